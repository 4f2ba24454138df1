//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use qrew_ir::Program;
use qrew_qasm3::{emit, parse};

/// On-disk program formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Qasm,
    Json,
}

impl Format {
    /// Format for a path; anything but `.json` is read as text.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if ext.eq_ignore_ascii_case("json") {
            Format::Json
        } else {
            Format::Qasm
        }
    }
}

/// Load a program from a text or JSON file.
pub fn load_program(path: &str) -> Result<Program> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    match Format::from_path(path) {
        Format::Qasm => parse(&source).with_context(|| format!("Failed to parse {path}")),
        Format::Json => serde_json::from_str(&source)
            .with_context(|| format!("Failed to read JSON program from {path}")),
    }
}

/// Render a program in the given format.
pub fn render_program(program: &Program, format: Format) -> Result<String> {
    match format {
        Format::Qasm => Ok(emit(program)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(program)
                .context("Failed to serialize program")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write a program to a file, format chosen by extension.
pub fn save_program(program: &Program, path: &str) -> Result<()> {
    let content = render_program(program, Format::from_path(path))?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
    Ok(())
}
