//! Optimize command implementation.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use tracing::debug;

use qrew_opt::{OptimizationStats, Optimizer, OptimizerConfig, RuleSet};

use super::common::{Format, load_program, render_program, save_program};

/// Arguments of `qrew optimize`.
#[derive(Debug, Clone, Default)]
pub struct OptimizeArgs {
    pub input: String,
    pub output: Option<String>,
    pub rules: Option<String>,
    pub config: Option<String>,
    pub max_depth: Option<usize>,
    pub max_iterations: Option<usize>,
    pub keep_names: bool,
    pub stats: bool,
}

/// Execute the optimize command.
pub fn execute(args: &OptimizeArgs) -> Result<()> {
    let config = build_config(args)?;
    debug!(?config, "optimizer configuration");
    let optimizer = Optimizer::new(config)?;

    let program = load_program(&args.input)?;
    let (optimized, stats) = optimizer
        .optimize_with_stats(&program)
        .with_context(|| format!("Failed to optimize {}", args.input))?;

    let optimized = if args.keep_names {
        optimized
    } else {
        optimized.with_canonical_names()
    };

    match &args.output {
        Some(path) => {
            save_program(&optimized, path)?;
            eprintln!(
                "{} {} -> {}",
                style("✓").green().bold(),
                style(&args.input).green(),
                style(path).green()
            );
        }
        None => print!("{}", render_program(&optimized, Format::Qasm)?),
    }

    if args.stats {
        print_stats(&stats);
    }

    Ok(())
}

/// Merge the YAML file (if any) with the command-line overrides.
pub fn build_config(args: &OptimizeArgs) -> Result<OptimizerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {path}"))?;
            serde_yaml_ng::from_str(&text)
                .with_context(|| format!("Invalid optimizer config: {path}"))?
        }
        None => OptimizerConfig::default(),
    };

    if let Some(rules) = &args.rules {
        config.rules = rules.parse::<RuleSet>()?;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = Some(depth);
    }
    if let Some(iterations) = args.max_iterations {
        config.max_iterations = iterations;
    }

    Ok(config)
}

fn print_stats(stats: &OptimizationStats) {
    eprintln!("{}", style("Optimization statistics").cyan().bold());
    eprintln!("  Gates before:  {}", stats.gates_before);
    eprintln!("  Gates after:   {}", stats.gates_after);
    eprintln!("  Removed:       {}", style(stats.gates_removed()).yellow());
    eprintln!("  Applications:  {}", stats.iterations);
    for (rule, count) in &stats.applications {
        eprintln!("    {:<24} {count}", style(rule).dim());
    }
    if stats.hit_iteration_cap {
        eprintln!(
            "  {} stopped at the iteration cap before reaching a fixed point",
            style("!").yellow().bold()
        );
    }
}
