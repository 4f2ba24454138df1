//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - peephole rewriting for guarded quantum circuits",
        style("qrew").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrew-ir     Instruction model and per-qubit wire graph");
    println!("  qrew-opt    Rewrite rules and fixed-point driver");
    println!("  qrew-qasm3  OpenQASM 3 subset reader and writer");
    println!("  qrew-cli    Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
}
