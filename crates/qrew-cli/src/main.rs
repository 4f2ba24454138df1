//! qrew command-line interface.
//!
//! ```text
//! qrew optimize -i circuit.qasm -o out.qasm --rules null-gate,h-sandwich --stats
//! qrew rules
//! qrew version
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{optimize, rules, version};

/// qrew - peephole rewriting for guarded quantum circuits
#[derive(Parser)]
#[command(name = "qrew")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a program until no rule applies
    Optimize {
        /// Input file (.qasm, .qasm3 or .json)
        #[arg(short, long)]
        input: String,

        /// Output file; the result goes to stdout if omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Comma-separated rule families, "all" or "none"
        #[arg(short, long)]
        rules: Option<String>,

        /// YAML optimizer configuration
        #[arg(short, long)]
        config: Option<String>,

        /// Skip rules whose window is deeper than this
        #[arg(long)]
        max_depth: Option<usize>,

        /// Stop after this many rule applications
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Keep the original qubit names instead of id0, id1, ...
        #[arg(long)]
        keep_names: bool,

        /// Print optimization statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// List the rule families
    Rules,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Optimize {
            input,
            output,
            rules,
            config,
            max_depth,
            max_iterations,
            keep_names,
            stats,
        } => optimize::execute(&optimize::OptimizeArgs {
            input,
            output,
            rules,
            config,
            max_depth,
            max_iterations,
            keep_names,
            stats,
        }),

        Commands::Rules => {
            rules::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
