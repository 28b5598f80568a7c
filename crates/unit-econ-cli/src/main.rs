mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::economics::EconomicsArgs;
use commands::reference::DefaultsArgs;

/// Marketplace SKU unit economics calculations
#[derive(Parser)]
#[command(
    name = "uecon",
    version,
    about = "Marketplace SKU unit economics calculations",
    long_about = "A CLI for per-unit marketplace profitability analysis with decimal \
                  precision. Computes the full profit decomposition for a SKU listing \
                  (commission, logistics, advertising, returns, tax) and the breakeven \
                  sale price."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full per-unit profit decomposition for a SKU
    Compute(EconomicsArgs),
    /// Find the breakeven sale price for a SKU
    Breakeven(EconomicsArgs),
    /// Look up reference cost defaults for a marketplace and scheme
    Defaults(DefaultsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::economics::run_compute(args),
        Commands::Breakeven(args) => commands::economics::run_breakeven(args),
        Commands::Defaults(args) => commands::reference::run_defaults(args),
        Commands::Version => {
            println!("uecon {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
