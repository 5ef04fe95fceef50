mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{BreakdownArgs, CompareArgs, ScheduleArgs};

/// Loan amortization schedules with decimal precision
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Loan amortization schedules with decimal precision",
    long_about = "A CLI for building fixed-rate loan amortization schedules with \
                  decimal precision. Supports month-by-month schedules, extra \
                  principal payment comparisons, and payment breakdowns."
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
    /// Build a month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Compare the nominal schedule against paying extra principal
    Compare(CompareArgs),
    /// Principal / interest breakdown and sampled chart series
    Breakdown(BreakdownArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Compare(args) => commands::loan::run_compare(args),
        Commands::Breakdown(args) => commands::loan::run_breakdown(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
