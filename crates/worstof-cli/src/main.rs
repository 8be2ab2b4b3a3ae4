mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analytics::{CalibrateArgs, CorrelationArgs};
use commands::monte_carlo::{EvaluateArgs, SimulateArgs};
use commands::payoff::PayoffArgs;
use commands::performance::{PerformanceArgs, RebaseArgs, WorstOfArgs};

/// Risk analysis for worst-of barrier certificates
#[derive(Parser)]
#[command(
    name = "wof",
    version,
    about = "Risk analysis for worst-of barrier certificates",
    long_about = "A CLI for analysing worst-of multi-underlying barrier certificates. \
                  Computes performance since strike, selects the worst-of underlying, \
                  simulates its price paths, estimates the probability of finishing \
                  above the barrier, and samples the redemption profile."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Performance since strike and barrier status of every underlying
    Performance(PerformanceArgs),
    /// The underlying with the lowest performance since strike
    WorstOf(WorstOfArgs),
    /// Price histories rebased to 100 at strike
    Rebase(RebaseArgs),
    /// Daily drift and volatility of the worst-of underlying
    Calibrate(CalibrateArgs),
    /// Correlation matrix of daily returns
    Correlation(CorrelationArgs),
    /// Simulate worst-of price paths and the barrier probability
    Simulate(SimulateArgs),
    /// Redemption profile against worst-of performance
    Payoff(PayoffArgs),
    /// Run the full certificate evaluation
    Evaluate(EvaluateArgs),
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
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Performance(args) => commands::performance::run_performance(args),
        Commands::WorstOf(args) => commands::performance::run_worst_of(args),
        Commands::Rebase(args) => commands::performance::run_rebase(args),
        Commands::Calibrate(args) => commands::analytics::run_calibrate(args),
        Commands::Correlation(args) => commands::analytics::run_correlation(args),
        Commands::Simulate(args) => commands::monte_carlo::run_simulate(args),
        Commands::Payoff(args) => commands::payoff::run_payoff(args),
        Commands::Evaluate(args) => commands::monte_carlo::run_evaluate(args),
        Commands::Version => {
            println!("wof {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
