//! gepa - reflective prompt evolution from the command line
//!
//! - `gepa optimize` evolves an instruction against training and validation
//!   sentences and saves the best one
//! - `gepa apply` runs a saved instruction over a sentence file

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod dataset;
mod error;

use commands::{apply, optimize};
use config::CliConfig;
use error::CliResult;

/// gepa CLI application
#[derive(Parser)]
#[command(name = "gepa")]
#[command(about = "Evolve prompt instructions with reflective mutation and Pareto merging", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GEPA_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Optimize an instruction
    Optimize(optimize::OptimizeArgs),

    /// Run a saved instruction over a dataset
    Apply(apply::ApplyArgs),
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Optimize(args) => optimize::execute(args, &config).await,
        Commands::Apply(args) => apply::execute(args, &config).await,
    }
}
