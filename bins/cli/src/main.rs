//! EcoTrack command-line calculator.
//!
//! Runs one KDV or budget calculation and prints the result as JSON on
//! stdout. Logs go to stderr.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ecotrack_shared::AppConfig;
use ecotrack_shared::config::LoggingConfig;

use commands::{BudgetCommands, KdvCommands};

#[derive(Parser)]
#[command(
    name = "ecotrack",
    version,
    about = "KDV and budget calculations for EcoTrack",
    long_about = "Computes Turkish VAT (KDV) breakdowns, suggests KDV rates for receipt \
                  lines, and allocates and evaluates category budgets. Results are \
                  printed as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// KDV (VAT) calculations
    #[command(subcommand)]
    Kdv(KdvCommands),

    /// Budget allocation and evaluation
    #[command(subcommand)]
    Budget(BudgetCommands),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);
    debug!(filter = %config.logging.filter, "Configuration loaded");

    let output = match cli.command {
        Commands::Kdv(command) => commands::run_kdv(command, &config)?,
        Commands::Budget(command) => commands::run_budget(command, &config)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let json_layer = logging.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!logging.json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
