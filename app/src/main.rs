// In app/src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

mod pipeline;
mod summary;

use crate::pipeline::Pipeline;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Builds a P&L dashboard from monthly trading results.")]
struct Cli {
    /// Directory holding `base.toml` and the trading data file.
    #[arg(long, global = true, default_value = app_config::DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Computes the metrics and writes the charts, metrics file and HTML report.
    Run,

    /// Computes the metrics and prints them without writing anything.
    Summary {
        /// Print the metrics snapshot as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(cli.log_level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(config_dir = %cli.config_dir.display(), "Starting P&L dashboard");

    let pipeline = Pipeline::load(&cli.config_dir)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => handle_run(&pipeline)?,
        Commands::Summary { json } => handle_summary(&pipeline, json)?,
    }

    tracing::info!("P&L dashboard has finished successfully.");

    Ok(())
}

fn handle_run(pipeline: &Pipeline) -> Result<()> {
    let analysis = pipeline.analyze()?;
    summary::print_metrics_summary(&analysis.primary().metrics, pipeline.currency_symbol());

    match pipeline.publish(&analysis) {
        Ok(report) => {
            println!("\nReport generated: {}", report.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to write the dashboard artifacts.");
            Err(e)
        }
    }
}

fn handle_summary(pipeline: &Pipeline, json: bool) -> Result<()> {
    let analysis = pipeline.analyze()?;
    let metrics = &analysis.primary().metrics;
    if json {
        println!("{}", serde_json::to_string_pretty(metrics)?);
    } else {
        summary::print_metrics_summary(metrics, pipeline.currency_symbol());
        summary::print_account_table(&analysis.accounts, pipeline.currency_symbol());
        summary::print_platform_table(&analysis.portfolio, pipeline.currency_symbol());
    }
    Ok(())
}
