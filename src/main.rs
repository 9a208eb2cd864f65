//! Equity screener CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::load_config;
use screener_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    let log_level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.is_json();
    let _guard = setup_logging(&log_level, json, config.logging.file.as_deref().map(Path::new));

    match cli.command {
        Commands::Screen(args) => cli::commands::screen::run(args, &config).await,
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config).await,
        Commands::Suggest(args) => cli::commands::suggest::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref(), &config),
    }
}
