//! Validate configuration command.

use anyhow::Result;
use screener_config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

pub fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating configuration: {} (optional)", DEFAULT_CONFIG_FILE),
    }

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Price directory: {}", config.data.price_dir);
    println!(
        "Backtest thresholds: {:?} over {} months",
        config.backtest.thresholds, config.backtest.months_back
    );
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
