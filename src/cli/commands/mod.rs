//! CLI command implementations.

pub mod backtest;
pub mod screen;
pub mod suggest;
pub mod validate;

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_core::Universe;
use screener_data::{load_fundamentals, load_universe, CsvDirectorySource, FundamentalsMap};
use screener_indicators::{ConsistencyAnalyzer, IndicatorEngine};
use screener_scoring::{DividendScorer, Screener, ScoringEngine};
use std::path::PathBuf;
use tracing::info;

use crate::cli::DataArgs;

/// Build the scoring pipeline from configuration.
pub fn build_screener(config: &AppConfig) -> Screener {
    let scoring = &config.scoring;
    Screener::new(
        IndicatorEngine::new(scoring.indicators.clone()),
        ConsistencyAnalyzer::new(scoring.consistency_min_bars),
        ScoringEngine::new(scoring.rules.clone()),
        DividendScorer::new(scoring.dividend.clone()),
    )
}

/// Load prices and fundamentals, command line paths taking precedence.
pub async fn load_data(args: &DataArgs, config: &AppConfig) -> Result<Universe> {
    let price_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.price_dir));
    if !price_dir.is_dir() {
        anyhow::bail!(
            "Price directory '{}' does not exist. Provide a directory of <SYMBOL>.csv files (e.g. --data ./data/prices)",
            price_dir.display()
        );
    }
    let source = CsvDirectorySource::new(&price_dir)?;

    let fundamentals_path = args
        .fundamentals
        .clone()
        .or_else(|| config.data.fundamentals.as_ref().map(PathBuf::from));
    let fundamentals = match fundamentals_path {
        Some(path) => load_fundamentals(&path)
            .await
            .with_context(|| format!("Failed to load fundamentals from {}", path.display()))?,
        None => {
            info!("No fundamentals file configured; value rules will not fire");
            FundamentalsMap::new()
        }
    };

    let only = (!args.symbols.is_empty()).then_some(args.symbols.as_slice());
    let universe = load_universe(&source, &fundamentals, only)
        .await
        .context("Failed to load price data")?;
    Ok(universe)
}
