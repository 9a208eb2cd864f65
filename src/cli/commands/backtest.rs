//! Backtest command implementation.

use anyhow::Result;
use screener_backtest::{PeriodAggregation, WalkForwardSimulator};
use screener_config::AppConfig;
use screener_indicators::{ConsistencyAnalyzer, IndicatorEngine};
use screener_scoring::ScoringEngine;
use tracing::info;

use crate::cli::{Aggregation, BacktestArgs, OutputFormat};

use super::load_data;

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;
    let mut backtest = config.backtest.clone();
    if !args.thresholds.is_empty() {
        backtest.thresholds = args.thresholds.clone();
    }
    if let Some(months) = args.months_back {
        backtest.months_back = months;
    }
    if let Some(interval) = args.interval {
        backtest.checkpoint_interval_days = interval;
    }
    if let Some(days) = args.holding_days {
        backtest.holding_days = days;
    }
    if args.as_of.is_some() {
        backtest.as_of = args.as_of;
    }
    if let Some(aggregation) = args.aggregation {
        backtest.aggregation = match aggregation {
            Aggregation::Mean => PeriodAggregation::Mean,
            Aggregation::Sum => PeriodAggregation::Sum,
        };
    }
    backtest.validate()?;

    let universe = load_data(&args.data, config).await?;
    info!("Starting backtest over {} symbols", universe.len());

    let scoring = &config.scoring;
    let simulator = WalkForwardSimulator::new(backtest).with_pipeline(
        IndicatorEngine::new(scoring.indicators.clone()),
        ConsistencyAnalyzer::new(scoring.consistency_min_bars),
        ScoringEngine::new(scoring.rules.clone()),
    );
    let report = simulator.run(&universe)?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Csv => print!("{}", report.to_csv()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let is_csv = save_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let contents = if is_csv {
            report.to_csv()?
        } else {
            report.to_json()?
        };
        std::fs::write(save_path, contents)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
