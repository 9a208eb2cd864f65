//! Walk-forward simulator.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use screener_core::{DataError, ScreenerError, ScreenerResult, Universe, UniverseEntry};
use screener_indicators::{ConsistencyAnalyzer, IndicatorEngine};
use screener_scoring::ScoringEngine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::report::{BacktestReport, CheckpointSummary};
use crate::statistics::{CheckpointOutcome, PeriodAggregation, SymbolOutcome, ThresholdResult};

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Score thresholds to evaluate
    pub thresholds: Vec<i32>,
    /// How far back the first checkpoint lies, in 30 day months
    pub months_back: u32,
    /// Days between checkpoints
    pub checkpoint_interval_days: i64,
    /// Days a pick is held after its checkpoint
    pub holding_days: i64,
    /// Bars required before a checkpoint for a symbol to be scored
    pub min_history_bars: usize,
    pub aggregation: PeriodAggregation,
    /// Reference date; the latest bar in the universe when unset
    pub as_of: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![5, 6, 7, 8],
            months_back: 6,
            checkpoint_interval_days: 15,
            holding_days: 30,
            min_history_bars: 60,
            aggregation: PeriodAggregation::Mean,
            as_of: None,
        }
    }
}

impl BacktestConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> ScreenerResult<()> {
        if self.thresholds.is_empty() {
            return Err(ScreenerError::Validation(
                "at least one threshold is required".into(),
            ));
        }
        if self.months_back == 0 {
            return Err(ScreenerError::Validation(
                "months_back must be positive".into(),
            ));
        }
        if self.checkpoint_interval_days <= 0 {
            return Err(ScreenerError::Validation(
                "checkpoint_interval_days must be positive".into(),
            ));
        }
        if self.holding_days <= 0 {
            return Err(ScreenerError::Validation(
                "holding_days must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Checkpoint dates before `as_of`, oldest first.
    pub fn checkpoints(&self, as_of: NaiveDate) -> Vec<NaiveDate> {
        let interval = self.checkpoint_interval_days.max(1);
        let count = (i64::from(self.months_back) * 30 / interval).max(1);
        (1..=count)
            .rev()
            .map(|i| as_of - Duration::days(interval * i))
            .collect()
    }
}

/// Replays the scoring pipeline at past checkpoints and measures the
/// forward return of each threshold's picks.
///
/// Only bars strictly before a checkpoint are scored; the holding window
/// is read afterwards.
#[derive(Debug, Clone, Default)]
pub struct WalkForwardSimulator {
    config: BacktestConfig,
    engine: IndicatorEngine,
    consistency: ConsistencyAnalyzer,
    scoring: ScoringEngine,
}

impl WalkForwardSimulator {
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Use a specific scoring pipeline.
    pub fn with_pipeline(
        mut self,
        engine: IndicatorEngine,
        consistency: ConsistencyAnalyzer,
        scoring: ScoringEngine,
    ) -> Self {
        self.engine = engine;
        self.consistency = consistency;
        self.scoring = scoring;
        self
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the backtest over the universe.
    pub fn run(&self, universe: &Universe) -> ScreenerResult<BacktestReport> {
        self.config.validate()?;

        let as_of = self
            .config
            .as_of
            .or_else(|| universe.latest_date())
            .ok_or_else(|| DataError::NoDataAvailable("universe has no price bars".into()))?;

        let dates = self.config.checkpoints(as_of);
        info!(
            symbols = universe.len(),
            checkpoints = dates.len(),
            %as_of,
            "Starting walk-forward backtest"
        );

        let entries = universe.entries();
        let checkpoints: Vec<CheckpointOutcome> = dates
            .iter()
            .map(|&date| self.evaluate_checkpoint(&entries, date))
            .collect();

        let mut thresholds = self.config.thresholds.clone();
        thresholds.sort_unstable();
        thresholds.dedup();

        let results: Vec<ThresholdResult> = thresholds
            .iter()
            .map(|&t| ThresholdResult::from_checkpoints(t, &checkpoints, self.config.aggregation))
            .collect();

        for result in &results {
            info!(
                threshold = result.threshold,
                trades = result.trade_count,
                win_rate = result.win_rate,
                alpha = result.alpha_pct,
                "Threshold evaluated"
            );
        }

        Ok(BacktestReport {
            config: self.config.clone(),
            as_of,
            symbols: universe.len(),
            checkpoints: checkpoints.iter().map(CheckpointSummary::from).collect(),
            results,
        })
    }

    /// Score every symbol at one checkpoint. Symbols are evaluated in
    /// parallel and the outcomes returned in symbol order.
    pub fn evaluate_checkpoint(&self, entries: &[&UniverseEntry], date: NaiveDate) -> CheckpointOutcome {
        let evaluated: Vec<Evaluation> = entries
            .par_iter()
            .map(|entry| self.evaluate_symbol(entry, date))
            .collect();

        let mut checkpoint = CheckpointOutcome::empty(date);
        for evaluation in evaluated {
            match evaluation {
                Evaluation::Outcome(outcome) => checkpoint.outcomes.push(outcome),
                Evaluation::InsufficientHistory => checkpoint.skipped_history += 1,
                Evaluation::NoForwardData => checkpoint.skipped_no_forward += 1,
            }
        }

        debug!(
            %date,
            valid = checkpoint.outcomes.len(),
            skipped_history = checkpoint.skipped_history,
            skipped_no_forward = checkpoint.skipped_no_forward,
            "Checkpoint evaluated"
        );
        checkpoint
    }

    fn evaluate_symbol(&self, entry: &UniverseEntry, date: NaiveDate) -> Evaluation {
        let symbol = &entry.series.symbol;
        let history = entry.series.truncated_before(date);
        if history.len() < self.config.min_history_bars {
            return Evaluation::InsufficientHistory;
        }

        let Some(start) = history.last().map(|b| b.close) else {
            return Evaluation::InsufficientHistory;
        };
        let horizon = date + Duration::days(self.config.holding_days);
        let Some(end) = entry.series.last_between(date, horizon).map(|b| b.close) else {
            debug!(%symbol, %date, "No bar inside holding window");
            return Evaluation::NoForwardData;
        };
        if start == 0.0 {
            debug!(%symbol, %date, "Zero start close");
            return Evaluation::NoForwardData;
        }

        let indicators = self.engine.analyze(&history);
        let consistency = self.consistency.analyze(&history);
        let score = self
            .scoring
            .score(&indicators, &consistency, &entry.fundamentals);

        Evaluation::Outcome(SymbolOutcome {
            symbol: symbol.clone(),
            score: score.score,
            forward_return_pct: (end - start) / start * 100.0,
        })
    }
}

enum Evaluation {
    Outcome(SymbolOutcome),
    InsufficientHistory,
    NoForwardData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::{FundamentalSnapshot, PriceBar, PriceSeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(symbol: &str, start: NaiveDate, closes: impl IntoIterator<Item = f64>) -> PriceSeries {
        let bars = closes
            .into_iter()
            .enumerate()
            .map(|(i, c)| PriceBar::from_close(start + Duration::days(i as i64), c, 1000.0))
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    fn universe(series: Vec<PriceSeries>) -> Universe {
        let mut universe = Universe::new();
        for s in series {
            universe.insert(s, FundamentalSnapshot::default());
        }
        universe
    }

    #[test]
    fn test_checkpoint_schedule() {
        let config = BacktestConfig::default();
        let dates = config.checkpoints(date(2024, 12, 31));

        assert_eq!(dates.len(), 12);
        assert_eq!(dates[0], date(2024, 12, 31) - Duration::days(180));
        assert_eq!(dates[11], date(2024, 12, 16));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));

        let sparse = BacktestConfig {
            months_back: 1,
            checkpoint_interval_days: 90,
            ..Default::default()
        };
        assert_eq!(sparse.checkpoints(date(2024, 12, 31)), vec![date(2024, 10, 2)]);
    }

    #[test]
    fn test_forward_return_uses_last_bar_in_window() {
        let start = date(2024, 1, 1);
        // Close rises by 1 per day from 100
        let s = series("RISE", start, (0..200).map(|i| 100.0 + i as f64));
        let u = universe(vec![s]);
        let sim = WalkForwardSimulator::new(BacktestConfig {
            thresholds: vec![-100],
            ..Default::default()
        });

        let checkpoint_date = start + Duration::days(100);
        let entries = u.entries();
        let outcome = sim.evaluate_checkpoint(&entries, checkpoint_date);

        assert_eq!(outcome.outcomes.len(), 1);
        // Start: bar 99 (close 199); end: bar 130 (close 230)
        let expected = (230.0 - 199.0) / 199.0 * 100.0;
        assert!((outcome.outcomes[0].forward_return_pct - expected).abs() < 1e-9);
    }

    #[test]
    fn test_short_history_contributes_nothing() {
        let start = date(2024, 1, 1);
        let u = universe(vec![
            series("AAA", start, (0..50).map(|i| 10.0 + i as f64)),
            series("BBB", start, (0..50).map(|_| 20.0)),
        ]);
        let sim = WalkForwardSimulator::new(BacktestConfig {
            thresholds: vec![-100, 5],
            months_back: 1,
            ..Default::default()
        });

        let report = sim.run(&u).unwrap();
        assert!(report.checkpoints.iter().all(|c| c.evaluated == 0));
        assert!(report.checkpoints.iter().all(|c| c.skipped_history == 2));
        for result in &report.results {
            assert_eq!(result, &ThresholdResult::empty(result.threshold));
        }
    }

    #[test]
    fn test_run_with_all_symbols_picked() {
        let start = date(2024, 1, 1);
        let u = universe(vec![
            series("FLAT", start, (0..300).map(|_| 50.0)),
            series("RISE", start, (0..300).map(|i| 100.0 + i as f64)),
        ]);
        let sim = WalkForwardSimulator::new(BacktestConfig {
            thresholds: vec![-100, 100],
            months_back: 2,
            checkpoint_interval_days: 20,
            ..Default::default()
        });

        let report = sim.run(&u).unwrap();
        assert_eq!(report.as_of, start + Duration::days(299));
        assert_eq!(report.checkpoints.len(), 3);

        let everything = &report.results[0];
        assert_eq!(everything.threshold, -100);
        assert_eq!(everything.trade_count, 6);
        assert_eq!(everything.periods_with_picks, 3);
        // Every symbol is a pick, so picks equal the market
        assert!(everything.alpha_pct.abs() < 1e-9);
        assert!((everything.win_rate - 50.0).abs() < 1e-9);

        let nothing = &report.results[1];
        assert_eq!(nothing.trade_count, 0);
    }

    #[test]
    fn test_last_checkpoint_without_forward_data() {
        let start = date(2024, 1, 1);
        let u = universe(vec![series("RISE", start, (0..120).map(|i| 10.0 + i as f64))]);
        let sim = WalkForwardSimulator::new(BacktestConfig {
            thresholds: vec![-100],
            as_of: Some(start + Duration::days(200)),
            months_back: 2,
            checkpoint_interval_days: 30,
            ..Default::default()
        });

        let report = sim.run(&u).unwrap();
        // Checkpoints at day 140 and 170 lie past the data
        assert!(report.checkpoints.iter().all(|c| c.evaluated == 0));
        assert!(report.checkpoints.iter().all(|c| c.skipped_no_forward == 1));
        assert_eq!(report.results[0].trade_count, 0);
    }

    #[test]
    fn test_empty_universe_is_an_error() {
        let sim = WalkForwardSimulator::default();
        assert!(sim.run(&Universe::new()).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(BacktestConfig::default().validate().is_ok());
        let bad = BacktestConfig {
            thresholds: vec![],
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = BacktestConfig {
            checkpoint_interval_days: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
