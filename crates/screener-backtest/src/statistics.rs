//! Per-checkpoint outcomes and per-threshold statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// How per-period averages are combined across checkpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodAggregation {
    /// Mean of the period averages
    #[default]
    Mean,
    /// Sum of the period averages
    Sum,
}

impl PeriodAggregation {
    fn combine(self, periods: &[f64]) -> f64 {
        if periods.is_empty() {
            return 0.0;
        }
        match self {
            PeriodAggregation::Mean => periods.mean(),
            PeriodAggregation::Sum => periods.iter().sum(),
        }
    }
}

/// Score at a checkpoint and the return realised over the holding window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub score: i32,
    pub forward_return_pct: f64,
}

/// Every valid outcome at one checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointOutcome {
    pub date: NaiveDate,
    /// Symbols with enough history and forward data, in symbol order
    pub outcomes: Vec<SymbolOutcome>,
    /// Symbols with too few bars before the checkpoint
    pub skipped_history: usize,
    /// Symbols without a bar in the holding window or with a zero start close
    pub skipped_no_forward: usize,
}

impl CheckpointOutcome {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            outcomes: Vec::new(),
            skipped_history: 0,
            skipped_no_forward: 0,
        }
    }

    /// Outcomes scoring at least `threshold`.
    pub fn picks(&self, threshold: i32) -> impl Iterator<Item = &SymbolOutcome> {
        self.outcomes.iter().filter(move |o| o.score >= threshold)
    }

    /// Average forward return over every valid outcome.
    pub fn market_return(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            return None;
        }
        Some(self.outcomes.iter().map(|o| o.forward_return_pct).mean())
    }
}

/// Pick performance against the market for one score threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub threshold: i32,
    pub win_rate: f64,
    pub avg_pick_return_pct: f64,
    pub avg_market_return_pct: f64,
    pub alpha_pct: f64,
    pub trade_count: usize,
    pub periods_with_picks: usize,
}

impl ThresholdResult {
    /// Result with no qualifying periods.
    pub fn empty(threshold: i32) -> Self {
        Self {
            threshold,
            win_rate: 0.0,
            avg_pick_return_pct: 0.0,
            avg_market_return_pct: 0.0,
            alpha_pct: 0.0,
            trade_count: 0,
            periods_with_picks: 0,
        }
    }

    /// Reduce checkpoint outcomes for one threshold.
    ///
    /// Checkpoints where nothing reaches the threshold contribute neither
    /// pick nor market returns.
    pub fn from_checkpoints(
        threshold: i32,
        checkpoints: &[CheckpointOutcome],
        aggregation: PeriodAggregation,
    ) -> Self {
        let mut pick_periods = Vec::new();
        let mut market_periods = Vec::new();
        let mut trades = 0usize;
        let mut winners = 0usize;

        for checkpoint in checkpoints {
            let returns: Vec<f64> = checkpoint
                .picks(threshold)
                .map(|o| o.forward_return_pct)
                .collect();
            if returns.is_empty() {
                continue;
            }
            let Some(market) = checkpoint.market_return() else {
                continue;
            };

            trades += returns.len();
            winners += returns.iter().filter(|r| **r > 0.0).count();
            pick_periods.push(returns.as_slice().mean());
            market_periods.push(market);
        }

        if trades == 0 {
            return Self::empty(threshold);
        }

        let avg_pick = aggregation.combine(&pick_periods);
        let avg_market = aggregation.combine(&market_periods);

        Self {
            threshold,
            win_rate: winners as f64 / trades as f64 * 100.0,
            avg_pick_return_pct: avg_pick,
            avg_market_return_pct: avg_market,
            alpha_pct: avg_pick - avg_market,
            trade_count: trades,
            periods_with_picks: pick_periods.len(),
        }
    }
}
