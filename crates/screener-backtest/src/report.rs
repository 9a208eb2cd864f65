//! Backtest report generation.

use chrono::NaiveDate;
use screener_core::{ScreenerError, ScreenerResult};
use serde::{Deserialize, Serialize};

use crate::statistics::{CheckpointOutcome, ThresholdResult};
use crate::BacktestConfig;

/// Counts for one checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    pub date: NaiveDate,
    pub evaluated: usize,
    pub skipped_history: usize,
    pub skipped_no_forward: usize,
}

impl From<&CheckpointOutcome> for CheckpointSummary {
    fn from(outcome: &CheckpointOutcome) -> Self {
        Self {
            date: outcome.date,
            evaluated: outcome.outcomes.len(),
            skipped_history: outcome.skipped_history,
            skipped_no_forward: outcome.skipped_no_forward,
        }
    }
}

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration used
    pub config: BacktestConfig,
    /// Reference date the checkpoints count back from
    pub as_of: NaiveDate,
    /// Symbols in the universe
    pub symbols: usize,
    pub checkpoints: Vec<CheckpointSummary>,
    /// One row per threshold, ascending
    pub results: Vec<ThresholdResult>,
}

#[derive(Serialize)]
struct CsvRow {
    threshold: i32,
    win_rate: f64,
    avg_return: f64,
    market_return: f64,
    alpha: f64,
    trade_count: usize,
}

impl BacktestReport {
    /// Threshold with the highest alpha among those that traded.
    pub fn best(&self) -> Option<&ThresholdResult> {
        self.results
            .iter()
            .filter(|r| r.trade_count > 0)
            .max_by(|a, b| a.alpha_pct.total_cmp(&b.alpha_pct))
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                  WALK-FORWARD BACKTEST                     \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  As Of:               {}\n", self.as_of));
        s.push_str(&format!("  Symbols:             {}\n", self.symbols));
        s.push_str(&format!("  Checkpoints:         {}\n", self.checkpoints.len()));
        if let (Some(first), Some(last)) = (self.checkpoints.first(), self.checkpoints.last()) {
            s.push_str(&format!("  Range:               {} .. {}\n", first.date, last.date));
        }
        s.push_str(&format!(
            "  Holding Days:        {}\n",
            self.config.holding_days
        ));
        s.push_str(&format!(
            "  Aggregation:         {:?}\n",
            self.config.aggregation
        ));
        s.push('\n');

        s.push_str("THRESHOLDS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("  Score   Win Rate   Avg Return   Market    Alpha   Trades\n");
        for r in &self.results {
            s.push_str(&format!(
                "  {:>5}   {:>7.1}%   {:>9.2}%   {:>6.2}%  {:>6.2}%   {:>6}\n",
                format!(">={}", r.threshold),
                r.win_rate,
                r.avg_pick_return_pct,
                r.avg_market_return_pct,
                r.alpha_pct,
                r.trade_count
            ));
        }
        s.push('\n');

        if let Some(best) = self.best() {
            s.push_str(&format!(
                "  Best Threshold:      {} (alpha {:.2}%)\n\n",
                best.threshold, best.alpha_pct
            ));
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the threshold table to CSV.
    pub fn to_csv(&self) -> ScreenerResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for r in &self.results {
            writer
                .serialize(CsvRow {
                    threshold: r.threshold,
                    win_rate: r.win_rate,
                    avg_return: r.avg_pick_return_pct,
                    market_return: r.avg_market_return_pct,
                    alpha: r.alpha_pct,
                    trade_count: r.trade_count,
                })
                .map_err(|e| ScreenerError::Serialization(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::Serialization(e.to_string()))
    }
}
