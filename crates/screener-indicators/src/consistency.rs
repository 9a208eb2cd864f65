//! Month-over-month return consistency.

use chrono::Datelike;
use screener_core::{ConsistencySnapshot, PriceSeries};
use statrs::statistics::Statistics;

/// Minimum bars before monthly statistics are attempted.
pub const MIN_BARS: usize = 30;

/// Computes win rate, mean and volatility of monthly returns.
#[derive(Debug, Clone)]
pub struct ConsistencyAnalyzer {
    min_bars: usize,
}

impl Default for ConsistencyAnalyzer {
    fn default() -> Self {
        Self { min_bars: MIN_BARS }
    }
}

impl ConsistencyAnalyzer {
    pub fn new(min_bars: usize) -> Self {
        Self { min_bars }
    }

    /// Analyze a series; short or single-month series give a zeroed snapshot.
    pub fn analyze(&self, series: &PriceSeries) -> ConsistencySnapshot {
        if series.len() < self.min_bars {
            return ConsistencySnapshot::zeroed();
        }

        let returns = Self::monthly_returns(series);
        if returns.is_empty() {
            return ConsistencySnapshot::zeroed();
        }

        let months = returns.len();
        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let avg = returns.iter().mean();
        let volatility = if months > 1 {
            returns.iter().std_dev()
        } else {
            0.0
        };

        ConsistencySnapshot {
            win_rate: wins as f64 / months as f64 * 100.0,
            avg_monthly_return_pct: avg,
            monthly_volatility_pct: volatility,
            months_analyzed: Some(months),
        }
    }

    /// Percent changes between consecutive month-end closes.
    ///
    /// The month-end close is the last observed close in each calendar
    /// month. The first month has no return. Calendar months without bars
    /// are not filled, so a return can span a gap and still counts once.
    pub fn monthly_returns(series: &PriceSeries) -> Vec<f64> {
        let mut month_ends: Vec<((i32, u32), f64)> = Vec::new();
        for bar in series.iter() {
            let key = (bar.date.year(), bar.date.month());
            match month_ends.last_mut() {
                Some((last_key, close)) if *last_key == key => *close = bar.close,
                _ => month_ends.push((key, bar.close)),
            }
        }

        month_ends
            .windows(2)
            .filter(|w| w[0].1 != 0.0)
            .map(|w| (w[1].1 - w[0].1) / w[0].1 * 100.0)
            .filter(|r| r.is_finite())
            .collect()
    }
}
