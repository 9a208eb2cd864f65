//! Composite opportunity score.
//!
//! Rules are applied in a fixed order and each hit records its point delta:
//!
//! 1. Trend: a downtrend costs points and skips the remaining trend and
//!    momentum bonuses; otherwise uptrend, above-EMA50 and golden cross add.
//! 2. Momentum: RSI inside the healthy band during an uptrend, MACD above
//!    its signal.
//! 3. Value: low positive P/E, quarterly dividends.
//! 4. Consistency: high monthly win rate.

use screener_core::{
    ConsistencySnapshot, FundamentalSnapshot, IndicatorSnapshot, ScoreResult, ScreenerError,
};
use serde::{Deserialize, Serialize};

/// Point values and bounds for each rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub downtrend_points: i32,
    pub uptrend_points: i32,
    pub above_ema_points: i32,
    pub golden_cross_points: i32,
    /// RSI must be strictly above this
    pub rsi_lower: f64,
    /// RSI must be strictly below this
    pub rsi_upper: f64,
    pub healthy_rsi_points: i32,
    pub macd_points: i32,
    /// P/E must be strictly between 0 and this
    pub max_pe: f64,
    pub low_pe_points: i32,
    pub quarterly_dividend_points: i32,
    /// Win rate must be strictly above this
    pub min_win_rate: f64,
    pub consistency_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            downtrend_points: -5,
            uptrend_points: 1,
            above_ema_points: 1,
            golden_cross_points: 3,
            rsi_lower: 40.0,
            rsi_upper: 70.0,
            healthy_rsi_points: 1,
            macd_points: 1,
            max_pe: 15.0,
            low_pe_points: 2,
            quarterly_dividend_points: 2,
            min_win_rate: 60.0,
            consistency_points: 3,
        }
    }
}

impl ScoringRules {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        if !(0.0..=100.0).contains(&self.rsi_lower) || !(0.0..=100.0).contains(&self.rsi_upper) {
            return Err(ScreenerError::Validation(
                "RSI bounds must be between 0 and 100".into(),
            ));
        }
        if self.rsi_lower >= self.rsi_upper {
            return Err(ScreenerError::Validation(
                "RSI lower bound must be below the upper bound".into(),
            ));
        }
        if self.max_pe <= 0.0 {
            return Err(ScreenerError::Validation("max_pe must be positive".into()));
        }
        if !(0.0..=100.0).contains(&self.min_win_rate) {
            return Err(ScreenerError::Validation(
                "min_win_rate must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// Pure scoring function over the three snapshots.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score one symbol. Identical inputs always give identical output.
    pub fn score(
        &self,
        indicators: &IndicatorSnapshot,
        consistency: &ConsistencySnapshot,
        fundamentals: &FundamentalSnapshot,
    ) -> ScoreResult {
        let rules = &self.rules;
        let mut result = ScoreResult::new();
        let trend = indicators.trend;

        if trend.is_downtrend() {
            result.add("Downtrend", rules.downtrend_points);
        } else {
            if trend.is_uptrend() {
                result.add(trend.as_str(), rules.uptrend_points);
            }
            if indicators.above_ema_50() {
                result.add("Above EMA 50", rules.above_ema_points);
            }
            if indicators.golden_cross {
                result.add("Golden Cross", rules.golden_cross_points);
            }

            let rsi = indicators.rsi;
            if rsi > rules.rsi_lower && rsi < rules.rsi_upper && trend.is_uptrend() {
                result.add("Healthy RSI", rules.healthy_rsi_points);
            }
            if indicators.macd_bullish() {
                result.add("MACD Bullish", rules.macd_points);
            }
        }

        if let Some(pe) = fundamentals.pe_ratio {
            if pe > 0.0 && pe < rules.max_pe {
                result.add(format!("Low P/E ({:.2})", pe), rules.low_pe_points);
            }
        }
        if fundamentals.pays_quarterly() {
            result.add("Quarterly Dividend", rules.quarterly_dividend_points);
        }

        if consistency.win_rate > rules.min_win_rate {
            result.add(
                format!("Consistent Gainer ({:.0}% win rate)", consistency.win_rate),
                rules.consistency_points,
            );
        }

        result
    }
}
