//! Per-evaluation indicator and consistency snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral RSI value used whenever RSI cannot be computed.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Trend classification of the last close against the 50/200 averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Trend {
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    #[serde(rename = "Uptrend")]
    Uptrend,
    #[default]
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Downtrend")]
    Downtrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
}

impl Trend {
    /// Uptrend or Strong Uptrend.
    pub fn is_uptrend(&self) -> bool {
        matches!(self, Trend::Uptrend | Trend::StrongUptrend)
    }

    /// Downtrend or Strong Downtrend.
    pub fn is_downtrend(&self) -> bool {
        matches!(self, Trend::Downtrend | Trend::StrongDowntrend)
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::StrongUptrend => "Strong Uptrend",
            Trend::Uptrend => "Uptrend",
            Trend::Neutral => "Neutral",
            Trend::Downtrend => "Downtrend",
            Trend::StrongDowntrend => "Strong Downtrend",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar shape used for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Indicator values for one symbol as of its last bar.
///
/// `None` means the indicator had insufficient history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Date of the last bar used
    pub as_of: Option<NaiveDate>,
    /// Last close
    pub last_close: f64,
    /// RSI(14), neutral 50 when not computable
    pub rsi: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
    /// MACD line (EMA12 - EMA26)
    pub macd: Option<f64>,
    /// EMA9 of the MACD line
    pub macd_signal: Option<f64>,
    /// Lowest low of the trailing window
    pub support: Option<f64>,
    /// Highest high of the trailing window
    pub resistance: Option<f64>,
    pub trend: Trend,
    pub golden_cross: bool,
    pub volume_spike: bool,
    pub volume_avg_20: Option<f64>,
    /// Last 30 closes, oldest first
    pub sparkline: Vec<f64>,
    /// Last 252 bars for charting
    pub history: Vec<ChartBar>,
}

impl IndicatorSnapshot {
    /// Snapshot of an empty series.
    pub fn empty() -> Self {
        Self {
            as_of: None,
            last_close: 0.0,
            rsi: NEUTRAL_RSI,
            sma_50: None,
            sma_200: None,
            ema_50: None,
            ema_200: None,
            macd: None,
            macd_signal: None,
            support: None,
            resistance: None,
            trend: Trend::Neutral,
            golden_cross: false,
            volume_spike: false,
            volume_avg_20: None,
            sparkline: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Check if the snapshot came from an empty series.
    pub fn is_empty(&self) -> bool {
        self.as_of.is_none()
    }

    /// Last close is above the 50 period EMA.
    pub fn above_ema_50(&self) -> bool {
        self.ema_50.is_some_and(|ema| self.last_close > ema)
    }

    /// MACD line is above its signal line.
    pub fn macd_bullish(&self) -> bool {
        matches!((self.macd, self.macd_signal), (Some(m), Some(s)) if m > s)
    }
}

impl Default for IndicatorSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Month-over-month return statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsistencySnapshot {
    /// Percent of months with a positive return
    pub win_rate: f64,
    pub avg_monthly_return_pct: f64,
    pub monthly_volatility_pct: f64,
    /// Number of monthly returns; `None` when there was too little data
    pub months_analyzed: Option<usize>,
}

impl ConsistencySnapshot {
    /// All-zero snapshot used for short or degenerate series.
    pub fn zeroed() -> Self {
        Self::default()
    }
}
