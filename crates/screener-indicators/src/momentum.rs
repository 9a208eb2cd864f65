//! Momentum indicators.

use screener_core::traits::{Indicator, MultiOutputIndicator};
use screener_core::NEUTRAL_RSI;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;
use crate::simd;

/// Relative Strength Index (RSI).
///
/// Average gain and average loss are simple means over the trailing
/// `period` close-to-close changes. A window without losses reads as the
/// neutral 50 rather than 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return NEUTRAL_RSI;
        }
        let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
        if rsi.is_finite() {
            rsi.clamp(0.0, 100.0)
        } else {
            NEUTRAL_RSI
        }
    }

    /// RSI as of the last value, neutral when it cannot be computed.
    pub fn last_or_neutral(&self, data: &[f64]) -> f64 {
        self.last(data).unwrap_or(NEUTRAL_RSI)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses) = simd::split_deltas(data);
        let period_f64 = self.period as f64;

        gains
            .windows(self.period)
            .zip(losses.windows(self.period))
            .map(|(g, l)| Self::from_averages(simd::sum(g) / period_f64, simd::sum(l) / period_f64))
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Built from first-bar-seeded EMAs, so it produces one output per input
/// bar.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let fast_ema = self.fast.calculate(data);
        let slow_ema = self.slow.calculate(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = self.signal.calculate(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounded() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0 + (i as f64 * 0.13).cos() * 3.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len() - 14);
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_is_neutral() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        // No losses in the window: clamped to neutral
        assert_eq!(result[0], NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_short_history_is_neutral() {
        let rsi = Rsi::default();
        let data: Vec<f64> = (0..14).map(|i| 100.0 - i as f64).collect();
        assert!(rsi.calculate(&data).is_empty());
        assert_eq!(rsi.last_or_neutral(&data), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_known_value() {
        let rsi = Rsi::new(2);
        // deltas over last two: +2, -1 => avg gain 1, avg loss 0.5, RS 2
        let data = vec![10.0, 12.0, 11.0];
        let value = rsi.last(&data).unwrap();
        assert!((value - (100.0 - 100.0 / 3.0)).abs() < 1e-10);
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), data.len());
        // In an uptrend, MACD should be positive
        let last = result.last().unwrap();
        assert!(last.macd > 0.0);
        assert!((last.histogram - (last.macd - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let macd = Macd::new();
        let last = macd.last(&vec![100.0; 300]).unwrap();
        assert_eq!(last.macd, 0.0);
        assert_eq!(last.signal, 0.0);
    }

    #[test]
    fn test_macd_empty() {
        assert!(Macd::new().calculate(&[]).is_empty());
    }
}
