//! Indicator snapshot engine.

use screener_core::traits::{Indicator, MultiOutputIndicator};
use screener_core::{ChartBar, IndicatorSnapshot, PriceSeries, ScreenerError, Trend};
use serde::{Deserialize, Serialize};

use crate::levels::{TrailingRange, VolumeStats};
use crate::momentum::{Macd, Rsi};
use crate::moving_average::{Ema, Sma};

/// Window lengths used by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub short_period: usize,
    pub long_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Bars scanned for support/resistance
    pub level_window: usize,
    pub volume_window: usize,
    /// Latest volume must exceed this multiple of the average to count as a spike
    pub volume_spike_multiple: f64,
    pub sparkline_len: usize,
    pub history_len: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            short_period: 50,
            long_period: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            level_window: 60,
            volume_window: 20,
            volume_spike_multiple: 2.0,
            sparkline_len: 30,
            history_len: 252,
        }
    }
}

impl IndicatorParams {
    /// Validate window lengths before building an engine.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        let windows = [
            ("rsi_period", self.rsi_period),
            ("short_period", self.short_period),
            ("long_period", self.long_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, n)| *n == 0) {
            return Err(ScreenerError::Validation(format!("{name} must be positive")));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ScreenerError::Validation(
                "macd_fast must be below macd_slow".into(),
            ));
        }
        if self.volume_spike_multiple <= 0.0 {
            return Err(ScreenerError::Validation(
                "volume_spike_multiple must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Computes an [`IndicatorSnapshot`] as of the last bar of a series.
///
/// The engine reads only the bars it is given; historical evaluation is
/// done by truncating the series first.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: IndicatorParams,
    rsi: Rsi,
    sma_short: Sma,
    sma_long: Sma,
    ema_short: Ema,
    ema_long: Ema,
    macd: Macd,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorParams::default())
    }
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self {
            rsi: Rsi::new(params.rsi_period),
            sma_short: Sma::new(params.short_period),
            sma_long: Sma::new(params.long_period),
            ema_short: Ema::new(params.short_period),
            ema_long: Ema::new(params.long_period),
            macd: Macd::with_periods(params.macd_fast, params.macd_slow, params.macd_signal),
            params,
        }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Build the snapshot. An empty series gives [`IndicatorSnapshot::empty`].
    pub fn analyze(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let Some(last) = series.last() else {
            return IndicatorSnapshot::empty();
        };

        let closes = series.closes();
        let last_close = last.close;

        let sma_50 = self.sma_short.last(&closes);
        let sma_200 = self.sma_long.last(&closes);
        let ema_50 = self.ema_short.last_warm(&closes);
        let ema_200 = self.ema_long.last_warm(&closes);
        let macd = self.macd.last(&closes);
        let range = TrailingRange::compute(&series.lows(), &series.highs(), self.params.level_window);
        let volume = VolumeStats::compute(
            &series.volumes(),
            self.params.volume_window,
            self.params.volume_spike_multiple,
        );

        let golden_cross = matches!((sma_50, sma_200), (Some(s), Some(l)) if s > l);

        IndicatorSnapshot {
            as_of: Some(last.date),
            last_close,
            rsi: self.rsi.last_or_neutral(&closes),
            sma_50,
            sma_200,
            ema_50,
            ema_200,
            macd: macd.map(|m| m.macd),
            macd_signal: macd.map(|m| m.signal),
            support: range.map(|r| r.support),
            resistance: range.map(|r| r.resistance),
            trend: classify_trend(last_close, ema_50, ema_200),
            golden_cross,
            volume_spike: volume.spike,
            volume_avg_20: volume.average,
            sparkline: closes[closes.len().saturating_sub(self.params.sparkline_len)..].to_vec(),
            history: series
                .last_n(self.params.history_len)
                .iter()
                .map(|b| ChartBar {
                    date: b.date,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                })
                .collect(),
        }
    }
}

/// Classify the last close against the short and long EMAs.
///
/// Without a short average the trend is neutral. The long average only
/// upgrades an up/down trend to its strong form.
pub fn classify_trend(close: f64, ema_short: Option<f64>, ema_long: Option<f64>) -> Trend {
    let Some(short) = ema_short else {
        return Trend::Neutral;
    };

    if close > short {
        if ema_long.is_some_and(|long| close > long) {
            Trend::StrongUptrend
        } else {
            Trend::Uptrend
        }
    } else if close < short {
        if ema_long.is_some_and(|long| close < long) {
            Trend::StrongDowntrend
        } else {
            Trend::Downtrend
        }
    } else {
        Trend::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use screener_core::PriceBar;

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1000.0))
            .collect();
        PriceSeries::new("SMPH", bars).unwrap()
    }

    #[test]
    fn test_empty_series() {
        let snapshot = IndicatorEngine::default().analyze(&PriceSeries::empty("X"));
        assert_eq!(snapshot, IndicatorSnapshot::empty());
    }

    #[test]
    fn test_flat_series() {
        let snapshot = IndicatorEngine::default().analyze(&series_from(&vec![100.0; 300]));

        assert_eq!(snapshot.rsi, 50.0);
        assert_eq!(snapshot.sma_50, Some(100.0));
        assert_eq!(snapshot.sma_200, Some(100.0));
        assert_eq!(snapshot.ema_50, Some(100.0));
        assert_eq!(snapshot.ema_200, Some(100.0));
        assert_eq!(snapshot.trend, Trend::Neutral);
        assert!(!snapshot.golden_cross);
        assert!(!snapshot.volume_spike);
        assert_eq!(snapshot.macd, Some(0.0));
        assert_eq!(snapshot.macd_signal, Some(0.0));
        assert_eq!(snapshot.support, Some(99.0));
        assert_eq!(snapshot.resistance, Some(101.0));
        assert_eq!(snapshot.sparkline.len(), 30);
        assert_eq!(snapshot.history.len(), 252);
    }

    #[test]
    fn test_linear_rise() {
        let closes: Vec<f64> = (0..300).map(|i| 50.0 + 100.0 * i as f64 / 299.0).collect();
        let snapshot = IndicatorEngine::default().analyze(&series_from(&closes));

        assert_eq!(snapshot.trend, Trend::StrongUptrend);
        assert!(snapshot.golden_cross);
        assert!(snapshot.macd.unwrap() > 0.0);
        assert!((snapshot.last_close - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_history_defaults() {
        let snapshot = IndicatorEngine::default().analyze(&series_from(&[10.0, 11.0, 12.0]));

        assert_eq!(snapshot.rsi, 50.0);
        assert!(snapshot.sma_50.is_none());
        assert!(snapshot.ema_50.is_none());
        assert_eq!(snapshot.trend, Trend::Neutral);
        assert!(!snapshot.golden_cross);
        assert!(snapshot.volume_avg_20.is_none());
        assert_eq!(snapshot.sparkline, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_golden_cross_appears_after_crossing() {
        // Long decline then a sharp recovery
        let mut closes: Vec<f64> = (0..200).map(|i| 200.0 - i as f64 * 0.5).collect();
        let engine = IndicatorEngine::default();

        let before = engine.analyze(&series_from(&closes));
        assert!(!before.golden_cross);

        closes.extend((0..120).map(|i| 100.0 + i as f64 * 2.0));
        let after = engine.analyze(&series_from(&closes));
        assert!(after.golden_cross);
        assert!(after.sma_50.unwrap() > after.sma_200.unwrap());
    }

    #[test]
    fn test_downtrend_classification() {
        let closes: Vec<f64> = (0..250).map(|i| 300.0 - i as f64).collect();
        let snapshot = IndicatorEngine::default().analyze(&series_from(&closes));
        assert_eq!(snapshot.trend, Trend::StrongDowntrend);
    }

    #[test]
    fn test_params_validation() {
        assert!(IndicatorParams::default().validate().is_ok());
        let bad = IndicatorParams {
            macd_fast: 30,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let zero = IndicatorParams {
            rsi_period: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_classify_trend_cases() {
        assert_eq!(classify_trend(10.0, None, Some(5.0)), Trend::Neutral);
        assert_eq!(classify_trend(10.0, Some(9.0), None), Trend::Uptrend);
        assert_eq!(classify_trend(10.0, Some(9.0), Some(11.0)), Trend::Uptrend);
        assert_eq!(classify_trend(10.0, Some(9.0), Some(8.0)), Trend::StrongUptrend);
        assert_eq!(classify_trend(10.0, Some(11.0), Some(9.0)), Trend::Downtrend);
        assert_eq!(classify_trend(10.0, Some(11.0), Some(12.0)), Trend::StrongDowntrend);
        assert_eq!(classify_trend(10.0, Some(10.0), Some(12.0)), Trend::Neutral);
    }
}
