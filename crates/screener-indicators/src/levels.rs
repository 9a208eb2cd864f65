//! Trailing price range and volume statistics.

use crate::simd;

/// Support and resistance over a trailing window of bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailingRange {
    /// Lowest low in the window
    pub support: f64,
    /// Highest high in the window
    pub resistance: f64,
}

impl TrailingRange {
    /// Range over the last `min(window, len)` bars; `None` for no bars.
    pub fn compute(lows: &[f64], highs: &[f64], window: usize) -> Option<Self> {
        let len = lows.len().min(highs.len());
        if len == 0 || window == 0 {
            return None;
        }
        let start = len.saturating_sub(window);

        let support = lows[start..len].iter().cloned().fold(f64::INFINITY, f64::min);
        let resistance = highs[start..len]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            support,
            resistance,
        })
    }
}

/// Trailing volume average and spike detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeStats {
    /// Mean volume over the window, `None` with too few bars
    pub average: Option<f64>,
    /// Latest volume exceeds `multiple` times the average
    pub spike: bool,
}

impl VolumeStats {
    pub fn compute(volumes: &[f64], window: usize, multiple: f64) -> Self {
        if window == 0 || volumes.len() < window {
            return Self {
                average: None,
                spike: false,
            };
        }

        let average = simd::mean(&volumes[volumes.len() - window..]);
        let spike = match (average, volumes.last()) {
            (Some(avg), Some(&latest)) => avg > 0.0 && latest > multiple * avg,
            _ => false,
        };

        Self { average, spike }
    }
}
