//! Moving average indicators.

use screener_core::traits::Indicator;

use crate::simd;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    /// Mean of the trailing window, summed directly instead of sliding.
    fn last(&self, data: &[f64]) -> Option<f64> {
        if data.len() < self.period {
            return None;
        }
        simd::mean(&data[data.len() - self.period..])
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the first value and updated causally with smoothing
/// factor 2/(n+1); there is no bias adjustment, so a value exists from the
/// first bar onward. [`Ema::last_warm`] reports only once `period` bars
/// have been seen.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Smoothing factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Last EMA value, or `None` when fewer than `period` values exist.
    pub fn last_warm(&self, data: &[f64]) -> Option<f64> {
        if data.len() < self.period {
            return None;
        }
        self.last(data)
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let Some((&first, rest)) = data.split_first() else {
            return vec![];
        };

        let mut result = Vec::with_capacity(data.len());
        let mut ema = first;
        result.push(ema);

        // Incremental form keeps a constant input exactly constant
        for &price in rest {
            ema += self.multiplier * (price - ema);
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[1] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[2] - 4.0).abs() < 1e-10); // (3+4+5)/3
        assert!((sma.last(&data).unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let data = vec![1.0, 2.0, 3.0];

        assert!(sma.calculate(&data).is_empty());
        assert!(sma.last(&data).is_none());
    }

    #[test]
    fn test_sma_identical_closes() {
        let sma = Sma::new(50);
        let data = vec![42.37; 50];
        assert_eq!(sma.last(&data), Some(42.37));
    }

    #[test]
    fn test_ema_seeded_from_first_value() {
        let ema = Ema::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ema.calculate(&data);

        // mult = 2/(3+1) = 0.5
        assert_eq!(result.len(), 5);
        assert!((result[0] - 1.0).abs() < 1e-10);
        assert!((result[1] - 1.5).abs() < 1e-10);
        assert!((result[2] - 2.25).abs() < 1e-10);
    }

    #[test]
    fn test_ema_warmup_gate() {
        let ema = Ema::new(5);
        assert!(ema.last_warm(&[1.0, 2.0, 3.0]).is_none());
        assert!(ema.last(&[1.0, 2.0, 3.0]).is_some());
        assert!(ema.last_warm(&[1.0; 5]).is_some());
    }

    #[test]
    fn test_ema_step_converges_without_overshoot() {
        let ema = Ema::new(10);
        let mut data = vec![100.0; 20];
        data.extend(vec![110.0; 40]);
        let result = ema.calculate(&data);

        let mut prev_gap = f64::INFINITY;
        for value in &result[20..] {
            let gap = 110.0 - value;
            assert!(gap >= 0.0, "EMA overshot the step");
            assert!(gap < prev_gap, "EMA did not move closer");
            prev_gap = gap;
        }
    }

    #[test]
    fn test_ema_constant_input_is_exact() {
        let ema = Ema::new(50);
        assert_eq!(ema.last(&vec![100.0; 300]), Some(100.0));
    }
}
