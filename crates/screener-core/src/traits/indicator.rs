//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators over a price slice.
///
/// Implementations never fail on short input: they return an empty
/// vector when there is not enough data for a single value.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data, oldest first.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value as of the last data point, if computable.
    fn last(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop()
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value as of the last data point, if computable.
    fn last(&self, data: &[f64]) -> Option<Self::Outputs> {
        self.calculate(data).pop()
    }
}
