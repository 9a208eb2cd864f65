//! Technical indicators with SIMD helpers.
//!
//! This crate provides the indicator set behind the opportunity score:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Trailing support/resistance and volume statistics
//! - Month-over-month consistency statistics
//!
//! [`IndicatorEngine`] combines them into an [`IndicatorSnapshot`] as of the
//! last bar of a series.
//!
//! [`IndicatorSnapshot`]: screener_core::IndicatorSnapshot

pub mod consistency;
pub mod engine;
pub mod levels;
pub mod momentum;
pub mod moving_average;
pub mod simd;

pub use consistency::ConsistencyAnalyzer;
pub use engine::{classify_trend, IndicatorEngine, IndicatorParams};
pub use levels::{TrailingRange, VolumeStats};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
