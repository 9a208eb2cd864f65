//! Core types and traits for the equity screener.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, PriceSeries)
//! - Per-evaluation snapshots (indicators, consistency, fundamentals)
//! - Score results with tagged reasons
//! - Core traits for indicators and price series sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, IndicatorError, ScreenerError, ScreenerResult};
pub use types::*;
pub use traits::*;
