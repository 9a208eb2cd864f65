//! Error types for the screener.
//!
//! Insufficient history, missing fundamentals and missing forward data are
//! resolved inside the engines with neutral defaults. These types cover the
//! I/O and configuration boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level screener error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available at {0}")]
    NoDataAvailable(String),

    #[error("Bars for {symbol} are not strictly ascending at {date}")]
    UnorderedBars { symbol: String, date: NaiveDate },

    #[error("Invalid bar for {symbol} at {date}")]
    InvalidBar { symbol: String, date: NaiveDate },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

impl From<serde_json::Error> for ScreenerError {
    fn from(err: serde_json::Error) -> Self {
        ScreenerError::Serialization(err.to_string())
    }
}
