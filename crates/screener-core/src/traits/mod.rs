//! Core traits for the screener.

mod data_source;
mod indicator;

pub use data_source::SeriesSource;
pub use indicator::{Indicator, MultiOutputIndicator};
