//! Core data types for the screener.

mod bar;
mod fundamentals;
mod score;
mod snapshot;
mod universe;

pub use bar::{PriceBar, PriceSeries};
pub use fundamentals::{DividendEvent, FundamentalSnapshot};
pub use score::{Reason, ScoreResult};
pub use snapshot::{ChartBar, ConsistencySnapshot, IndicatorSnapshot, Trend, NEUTRAL_RSI};
pub use universe::{Universe, UniverseEntry};
