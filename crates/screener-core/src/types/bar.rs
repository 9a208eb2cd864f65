//! Daily OHLCV price bars and per-symbol series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One trading day of price and volume data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl PriceBar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar when only the close is known.
    ///
    /// Open, high and low all take the close.
    pub fn from_close(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self::new(date, close, close, close, close, volume)
    }

    /// Create a bar from partially known prices, substituting close for
    /// any missing open/high/low.
    pub fn with_optional(
        date: NaiveDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: f64,
        volume: Option<f64>,
    ) -> Self {
        Self::new(
            date,
            open.unwrap_or(close),
            high.unwrap_or(close),
            low.unwrap_or(close),
            close,
            volume.unwrap_or(0.0),
        )
    }
}

/// Ordered daily bars for one instrument.
///
/// Dates are strictly ascending; this is checked on construction,
/// including when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<PriceBar>,
}

#[derive(Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = DataError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.symbol, raw.bars)
    }
}

impl PriceSeries {
    /// Build a series, rejecting duplicate or out-of-order dates and
    /// negative volumes.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, DataError> {
        let symbol = symbol.into();

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::UnorderedBars {
                    symbol,
                    date: pair[1].date,
                });
            }
        }

        if let Some(bad) = bars.iter().find(|b| b.volume < 0.0 || !b.close.is_finite()) {
            return Err(DataError::InvalidBar {
                symbol,
                date: bad.date,
            });
        }

        Ok(Self { symbol, bars })
    }

    /// Sort bars by date and then validate.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, DataError> {
        bars.sort_by_key(|b| b.date);
        Self::new(symbol, bars)
    }

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// Get the last N bars (fewer if the series is shorter).
    pub fn last_n(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Copy of the series holding only bars dated strictly before `date`.
    pub fn truncated_before(&self, date: NaiveDate) -> PriceSeries {
        let end = self.bars.partition_point(|b| b.date < date);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..end].to_vec(),
        }
    }

    /// Last bar with `after < date <= until`.
    pub fn last_between(&self, after: NaiveDate, until: NaiveDate) -> Option<&PriceBar> {
        let end = self.bars.partition_point(|b| b.date <= until);
        self.bars[..end].last().filter(|b| b.date > after)
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &PriceBar> {
        self.bars.iter()
    }
}
