//! The set of instruments being screened.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{FundamentalSnapshot, PriceSeries};

/// Price history and fundamentals for one symbol.
#[derive(Debug, Clone)]
pub struct UniverseEntry {
    pub series: PriceSeries,
    pub fundamentals: FundamentalSnapshot,
}

/// All symbols keyed by name, iterated in symbol order.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    entries: BTreeMap<String, UniverseEntry>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a symbol.
    pub fn insert(&mut self, series: PriceSeries, fundamentals: FundamentalSnapshot) {
        self.entries.insert(
            series.symbol.clone(),
            UniverseEntry {
                series,
                fundamentals,
            },
        );
    }

    pub fn get(&self, symbol: &str) -> Option<&UniverseEntry> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in symbol order.
    pub fn entries(&self) -> Vec<&UniverseEntry> {
        self.entries.values().collect()
    }

    /// Date of the most recent bar across all symbols.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries
            .values()
            .filter_map(|e| e.series.last().map(|b| b.date))
            .max()
    }
}
