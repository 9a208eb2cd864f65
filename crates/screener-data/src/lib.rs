//! Data sources for the screener.

mod csv_source;
mod fundamentals;

pub use csv_source::{CsvDataSource, CsvDirectorySource};
pub use fundamentals::{load_fundamentals, parse_fundamentals, FundamentalsMap};

use screener_core::{DataError, PriceSeries, SeriesSource, Universe};
use tracing::{debug, info, warn};

/// Load a price series from a single CSV file.
pub fn load_csv(path: &str, symbol: &str) -> Result<PriceSeries, DataError> {
    CsvDataSource::new(path)?.load(symbol)
}

/// Build a universe from a series source and fundamentals.
///
/// With `only` set, just those symbols are loaded. Files that fail to
/// load and empty series are skipped with a warning. Symbols without
/// fundamentals get an empty snapshot.
pub async fn load_universe(
    source: &dyn SeriesSource,
    fundamentals: &FundamentalsMap,
    only: Option<&[String]>,
) -> Result<Universe, DataError> {
    let symbols = match only {
        Some(list) => list.to_vec(),
        None => source.symbols().await?,
    };

    let mut universe = Universe::new();
    for symbol in &symbols {
        let series = match source.load_series(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!(%symbol, error = %e, "Skipping symbol");
                continue;
            }
        };
        if series.is_empty() {
            debug!(%symbol, "Skipping empty series");
            continue;
        }
        let fundamental = fundamentals.get(symbol).cloned().unwrap_or_default();
        universe.insert(series, fundamental);
    }

    if universe.is_empty() {
        return Err(DataError::NoDataAvailable(format!(
            "no usable series from {}",
            source.name()
        )));
    }

    info!(
        source = source.name(),
        loaded = universe.len(),
        requested = symbols.len(),
        "Loaded universe"
    );
    Ok(universe)
}
