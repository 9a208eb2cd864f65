//! CSV price data.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use screener_core::{DataError, PriceBar, PriceSeries, SeriesSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// CSV record format. Only date and close are required.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// Daily bars for one symbol from a single CSV file.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load the file as a validated series. Rows without a close are
    /// dropped; duplicate dates are an error.
    pub fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let Some(close) = record.close else {
                dropped += 1;
                continue;
            };

            let date = parse_date(&record.date)?;
            bars.push(PriceBar::with_optional(
                date,
                record.open,
                record.high,
                record.low,
                close,
                record.volume,
            ));
        }

        if dropped > 0 {
            debug!(symbol, dropped, "Dropped rows without a close");
        }

        PriceSeries::from_unsorted(symbol, bars)
    }
}

/// Parse the date formats seen in daily price exports.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

/// A directory of `<SYMBOL>.csv` files.
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable(dir.display().to_string()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

#[async_trait]
impl SeriesSource for CsvDirectorySource {
    async fn symbols(&self) -> Result<Vec<String>, DataError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut symbols = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.is_empty() => symbols.push(stem.to_string()),
                _ => warn!(path = %path.display(), "Skipping file with unusable name"),
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    async fn load_series(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        CsvDataSource::new(&path)?.load(symbol)
    }

    fn name(&self) -> &str {
        "csv-directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("2024/01/15").is_ok());
        assert!(parse_date("01/15/2024").is_ok());
        assert!(parse_date("2024-01-15 10:30:00").is_ok());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_load_with_optional_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BDO.csv");
        fs::write(
            &path,
            "Date,Close\n2024-01-03,101.5\n2024-01-02,100.0\n2024-01-04,\n",
        )
        .unwrap();

        let series = CsvDataSource::new(&path).unwrap().load("BDO").unwrap();
        assert_eq!(series.len(), 2);
        let first = series.first().unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.open, 100.0);
        assert_eq!(first.high, 100.0);
        assert_eq!(first.volume, 0.0);
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DUP.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n\
             2024-01-02,1,1,1,1,10\n\
             2024-01-02,2,2,2,2,10\n",
        )
        .unwrap();

        let result = CsvDataSource::new(&path).unwrap().load("DUP");
        assert!(matches!(result, Err(DataError::UnorderedBars { .. })));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NEG.csv");
        fs::write(&path, "date,close,volume\n2024-01-02,5.0,-1\n").unwrap();

        let result = CsvDataSource::new(&path).unwrap().load("NEG");
        assert!(matches!(result, Err(DataError::InvalidBar { .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvDataSource::new("/nonexistent/prices.csv"),
            Err(DataError::NoDataAvailable(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("TEL.csv"), "date,close\n2024-01-02,1300\n").unwrap();
        fs::write(dir.path().join("ALI.csv"), "date,close\n2024-01-02,30\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let source = CsvDirectorySource::new(dir.path()).unwrap();
        assert_eq!(source.symbols().await.unwrap(), vec!["ALI", "TEL"]);

        let series = source.load_series("TEL").await.unwrap();
        assert_eq!(series.last().unwrap().close, 1300.0);
        assert!(matches!(
            source.load_series("SM").await,
            Err(DataError::SymbolNotFound(_))
        ));
    }
}
