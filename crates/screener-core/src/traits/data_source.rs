//! Price series source trait.

use crate::error::DataError;
use crate::types::PriceSeries;
use async_trait::async_trait;

/// Trait for historical daily price sources.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// List the symbols this source can provide, sorted.
    async fn symbols(&self) -> Result<Vec<String>, DataError>;

    /// Load the full daily history for a symbol, oldest bar first.
    async fn load_series(&self, symbol: &str) -> Result<PriceSeries, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceBar;
    use chrono::NaiveDate;

    struct StaticSource;

    #[async_trait]
    impl SeriesSource for StaticSource {
        async fn symbols(&self) -> Result<Vec<String>, DataError> {
            Ok(vec!["AC".to_string()])
        }

        async fn load_series(&self, symbol: &str) -> Result<PriceSeries, DataError> {
            if symbol != "AC" {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
            PriceSeries::new(symbol, vec![PriceBar::from_close(date, 900.0, 10.0)])
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn test_source_contract() {
        let source = StaticSource;
        let symbols = source.symbols().await.unwrap();
        let series = source.load_series(&symbols[0]).await.unwrap();

        assert_eq!(series.len(), 1);
        assert!(matches!(
            source.load_series("XYZ").await,
            Err(DataError::SymbolNotFound(_))
        ));
    }
}
