//! Fundamentals loader.

use screener_core::{DataError, FundamentalSnapshot};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Fundamentals keyed by symbol.
pub type FundamentalsMap = BTreeMap<String, FundamentalSnapshot>;

/// Parse a JSON object keyed by symbol.
pub fn parse_fundamentals(json: &str) -> Result<FundamentalsMap, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))
}

/// Load fundamentals from a JSON file.
pub async fn load_fundamentals(path: impl AsRef<Path>) -> Result<FundamentalsMap, DataError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await?;
    let map = parse_fundamentals(&json)?;
    info!(path = %path.display(), symbols = map.len(), "Loaded fundamentals");
    Ok(map)
}
