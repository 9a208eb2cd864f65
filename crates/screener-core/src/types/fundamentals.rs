//! Externally supplied fundamental data.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fundamental data for one symbol, consumed read-only.
///
/// Numeric fields accept JSON numbers or numeric strings. Anything else
/// (null, "-", "N/A") is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    /// Price to earnings ratio
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pe_ratio: Option<f64>,
    /// Dividend frequency label, e.g. "Quarterly"
    #[serde(default, deserialize_with = "lenient_string")]
    pub div_freq: Option<String>,
    /// Reported dividend yield in percent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub div_yield: Option<f64>,
    /// Earnings per share
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps: Option<f64>,
    /// Listing status, e.g. "Active" or "Suspended"
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Industry sector
    #[serde(default, deserialize_with = "lenient_string")]
    pub sector: Option<String>,
    /// Company name
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    /// Cash dividend history
    #[serde(default)]
    pub div_history: Vec<DividendEvent>,
}

impl FundamentalSnapshot {
    /// Check if trading in the symbol is suspended.
    pub fn is_suspended(&self) -> bool {
        self.status.as_deref() == Some("Suspended")
    }

    /// Check if dividends are paid quarterly.
    pub fn pays_quarterly(&self) -> bool {
        self.div_freq.as_deref() == Some("Quarterly")
    }
}

/// A single cash dividend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    /// Ex-dividend date; unparseable dates are dropped
    #[serde(default, deserialize_with = "lenient_date")]
    pub ex_date: Option<NaiveDate>,
    /// Amount per share
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
    .filter(|f| f.is_finite()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(s)) = value else {
        return Ok(None);
    };
    let s = s.trim();
    Ok(["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_parsed() {
        let f: FundamentalSnapshot =
            serde_json::from_str(r#"{"pe_ratio": "12.5", "eps": 1.2, "div_yield": "1,234.5"}"#)
                .unwrap();
        assert_eq!(f.pe_ratio, Some(12.5));
        assert_eq!(f.eps, Some(1.2));
        assert_eq!(f.div_yield, Some(1234.5));
    }

    #[test]
    fn test_non_numeric_values_are_absent() {
        let f: FundamentalSnapshot =
            serde_json::from_str(r#"{"pe_ratio": "N/A", "eps": null, "div_freq": ""}"#).unwrap();
        assert_eq!(f.pe_ratio, None);
        assert_eq!(f.eps, None);
        assert_eq!(f.div_freq, None);
    }

    #[test]
    fn test_dividend_history_dates() {
        let f: FundamentalSnapshot = serde_json::from_str(
            r#"{"div_history": [
                {"ex_date": "Sep 05, 2025", "amount": "0.50"},
                {"ex_date": "2025-03-01", "amount": 0.25},
                {"ex_date": "someday", "amount": 1.0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(f.div_history[0].ex_date, NaiveDate::from_ymd_opt(2025, 9, 5));
        assert_eq!(f.div_history[0].amount, Some(0.5));
        assert_eq!(f.div_history[1].ex_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(f.div_history[2].ex_date, None);
    }

    #[test]
    fn test_status_and_frequency() {
        let f = FundamentalSnapshot {
            status: Some("Suspended".into()),
            div_freq: Some("Quarterly".into()),
            ..Default::default()
        };
        assert!(f.is_suspended());
        assert!(f.pays_quarterly());
        assert!(!FundamentalSnapshot::default().is_suspended());
    }
}
