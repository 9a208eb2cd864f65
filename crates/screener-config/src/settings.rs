//! Configuration structures.

use screener_backtest::BacktestConfig;
use screener_core::{ScreenerError, ScreenerResult};
use screener_indicators::{consistency::MIN_BARS, IndicatorParams};
use screener_scoring::{DividendRules, ScoringRules, SuggestionConfig};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub portfolio: PortfolioSettings,
}

impl AppConfig {
    /// Check every section that has constraints.
    pub fn validate(&self) -> ScreenerResult<()> {
        self.scoring.indicators.validate()?;
        self.scoring.rules.validate()?;
        self.backtest.validate()?;
        if self.scoring.top_picks_limit == 0 {
            return Err(ScreenerError::Validation(
                "top_picks_limit must be positive".into(),
            ));
        }
        if self.portfolio.suggestion.max_stocks == 0 || self.portfolio.suggestion.max_per_sector == 0 {
            return Err(ScreenerError::Validation(
                "portfolio limits must be positive".into(),
            ));
        }
        if self.portfolio.default_amount <= 0.0 {
            return Err(ScreenerError::Validation(
                "default_amount must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> ScreenerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ScreenerError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "equity-screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Input locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory of `<SYMBOL>.csv` price files
    pub price_dir: String,
    /// JSON fundamentals keyed by symbol
    pub fundamentals: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            price_dir: "data/prices".to_string(),
            fundamentals: None,
        }
    }
}

/// Indicator parameters and scoring rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Minimum score listed by `screen`
    pub top_picks_min_score: i32,
    /// Maximum rows listed by `screen`
    pub top_picks_limit: usize,
    /// Bars required before monthly consistency is measured
    pub consistency_min_bars: usize,
    pub indicators: IndicatorParams,
    pub rules: ScoringRules,
    pub dividend: DividendRules,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            top_picks_min_score: 3,
            top_picks_limit: 20,
            consistency_min_bars: MIN_BARS,
            indicators: IndicatorParams::default(),
            rules: ScoringRules::default(),
            dividend: DividendRules::default(),
        }
    }
}

/// Portfolio suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    /// Amount used when `suggest` is given none
    pub default_amount: f64,
    #[serde(flatten)]
    pub suggestion: SuggestionConfig,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            default_amount: 100_000.0,
            suggestion: SuggestionConfig::default(),
        }
    }
}
