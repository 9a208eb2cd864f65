//! Configuration management.
//!
//! Settings come from an optional TOML file overlaid with environment
//! variables of the form `SCREENER__SECTION__KEY`, e.g.
//! `SCREENER__BACKTEST__HOLDING_DAYS=45`.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, LoggingConfig, PortfolioSettings, ScoringSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

const ENV_PREFIX: &str = "SCREENER";

/// Load configuration from file and environment.
///
/// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
/// read if present.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("backtest.thresholds")
}

fn load_with_env(path: Option<&Path>, env: Environment) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let config = Config::builder().add_source(file).add_source(env).build()?;

    config.try_deserialize()
}
