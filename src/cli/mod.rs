//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Equity opportunity screener with walk-forward validation")]
pub struct Cli {
    /// Configuration file path (default: config/default.toml if present)
    #[arg(short, long, env = "SCREENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and rank every symbol
    Screen(ScreenArgs),
    /// Walk-forward backtest of score thresholds
    Backtest(BacktestArgs),
    /// Suggest an equal-weight portfolio from the top picks
    Suggest(SuggestArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Where to read prices and fundamentals from.
#[derive(clap::Args, Clone, Default)]
pub struct DataArgs {
    /// Directory of <SYMBOL>.csv price files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Fundamentals JSON file
    #[arg(long)]
    pub fundamentals: Option<PathBuf>,

    /// Only these symbols (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

/// Backtest output formats.
#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output formats for per-symbol listings.
#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListingFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ScreenArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Minimum score listed
    #[arg(long)]
    pub min_score: Option<i32>,

    /// Maximum rows listed
    #[arg(long)]
    pub limit: Option<usize>,

    /// List dividend picks instead of top picks
    #[arg(long)]
    pub dividends: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: ListingFormat,

    /// Save all analysed records as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Aggregation {
    Mean,
    Sum,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Score thresholds (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub thresholds: Vec<i32>,

    /// Months of checkpoints before the reference date
    #[arg(long)]
    pub months_back: Option<u32>,

    /// Days between checkpoints
    #[arg(long)]
    pub interval: Option<i64>,

    /// Holding period in days
    #[arg(long)]
    pub holding_days: Option<i64>,

    /// Reference date (YYYY-MM-DD); defaults to the latest bar
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// How period averages are combined
    #[arg(long)]
    pub aggregation: Option<Aggregation>,

    /// Output format (text, json, csv)
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Save results to file (JSON, or CSV with a .csv extension)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Amount to invest
    #[arg(short, long)]
    pub amount: Option<f64>,

    /// Maximum number of positions
    #[arg(long)]
    pub max_stocks: Option<usize>,

    /// Minimum score for a position
    #[arg(long)]
    pub min_score: Option<i32>,

    /// Maximum positions per sector
    #[arg(long)]
    pub max_per_sector: Option<usize>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: ListingFormat,
}
