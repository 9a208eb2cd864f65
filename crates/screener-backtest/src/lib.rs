//! Walk-forward backtesting of score thresholds.

mod engine;
mod report;
mod statistics;

pub use engine::{BacktestConfig, WalkForwardSimulator};
pub use report::{BacktestReport, CheckpointSummary};
pub use statistics::{CheckpointOutcome, PeriodAggregation, SymbolOutcome, ThresholdResult};
