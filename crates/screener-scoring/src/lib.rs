//! Opportunity scoring.
//!
//! - [`ScoringEngine`]: composite integer score with tagged reasons
//! - [`DividendScorer`]: dividend quality score, payout ratio, value-trap flag
//! - [`Screener`]: parallel per-symbol evaluation and deterministic ranking
//! - [`PortfolioSuggester`]: equal-weight allocation over the top picks

pub mod dividend;
pub mod portfolio;
pub mod rules;
pub mod screener;

pub use dividend::{DividendRules, DividendScore, DividendScorer};
pub use portfolio::{Allocation, PortfolioSuggester, PortfolioSuggestion, SuggestionConfig};
pub use rules::{ScoringEngine, ScoringRules};
pub use screener::{Screener, SymbolAnalysis};
