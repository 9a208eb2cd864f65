//! Equal-weight portfolio suggestion over ranked picks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::screener::SymbolAnalysis;

const UNKNOWN_SECTOR: &str = "Unknown";

/// Limits for a portfolio suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub max_stocks: usize,
    pub min_score: i32,
    pub max_per_sector: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_stocks: 5,
            min_score: 6,
            max_per_sector: 2,
        }
    }
}

/// One position in a suggested portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub symbol: String,
    pub score: i32,
    pub price: f64,
    pub shares: u64,
    pub cost: f64,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSuggestion {
    pub allocations: Vec<Allocation>,
    pub total_invested: f64,
    pub amount: f64,
}

impl PortfolioSuggestion {
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Amount left after buying whole shares.
    pub fn cash_remaining(&self) -> f64 {
        self.amount - self.total_invested
    }
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioSuggester {
    config: SuggestionConfig,
}

impl PortfolioSuggester {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Split `amount` evenly over the best ranked candidates.
    ///
    /// `ranked` must already be in ranking order.
    pub fn suggest(&self, ranked: &[SymbolAnalysis], amount: f64) -> PortfolioSuggestion {
        let mut per_sector: HashMap<&str, usize> = HashMap::new();
        let mut chosen: Vec<(&SymbolAnalysis, &str)> = Vec::new();

        for analysis in ranked {
            if chosen.len() >= self.config.max_stocks {
                break;
            }
            if analysis.score.score < self.config.min_score {
                continue;
            }
            if analysis.fundamentals.is_suspended() || analysis.indicators.last_close <= 0.0 {
                debug!(symbol = %analysis.symbol, "Skipping untradeable symbol");
                continue;
            }

            let sector = analysis
                .fundamentals
                .sector
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(UNKNOWN_SECTOR);
            let held = per_sector.entry(sector).or_insert(0);
            if *held >= self.config.max_per_sector {
                debug!(symbol = %analysis.symbol, sector, "Sector cap reached");
                continue;
            }
            *held += 1;
            chosen.push((analysis, sector));
        }

        if chosen.is_empty() {
            return PortfolioSuggestion {
                allocations: Vec::new(),
                total_invested: 0.0,
                amount,
            };
        }

        let per_pick = amount / chosen.len() as f64;
        let allocations: Vec<Allocation> = chosen
            .into_iter()
            .map(|(analysis, sector)| {
                let price = analysis.indicators.last_close;
                let shares = ((per_pick / price).floor() as u64).max(1);
                Allocation {
                    symbol: analysis.symbol.clone(),
                    score: analysis.score.score,
                    price,
                    shares,
                    cost: shares as f64 * price,
                    sector: sector.to_string(),
                }
            })
            .collect();

        let total_invested = allocations.iter().map(|a| a.cost).sum();
        PortfolioSuggestion {
            allocations,
            total_invested,
            amount,
        }
    }
}
