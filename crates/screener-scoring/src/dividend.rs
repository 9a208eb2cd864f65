//! Dividend quality scoring.

use chrono::{Duration, NaiveDate};
use screener_core::{DividendEvent, FundamentalSnapshot, Trend};
use serde::{Deserialize, Serialize};

/// Dividend score with the payout ratio and value-trap flag behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendScore {
    pub score: i32,
    /// Dividend per share over EPS, in percent; only with positive EPS
    pub payout_ratio: Option<f64>,
    /// High yield that looks unsustainable
    pub value_trap: bool,
}

/// Thresholds for dividend scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividendRules {
    pub good_yield: f64,
    pub high_yield: f64,
    pub safe_payout: f64,
    pub conservative_payout: f64,
    pub trap_yield: f64,
    /// Score needed to be listed as a dividend pick
    pub min_pick_score: i32,
    /// Days of dividend history summed for the trailing yield
    pub ttm_days: i64,
}

impl Default for DividendRules {
    fn default() -> Self {
        Self {
            good_yield: 3.0,
            high_yield: 5.0,
            safe_payout: 90.0,
            conservative_payout: 60.0,
            trap_yield: 8.0,
            min_pick_score: 40,
            ttm_days: 365,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DividendScorer {
    rules: DividendRules,
}

impl DividendScorer {
    pub fn new(rules: DividendRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &DividendRules {
        &self.rules
    }

    /// Sum of dividends with ex-date in `(as_of - ttm_days, as_of]`.
    pub fn trailing_dividends(&self, history: &[DividendEvent], as_of: NaiveDate) -> f64 {
        let cutoff = as_of - Duration::days(self.rules.ttm_days);
        history
            .iter()
            .filter_map(|event| match (event.ex_date, event.amount) {
                (Some(date), Some(amount)) if date > cutoff && date <= as_of => Some(amount),
                _ => None,
            })
            .sum()
    }

    /// Yield from trailing dividends over the last close, falling back to the
    /// reported yield when there is no usable history.
    pub fn effective_yield(
        &self,
        fundamentals: &FundamentalSnapshot,
        last_close: f64,
        as_of: Option<NaiveDate>,
    ) -> Option<f64> {
        if let Some(as_of) = as_of {
            let total = self.trailing_dividends(&fundamentals.div_history, as_of);
            if total > 0.0 && last_close > 0.0 {
                return Some(total / last_close * 100.0);
            }
        }
        fundamentals.div_yield
    }

    /// Score a dividend payer. Without a yield the score is zero.
    pub fn score(
        &self,
        dividend_yield: Option<f64>,
        eps: Option<f64>,
        price: f64,
        trend: Trend,
    ) -> DividendScore {
        let rules = &self.rules;
        let Some(yield_pct) = dividend_yield.filter(|y| *y > 0.0) else {
            return DividendScore::default();
        };

        let mut score = 0;
        if yield_pct >= rules.good_yield {
            score += 20;
        }
        if yield_pct >= rules.high_yield {
            score += 10;
        }

        let dps = yield_pct / 100.0 * price;
        let mut payout_ratio = None;
        match eps {
            Some(eps) if eps > 0.0 => {
                let payout = dps / eps * 100.0;
                payout_ratio = Some(payout);
                if payout < rules.safe_payout {
                    score += 20;
                }
                if payout < rules.conservative_payout {
                    score += 20;
                }
                if payout > 100.0 {
                    score -= 50;
                }
            }
            Some(eps) if eps < 0.0 => score -= 50,
            _ => {}
        }

        if trend.is_uptrend() {
            score += 20;
        } else if trend.is_downtrend() {
            score -= 10;
        }

        let value_trap = yield_pct > rules.trap_yield
            && (payout_ratio.is_some_and(|p| p > 100.0) || trend.is_downtrend());

        DividendScore {
            score,
            payout_ratio,
            value_trap,
        }
    }

    /// Check if a dividend score qualifies as a pick.
    pub fn is_pick(&self, score: &DividendScore) -> bool {
        score.score >= self.rules.min_pick_score
    }
}
