//! Per-symbol analysis and ranking across the universe.

use rayon::prelude::*;
use screener_core::{
    ConsistencySnapshot, FundamentalSnapshot, IndicatorSnapshot, ScoreResult, Universe,
    UniverseEntry, NEUTRAL_RSI,
};
use screener_indicators::{ConsistencyAnalyzer, IndicatorEngine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::dividend::{DividendScore, DividendScorer};
use crate::rules::ScoringEngine;

/// Everything computed for one symbol in a screening pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub indicators: IndicatorSnapshot,
    pub consistency: ConsistencySnapshot,
    pub fundamentals: FundamentalSnapshot,
    pub score: ScoreResult,
    pub dividend: DividendScore,
    /// Trailing or reported dividend yield in percent
    pub dividend_yield: Option<f64>,
}

impl SymbolAnalysis {
    /// Flat key/value record for persistence and display.
    ///
    /// Undefined values are written as their neutral defaults: RSI 50,
    /// moving averages 0.0, trend "Neutral", flags false.
    pub fn to_record(&self) -> BTreeMap<String, Value> {
        let ind = &self.indicators;
        let or_zero = |v: Option<f64>| v.unwrap_or(0.0);

        let mut record = BTreeMap::new();
        record.insert("symbol".into(), json!(self.symbol));
        record.insert("last_close".into(), json!(ind.last_close));
        record.insert(
            "rsi".into(),
            json!(if ind.rsi.is_finite() { ind.rsi } else { NEUTRAL_RSI }),
        );
        record.insert("sma_50".into(), json!(or_zero(ind.sma_50)));
        record.insert("sma_200".into(), json!(or_zero(ind.sma_200)));
        record.insert("ema_50".into(), json!(or_zero(ind.ema_50)));
        record.insert("ema_200".into(), json!(or_zero(ind.ema_200)));
        record.insert("macd".into(), json!(or_zero(ind.macd)));
        record.insert("macd_signal".into(), json!(or_zero(ind.macd_signal)));
        record.insert("support".into(), json!(or_zero(ind.support)));
        record.insert("resistance".into(), json!(or_zero(ind.resistance)));
        record.insert("trend".into(), json!(ind.trend.as_str()));
        record.insert("golden_cross".into(), json!(ind.golden_cross));
        record.insert("volume_spike".into(), json!(ind.volume_spike));
        record.insert("volume_avg_20".into(), json!(or_zero(ind.volume_avg_20)));
        record.insert("sparkline".into(), json!(ind.sparkline));
        record.insert("history".into(), json!(ind.history));
        record.insert("win_rate".into(), json!(self.consistency.win_rate));
        record.insert(
            "avg_monthly_return".into(),
            json!(self.consistency.avg_monthly_return_pct),
        );
        record.insert(
            "monthly_volatility".into(),
            json!(self.consistency.monthly_volatility_pct),
        );
        record.insert(
            "months_analyzed".into(),
            json!(self.consistency.months_analyzed),
        );
        record.insert("score".into(), json!(self.score.score));
        record.insert("reasons".into(), json!(self.score.reason_strings()));
        record.insert("div_score".into(), json!(self.dividend.score));
        record.insert("payout_ratio".into(), json!(or_zero(self.dividend.payout_ratio)));
        record.insert("value_trap".into(), json!(self.dividend.value_trap));
        record.insert("div_yield".into(), json!(self.dividend_yield));
        record.insert("pe_ratio".into(), json!(self.fundamentals.pe_ratio));
        record.insert("div_freq".into(), json!(self.fundamentals.div_freq));
        record
    }
}

/// Runs the indicator, consistency, scoring and dividend stages per symbol.
#[derive(Debug, Clone, Default)]
pub struct Screener {
    engine: IndicatorEngine,
    consistency: ConsistencyAnalyzer,
    scoring: ScoringEngine,
    dividends: DividendScorer,
}

impl Screener {
    pub fn new(
        engine: IndicatorEngine,
        consistency: ConsistencyAnalyzer,
        scoring: ScoringEngine,
        dividends: DividendScorer,
    ) -> Self {
        Self {
            engine,
            consistency,
            scoring,
            dividends,
        }
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn dividends(&self) -> &DividendScorer {
        &self.dividends
    }

    /// Snapshot and score for one symbol from its own data only.
    pub fn analyze(&self, entry: &UniverseEntry) -> SymbolAnalysis {
        let indicators = self.engine.analyze(&entry.series);
        let consistency = self.consistency.analyze(&entry.series);
        let score = self
            .scoring
            .score(&indicators, &consistency, &entry.fundamentals);

        let dividend_yield = self.dividends.effective_yield(
            &entry.fundamentals,
            indicators.last_close,
            indicators.as_of,
        );
        let dividend = self.dividends.score(
            dividend_yield,
            entry.fundamentals.eps,
            indicators.last_close,
            indicators.trend,
        );

        debug!(
            symbol = %entry.series.symbol,
            score = score.score,
            trend = %indicators.trend,
            "Scored symbol"
        );

        SymbolAnalysis {
            symbol: entry.series.symbol.clone(),
            indicators,
            consistency,
            fundamentals: entry.fundamentals.clone(),
            score,
            dividend,
            dividend_yield,
        }
    }

    /// Analyze every symbol in parallel and return them ranked.
    pub fn analyze_universe(&self, universe: &Universe) -> Vec<SymbolAnalysis> {
        let mut analyses: Vec<SymbolAnalysis> = universe
            .entries()
            .par_iter()
            .map(|entry| self.analyze(entry))
            .collect();

        Self::rank(&mut analyses);
        info!(symbols = analyses.len(), "Screened universe");
        analyses
    }

    /// Sort by score descending, then dividend yield descending, then symbol.
    pub fn rank(analyses: &mut [SymbolAnalysis]) {
        analyses.sort_by(|a, b| {
            b.score
                .score
                .cmp(&a.score.score)
                .then_with(|| compare_yield_desc(a.dividend_yield, b.dividend_yield))
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
    }

    /// Ranked analyses scoring at least `min_score`, at most `limit`.
    pub fn top_picks(
        analyses: &[SymbolAnalysis],
        min_score: i32,
        limit: usize,
    ) -> Vec<&SymbolAnalysis> {
        analyses
            .iter()
            .filter(|a| a.score.score >= min_score)
            .take(limit)
            .collect()
    }

    /// Dividend picks, best dividend score first.
    pub fn dividend_picks<'a>(&self, analyses: &'a [SymbolAnalysis]) -> Vec<&'a SymbolAnalysis> {
        let mut picks: Vec<&SymbolAnalysis> = analyses
            .iter()
            .filter(|a| self.dividends.is_pick(&a.dividend))
            .collect();
        picks.sort_by(|a, b| {
            b.dividend
                .score
                .cmp(&a.dividend.score)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        picks
    }
}

fn compare_yield_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use screener_core::{PriceBar, PriceSeries, Trend};

    fn entry(symbol: &str, closes: &[f64], fundamentals: FundamentalSnapshot) -> UniverseEntry {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::from_close(start + Duration::days(i as i64), c, 1000.0))
            .collect();
        UniverseEntry {
            series: PriceSeries::new(symbol, bars).unwrap(),
            fundamentals,
        }
    }

    fn analysis(symbol: &str, score: i32, dividend_yield: Option<f64>) -> SymbolAnalysis {
        SymbolAnalysis {
            symbol: symbol.into(),
            indicators: IndicatorSnapshot::empty(),
            consistency: ConsistencySnapshot::zeroed(),
            fundamentals: FundamentalSnapshot::default(),
            score: ScoreResult {
                score,
                reasons: vec![],
            },
            dividend: DividendScore::default(),
            dividend_yield,
        }
    }

    #[test]
    fn test_flat_series_scores_zero() {
        let screener = Screener::default();
        let result = screener.analyze(&entry("FLAT", &vec![100.0; 300], FundamentalSnapshot::default()));

        assert_eq!(result.indicators.trend, Trend::Neutral);
        assert_eq!(result.score.score, 0);
        assert!(result.score.reasons.is_empty());
    }

    #[test]
    fn test_linear_rise_scores_uptrend() {
        let closes: Vec<f64> = (0..300).map(|i| 50.0 + 100.0 * i as f64 / 299.0).collect();
        let result = Screener::default().analyze(&entry("UP", &closes, FundamentalSnapshot::default()));

        assert_eq!(result.indicators.trend, Trend::StrongUptrend);
        assert!(result.indicators.golden_cross);
        assert!(result.score.score >= 2);
        let labels: Vec<&str> = result.score.reasons.iter().map(|r| r.label.as_str()).collect();
        assert!(labels.contains(&"Strong Uptrend"));
        assert!(labels.contains(&"Above EMA 50"));
        assert!(labels.contains(&"Golden Cross"));
    }

    #[test]
    fn test_rank_by_score_then_yield() {
        let mut analyses = vec![
            analysis("AAA", 3, None),
            analysis("BBB", 5, Some(2.0)),
            analysis("CCC", 5, Some(6.0)),
            analysis("DDD", 5, None),
            analysis("EEE", 7, None),
        ];
        Screener::rank(&mut analyses);

        let order: Vec<&str> = analyses.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(order, vec!["EEE", "CCC", "BBB", "DDD", "AAA"]);
    }

    #[test]
    fn test_universe_order_is_deterministic() {
        let mut universe = Universe::new();
        for (i, symbol) in ["ZED", "ABC", "MID"].iter().enumerate() {
            let e = entry(symbol, &vec![10.0 + i as f64; 40], FundamentalSnapshot::default());
            universe.insert(e.series, e.fundamentals);
        }

        let screener = Screener::default();
        let first = screener.analyze_universe(&universe);
        let second = screener.analyze_universe(&universe);
        assert_eq!(first, second);
        // All score zero: ties fall back to symbol order
        let order: Vec<&str> = first.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(order, vec!["ABC", "MID", "ZED"]);
    }

    #[test]
    fn test_top_picks_filter_and_limit() {
        let analyses = vec![
            analysis("A", 9, None),
            analysis("B", 6, None),
            analysis("C", 4, None),
            analysis("D", 2, None),
        ];
        let picks = Screener::top_picks(&analyses, 3, 2);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[1].symbol, "B");
    }

    #[test]
    fn test_record_uses_neutral_defaults() {
        let record = analysis("NEW", 0, None).to_record();

        assert_eq!(record["rsi"], json!(50.0));
        assert_eq!(record["sma_200"], json!(0.0));
        assert_eq!(record["trend"], json!("Neutral"));
        assert_eq!(record["golden_cross"], json!(false));
        assert_eq!(record["months_analyzed"], Value::Null);
    }

    #[test]
    fn test_dividend_picks_sorted() {
        let screener = Screener::default();
        let mut rich = analysis("RICH", 1, Some(7.0));
        rich.dividend.score = 90;
        let mut ok = analysis("OK", 1, Some(3.0));
        ok.dividend.score = 40;
        let poor = analysis("POOR", 1, None);

        let analyses = vec![ok, poor, rich];
        let picks = screener.dividend_picks(&analyses);
        let order: Vec<&str> = picks.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(order, vec!["RICH", "OK"]);
    }
}
