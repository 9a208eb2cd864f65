//! Screen command implementation.

use anyhow::Result;
use screener_config::AppConfig;
use screener_scoring::{Screener, SymbolAnalysis};
use tracing::info;

use crate::cli::{ListingFormat, ScreenArgs};

use super::{build_screener, load_data};

pub async fn run(args: ScreenArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;
    let universe = load_data(&args.data, config).await?;

    let screener = build_screener(config);
    let analyses = screener.analyze_universe(&universe);

    if let Some(save_path) = &args.save {
        let records: Vec<_> = analyses.iter().map(SymbolAnalysis::to_record).collect();
        std::fs::write(save_path, serde_json::to_string_pretty(&records)?)?;
        info!("Records saved to {:?}", save_path);
    }

    let picks = if args.dividends {
        screener.dividend_picks(&analyses)
    } else {
        let min_score = args.min_score.unwrap_or(config.scoring.top_picks_min_score);
        let limit = args.limit.unwrap_or(config.scoring.top_picks_limit);
        Screener::top_picks(&analyses, min_score, limit)
    };

    match args.output {
        ListingFormat::Json => {
            let records: Vec<_> = picks.iter().map(|a| a.to_record()).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        ListingFormat::Text if args.dividends => println!("{}", dividend_table(&picks)),
        ListingFormat::Text => println!("{}", picks_table(&picks, analyses.len())),
    }

    Ok(())
}

fn picks_table(picks: &[&SymbolAnalysis], screened: usize) -> String {
    let mut s = String::new();
    s.push_str(&format!("Top picks ({} of {} screened)\n", picks.len(), screened));
    s.push_str("───────────────────────────────────────────────────────────────────────\n");
    s.push_str(" #  Symbol   Score    Close    RSI  Trend              Yield\n");
    for (i, a) in picks.iter().enumerate() {
        s.push_str(&format!(
            "{:>2}  {:<7} {:>6} {:>8.2} {:>6.1}  {:<17} {:>6}\n",
            i + 1,
            a.symbol,
            a.score.score,
            a.indicators.last_close,
            a.indicators.rsi,
            a.indicators.trend.as_str(),
            a.dividend_yield
                .map(|y| format!("{y:.2}%"))
                .unwrap_or_else(|| "-".to_string()),
        ));
        for reason in &a.score.reasons {
            s.push_str(&format!("      {reason}\n"));
        }
    }
    s
}

fn dividend_table(picks: &[&SymbolAnalysis]) -> String {
    let mut s = String::new();
    s.push_str(&format!("Dividend picks ({})\n", picks.len()));
    s.push_str("───────────────────────────────────────────────────────────\n");
    s.push_str(" Symbol   Div Score   Yield   Payout  Trend\n");
    for a in picks {
        s.push_str(&format!(
            " {:<7} {:>10} {:>6.2}% {:>7}  {}{}\n",
            a.symbol,
            a.dividend.score,
            a.dividend_yield.unwrap_or(0.0),
            a.dividend
                .payout_ratio
                .map(|p| format!("{p:.0}%"))
                .unwrap_or_else(|| "-".to_string()),
            a.indicators.trend,
            if a.dividend.value_trap { "  (value trap?)" } else { "" },
        ));
    }
    s
}
