//! Suggest command implementation.

use anyhow::Result;
use screener_config::AppConfig;
use screener_scoring::{PortfolioSuggester, PortfolioSuggestion};

use crate::cli::{ListingFormat, SuggestArgs};

use super::{build_screener, load_data};

pub async fn run(args: SuggestArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;

    let amount = args.amount.unwrap_or(config.portfolio.default_amount);
    if amount <= 0.0 {
        anyhow::bail!("Amount must be positive, got {amount}");
    }

    let mut limits = config.portfolio.suggestion.clone();
    if let Some(max_stocks) = args.max_stocks {
        limits.max_stocks = max_stocks;
    }
    if let Some(min_score) = args.min_score {
        limits.min_score = min_score;
    }
    if let Some(max_per_sector) = args.max_per_sector {
        limits.max_per_sector = max_per_sector;
    }

    let universe = load_data(&args.data, config).await?;
    let analyses = build_screener(config).analyze_universe(&universe);
    let suggestion = PortfolioSuggester::new(limits).suggest(&analyses, amount);

    match args.output {
        ListingFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestion)?),
        ListingFormat::Text => println!("{}", suggestion_table(&suggestion)),
    }

    Ok(())
}

fn suggestion_table(suggestion: &PortfolioSuggestion) -> String {
    let mut s = String::new();
    if suggestion.is_empty() {
        s.push_str("No symbols meet the suggestion criteria.\n");
        return s;
    }

    s.push_str(&format!("Suggested portfolio for {:.2}\n", suggestion.amount));
    s.push_str("───────────────────────────────────────────────────────────\n");
    s.push_str(" Symbol   Score     Price   Shares        Cost  Sector\n");
    for a in &suggestion.allocations {
        s.push_str(&format!(
            " {:<7} {:>6} {:>9.2} {:>8} {:>11.2}  {}\n",
            a.symbol, a.score, a.price, a.shares, a.cost, a.sector
        ));
    }
    s.push_str("───────────────────────────────────────────────────────────\n");
    s.push_str(&format!("  Invested:   {:.2}\n", suggestion.total_invested));
    s.push_str(&format!("  Remaining:  {:.2}\n", suggestion.cash_remaining()));
    s
}
