//! Report command implementations

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde_json::json;
use tally_core::export::{categories_csv, to_json, trends_csv};
use tally_core::ledger::{aggregate, category_breakdown, filter_by_window, AggregationRequest};
use tally_core::Granularity;

use super::core::{parse_direction, parse_format, parse_timeframe, OutputFormat, Session};
use super::truncate;

pub fn cmd_summary(session: &Session, timeframe: &str, direction: &str, format: &str) -> Result<()> {
    let timeframe = parse_timeframe(timeframe)?;
    let direction = parse_direction(direction)?;
    let format = parse_format(format)?;

    let request = AggregationRequest::for_timeframe(timeframe, session.today, direction);
    let in_window = filter_by_window(&session.ledger.transactions, &request.window, false);
    let categories = category_breakdown(in_window.iter().copied(), direction);
    let total = categories
        .iter()
        .fold(Decimal::ZERO, |total, c| total.saturating_add(c.amount));

    match format {
        OutputFormat::Json => {
            let report = json!({
                "timeframe": timeframe,
                "window": request.window,
                "direction": direction,
                "total": total,
                "categories": categories,
            });
            println!("{}", to_json(&report)?);
            return Ok(());
        }
        OutputFormat::Csv => {
            print!("{}", categories_csv(&categories)?);
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    println!();
    println!("📊 {} Summary ({})", title_case(direction.as_str()), timeframe);
    println!("   Period: {}", request.window);
    println!("   ─────────────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No {} found in this period.", direction);
        return Ok(());
    }

    println!("   Total: ${:.2}", total);
    println!();
    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");

    for cat in &categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.transaction_count
        );
    }

    Ok(())
}

pub fn cmd_trends(
    session: &Session,
    timeframe: &str,
    granularity: Option<&str>,
    direction: &str,
    format: &str,
) -> Result<()> {
    let timeframe = parse_timeframe(timeframe)?;
    let direction = parse_direction(direction)?;
    let format = parse_format(format)?;

    let mut request = AggregationRequest::for_timeframe(timeframe, session.today, direction);
    if let Some(g) = granularity {
        let granularity: Granularity = g
            .parse()
            .map_err(anyhow::Error::msg)
            .context("Invalid --granularity")?;
        request = request.with_granularity(granularity);
    }

    let result = aggregate(&session.ledger.transactions, &request);

    match format {
        OutputFormat::Json => {
            println!("{}", to_json(&result)?);
            return Ok(());
        }
        OutputFormat::Csv => {
            print!("{}", trends_csv(&result.by_period)?);
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    println!();
    println!(
        "📈 {} Trends ({}, {})",
        title_case(direction.as_str()),
        timeframe,
        result.granularity
    );
    println!("   Period: {}", result.window);
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   {:12} │ {:>10} │ {:>5}", "Period", "Amount", "Count");
    println!("   ─────────────┼────────────┼───────");

    for point in &result.by_period {
        println!(
            "   {:12} │ {:>10.2} │ {:>5}",
            point.period, point.amount, point.transaction_count
        );
    }

    let total_count: i64 = result.by_period.iter().map(|p| p.transaction_count).sum();
    let avg_amount = if result.by_period.is_empty() {
        Decimal::ZERO
    } else {
        result.total_for_window / Decimal::from(result.by_period.len())
    };

    println!("   ─────────────┼────────────┼───────");
    println!(
        "   {:12} │ {:>10.2} │ {:>5}",
        "Total", result.total_for_window, total_count
    );
    println!("   {:12} │ {:>10.2} │", "Average", avg_amount);

    Ok(())
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::title_case;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("expense"), "Expense");
        assert_eq!(title_case(""), "");
    }
}
