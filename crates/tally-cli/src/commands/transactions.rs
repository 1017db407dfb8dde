//! Transaction command implementations

use anyhow::{Context, Result};
use tally_core::export::{to_json, transactions_csv};
use tally_core::ledger::{SortField, SortOrder, TransactionFilter};
use tally_core::{TransactionStatus, TransactionType, Window};

use super::core::{parse_format, parse_timeframe, OutputFormat, Session};
use super::truncate;

/// List filters as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ListQuery<'a> {
    pub search: Option<&'a str>,
    pub category: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub timeframe: Option<&'a str>,
    pub successful_only: bool,
    pub sort: &'a str,
    pub order: &'a str,
    pub limit: usize,
}

pub fn cmd_transactions(session: &Session, query: &ListQuery<'_>, format: &str) -> Result<()> {
    let format = parse_format(format)?;

    let kind = query
        .kind
        .map(|k| k.parse::<TransactionType>().map_err(anyhow::Error::msg))
        .transpose()
        .context("Invalid --type")?;
    let window = query
        .timeframe
        .map(parse_timeframe)
        .transpose()?
        .map(|tf| Window::trailing(tf, session.today));
    let sort_field: SortField = query.sort.parse().map_err(anyhow::Error::msg)?;
    let sort_order: SortOrder = query.order.parse().map_err(anyhow::Error::msg)?;

    let filter = TransactionFilter::new()
        .search(query.search)
        .category(query.category)
        .kind(kind)
        .date_range(window)
        .include_non_successful(!query.successful_only)
        .sort_field(sort_field)
        .sort_order(sort_order);

    let matched = filter.apply(&session.ledger.transactions);
    let shown: Vec<_> = matched.iter().copied().take(query.limit).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", to_json(&shown)?);
            return Ok(());
        }
        OutputFormat::Csv => {
            print!("{}", transactions_csv(&shown)?);
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    if shown.is_empty() {
        println!("No transactions match these filters.");
        return Ok(());
    }

    println!();
    println!("📝 Transactions ({} of {})", shown.len(), matched.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &shown {
        let amount_str = if tx.kind.is_outflow() {
            format!("\x1b[31m-${:.2}\x1b[0m", tx.amount) // Red for money out
        } else {
            format!("\x1b[32m+${:.2}\x1b[0m", tx.amount) // Green for money in
        };
        let status = match tx.status {
            TransactionStatus::Success => String::new(),
            other => format!(" \x1b[2m({})\x1b[0m", other),
        };

        println!(
            "   {} │ {:>10} │ {:12} │ {}{}",
            tx.date,
            amount_str,
            truncate(tx.category_label(), 12),
            truncate(tx.description.as_deref().unwrap_or(""), 40),
            status
        );
    }

    Ok(())
}
