//! Insight command implementation

use anyhow::{bail, Result};
use serde_json::json;
use tally_core::export::to_json;
use tally_core::ledger::{aggregate, AggregationRequest};
use tally_core::{Direction, InsightKind};

use super::core::{parse_format, parse_timeframe, OutputFormat, Session};

pub fn cmd_insights(session: &Session, timeframe: &str, format: &str) -> Result<()> {
    let timeframe = parse_timeframe(timeframe)?;
    let format = parse_format(format)?;

    let request = AggregationRequest::for_timeframe(timeframe, session.today, Direction::Expense);
    let result = aggregate(&session.ledger.transactions, &request);
    let records = session.engine.evaluate(&session.snapshot.profile, &result);

    match format {
        OutputFormat::Json => {
            let report = json!({
                "timeframe": timeframe,
                "window": result.window,
                "insights": records,
            });
            println!("{}", to_json(&report)?);
            return Ok(());
        }
        OutputFormat::Csv => bail!("CSV output is not available for insights (use table or json)"),
        OutputFormat::Table => {}
    }

    println!();
    println!("💡 Insights ({})", timeframe);
    println!("   Period: {}", result.window);
    println!("   ─────────────────────────────────────────────────────────────");

    if records.is_empty() {
        println!("   Nothing to report. Set a monthly salary in your profile to enable");
        println!("   spending and savings insights.");
        return Ok(());
    }

    for record in &records {
        let icon = match record.kind {
            InsightKind::Warning => "⚠️ ",
            InsightKind::Success => "✅",
            InsightKind::Info => "ℹ️ ",
        };
        println!("   {} {}", icon, record.title);
        println!("      {}", record.message);
    }

    Ok(())
}
