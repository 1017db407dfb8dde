//! Bill command implementation

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde_json::json;
use tally_core::bills::{overdue, total_due, upcoming};
use tally_core::export::to_json;
use tally_core::{Bill, Window};

use super::core::{parse_format, OutputFormat, Session};
use super::truncate;

pub fn cmd_bills(session: &Session, days: i64, format: &str) -> Result<()> {
    let format = parse_format(format)?;
    let bills = &session.snapshot.bills;
    let today = session.today;

    let due_soon = upcoming(bills, today, days);
    let late = overdue(bills, today);
    let horizon = Window::through(today, days);
    let total = total_due(bills, &horizon);

    match format {
        OutputFormat::Json => {
            let report = json!({
                "today": today,
                "days": days,
                "upcoming": due_soon,
                "overdue": late,
                "total_upcoming": total,
            });
            println!("{}", to_json(&report)?);
            return Ok(());
        }
        OutputFormat::Csv => bail!("CSV output is not available for bills (use table or json)"),
        OutputFormat::Table => {}
    }

    if bills.is_empty() {
        println!("No bills in this snapshot.");
        return Ok(());
    }

    println!();
    println!("🧾 Bills (next {} days)", days);
    println!("   ─────────────────────────────────────────────────────────────");

    if due_soon.is_empty() {
        println!("   Nothing due.");
    } else {
        print_bills(&due_soon, today);
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Total due: ${:.2}", total);
    }

    if !late.is_empty() {
        let late_total = late
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.amount));
        println!();
        println!("⏰ Overdue (${:.2})", late_total);
        println!("   ─────────────────────────────────────────────────────────────");
        print_bills(&late, today);
    }

    Ok(())
}

fn print_bills(bills: &[&Bill], today: chrono::NaiveDate) {
    for bill in bills {
        let days_away = (bill.due_date - today).num_days();
        let when = match days_away {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n if n > 0 => format!("in {} days", n),
            n => format!("{} days ago", -n),
        };
        println!(
            "   {} │ {:25} │ {:>10.2} │ {}",
            bill.due_date,
            truncate(&bill.name, 25),
            bill.amount,
            when
        );
    }
}
