//! Profile and snapshot check commands

use anyhow::{bail, Result};
use serde_json::json;
use tally_core::export::to_json;
use tally_core::ledger::{compute_rate, reconcile_expenditure};

use super::core::{parse_format, OutputFormat, Session};

pub fn cmd_profile(session: &Session, format: &str) -> Result<()> {
    let format = parse_format(format)?;
    let stored = &session.snapshot.profile;
    let reconciled = reconcile_expenditure(stored, &session.ledger.transactions, session.today);

    match format {
        OutputFormat::Json => {
            let report = json!({
                "stored": stored,
                "reconciled": reconciled.profile,
                "changed": reconciled.changed,
            });
            println!("{}", to_json(&report)?);
            return Ok(());
        }
        OutputFormat::Csv => bail!("CSV output is not available for the profile (use table or json)"),
        OutputFormat::Table => {}
    }

    let profile = &reconciled.profile;

    println!();
    println!("👤 Financial Profile");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Monthly salary:       ${:>12.2}", profile.monthly_salary);
    println!("   Total savings:        ${:>12.2}", profile.total_savings);
    println!("   Monthly expenditure:  ${:>12.2}", profile.monthly_expenditure);
    println!(
        "   Spent of income:       {:>11.1}%",
        compute_rate(profile.monthly_expenditure, profile.monthly_salary)
    );

    if reconciled.changed {
        println!();
        println!(
            "   ⚠️  Stored expenditure ${:.2} is out of date (ledger says ${:.2})",
            stored.monthly_expenditure, reconciled.expenditure
        );
    }

    Ok(())
}

/// Report skipped records; fails when any record was skipped
pub fn cmd_check(session: &Session) -> Result<()> {
    let total = session.snapshot.transactions.len();
    let diagnostics = &session.ledger.diagnostics;

    println!();
    println!("🔍 Snapshot Check");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Records:  {}", total);
    println!("   Valid:    {}", session.ledger.transactions.len());
    println!("   Skipped:  {}", diagnostics.len());
    println!("   Bills:    {}", session.snapshot.bills.len());

    if diagnostics.is_empty() {
        println!();
        println!("✅ All records are valid");
        return Ok(());
    }

    println!();
    for diag in diagnostics {
        println!("   ✗ #{:<4} {:12} {}", diag.index, diag.record_id, diag.reason);
    }

    bail!("{} of {} records were skipped", diagnostics.len(), total)
}
