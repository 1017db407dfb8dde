//! Shared command utilities
//!
//! This module contains:
//! - `open_session` - Load the snapshot and rules once for a command
//! - `OutputFormat` - table, json or csv output
//! - Argument parsers that turn CLI strings into core types

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::ledger::Validated;
use tally_core::{load_rules, Direction, InsightEngine, LedgerSnapshot, Timeframe};

/// Everything a command needs: parsed snapshot, validated ledger, rules, clock
pub struct Session {
    pub snapshot: LedgerSnapshot,
    pub ledger: Validated,
    pub engine: InsightEngine,
    pub today: NaiveDate,
}

impl Session {
    pub fn new(snapshot: LedgerSnapshot, engine: InsightEngine, today: NaiveDate) -> Self {
        let ledger = snapshot.validated();
        if !ledger.diagnostics.is_empty() {
            tracing::info!(
                skipped = ledger.diagnostics.len(),
                "Some ledger records were skipped (run `tally check` for details)"
            );
        }
        Self {
            snapshot,
            ledger,
            engine,
            today,
        }
    }
}

/// Load the snapshot and insight rules
pub fn open_session(
    snapshot_path: &Path,
    rules_path: Option<&Path>,
    today: Option<&str>,
) -> Result<Session> {
    let snapshot = LedgerSnapshot::from_path(snapshot_path)
        .with_context(|| format!("Failed to load snapshot: {}", snapshot_path.display()))?;
    let rules = load_rules(rules_path).context("Failed to load insight rules")?;
    let today = resolve_today(today)?;

    Ok(Session::new(snapshot, rules.engine(), today))
}

/// `--today` if given, else the local date
pub fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .context("Invalid --today date format (use YYYY-MM-DD)"),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// How a command renders its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown format: {} (valid: table, json, csv)", s)),
        }
    }
}

pub fn parse_format(s: &str) -> Result<OutputFormat> {
    s.parse().map_err(anyhow::Error::msg)
}

pub fn parse_timeframe(s: &str) -> Result<Timeframe> {
    s.parse().map_err(anyhow::Error::msg)
}

pub fn parse_direction(s: &str) -> Result<Direction> {
    s.parse().map_err(anyhow::Error::msg)
}
