//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Personal finance summaries, trends and insights
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance dashboard reports from a ledger snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger snapshot (JSON export of transactions, profile and bills)
    #[arg(long, default_value = "ledger.json", global = true)]
    pub snapshot: PathBuf,

    /// Insight rule file (TOML)
    ///
    /// Defaults to ~/.local/share/tally/config/insights.toml when present,
    /// otherwise the built-in rules.
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Spending (or income) by category
    Summary {
        /// Timeframe: 1D, 7D, 1M, 6M, 1Y
        #[arg(long, default_value = "1M")]
        timeframe: String,

        /// Direction: expense or income
        #[arg(long, default_value = "expense")]
        direction: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Totals bucketed over time
    Trends {
        /// Timeframe: 1D, 7D, 1M, 6M, 1Y
        #[arg(long, default_value = "7D")]
        timeframe: String,

        /// Granularity: day-of-week, calendar-day, week, month, year
        /// (defaults to the timeframe's chart granularity)
        #[arg(long)]
        granularity: Option<String>,

        /// Direction: expense or income
        #[arg(long, default_value = "expense")]
        direction: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Rule-based insights for a timeframe
    Insights {
        /// Timeframe: 1D, 7D, 1M, 6M, 1Y
        #[arg(long, default_value = "1M")]
        timeframe: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List transactions
    Transactions {
        /// Search descriptions (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Only this category ("Other" for uncategorized)
        #[arg(long)]
        category: Option<String>,

        /// Only this type: deposit, withdrawal, payment
        #[arg(long = "type")]
        kind: Option<String>,

        /// Only this timeframe: 1D, 7D, 1M, 6M, 1Y (default: all dates)
        #[arg(long)]
        timeframe: Option<String>,

        /// Hide pending and failed transactions
        #[arg(long)]
        successful_only: bool,

        /// Sort by: date or amount
        #[arg(long, default_value = "date")]
        sort: String,

        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Maximum number of rows
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Upcoming and overdue bills
    Bills {
        /// Look-ahead window in days
        #[arg(long, default_value = "30")]
        days: i64,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the financial profile and this month's reconciled expenditure
    Profile {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Validate the snapshot and list skipped records
    Check,
}
