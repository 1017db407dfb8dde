//! Tally CLI - Personal finance dashboard reports
//!
//! Usage:
//!   tally summary --timeframe 1M      Spending by category
//!   tally trends --timeframe 7D       Spending by weekday
//!   tally insights                    Rule-based insights
//!   tally check                       Validate the snapshot

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let session = commands::open_session(&cli.snapshot, cli.rules.as_deref(), cli.today.as_deref())?;

    match cli.command {
        Commands::Summary {
            timeframe,
            direction,
            format,
        } => commands::cmd_summary(&session, &timeframe, &direction, &format),
        Commands::Trends {
            timeframe,
            granularity,
            direction,
            format,
        } => commands::cmd_trends(
            &session,
            &timeframe,
            granularity.as_deref(),
            &direction,
            &format,
        ),
        Commands::Insights { timeframe, format } => {
            commands::cmd_insights(&session, &timeframe, &format)
        }
        Commands::Transactions {
            search,
            category,
            kind,
            timeframe,
            successful_only,
            sort,
            order,
            limit,
            format,
        } => {
            let query = commands::ListQuery {
                search: search.as_deref(),
                category: category.as_deref(),
                kind: kind.as_deref(),
                timeframe: timeframe.as_deref(),
                successful_only,
                sort: &sort,
                order: &order,
                limit,
            };
            commands::cmd_transactions(&session, &query, &format)
        }
        Commands::Bills { days, format } => commands::cmd_bills(&session, days, &format),
        Commands::Profile { format } => commands::cmd_profile(&session, &format),
        Commands::Check => commands::cmd_check(&session),
    }
}
