//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance dashboard:
//! - Domain models for transactions, financial profiles and bills
//! - Record validation with per-row diagnostics
//! - Ledger aggregation (category sums, period trends, rates)
//! - Insight engine with declarative threshold rules
//! - Rule configuration with embedded defaults and override files
//! - Snapshot loading for exported ledgers
//! - CSV/JSON export of report data

pub mod bills;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod snapshot;

/// Shared ledger fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{load_rules, RuleConfig};
pub use error::{Error, Result};
pub use insights::{InsightEngine, InsightKind, InsightRecord, InsightRule, Metric, ThresholdRule};
pub use ledger::{
    aggregate, aggregate_records, category_breakdown, compute_rate, filter_by_window,
    sum_by_category, sum_by_period, AggregationRequest, Diagnostic, SkipReason,
    Timeframe, TransactionFilter, Validated, Window,
};
pub use models::{
    AggregationResult, Bill, CategorySpending, Direction, FinancialProfile, Granularity,
    RawTransaction, Transaction, TransactionStatus, TransactionType, TrendDataPoint,
};
pub use snapshot::LedgerSnapshot;
