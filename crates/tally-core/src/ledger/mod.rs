//! Ledger aggregation
//!
//! Pure functions over an in-memory transaction snapshot:
//! - `window`: date ranges and timeframe presets
//! - `validate`: raw rows to transactions, with per-row diagnostics
//! - `aggregate`: category sums, period sums, rates
//! - `profile`: how transactions feed the financial profile
//! - `filter`: list-view filtering and sorting

mod aggregate;
mod filter;
mod profile;
mod validate;
mod window;

pub use aggregate::{
    aggregate, aggregate_records, category_breakdown, compute_rate, filter_by_window,
    sum_by_category, sum_by_period, AggregationRequest,
};
pub use filter::{SortField, SortOrder, TransactionFilter};
pub use profile::{apply_transaction, reconcile_expenditure, Reconciled};
pub use validate::{
    parse_amount, parse_date, validate_record, validate_records, Diagnostic, SkipReason, Validated,
};
pub use window::{Timeframe, Window};
