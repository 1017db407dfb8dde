//! Insight Engine - rule-based observations about a user's finances
//!
//! Rules are evaluated against a `(FinancialProfile, AggregationResult)` pair
//! and each emits at most one record. Output follows rule registration order,
//! so identical input always produces the same list.
//!
//! ## Built-in Rules
//!
//! - **Spending ratio** - window spending as a share of monthly salary
//! - **Savings rate** - total savings as a share of monthly salary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::InsightEngine;
//! use tally_core::ledger::{aggregate, AggregationRequest};
//!
//! let result = aggregate(&transactions, &request);
//! let records = InsightEngine::new().evaluate(&profile, &result);
//! ```

pub mod builtin;
pub mod engine;
pub mod threshold;
pub mod types;

pub use builtin::{builtin_rules, savings_rate_rule, spending_ratio_rule};
pub use engine::{InsightEngine, InsightRule};
pub use threshold::ThresholdRule;
pub use types::{Band, InsightKind, InsightRecord, Metric, MetricValue};
