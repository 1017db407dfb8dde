//! Per-record validation of raw ledger rows
//!
//! Every row either becomes a [`Transaction`] or a [`Diagnostic`] explaining
//! why it was skipped. One bad row never aborts the batch.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{value_text, RawTransaction, Transaction, TransactionStatus, TransactionType};

/// Why a raw row was left out of aggregation
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("missing {0}")]
    MissingField(String),

    #[error("missing date")]
    MissingDate,

    #[error("unparseable date '{0}'")]
    UnparseableDate(String),

    #[error("invalid amount {0}")]
    InvalidAmount(String),

    #[error("negative amount {0}")]
    NegativeAmount(Decimal),

    #[error("amount {0} overflows the running total")]
    AmountOverflow(Decimal),

    #[error("unknown transaction type '{0}'")]
    UnknownType(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

/// A skipped row and the reason it was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Position of the row in the input sequence
    pub index: usize,
    pub record_id: String,
    pub reason: SkipReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {} (#{}): {}", self.record_id, self.index, self.reason)
    }
}

/// Outcome of validating a batch of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validated {
    pub transactions: Vec<Transaction>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse the date forms the store produces
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive ISO timestamps.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|ts| ts.date())
        .ok()
}

/// Decimal amount from a JSON number or a numeric string
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Text of a scalar, or the JSON rendering of anything else
fn rendered(value: &Value) -> String {
    value_text(value).unwrap_or_else(|| value.to_string())
}

fn optional_text(value: &Option<Value>) -> Option<String> {
    value.as_ref().and_then(value_text)
}

/// Validate a single row
///
/// Checks run in a fixed order (id, type, status, amount, date) and the first
/// problem found is reported.
pub fn validate_record(raw: &RawTransaction) -> Result<Transaction, SkipReason> {
    let id = raw.record_id();
    if id.trim().is_empty() {
        return Err(SkipReason::MissingField("id".to_string()));
    }

    let kind: TransactionType = match &raw.kind {
        None => return Err(SkipReason::MissingField("type".to_string())),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| SkipReason::UnknownType(s.clone()))?,
        Some(other) => return Err(SkipReason::UnknownType(rendered(other))),
    };

    let status: TransactionStatus = match &raw.status {
        None => TransactionStatus::Success,
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| SkipReason::UnknownStatus(s.clone()))?,
        Some(other) => return Err(SkipReason::UnknownStatus(rendered(other))),
    };

    let amount = match &raw.amount {
        None => return Err(SkipReason::MissingField("amount".to_string())),
        Some(value) => {
            parse_amount(value).ok_or_else(|| SkipReason::InvalidAmount(rendered(value)))?
        }
    };
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SkipReason::NegativeAmount(amount));
    }

    let date = match &raw.date {
        None => return Err(SkipReason::MissingDate),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(SkipReason::MissingDate),
        Some(Value::String(s)) => {
            parse_date(s).ok_or_else(|| SkipReason::UnparseableDate(s.clone()))?
        }
        Some(other) => return Err(SkipReason::UnparseableDate(rendered(other))),
    };

    Ok(Transaction {
        id,
        amount,
        kind,
        category: optional_text(&raw.category),
        date,
        status,
        description: optional_text(&raw.description),
        payment_method: optional_text(&raw.payment_method),
        tag: optional_text(&raw.tag),
    })
}

/// Validate a batch, keeping input order for the accepted rows
pub fn validate_records(records: &[RawTransaction]) -> Validated {
    let mut validated = Validated::default();

    for (index, raw) in records.iter().enumerate() {
        match validate_record(raw) {
            Ok(tx) => validated.transactions.push(tx),
            Err(reason) => {
                let record_id = raw.record_id();
                tracing::warn!(
                    record_id = record_id.as_str(),
                    index,
                    reason = %reason,
                    "Skipping malformed ledger record"
                );
                validated.diagnostics.push(Diagnostic {
                    index,
                    record_id,
                    reason,
                });
            }
        }
    }

    validated
}
