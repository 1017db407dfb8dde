//! Exported ledger snapshots
//!
//! A snapshot is the JSON dump of one user's rows from the hosted store:
//! `transactions`, the `profile` record and `bills`. Transaction rows stay
//! raw here; they are validated when the snapshot is read for reporting, so a
//! bad row becomes a diagnostic instead of a load error.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bills::validate_bills;
use crate::error::Result;
use crate::ledger::{validate_records, Validated};
use crate::models::{Bill, FinancialProfile, RawTransaction};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub profile: FinancialProfile,
    #[serde(default)]
    pub bills: Vec<Bill>,
}

/// Keep every element of the transactions array, even ones that are not objects
///
/// A non-object element becomes an empty row, which validation then reports.
fn lenient_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<RawTransaction>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Value> = Vec::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| serde_json::from_value(row).unwrap_or_default())
        .collect())
}

impl LedgerSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        validate_bills(&snapshot.bills)?;
        Ok(snapshot)
    }

    /// Read and parse a snapshot file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            transactions = snapshot.transactions.len(),
            bills = snapshot.bills.len(),
            "Loaded ledger snapshot"
        );
        Ok(snapshot)
    }

    /// Validate the transaction rows
    pub fn validated(&self) -> Validated {
        validate_records(&self.transactions)
    }
}
