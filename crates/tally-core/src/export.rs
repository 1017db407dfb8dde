//! CSV and JSON rendering of report data
//!
//! Supports:
//! - Category breakdowns, period series and transaction lists as CSV
//! - Any serializable report as pretty JSON

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{CategorySpending, Transaction, TrendDataPoint};

/// Pretty-printed JSON for any report value
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Category breakdown as CSV
pub fn categories_csv(categories: &[CategorySpending]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["category", "amount", "percentage", "transactions"])?;
    for cat in categories {
        writer.write_record([
            cat.category.clone(),
            format!("{:.2}", cat.amount),
            format!("{:.1}", cat.percentage),
            cat.transaction_count.to_string(),
        ])?;
    }
    finish(writer)
}

/// Period series as CSV
pub fn trends_csv(points: &[TrendDataPoint]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["period", "amount", "transactions"])?;
    for point in points {
        writer.write_record([
            point.period.clone(),
            format!("{:.2}", point.amount),
            point.transaction_count.to_string(),
        ])?;
    }
    finish(writer)
}

/// Transaction list as CSV
pub fn transactions_csv(transactions: &[&Transaction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "date",
        "type",
        "status",
        "category",
        "amount",
        "description",
        "payment_method",
        "tag",
    ])?;
    for tx in transactions {
        let date = tx.date.to_string();
        let amount = format!("{:.2}", tx.amount);
        writer.write_record([
            tx.id.as_str(),
            date.as_str(),
            tx.kind.as_str(),
            tx.status.as_str(),
            tx.category_label(),
            amount.as_str(),
            tx.description.as_deref().unwrap_or(""),
            tx.payment_method.as_deref().unwrap_or(""),
            tx.tag.as_deref().unwrap_or(""),
        ])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV output not UTF-8: {}", e)))
}
