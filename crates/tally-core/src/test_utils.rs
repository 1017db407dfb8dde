//! Test utilities for tally-core
//!
//! Small constructors for ledger fixtures plus a sample snapshot document
//! shared by the core and CLI tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::{
    Bill, FinancialProfile, RawTransaction, Transaction, TransactionStatus, TransactionType,
};

/// Parse a `YYYY-MM-DD` literal
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

fn tx(id: &str, amount: i64, kind: TransactionType, category: Option<&str>, date: &str) -> Transaction {
    let tx = Transaction::new(id, Decimal::from(amount), kind, d(date));
    match category {
        Some(c) => tx.with_category(c),
        None => tx,
    }
}

pub fn deposit(id: &str, amount: i64, category: Option<&str>, date: &str) -> Transaction {
    tx(id, amount, TransactionType::Deposit, category, date)
}

pub fn withdrawal(id: &str, amount: i64, category: Option<&str>, date: &str) -> Transaction {
    tx(id, amount, TransactionType::Withdrawal, category, date)
}

pub fn payment(id: &str, amount: i64, category: Option<&str>, date: &str) -> Transaction {
    tx(id, amount, TransactionType::Payment, category, date)
}

/// A raw row as the store would deliver it
pub fn raw(id: &str, amount: i64, kind: &str, category: Option<&str>, date: &str) -> RawTransaction {
    let text = |s: &str| Value::String(s.to_string());
    RawTransaction {
        id: Some(text(id)),
        amount: Some(Value::from(amount)),
        kind: Some(text(kind)),
        category: category.map(text),
        date: Some(text(date)),
        status: Some(text(TransactionStatus::Success.as_str())),
        ..Default::default()
    }
}

pub fn profile(monthly_salary: i64, total_savings: i64) -> FinancialProfile {
    FinancialProfile::new(
        Decimal::from(monthly_salary),
        Decimal::from(total_savings),
        Decimal::ZERO,
    )
}

pub fn bill(id: &str, name: &str, amount: i64, due_date: &str) -> Bill {
    Bill {
        id: id.to_string(),
        name: name.to_string(),
        amount: Decimal::from(amount),
        due_date: d(due_date),
    }
}

/// Three months of mixed activity, including unsettled rows
pub fn sample_ledger() -> Vec<Transaction> {
    vec![
        deposit("s1", 4800, Some("Salary"), "2024-01-01"),
        withdrawal("s2", 1800, Some("Rent"), "2024-01-02"),
        withdrawal("s3", 96, Some("Food"), "2024-01-13"),
        payment("s4", 110, Some("Utilities"), "2024-01-20"),
        deposit("s5", 4800, Some("Salary"), "2024-02-01"),
        withdrawal("s6", 1800, Some("Rent"), "2024-02-02"),
        withdrawal("s7", 42, None, "2024-02-14"),
        withdrawal("s8", 300, Some("Travel"), "2024-02-29").with_status(TransactionStatus::Pending),
        deposit("s9", 4800, Some("Salary"), "2024-03-01"),
        deposit("s10", 150, Some("Refund"), "2024-03-09"),
        withdrawal("s11", 1800, Some("Rent"), "2024-03-02"),
        withdrawal("s12", 64, Some("Food"), "2024-03-17"),
        payment("s13", 120, Some("Utilities"), "2024-03-18"),
        withdrawal("s14", 75, Some("Food"), "2024-03-20").with_status(TransactionStatus::Failed),
    ]
}

/// A snapshot export with one malformed row (`t8`), pinned to March 2024
pub const SAMPLE_SNAPSHOT_JSON: &str = r#"{
  "profile": {
    "monthly_salary": 5000,
    "total_savings": 12000,
    "monthly_expenditure": 2100
  },
  "transactions": [
    {"id": "t1", "amount": 5000, "type": "deposit", "category": "Salary", "date": "2024-03-01", "status": "success", "description": "ACME payroll"},
    {"id": "t2", "amount": 1800, "type": "withdrawal", "category": "Rent", "date": "2024-03-02T09:00:00Z", "status": "success", "description": "March rent"},
    {"id": "t3", "amount": "250.75", "type": "withdrawal", "category": "Food", "date": "2024-03-14", "status": "success", "description": "Groceries"},
    {"id": "t4", "amount": 120, "type": "payment", "category": "Utilities", "date": "2024-03-18", "status": "success", "description": "Electric bill", "payment_method": "card", "tag": "bills"},
    {"id": "t5", "amount": "64.25", "type": "withdrawal", "category": "Food", "date": "2024-03-19", "status": "success", "description": "Corner Cafe"},
    {"id": "t6", "amount": 500, "type": "withdrawal", "category": "Travel", "date": "2024-03-19", "status": "pending", "description": "Flight deposit"},
    {"id": "t7", "amount": 35, "type": "withdrawal", "date": "2024-03-20", "status": "success", "description": "Cash"},
    {"id": "t8", "amount": 99, "type": "withdrawal", "category": "Food", "date": "not-a-date", "status": "success"},
    {"id": "t9", "amount": 2200, "type": "withdrawal", "category": "Rent", "date": "2024-02-02", "status": "success", "description": "February rent"},
    {"id": "t10", "amount": 5000, "type": "deposit", "category": "Salary", "date": "2024-02-01", "status": "success", "description": "ACME payroll"}
  ],
  "bills": [
    {"id": "b1", "name": "Rent", "amount": 1800, "due_date": "2024-04-02"},
    {"id": "b2", "name": "Internet", "amount": "59.99", "due_date": "2024-03-25"},
    {"id": "b3", "name": "Phone", "amount": 40, "due_date": "2024-03-10"}
  ]
}"#;
