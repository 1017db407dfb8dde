//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::{Diagnostic, Window};

/// Label used for transactions without a category
pub const OTHER_CATEGORY: &str = "Other";

/// Kind of ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in
    Deposit,
    /// Money out
    Withdrawal,
    /// Money out, shown separately from withdrawals in lists
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Payment => "payment",
        }
    }

    /// True for withdrawals and payments
    pub fn is_outflow(&self) -> bool {
        matches!(self, Self::Withdrawal | Self::Payment)
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "payment" => Ok(Self::Payment),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: deposit, withdrawal, payment)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            _ => Err(format!(
                "Unknown transaction status: {} (valid: success, pending, failed)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the ledger an aggregation looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Deposits only
    Income,
    /// Withdrawals and payments
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Whether a transaction type counts toward this direction
    pub fn includes(&self, kind: TransactionType) -> bool {
        match self {
            Self::Income => kind == TransactionType::Deposit,
            Self::Expense => kind.is_outflow(),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "spending" => Ok(Self::Expense),
            _ => Err(format!("Unknown direction: {} (valid: income, expense)", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Non-negative magnitude; direction comes from `kind`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub tag: Option<String>,
}

impl Transaction {
    /// Create a successful, uncategorized transaction
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            kind,
            category: None,
            date,
            status: TransactionStatus::Success,
            description: None,
            payment_method: None,
            tag: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Category label used for grouping; blank or missing folds into "Other"
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => OTHER_CATEGORY,
        }
    }

    /// Only successful transactions take part in totals
    pub fn is_successful(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Effect on a running balance: +amount for deposits, -amount otherwise
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_outflow() {
            -self.amount
        } else {
            self.amount
        }
    }
}

/// A transaction row as delivered by the store, before validation
///
/// Fields are kept as loose JSON values so that a row with a null or
/// mistyped field still loads and is reported during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<Value>,
    /// Number or decimal string
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    /// Rows written by the dashboard always carry a status; missing means success
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub payment_method: Option<Value>,
    #[serde(default)]
    pub tag: Option<Value>,
}

impl RawTransaction {
    /// Identifier for diagnostics, empty when the row has none
    pub fn record_id(&self) -> String {
        self.id.as_ref().and_then(value_text).unwrap_or_default()
    }
}

/// Scalar JSON value as text; null, arrays and objects have none
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_value(text: &Option<String>) -> Option<Value> {
    text.clone().map(Value::String)
}

impl From<&Transaction> for RawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: Some(Value::String(tx.id.clone())),
            amount: Some(Value::String(tx.amount.to_string())),
            kind: Some(Value::String(tx.kind.as_str().to_string())),
            category: text_value(&tx.category),
            date: Some(Value::String(tx.date.to_string())),
            status: Some(Value::String(tx.status.as_str().to_string())),
            description: text_value(&tx.description),
            payment_method: text_value(&tx.payment_method),
            tag: text_value(&tx.tag),
        }
    }
}

/// Per-user financial profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    #[serde(default)]
    pub monthly_salary: Decimal,
    #[serde(default)]
    pub total_savings: Decimal,
    #[serde(default)]
    pub monthly_expenditure: Decimal,
}

impl FinancialProfile {
    pub fn new(monthly_salary: Decimal, total_savings: Decimal, monthly_expenditure: Decimal) -> Self {
        Self {
            monthly_salary,
            total_savings,
            monthly_expenditure,
        }
    }
}

/// A recurring bill with a due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

// ========== Report Models ==========

/// Report time granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// Seven buckets, Sunday through Saturday
    DayOfWeek,
    CalendarDay,
    /// Weeks starting on Sunday
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayOfWeek => "day-of-week",
            Self::CalendarDay => "calendar-day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day-of-week" | "weekday" => Ok(Self::DayOfWeek),
            "calendar-day" | "day" | "daily" => Ok(Self::CalendarDay),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            _ => Err(format!(
                "Unknown granularity: {} (valid: day-of-week, calendar-day, week, month, year)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending category in a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: Decimal,
    pub percentage: f64,
    pub transaction_count: i64,
}

/// A single bucket in a period series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub period: String,
    pub amount: Decimal,
    pub transaction_count: i64,
}

/// Category and period sums for one window, granularity and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub window: Window,
    pub granularity: Granularity,
    pub direction: Direction,
    pub by_category: BTreeMap<String, Decimal>,
    pub by_period: Vec<TrendDataPoint>,
    pub total_for_window: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[test]
    fn test_category_label_folds_missing_and_blank() {
        let tx = Transaction::new("1", Decimal::from(10), TransactionType::Withdrawal, day());
        assert_eq!(tx.category_label(), "Other");

        let blank = tx.clone().with_category("   ");
        assert_eq!(blank.category_label(), "Other");

        let food = tx.with_category(" Food ");
        assert_eq!(food.category_label(), "Food");
    }

    #[test]
    fn test_signed_amount() {
        let deposit = Transaction::new("1", Decimal::from(100), TransactionType::Deposit, day());
        let payment = Transaction::new("2", Decimal::from(40), TransactionType::Payment, day());
        assert_eq!(deposit.signed_amount(), Decimal::from(100));
        assert_eq!(payment.signed_amount(), Decimal::from(-40));
    }

    #[test]
    fn test_direction_includes() {
        assert!(Direction::Income.includes(TransactionType::Deposit));
        assert!(!Direction::Income.includes(TransactionType::Payment));
        assert!(Direction::Expense.includes(TransactionType::Withdrawal));
        assert!(Direction::Expense.includes(TransactionType::Payment));
        assert!(!Direction::Expense.includes(TransactionType::Deposit));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(
            TransactionType::from_str(" Withdrawal ").unwrap(),
            TransactionType::Withdrawal
        );
        assert!(TransactionType::from_str("transfer").is_err());
        assert_eq!(
            TransactionStatus::from_str("PENDING").unwrap(),
            TransactionStatus::Pending
        );
        assert_eq!(Granularity::from_str("weekday").unwrap(), Granularity::DayOfWeek);
        assert_eq!(Granularity::from_str("monthly").unwrap(), Granularity::Month);
        assert!(Granularity::from_str("hourly").is_err());
    }

    #[test]
    fn test_raw_transaction_defaults() {
        let raw: RawTransaction =
            serde_json::from_str(r#"{"id": "t1", "amount": 12.5, "type": "payment"}"#).unwrap();
        assert_eq!(raw.record_id(), "t1");
        assert!(raw.status.is_none());
        assert!(raw.date.is_none());
        assert!(raw.category.is_none());
        assert!(raw.tag.is_none());
    }

    #[test]
    fn test_raw_transaction_accepts_mistyped_fields() {
        let raw: RawTransaction = serde_json::from_str(
            r#"{"id": 42, "amount": null, "type": ["withdrawal"], "date": 20240320, "tag": "rent"}"#,
        )
        .unwrap();
        assert_eq!(raw.record_id(), "42");
        assert!(raw.amount.is_none());
        assert!(raw.kind.is_some());
        assert_eq!(raw.tag, Some(Value::String("rent".to_string())));
    }

    #[test]
    fn test_raw_from_transaction_keeps_exact_amount() {
        let tx = Transaction::new("t1", Decimal::new(1005, 2), TransactionType::Payment, day())
            .with_tag("utilities");
        let raw = RawTransaction::from(&tx);
        assert_eq!(raw.amount, Some(Value::String("10.05".to_string())));
        assert_eq!(raw.tag, Some(Value::String("utilities".to_string())));
    }

    #[test]
    fn test_granularity_serialization() {
        let json = serde_json::to_string(&Granularity::DayOfWeek).unwrap();
        assert_eq!(json, "\"day-of-week\"");
    }
}
