//! How transactions feed the financial profile

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{aggregate, AggregationRequest};
use super::validate::Diagnostic;
use super::window::Window;
use crate::models::{Direction, FinancialProfile, Granularity, Transaction, TransactionType};

/// Profile after a single transaction is recorded
///
/// A successful deposit adds to savings, a successful withdrawal or payment
/// adds to this month's expenditure. Pending and failed transactions leave
/// the profile untouched. Totals saturate at `Decimal::MAX`.
pub fn apply_transaction(profile: &FinancialProfile, tx: &Transaction) -> FinancialProfile {
    let mut next = profile.clone();
    if !tx.is_successful() {
        return next;
    }

    let (field, name) = match tx.kind {
        TransactionType::Deposit => (&mut next.total_savings, "total_savings"),
        TransactionType::Withdrawal | TransactionType::Payment => {
            (&mut next.monthly_expenditure, "monthly_expenditure")
        }
    };
    match field.checked_add(tx.amount) {
        Some(sum) => *field = sum,
        None => {
            tracing::warn!(
                record_id = tx.id.as_str(),
                field = name,
                "Profile total overflowed; keeping Decimal::MAX"
            );
            *field = Decimal::MAX;
        }
    }
    next
}

/// Result of recomputing monthly expenditure from the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciled {
    pub profile: FinancialProfile,
    /// Expense total for the calendar month that was summed
    pub expenditure: Decimal,
    /// Whether the stored expenditure differed and needs writing back
    pub changed: bool,
    /// Transactions left out because they overflowed the total
    pub diagnostics: Vec<Diagnostic>,
}

/// Recompute `monthly_expenditure` as the expense total of the month containing `month`
pub fn reconcile_expenditure(
    profile: &FinancialProfile,
    transactions: &[Transaction],
    month: NaiveDate,
) -> Reconciled {
    let window = Window::month_of(month);
    let request = AggregationRequest::new(window, Granularity::Month, Direction::Expense);
    let result = aggregate(transactions, &request);
    let expenditure = result.total_for_window;

    let changed = profile.monthly_expenditure != expenditure;
    if changed {
        tracing::debug!(
            stored = %profile.monthly_expenditure,
            computed = %expenditure,
            month = %window,
            "Monthly expenditure out of date"
        );
    }

    let mut updated = profile.clone();
    updated.monthly_expenditure = expenditure;

    Reconciled {
        profile: updated,
        expenditure,
        changed,
        diagnostics: result.diagnostics,
    }
}
