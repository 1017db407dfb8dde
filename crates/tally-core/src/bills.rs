//! Bill due-date queries

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::ledger::Window;
use crate::models::Bill;

/// Bills due from `today` through `today + horizon_days`, inclusive
///
/// Sorted by due date, then name.
pub fn upcoming(bills: &[Bill], today: NaiveDate, horizon_days: i64) -> Vec<&Bill> {
    let window = Window::through(today, horizon_days);
    let mut due: Vec<&Bill> = bills.iter().filter(|b| window.contains(b.due_date)).collect();
    sort_by_due(&mut due);
    due
}

/// Bills whose due date is before `today`
pub fn overdue(bills: &[Bill], today: NaiveDate) -> Vec<&Bill> {
    let mut late: Vec<&Bill> = bills.iter().filter(|b| b.due_date < today).collect();
    sort_by_due(&mut late);
    late
}

/// Sum of bills due inside `window`, saturating at `Decimal::MAX`
pub fn total_due(bills: &[Bill], window: &Window) -> Decimal {
    bills
        .iter()
        .filter(|b| window.contains(b.due_date))
        .fold(Decimal::ZERO, |total, b| total.saturating_add(b.amount))
}

/// Reject bills that cannot be summed
pub fn validate_bills(bills: &[Bill]) -> Result<()> {
    for bill in bills {
        if bill.amount.is_sign_negative() && !bill.amount.is_zero() {
            return Err(Error::InvalidData(format!(
                "Bill '{}' ({}) has negative amount {}",
                bill.name, bill.id, bill.amount
            )));
        }
    }
    Ok(())
}

fn sort_by_due(bills: &mut [&Bill]) {
    bills.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bill, d};

    fn bills() -> Vec<Bill> {
        vec![
            bill("1", "Rent", 1200, "2024-04-01"),
            bill("2", "Internet", 60, "2024-03-25"),
            bill("3", "Electric", 85, "2024-03-25"),
            bill("4", "Phone", 40, "2024-03-10"),
            bill("5", "Insurance", 300, "2024-05-15"),
        ]
    }

    #[test]
    fn test_upcoming_within_horizon() {
        let bills = bills();
        let names: Vec<&str> = upcoming(&bills, d("2024-03-20"), 12)
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, vec!["Electric", "Internet", "Rent"]);
    }

    #[test]
    fn test_upcoming_includes_today_and_horizon_end() {
        let bills = bills();
        assert_eq!(upcoming(&bills, d("2024-03-25"), 0).len(), 2);
        assert_eq!(upcoming(&bills, d("2024-03-26"), 6).len(), 1);
    }

    #[test]
    fn test_overdue() {
        let bills = bills();
        let late = overdue(&bills, d("2024-03-20"));
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].name, "Phone");
    }

    #[test]
    fn test_total_due() {
        let bills = bills();
        let march = Window::month_of(d("2024-03-01"));
        assert_eq!(total_due(&bills, &march), Decimal::from(185));
        assert_eq!(total_due(&[], &march), Decimal::ZERO);
    }

    #[test]
    fn test_huge_horizon_does_not_overflow() {
        let bills = bills();
        let today = d("2024-03-20");
        assert_eq!(upcoming(&bills, today, i64::MAX / 2).len(), 4);
        assert_eq!(upcoming(&bills, today, i64::MAX).len(), 4);
        assert_eq!(upcoming(&bills, today, -3).len(), 0);

        let everything = Window::through(today, i64::MAX);
        assert_eq!(total_due(&bills, &everything), Decimal::from(1645));
    }

    #[test]
    fn test_total_due_saturates() {
        let mut bills = bills();
        bills[0].amount = Decimal::MAX;
        bills[1].amount = Decimal::MAX;
        let spring = Window::new(d("2024-03-01"), d("2024-05-01"));
        assert_eq!(total_due(&bills, &spring), Decimal::MAX);
    }

    #[test]
    fn test_negative_bill_rejected() {
        let mut bills = bills();
        assert!(validate_bills(&bills).is_ok());
        bills.push(bill("6", "Refund", -20, "2024-03-30"));
        let err = validate_bills(&bills).unwrap_err();
        assert!(err.to_string().contains("Refund"));
    }
}
