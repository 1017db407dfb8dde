//! Category and period sums over a window

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validate::{validate_records, Diagnostic, SkipReason};
use super::window::{first_of_month, week_start, Timeframe, Window};
use crate::models::{
    AggregationResult, CategorySpending, Direction, Granularity, RawTransaction, Transaction,
    TrendDataPoint,
};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// What to aggregate: one window, one bucket size, one side of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub window: Window,
    pub granularity: Granularity,
    pub direction: Direction,
}

impl AggregationRequest {
    pub fn new(window: Window, granularity: Granularity, direction: Direction) -> Self {
        Self {
            window,
            granularity,
            direction,
        }
    }

    /// Trailing window for a timeframe preset, using its chart granularity
    pub fn for_timeframe(timeframe: Timeframe, today: NaiveDate, direction: Direction) -> Self {
        Self::new(
            Window::trailing(timeframe, today),
            timeframe.default_granularity(),
            direction,
        )
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
}

/// Transactions dated inside `window`
///
/// Non-successful transactions are only returned when
/// `include_non_successful` is set, which is meant for display. The sums in
/// this module skip them either way.
pub fn filter_by_window<'a>(
    transactions: &'a [Transaction],
    window: &Window,
    include_non_successful: bool,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| window.contains(tx.date))
        .filter(|tx| include_non_successful || tx.is_successful())
        .collect()
}

/// Sum successful transactions per category label for one direction
///
/// Sums saturate at `Decimal::MAX`; `aggregate` screens out rows that would
/// get there.
pub fn sum_by_category<'a, I>(transactions: I, direction: Direction) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sums: BTreeMap<String, Decimal> = BTreeMap::new();

    for tx in counted(transactions, direction) {
        let sum = sums.entry(tx.category_label().to_string()).or_default();
        *sum = sum.saturating_add(tx.amount);
    }

    sums
}

/// Sum successful transactions into chronological buckets covering `window`
///
/// Every bucket in range is present, zero when nothing fell into it.
/// Day-of-week always yields seven buckets, Sunday first. Transactions dated
/// outside the window are ignored.
pub fn sum_by_period<'a, I>(
    transactions: I,
    window: &Window,
    granularity: Granularity,
    direction: Direction,
) -> Vec<TrendDataPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if granularity == Granularity::DayOfWeek {
        let mut buckets: Vec<TrendDataPoint> = WEEKDAY_LABELS
            .iter()
            .map(|label| empty_point(label.to_string()))
            .collect();
        for tx in counted(transactions, direction).filter(|tx| window.contains(tx.date)) {
            let slot = &mut buckets[tx.date.weekday().num_days_from_sunday() as usize];
            slot.amount = slot.amount.saturating_add(tx.amount);
            slot.transaction_count += 1;
        }
        return buckets;
    }

    let starts = bucket_starts(window, granularity);
    let mut buckets: Vec<TrendDataPoint> = starts
        .iter()
        .map(|start| empty_point(period_label(*start, granularity)))
        .collect();

    for tx in counted(transactions, direction).filter(|tx| window.contains(tx.date)) {
        let key = bucket_start(tx.date, granularity);
        if let Ok(idx) = starts.binary_search(&key) {
            buckets[idx].amount = buckets[idx].amount.saturating_add(tx.amount);
            buckets[idx].transaction_count += 1;
        }
    }

    buckets
}

/// `numerator / denominator * 100`, or 0 when the denominator is zero
pub fn compute_rate(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    let exact = numerator
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|n| n.checked_div(denominator))
        .or_else(|| {
            numerator
                .checked_div(denominator)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        });
    match exact.and_then(|rate| rate.to_f64()) {
        Some(rate) => rate,
        None => match (numerator.to_f64(), denominator.to_f64()) {
            (Some(n), Some(d)) => n / d * 100.0,
            _ => 0.0,
        },
    }
}

/// Aggregate validated transactions for one request
///
/// A transaction whose amount would push the window total past
/// `Decimal::MAX` is left out of every sum and reported as a diagnostic, so
/// the category, period and window totals always agree.
pub fn aggregate(transactions: &[Transaction], request: &AggregationRequest) -> AggregationResult {
    let in_window = transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| request.window.contains(tx.date));
    let admitted = admit(in_window, request.direction);

    let by_category = sum_by_category(admitted.transactions.iter().copied(), request.direction);
    let by_period = sum_by_period(
        admitted.transactions.iter().copied(),
        &request.window,
        request.granularity,
        request.direction,
    );

    tracing::debug!(
        window = %request.window,
        granularity = %request.granularity,
        direction = %request.direction,
        counted = admitted.transactions.len(),
        total = %admitted.total,
        "Aggregated ledger window"
    );

    AggregationResult {
        window: request.window,
        granularity: request.granularity,
        direction: request.direction,
        by_category,
        by_period,
        total_for_window: admitted.total,
        diagnostics: admitted.diagnostics,
    }
}

/// Validate raw rows, aggregate the good ones and attach diagnostics for the rest
pub fn aggregate_records(
    records: &[RawTransaction],
    request: &AggregationRequest,
) -> AggregationResult {
    let validated = validate_records(records);
    let mut result = aggregate(&validated.transactions, request);

    // Overflow diagnostics point into the validated rows; map them back to
    // positions in `records`.
    let skipped: BTreeSet<usize> = validated.diagnostics.iter().map(|d| d.index).collect();
    let accepted: Vec<usize> = (0..records.len()).filter(|i| !skipped.contains(i)).collect();
    for diag in &mut result.diagnostics {
        if let Some(&position) = accepted.get(diag.index) {
            diag.index = position;
        }
    }

    result.diagnostics.extend(validated.diagnostics);
    result.diagnostics.sort_by_key(|d| d.index);
    result
}

/// Categories sorted by amount (largest first), with share of the total
///
/// Rows that would overflow the total are left out, as in [`aggregate`].
pub fn category_breakdown<'a, I>(transactions: I, direction: Direction) -> Vec<CategorySpending>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let admitted = admit(transactions.into_iter().enumerate(), direction);

    let mut totals: BTreeMap<&str, (Decimal, i64)> = BTreeMap::new();
    for &tx in &admitted.transactions {
        let entry = totals.entry(tx.category_label()).or_default();
        entry.0 = entry.0.saturating_add(tx.amount);
        entry.1 += 1;
    }
    let total = admitted.total;

    let mut categories: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, (amount, count))| CategorySpending {
            category: category.to_string(),
            amount,
            percentage: compute_rate(amount, total),
            transaction_count: count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

/// Successful transactions on the requested side of the ledger
fn counted<'a, I>(transactions: I, direction: Direction) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(move |tx| tx.is_successful() && direction.includes(tx.kind))
}

/// Counted rows whose running total stays representable
struct Admitted<'a> {
    transactions: Vec<&'a Transaction>,
    total: Decimal,
    diagnostics: Vec<Diagnostic>,
}

/// Keep successful rows on one side of the ledger while the total fits in a
/// `Decimal`; items are `(position, transaction)` pairs
fn admit<'a, I>(transactions: I, direction: Direction) -> Admitted<'a>
where
    I: IntoIterator<Item = (usize, &'a Transaction)>,
{
    let mut admitted = Admitted {
        transactions: Vec::new(),
        total: Decimal::ZERO,
        diagnostics: Vec::new(),
    };

    for (index, tx) in transactions {
        if !(tx.is_successful() && direction.includes(tx.kind)) {
            continue;
        }
        match admitted.total.checked_add(tx.amount) {
            Some(total) => {
                admitted.total = total;
                admitted.transactions.push(tx);
            }
            None => {
                tracing::warn!(
                    record_id = tx.id.as_str(),
                    index,
                    amount = %tx.amount,
                    "Skipping transaction that overflows the window total"
                );
                admitted.diagnostics.push(Diagnostic {
                    index,
                    record_id: tx.id.clone(),
                    reason: SkipReason::AmountOverflow(tx.amount),
                });
            }
        }
    }

    admitted
}

fn empty_point(period: String) -> TrendDataPoint {
    TrendDataPoint {
        period,
        amount: Decimal::ZERO,
        transaction_count: 0,
    }
}

/// First day of the bucket containing `date`
fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::DayOfWeek | Granularity::CalendarDay => date,
        Granularity::Week => week_start(date),
        Granularity::Month => first_of_month(date),
        Granularity::Year => date.with_ordinal(1).unwrap_or(date),
    }
}

fn next_bucket(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::DayOfWeek | Granularity::CalendarDay => start.succ_opt(),
        Granularity::Week => start.checked_add_signed(Duration::days(7)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
        Granularity::Year => start.checked_add_months(Months::new(12)),
    }
}

/// Start dates of every bucket overlapping `window`, ascending
fn bucket_starts(window: &Window, granularity: Granularity) -> Vec<NaiveDate> {
    let mut starts = Vec::new();
    if window.is_empty() {
        return starts;
    }

    let mut cursor = Some(bucket_start(window.start, granularity));
    while let Some(start) = cursor {
        if start >= window.end {
            break;
        }
        starts.push(start);
        cursor = next_bucket(start, granularity);
    }
    starts
}

fn period_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::DayOfWeek => {
            WEEKDAY_LABELS[start.weekday().num_days_from_sunday() as usize].to_string()
        }
        Granularity::CalendarDay | Granularity::Week => start.format("%Y-%m-%d").to_string(),
        Granularity::Month => start.format("%Y-%m").to_string(),
        Granularity::Year => start.format("%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::{TransactionStatus, TransactionType};
    use crate::test_utils::{d, deposit, payment, raw, sample_ledger, withdrawal};

    const NONE: &[Transaction] = &[];

    fn total(map: &BTreeMap<String, Decimal>) -> Decimal {
        map.values().copied().sum()
    }

    fn period_total(points: &[TrendDataPoint]) -> Decimal {
        points.iter().map(|p| p.amount).sum()
    }

    #[test]
    fn test_sum_by_category_splits_directions() {
        let txs = vec![
            withdrawal("1", 100, Some("Food"), "2024-03-18"),
            withdrawal("2", 50, Some("Food"), "2024-03-19"),
            withdrawal("3", 25, Some("Food"), "2024-03-20"),
            deposit("4", 1000, Some("Salary"), "2024-03-15"),
        ];

        let expense = sum_by_category(&txs, Direction::Expense);
        assert_eq!(expense.len(), 1);
        assert_eq!(expense["Food"], Decimal::from(175));

        let income = sum_by_category(&txs, Direction::Income);
        assert_eq!(income.len(), 1);
        assert_eq!(income["Salary"], Decimal::from(1000));
    }

    #[test]
    fn test_payment_counts_as_expense_and_missing_category_is_other() {
        let txs = vec![
            payment("1", 30, None, "2024-03-18"),
            withdrawal("2", 20, Some(""), "2024-03-18"),
        ];
        let expense = sum_by_category(&txs, Direction::Expense);
        assert_eq!(expense["Other"], Decimal::from(50));
    }

    #[test]
    fn test_pending_never_contributes() {
        let pending = withdrawal("p", 500, Some("Rent"), "2024-03-18")
            .with_status(TransactionStatus::Pending);
        let failed = withdrawal("f", 70, Some("Rent"), "2024-03-18")
            .with_status(TransactionStatus::Failed);
        let txs = vec![pending, failed];
        let window = Window::days(d("2024-03-14"), 7);

        assert!(filter_by_window(&txs, &window, false).is_empty());

        let shown = filter_by_window(&txs, &window, true);
        assert_eq!(shown.len(), 2);
        assert!(sum_by_category(shown.iter().copied(), Direction::Expense).is_empty());

        let request = AggregationRequest::new(window, Granularity::CalendarDay, Direction::Expense);
        let result = aggregate(&txs, &request);
        assert_eq!(result.total_for_window, Decimal::ZERO);
        assert_eq!(period_total(&result.by_period), Decimal::ZERO);
    }

    #[test]
    fn test_filter_by_window_bounds() {
        let txs = vec![
            withdrawal("before", 1, None, "2024-03-13"),
            withdrawal("first", 2, None, "2024-03-14"),
            withdrawal("last", 3, None, "2024-03-20"),
            withdrawal("after", 4, None, "2024-03-21"),
        ];
        let window = Window::days(d("2024-03-14"), 7);
        let ids: Vec<&str> = filter_by_window(&txs, &window, false)
            .iter()
            .map(|tx| tx.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "last"]);
    }

    #[test]
    fn test_empty_input_yields_zero_filled_days() {
        let window = Window::days(d("2024-03-14"), 7);
        let points = sum_by_period(NONE, &window, Granularity::CalendarDay, Direction::Expense);

        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.amount == Decimal::ZERO));
        assert_eq!(points[0].period, "2024-03-14");
        assert_eq!(points[6].period, "2024-03-20");
    }

    #[test]
    fn test_day_of_week_is_sunday_first() {
        // 2024-03-17 is a Sunday, 2024-03-20 a Wednesday
        let txs = vec![
            withdrawal("1", 10, None, "2024-03-20"),
            withdrawal("2", 5, None, "2024-03-17"),
            withdrawal("3", 7, None, "2024-03-13"),
        ];
        let window = Window::days(d("2024-03-10"), 14);
        let points = sum_by_period(&txs, &window, Granularity::DayOfWeek, Direction::Expense);

        let labels: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(points[0].amount, Decimal::from(5));
        assert_eq!(points[3].amount, Decimal::from(17));
        assert_eq!(points[3].transaction_count, 2);

        let empty_window = Window::days(d("2024-03-10"), 0);
        let empty = sum_by_period(NONE, &empty_window, Granularity::DayOfWeek, Direction::Expense);
        assert_eq!(empty.len(), 7);
    }

    #[test]
    fn test_week_month_and_year_buckets() {
        let window = Window::new(d("2024-01-15"), d("2024-04-01"));

        let months = sum_by_period(NONE, &window, Granularity::Month, Direction::Expense);
        let labels: Vec<&str> = months.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);

        // 2024-01-15 is a Monday; its week starts Sunday 2024-01-14
        let weeks = sum_by_period(NONE, &window, Granularity::Week, Direction::Expense);
        assert_eq!(weeks[0].period, "2024-01-14");
        assert_eq!(weeks.last().map(|p| p.period.as_str()), Some("2024-03-31"));
        assert_eq!(weeks.len(), 12);

        let years = sum_by_period(
            NONE,
            &Window::new(d("2023-06-01"), d("2024-06-01")),
            Granularity::Year,
            Direction::Income,
        );
        let labels: Vec<&str> = years.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2023", "2024"]);
    }

    #[test]
    fn test_period_sums_ignore_out_of_window() {
        let txs = vec![
            withdrawal("in", 10, None, "2024-03-05"),
            withdrawal("out", 99, None, "2024-04-02"),
        ];
        let window = Window::month_of(d("2024-03-10"));
        let points = sum_by_period(&txs, &window, Granularity::Month, Direction::Expense);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].amount, Decimal::from(10));
    }

    #[test]
    fn test_compute_rate() {
        assert_eq!(compute_rate(Decimal::from(42), Decimal::ZERO), 0.0);
        assert_eq!(compute_rate(Decimal::ZERO, Decimal::ZERO), 0.0);
        assert_eq!(compute_rate(Decimal::from(4200), Decimal::from(5000)), 84.0);
        assert_eq!(compute_rate(Decimal::from(1), Decimal::from(4)), 25.0);
    }

    #[test]
    fn test_compute_rate_near_decimal_max() {
        assert_eq!(compute_rate(Decimal::MAX, Decimal::MAX), 100.0);

        let rate = compute_rate(Decimal::MAX, Decimal::from(2));
        let expected = 3.961_408_125_713_217e30;
        assert!((rate - expected).abs() / expected < 1e-9, "rate {}", rate);
    }

    fn huge(id: &str, category: &str) -> Transaction {
        Transaction::new(id, Decimal::MAX, TransactionType::Withdrawal, d("2024-03-18"))
            .with_category(category)
    }

    #[test]
    fn test_overflowing_amount_becomes_diagnostic() {
        let txs = vec![
            huge("a", "Rent"),
            huge("b", "Food"),
            withdrawal("c", 5, Some("Food"), "2024-03-10"),
        ];
        let request = AggregationRequest::new(
            Window::days(d("2024-03-14"), 7),
            Granularity::CalendarDay,
            Direction::Expense,
        );

        let result = aggregate(&txs, &request);
        assert_eq!(result.total_for_window, Decimal::MAX);
        assert_eq!(result.by_category.len(), 1);
        assert_eq!(result.by_category["Rent"], Decimal::MAX);
        assert_eq!(period_total(&result.by_period), Decimal::MAX);

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].index, 1);
        assert_eq!(result.diagnostics[0].record_id, "b");
        assert_eq!(
            result.diagnostics[0].reason,
            SkipReason::AmountOverflow(Decimal::MAX)
        );
    }

    #[test]
    fn test_aggregate_records_overflow_points_at_raw_row() {
        let mut first = raw("a", 0, "withdrawal", Some("Rent"), "2024-03-18");
        first.amount = Some(json!(Decimal::MAX.to_string()));
        let mut second = first.clone();
        second.id = Some(json!("b"));
        let records = vec![
            raw("bad", 5, "withdrawal", None, "someday"),
            first,
            second,
        ];
        let request = AggregationRequest::new(
            Window::days(d("2024-03-14"), 7),
            Granularity::DayOfWeek,
            Direction::Expense,
        );

        let result = aggregate_records(&records, &request);
        assert_eq!(result.total_for_window, Decimal::MAX);
        let positions: Vec<(usize, &str)> = result
            .diagnostics
            .iter()
            .map(|d| (d.index, d.record_id.as_str()))
            .collect();
        assert_eq!(positions, vec![(0, "bad"), (2, "b")]);
    }

    #[test]
    fn test_standalone_sums_saturate() {
        let txs = vec![huge("a", "Rent"), huge("b", "Rent")];
        let window = Window::days(d("2024-03-18"), 1);

        let by_category = sum_by_category(&txs, Direction::Expense);
        assert_eq!(by_category["Rent"], Decimal::MAX);

        let by_period = sum_by_period(&txs, &window, Granularity::CalendarDay, Direction::Expense);
        assert_eq!(by_period[0].amount, Decimal::MAX);
        assert_eq!(by_period[0].transaction_count, 2);

        let breakdown = category_breakdown(&txs, Direction::Expense);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].transaction_count, 1);
        assert_eq!(breakdown[0].percentage, 100.0);
    }

    #[test]
    fn test_conservation_across_granularities() {
        let txs = sample_ledger();
        let window = Window::new(d("2024-01-01"), d("2024-04-01"));

        for granularity in [
            Granularity::DayOfWeek,
            Granularity::CalendarDay,
            Granularity::Week,
            Granularity::Month,
            Granularity::Year,
        ] {
            for direction in [Direction::Income, Direction::Expense] {
                let request = AggregationRequest::new(window, granularity, direction);
                let result = aggregate(&txs, &request);
                assert_eq!(total(&result.by_category), result.total_for_window);
                assert_eq!(period_total(&result.by_period), result.total_for_window);
            }
        }
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let txs = sample_ledger();
        let request = AggregationRequest::for_timeframe(
            Timeframe::OneMonth,
            d("2024-03-20"),
            Direction::Expense,
        );
        assert_eq!(aggregate(&txs, &request), aggregate(&txs, &request));
    }

    #[test]
    fn test_aggregate_records_reports_bad_rows() {
        let records = vec![
            raw("a", 40, "withdrawal", Some("Food"), "2024-03-18"),
            raw("bad", 500, "withdrawal", Some("Food"), "someday"),
            raw("b", 60, "withdrawal", Some("Food"), "2024-03-19"),
        ];
        let request = AggregationRequest::new(
            Window::days(d("2024-03-14"), 7),
            Granularity::CalendarDay,
            Direction::Expense,
        );

        let result = aggregate_records(&records, &request);
        assert_eq!(result.total_for_window, Decimal::from(100));
        assert_eq!(result.by_category["Food"], Decimal::from(100));
        assert_eq!(result.by_period.len(), 7);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].record_id, "bad");
    }

    #[test]
    fn test_category_breakdown_ordering() {
        let txs = vec![
            withdrawal("1", 30, Some("Transport"), "2024-03-18"),
            withdrawal("2", 60, Some("Food"), "2024-03-18"),
            withdrawal("3", 30, Some("Books"), "2024-03-18"),
            deposit("4", 900, Some("Salary"), "2024-03-18"),
        ];
        let breakdown = category_breakdown(&txs, Direction::Expense);

        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Books", "Transport"]);
        assert_eq!(breakdown[0].percentage, 50.0);
        assert_eq!(breakdown[0].transaction_count, 1);
        assert!(category_breakdown(&txs[..0], Direction::Expense).is_empty());
    }

    #[test]
    fn test_request_for_timeframe_uses_chart_granularity() {
        let request =
            AggregationRequest::for_timeframe(Timeframe::SevenDays, d("2024-03-20"), Direction::Expense);
        assert_eq!(request.granularity, Granularity::DayOfWeek);
        assert_eq!(request.window.day_count(), 7);

        let monthly = request.with_granularity(Granularity::CalendarDay);
        assert_eq!(monthly.granularity, Granularity::CalendarDay);
    }
}
