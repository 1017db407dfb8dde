//! Insight Engine - evaluates rules against an aggregation

use super::builtin::builtin_rules;
use super::types::InsightRecord;
use crate::models::{AggregationResult, FinancialProfile};

/// A single insight rule
///
/// Rules see only the profile and the aggregation, never each other's
/// output.
pub trait InsightRule: Send + Sync {
    /// Stable identifier, copied into every record the rule emits
    fn key(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Produce a record, or `None` when the rule has nothing to say
    fn evaluate(
        &self,
        profile: &FinancialProfile,
        aggregation: &AggregationResult,
    ) -> Option<InsightRecord>;
}

/// Ordered list of rules evaluated uniformly
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self::empty();

        for rule in builtin_rules() {
            engine.register(Box::new(rule));
        }

        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Create an engine from a caller-supplied rule list, kept in order
    pub fn with_rules(rules: Vec<Box<dyn InsightRule>>) -> Self {
        Self { rules }
    }

    /// Register a rule after the existing ones
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Keys of the registered rules, in evaluation order
    pub fn rule_keys(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule and collect records in registration order
    pub fn evaluate(
        &self,
        profile: &FinancialProfile,
        aggregation: &AggregationResult,
    ) -> Vec<InsightRecord> {
        let mut records = vec![];

        for rule in &self.rules {
            match rule.evaluate(profile, aggregation) {
                Some(record) => {
                    tracing::debug!(
                        rule = rule.key(),
                        kind = record.kind.as_str(),
                        "Insight rule fired"
                    );
                    records.push(record);
                }
                None => {
                    tracing::debug!(rule = rule.key(), "Insight rule suppressed");
                }
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::insights::types::InsightKind;
    use crate::ledger::{aggregate, AggregationRequest, Window};
    use crate::models::{Direction, Granularity, Transaction};
    use crate::test_utils::{d, profile, withdrawal};

    fn march_expenses(amount: i64) -> AggregationResult {
        let txs = vec![withdrawal("1", amount, Some("Rent"), "2024-03-02")];
        let request = AggregationRequest::new(
            Window::month_of(d("2024-03-01")),
            Granularity::CalendarDay,
            Direction::Expense,
        );
        aggregate(&txs, &request)
    }

    struct Always(&'static str);

    impl InsightRule for Always {
        fn key(&self) -> &str {
            self.0
        }

        fn name(&self) -> &str {
            "always"
        }

        fn evaluate(&self, _: &FinancialProfile, _: &AggregationResult) -> Option<InsightRecord> {
            Some(InsightRecord::new(self.0, InsightKind::Info, "t", "m"))
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(engine.rule_keys(), vec!["spending_ratio", "savings_rate"]);
        assert!(InsightEngine::empty().is_empty());
    }

    #[test]
    fn test_zero_salary_suppresses_builtins() {
        let engine = InsightEngine::new();
        let records = engine.evaluate(&profile(0, 5000), &march_expenses(900));
        assert!(records.is_empty());
    }

    #[test]
    fn test_high_spending_warns_with_percentage() {
        let engine = InsightEngine::new();
        let records = engine.evaluate(&profile(5000, 1000), &march_expenses(4200));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "spending_ratio");
        assert_eq!(records[0].kind, InsightKind::Warning);
        assert!(records[0].message.contains("84.0%"));

        assert_eq!(records[1].key, "savings_rate");
        assert_eq!(records[1].kind, InsightKind::Info);
        assert!(records[1].message.contains("20.0%"));
    }

    #[test]
    fn test_moderate_spending_is_success() {
        let engine = InsightEngine::new();
        let records = engine.evaluate(&profile(5000, 0), &march_expenses(4000));
        assert_eq!(records[0].kind, InsightKind::Success);
        assert!(records[0].message.contains("80.0%"));
    }

    #[test]
    fn test_empty_window_still_reports() {
        let empty: Vec<Transaction> = vec![];
        let request = AggregationRequest::new(
            Window::days(d("2024-03-14"), 7),
            Granularity::CalendarDay,
            Direction::Expense,
        );
        let result = aggregate(&empty, &request);
        assert_eq!(result.total_for_window, Decimal::ZERO);

        let records = InsightEngine::new().evaluate(&profile(5000, 0), &result);
        assert_eq!(records[0].kind, InsightKind::Success);
        assert!(records[0].message.contains("0.0%"));
    }

    #[test]
    fn test_declared_order_and_determinism() {
        let mut engine = InsightEngine::with_rules(vec![Box::new(Always("z")), Box::new(Always("a"))]);
        engine.register(Box::new(Always("m")));

        let p = profile(5000, 1000);
        let agg = march_expenses(100);
        let first = engine.evaluate(&p, &agg);
        let second = engine.evaluate(&p, &agg);

        let keys: Vec<&str> = first.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(first, second);
    }
}
