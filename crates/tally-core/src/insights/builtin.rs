//! The dashboard's stock rules

use super::threshold::ThresholdRule;
use super::types::{Band, InsightKind, Metric};

/// Share of income spent in the window; above 80% is a warning
pub fn spending_ratio_rule() -> ThresholdRule {
    ThresholdRule::new("spending_ratio", "Spending ratio", Metric::SpendingRatio)
        .with_band(Band::new(
            Some(80.0),
            InsightKind::Warning,
            "Spending Alert",
            "You've spent {percent}% of your monthly income. Consider budgeting!",
        ))
        .with_band(Band::new(
            None,
            InsightKind::Success,
            "Spending on Track",
            "You've spent {percent}% of your monthly income. Keep up the savings!",
        ))
}

/// Savings relative to monthly income
pub fn savings_rate_rule() -> ThresholdRule {
    ThresholdRule::new("savings_rate", "Savings rate", Metric::SavingsRate).with_band(Band::new(
        None,
        InsightKind::Info,
        "Savings Rate",
        "Your savings equal {percent}% of your monthly income.",
    ))
}

/// Built-in rules in evaluation order
pub fn builtin_rules() -> Vec<ThresholdRule> {
    vec![spending_ratio_rule(), savings_rate_rule()]
}
