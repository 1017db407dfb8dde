//! Declarative threshold rules

use serde::{Deserialize, Serialize};

use super::engine::InsightRule;
use super::types::{Band, InsightRecord, Metric};
use crate::models::{AggregationResult, FinancialProfile};

/// A rule described entirely by data: one metric, ordered bands
///
/// Bands are tried in order and the first whose threshold the metric exceeds
/// produces the record. If the metric cannot be computed, or no band
/// matches, the rule stays silent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub key: String,
    pub name: String,
    pub metric: Metric,
    pub bands: Vec<Band>,
}

impl ThresholdRule {
    pub fn new(key: impl Into<String>, name: impl Into<String>, metric: Metric) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            metric,
            bands: Vec::new(),
        }
    }

    /// Append a band; earlier bands take precedence
    pub fn with_band(mut self, band: Band) -> Self {
        self.bands.push(band);
        self
    }
}

impl InsightRule for ThresholdRule {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(
        &self,
        profile: &FinancialProfile,
        aggregation: &AggregationResult,
    ) -> Option<InsightRecord> {
        let value = self.metric.compute(profile, aggregation)?;
        let band = self.bands.iter().find(|band| band.matches(value.percent))?;

        Some(InsightRecord::new(
            self.key.as_str(),
            band.kind,
            value.render(&band.title),
            value.render(&band.message),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::InsightKind;
    use crate::ledger::{aggregate, AggregationRequest, Window};
    use crate::models::{Direction, Granularity};
    use crate::test_utils::{d, profile, withdrawal};

    fn food_heavy() -> AggregationResult {
        let txs = vec![
            withdrawal("1", 700, Some("Food"), "2024-03-02"),
            withdrawal("2", 300, Some("Rent"), "2024-03-05"),
        ];
        let request = AggregationRequest::new(
            Window::month_of(d("2024-03-01")),
            Granularity::Month,
            Direction::Expense,
        );
        aggregate(&txs, &request)
    }

    fn concentration_rule() -> ThresholdRule {
        ThresholdRule::new("concentration", "Category concentration", Metric::TopCategoryShare)
            .with_band(Band::new(
                Some(50.0),
                InsightKind::Warning,
                "{category} dominates",
                "{category} is {percent}% of spending ({amount}).",
            ))
            .with_band(Band::new(
                Some(25.0),
                InsightKind::Info,
                "Top category: {category}",
                "{category} is {percent}% of spending.",
            ))
    }

    #[test]
    fn test_first_matching_band_wins() {
        let record = concentration_rule()
            .evaluate(&profile(5000, 0), &food_heavy())
            .unwrap();
        assert_eq!(record.key, "concentration");
        assert_eq!(record.kind, InsightKind::Warning);
        assert_eq!(record.title, "Food dominates");
        assert_eq!(record.message, "Food is 70.0% of spending (700.00).");
    }

    #[test]
    fn test_no_matching_band_is_silent() {
        let rule = ThresholdRule::new("high", "High share", Metric::TopCategoryShare).with_band(
            Band::new(Some(90.0), InsightKind::Warning, "t", "m"),
        );
        assert!(rule.evaluate(&profile(5000, 0), &food_heavy()).is_none());
    }

    #[test]
    fn test_rule_round_trips_through_toml() {
        let rule = concentration_rule();
        let text = toml::to_string(&rule).unwrap();
        let parsed: ThresholdRule = toml::from_str(&text).unwrap();
        assert_eq!(parsed, rule);
    }
}
