//! Core types for the Insight Engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ledger::compute_rate;
use crate::models::{AggregationResult, Direction, FinancialProfile};

/// Tone of an insight as the dashboard renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Something needs attention
    Warning,
    /// Things are going well
    Success,
    /// Neutral figure, no judgement
    Info,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Success => "success",
            InsightKind::Info => "info",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(InsightKind::Warning),
            "success" => Ok(InsightKind::Success),
            "info" => Ok(InsightKind::Info),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A rule-derived observation, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRecord {
    /// Key of the rule that produced it (e.g., "spending_ratio")
    pub key: String,
    pub kind: InsightKind,
    /// Short title (e.g., "Spending Alert")
    pub title: String,
    /// One-line message with the computed figures substituted in
    pub message: String,
}

impl InsightRecord {
    pub fn new(
        key: impl Into<String>,
        kind: InsightKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Figure a threshold rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Window expense total as a percentage of monthly salary
    SpendingRatio,
    /// Total savings as a percentage of monthly salary
    SavingsRate,
    /// Largest category's share of the window total
    TopCategoryShare,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SpendingRatio => "spending_ratio",
            Metric::SavingsRate => "savings_rate",
            Metric::TopCategoryShare => "top_category_share",
        }
    }

    /// Compute the metric, or `None` when its denominator is zero or the
    /// aggregation is on the wrong side of the ledger
    pub fn compute(
        &self,
        profile: &FinancialProfile,
        aggregation: &AggregationResult,
    ) -> Option<MetricValue> {
        match self {
            Metric::SpendingRatio => {
                if profile.monthly_salary <= Decimal::ZERO
                    || aggregation.direction != Direction::Expense
                {
                    return None;
                }
                Some(MetricValue {
                    percent: compute_rate(aggregation.total_for_window, profile.monthly_salary),
                    amount: aggregation.total_for_window,
                    category: None,
                })
            }
            Metric::SavingsRate => {
                if profile.monthly_salary <= Decimal::ZERO {
                    return None;
                }
                Some(MetricValue {
                    percent: compute_rate(profile.total_savings, profile.monthly_salary),
                    amount: profile.total_savings,
                    category: None,
                })
            }
            Metric::TopCategoryShare => {
                if aggregation.total_for_window <= Decimal::ZERO {
                    return None;
                }
                // BTreeMap order means ties go to the alphabetically first label
                let (category, amount) = aggregation
                    .by_category
                    .iter()
                    .fold(None::<(&String, &Decimal)>, |best, (name, amount)| match best {
                        Some((_, top)) if top >= amount => best,
                        _ => Some((name, amount)),
                    })?;
                Some(MetricValue {
                    percent: compute_rate(*amount, aggregation.total_for_window),
                    amount: *amount,
                    category: Some(category.clone()),
                })
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_ratio" => Ok(Metric::SpendingRatio),
            "savings_rate" => Ok(Metric::SavingsRate),
            "top_category_share" => Ok(Metric::TopCategoryShare),
            _ => Err(format!(
                "Unknown metric: {} (valid: spending_ratio, savings_rate, top_category_share)",
                s
            )),
        }
    }
}

/// A computed metric plus the values templates can reference
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub percent: f64,
    pub amount: Decimal,
    pub category: Option<String>,
}

impl MetricValue {
    /// Substitute `{percent}`, `{amount}` and `{category}` into a template
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{percent}", &format!("{:.1}", self.percent))
            .replace("{amount}", &format!("{:.2}", self.amount))
            .replace("{category}", self.category.as_deref().unwrap_or(""))
    }
}

/// One outcome of a threshold rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Matches when the metric is strictly greater than this percentage;
    /// `None` always matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Band {
    pub fn new(
        above: Option<f64>,
        kind: InsightKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            above,
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn matches(&self, percent: f64) -> bool {
        self.above.map_or(true, |threshold| percent > threshold)
    }
}
