//! Aggregation windows and timeframe presets

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Granularity;

/// A half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` consecutive calendar days beginning at `start`
    ///
    /// The end is clamped to `NaiveDate::MAX` for very long spans.
    pub fn days(start: NaiveDate, days: i64) -> Self {
        let span = Days::new(days.max(0).unsigned_abs());
        Self::new(start, start.checked_add_days(span).unwrap_or(NaiveDate::MAX))
    }

    /// `start` through `start + days`, both inclusive
    pub fn through(start: NaiveDate, days: i64) -> Self {
        Self::days(start, days.max(0).saturating_add(1))
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self::new(start, end)
    }

    /// A trailing window that ends with `today` (inclusive)
    pub fn trailing(timeframe: Timeframe, today: NaiveDate) -> Self {
        let end = today.succ_opt().unwrap_or(NaiveDate::MAX);
        let start = match timeframe {
            Timeframe::OneDay => Some(today),
            Timeframe::SevenDays => end.checked_sub_days(Days::new(7)),
            Timeframe::OneMonth => end.checked_sub_months(Months::new(1)),
            Timeframe::SixMonths => end.checked_sub_months(Months::new(6)),
            Timeframe::OneYear => end.checked_sub_months(Months::new(12)),
        };
        Self::new(start.unwrap_or(NaiveDate::MIN), end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Number of calendar days covered
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// Last date inside the window, if any
    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.is_empty() {
            None
        } else {
            self.end.pred_opt()
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_day() {
            Some(last) => write!(f, "{} to {}", self.start, last),
            None => write!(f, "{} (empty)", self.start),
        }
    }
}

/// Named trailing windows offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::SevenDays => "7D",
            Self::OneMonth => "1M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
        }
    }

    pub fn all() -> &'static [Timeframe] {
        &[
            Self::OneDay,
            Self::SevenDays,
            Self::OneMonth,
            Self::SixMonths,
            Self::OneYear,
        ]
    }

    /// Granularity the trend chart uses for this timeframe
    pub fn default_granularity(&self) -> Granularity {
        match self {
            Self::OneDay | Self::OneMonth => Granularity::CalendarDay,
            Self::SevenDays => Granularity::DayOfWeek,
            Self::SixMonths | Self::OneYear => Granularity::Month,
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "today" | "day" => Ok(Self::OneDay),
            "7d" | "week" => Ok(Self::SevenDays),
            "1m" | "month" => Ok(Self::OneMonth),
            "6m" => Ok(Self::SixMonths),
            "1y" | "year" => Ok(Self::OneYear),
            _ => Err(format!(
                "Unknown timeframe: {} (valid: 1D, 7D, 1M, 6M, 1Y)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sunday on or before `date`
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
    date.checked_sub_days(back).unwrap_or(NaiveDate::MIN)
}
