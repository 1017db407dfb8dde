//! Transaction filter builder for list views
//!
//! Same knobs the transactions page offers: free-text search, category,
//! type, date range, status visibility and sort.

use std::cmp::Ordering;

use super::window::Window;
use crate::models::{Transaction, TransactionType, OTHER_CATEGORY};

/// Column to sort the list by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            _ => Err(format!("Unknown sort field: {} (valid: date, amount)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {} (valid: asc, desc)", s)),
        }
    }
}

/// Builder for list-view transaction filters
///
/// The lifetime `'query` is how long the search term and category label
/// must stay valid.
#[derive(Debug, Clone)]
pub struct TransactionFilter<'query> {
    pub search: Option<&'query str>,
    pub category: Option<&'query str>,
    pub kind: Option<TransactionType>,
    pub date_range: Option<Window>,
    pub include_non_successful: bool,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for TransactionFilter<'_> {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            kind: None,
            date_range: None,
            // The list shows pending and failed rows too
            include_non_successful: true,
            sort_field: SortField::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search query (case-insensitive match on description)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Set category filter; "Other" matches uncategorized rows
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    pub fn kind(mut self, kind: Option<TransactionType>) -> Self {
        self.kind = kind;
        self
    }

    pub fn date_range(mut self, window: Option<Window>) -> Self {
        self.date_range = window;
        self
    }

    /// Set whether pending and failed transactions are listed
    pub fn include_non_successful(mut self, value: bool) -> Self {
        self.include_non_successful = value;
        self
    }

    pub fn sort_field(mut self, field: SortField) -> Self {
        self.sort_field = field;
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Whether a single transaction passes every filter
    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.include_non_successful && !tx.is_successful() {
            return false;
        }

        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        if let Some(window) = &self.date_range {
            if !window.contains(tx.date) {
                return false;
            }
        }

        if let Some(category) = self.category.map(str::trim).filter(|c| !c.is_empty()) {
            let wanted = if category.eq_ignore_ascii_case(OTHER_CATEGORY) {
                OTHER_CATEGORY
            } else {
                category
            };
            if tx.category_label() != wanted {
                return false;
            }
        }

        if let Some(q) = self.search.map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let found = tx
                .description
                .as_deref()
                .map(|desc| desc.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }

        true
    }

    /// Matching transactions, sorted
    ///
    /// Ties on the sort column are broken by id, newest id first.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut matched: Vec<&Transaction> =
            transactions.iter().filter(|tx| self.matches(tx)).collect();

        matched.sort_by(|a, b| {
            let primary = match self.sort_field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Amount => a.amount.cmp(&b.amount),
            };
            let primary = match self.sort_order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            match primary {
                Ordering::Equal => b.id.cmp(&a.id),
                other => other,
            }
        });

        tracing::debug!(
            total = transactions.len(),
            matched = matched.len(),
            "Filtered transactions"
        );
        matched
    }
}
