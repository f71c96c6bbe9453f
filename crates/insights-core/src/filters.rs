//! Month-based filtering shared by the dashboard and its exports.

use std::collections::BTreeSet;
use std::fmt;

use crate::models::{Call, Ticket};

/// A record that belongs to (at most) one calendar-month bucket.
pub trait Monthly {
    /// The `YYYY-MM` bucket, or `None` when the source date was unusable.
    fn month(&self) -> Option<&str>;
}

impl Monthly for Ticket {
    fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

impl Monthly for Call {
    fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

/// Which slice of the data a view is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Month(String),
}

impl MonthFilter {
    /// Whether `row` passes the filter. Undated rows only pass `All`.
    pub fn matches<R: Monthly>(&self, row: &R) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => row.month() == Some(m.as_str()),
        }
    }

    /// Clone the rows that pass the filter, preserving order.
    pub fn apply<R: Monthly + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|r| self.matches(*r)).cloned().collect()
    }

    /// Filter options in selector order: `All` first, then each month
    /// ascending.
    pub fn options(months: &[String]) -> Vec<MonthFilter> {
        std::iter::once(MonthFilter::All)
            .chain(months.iter().cloned().map(MonthFilter::Month))
            .collect()
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => write!(f, "All"),
            MonthFilter::Month(m) => write!(f, "{}", m),
        }
    }
}

/// Distinct months present in `rows`, sorted ascending.
pub fn available_months<R: Monthly>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.month())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
