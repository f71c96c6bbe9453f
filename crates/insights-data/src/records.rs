//! Column layouts for the cleaned tables.
//!
//! A cleaned CSV (and the matching dashboard worksheet) is laid out as the
//! required columns, then any pass-through columns, then derived columns.

use insights_core::data_processors::DateParser;
use insights_core::models::{Call, Feedback, Table, Ticket};

pub const TICKET_COLUMNS: [&str; 8] = [
    "ticket_id",
    "customer_id",
    "created_date",
    "priority",
    "status",
    "issue_type",
    "resolution_time_hrs",
    "agent",
];
pub const TICKET_DERIVED: [&str; 3] = ["month", "customer_ticket_count", "is_repeat_customer"];

pub const CALL_COLUMNS: [&str; 4] = ["call_id", "agent_id", "call_date", "duration_min"];
pub const CALL_DERIVED: [&str; 1] = ["month"];

pub const FEEDBACK_COLUMNS: [&str; 2] = ["csat", "nps"];
pub const FEEDBACK_DERIVED: [&str; 0] = [];

/// A single typed cell, kept typed so the spreadsheet writer can emit
/// numbers as numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Empty,
}

impl Cell {
    /// Text form used in CSV output.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format_float(*f),
            Cell::Empty => String::new(),
        }
    }

    fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    fn opt_text(s: Option<&str>) -> Self {
        s.map(Cell::text).unwrap_or(Cell::Empty)
    }
}

/// Floats always carry a decimal point (`50.0`, not `50`).
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// A cleaned record with a fixed column layout.
pub trait TabularRecord {
    const REQUIRED: &'static [&'static str];
    const DERIVED: &'static [&'static str];

    /// Cells in layout order: required, pass-through, derived.
    fn cells(&self) -> Vec<Cell>;
}

/// Full header row for `table`.
pub fn header_for<R: TabularRecord>(table: &Table<R>) -> Vec<String> {
    R::REQUIRED
        .iter()
        .map(|s| s.to_string())
        .chain(table.extra_columns.iter().cloned())
        .chain(R::DERIVED.iter().map(|s| s.to_string()))
        .collect()
}

fn extra_cells(extra: &[String]) -> impl Iterator<Item = Cell> + '_ {
    extra.iter().map(|s| Cell::Text(s.clone()))
}

impl TabularRecord for Ticket {
    const REQUIRED: &'static [&'static str] = &TICKET_COLUMNS;
    const DERIVED: &'static [&'static str] = &TICKET_DERIVED;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::text(&self.ticket_id),
            Cell::text(&self.customer_id),
            self.created_date
                .as_ref()
                .map(|d| Cell::Text(DateParser::format(d)))
                .unwrap_or(Cell::Empty),
            Cell::opt_text(self.priority.map(|p| p.as_str())),
            Cell::text(&self.status),
            Cell::text(&self.issue_type),
            Cell::Int(self.resolution_time_hrs),
            Cell::text(&self.agent),
        ];
        cells.extend(extra_cells(&self.extra));
        cells.push(Cell::opt_text(self.month.as_deref()));
        cells.push(
            self.customer_ticket_count
                .map(|c| Cell::Int(i64::from(c)))
                .unwrap_or(Cell::Empty),
        );
        cells.push(Cell::Int(i64::from(self.is_repeat_customer)));
        cells
    }
}

impl TabularRecord for Call {
    const REQUIRED: &'static [&'static str] = &CALL_COLUMNS;
    const DERIVED: &'static [&'static str] = &CALL_DERIVED;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::text(&self.call_id),
            Cell::text(&self.agent_id),
            self.call_date
                .as_ref()
                .map(|d| Cell::Text(DateParser::format(d)))
                .unwrap_or(Cell::Empty),
            Cell::Int(self.duration_min),
        ];
        cells.extend(extra_cells(&self.extra));
        cells.push(Cell::opt_text(self.month.as_deref()));
        cells
    }
}

impl TabularRecord for Feedback {
    const REQUIRED: &'static [&'static str] = &FEEDBACK_COLUMNS;
    const DERIVED: &'static [&'static str] = &FEEDBACK_DERIVED;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![Cell::Int(self.csat), Cell::Int(self.nps)];
        cells.extend(extra_cells(&self.extra));
        cells
    }
}
