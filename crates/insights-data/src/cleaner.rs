//! Raw CSV tables to typed, cleaned records.
//!
//! Cleaning never adds rows. Tickets with a negative resolution time are
//! dropped; every other row survives with coerced values.

use std::collections::HashMap;

use insights_core::data_processors::{month_key, DateParser, NumericCoercer};
use insights_core::error::Result;
use insights_core::models::{Call, Feedback, Priority, Table, Ticket};
use tracing::debug;

use crate::reader::CsvTable;
use crate::records::{
    CALL_COLUMNS, CALL_DERIVED, FEEDBACK_COLUMNS, FEEDBACK_DERIVED, TICKET_COLUMNS,
    TICKET_DERIVED,
};

/// What happened while cleaning one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Numeric cells that were empty or unparseable and became `0`.
    pub coerced_cells: usize,
    /// Non-empty date cells that matched no known format.
    pub unparsed_dates: usize,
}

impl CleanStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Typed rows plus the stats gathered while producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<R> {
    pub table: Table<R>,
    pub stats: CleanStats,
}

/// Pass-through columns: everything that is neither required nor derived.
/// Excluding derived names keeps re-cleaning a cleaned file stable.
fn split_extras(raw: &CsvTable, required: &[&str], derived: &[&str]) -> (Vec<usize>, Vec<String>) {
    let known: Vec<&str> = required.iter().chain(derived.iter()).copied().collect();
    raw.extra_columns(&known).into_iter().unzip()
}

fn pick_extras(row: &[String], idx: &[usize]) -> Vec<String> {
    idx.iter().map(|&i| row[i].clone()).collect()
}

fn parse_date(raw: &str, stats: &mut CleanStats) -> Option<chrono::NaiveDateTime> {
    let parsed = DateParser::parse(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        stats.unparsed_dates += 1;
    }
    parsed
}

fn coerce(raw: &str, stats: &mut CleanStats) -> i64 {
    let (value, coerced) = NumericCoercer::coerce_int(raw);
    if coerced {
        stats.coerced_cells += 1;
    }
    value
}

fn log_stats(kind: &str, source: &str, stats: &CleanStats) {
    debug!(
        "Cleaned {} from {}: {} -> {} rows ({} dropped), {} coerced cells, {} unparsed dates",
        kind,
        source,
        stats.rows_in,
        stats.rows_out,
        stats.rows_dropped(),
        stats.coerced_cells,
        stats.unparsed_dates
    );
}

/// Clean the support-ticket table.
pub fn clean_tickets(raw: &CsvTable) -> Result<Cleaned<Ticket>> {
    let cols = raw.columns(&TICKET_COLUMNS)?;
    let (extra_idx, extra_columns) = split_extras(raw, &TICKET_COLUMNS, &TICKET_DERIVED);
    let mut stats = CleanStats {
        rows_in: raw.len(),
        ..Default::default()
    };

    let mut rows = Vec::with_capacity(raw.len());
    for row in &raw.rows {
        let resolution_time_hrs = coerce(&row[cols[6]], &mut stats);
        if resolution_time_hrs < 0 {
            continue;
        }
        let created_date = parse_date(&row[cols[2]], &mut stats);
        rows.push(Ticket {
            ticket_id: row[cols[0]].clone(),
            customer_id: row[cols[1]].clone(),
            month: created_date.as_ref().map(month_key),
            created_date,
            priority: Priority::parse(&row[cols[3]]),
            status: row[cols[4]].clone(),
            issue_type: row[cols[5]].clone(),
            resolution_time_hrs,
            agent: row[cols[7]].clone(),
            customer_ticket_count: None,
            is_repeat_customer: false,
            extra: pick_extras(row, &extra_idx),
        });
    }

    assign_repeat_flags(&mut rows);
    stats.rows_out = rows.len();
    log_stats("tickets", &raw.source, &stats);

    Ok(Cleaned {
        table: Table { extra_columns, rows },
        stats,
    })
}

/// Fill `customer_ticket_count` and `is_repeat_customer`.
///
/// The count is the number of tickets with a non-empty id filed by the same
/// customer. Tickets without a customer id get no count and no flag.
pub fn assign_repeat_flags(tickets: &mut [Ticket]) {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for t in tickets.iter().filter(|t| !t.customer_id.is_empty()) {
        let entry = counts.entry(t.customer_id.clone()).or_insert(0);
        if !t.ticket_id.is_empty() {
            *entry += 1;
        }
    }

    for t in tickets.iter_mut() {
        t.customer_ticket_count = counts.get(&t.customer_id).copied();
        t.is_repeat_customer = t.customer_ticket_count.is_some_and(|c| c > 1);
    }
}

/// Clean the call-log table. No rows are dropped.
pub fn clean_calls(raw: &CsvTable) -> Result<Cleaned<Call>> {
    let cols = raw.columns(&CALL_COLUMNS)?;
    let (extra_idx, extra_columns) = split_extras(raw, &CALL_COLUMNS, &CALL_DERIVED);
    let mut stats = CleanStats {
        rows_in: raw.len(),
        ..Default::default()
    };

    let rows: Vec<Call> = raw
        .rows
        .iter()
        .map(|row| {
            let call_date = parse_date(&row[cols[2]], &mut stats);
            Call {
                call_id: row[cols[0]].clone(),
                agent_id: row[cols[1]].clone(),
                month: call_date.as_ref().map(month_key),
                call_date,
                duration_min: coerce(&row[cols[3]], &mut stats),
                extra: pick_extras(row, &extra_idx),
            }
        })
        .collect();

    stats.rows_out = rows.len();
    log_stats("calls", &raw.source, &stats);

    Ok(Cleaned {
        table: Table { extra_columns, rows },
        stats,
    })
}

/// Clean the survey table. No rows are dropped.
pub fn clean_feedback(raw: &CsvTable) -> Result<Cleaned<Feedback>> {
    let cols = raw.columns(&FEEDBACK_COLUMNS)?;
    let (extra_idx, extra_columns) = split_extras(raw, &FEEDBACK_COLUMNS, &FEEDBACK_DERIVED);
    let mut stats = CleanStats {
        rows_in: raw.len(),
        ..Default::default()
    };

    let rows: Vec<Feedback> = raw
        .rows
        .iter()
        .map(|row| Feedback {
            csat: coerce(&row[cols[0]], &mut stats),
            nps: coerce(&row[cols[1]], &mut stats),
            extra: pick_extras(row, &extra_idx),
        })
        .collect();

    stats.rows_out = rows.len();
    log_stats("feedback", &raw.source, &stats);

    Ok(Cleaned {
        table: Table { extra_columns, rows },
        stats,
    })
}
