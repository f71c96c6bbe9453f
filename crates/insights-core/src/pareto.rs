//! Pareto ranking of ticket issue types.

use std::collections::HashMap;

use crate::models::{FiveWhysRow, ParetoRow, Ticket};

/// Number of issue types that get a 5-Whys worksheet row.
pub const FIVE_WHYS_TOP_N: usize = 5;

/// Rank issue types by ticket count, descending, with running totals.
///
/// Ties keep the order in which the issue types were first encountered.
/// Tickets with an empty issue type are not counted. For non-empty input the
/// last row's `cum_pct` is 100.
pub fn pareto_issues(tickets: &[Ticket]) -> Vec<ParetoRow> {
    let mut order: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in tickets.iter().filter(|t| !t.issue_type.is_empty()) {
        let key = t.issue_type.as_str();
        match index.get(key).copied() {
            Some(i) => order[i].1 += 1,
            None => {
                index.insert(key, order.len());
                order.push((key, 1));
            }
        }
    }

    // `sort_by` is stable, so equal counts stay in encounter order.
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let total: u64 = order.iter().map(|(_, c)| c).sum();
    let mut cum_count = 0_u64;
    order
        .into_iter()
        .map(|(issue, count)| {
            cum_count += count;
            ParetoRow {
                issue_type: issue.to_string(),
                count,
                cum_count,
                cum_pct: cum_count as f64 / total as f64 * 100.0,
            }
        })
        .collect()
}

/// Issue types that together account for at least `threshold_pct` of
/// tickets: the "vital few". Includes the row that crosses the threshold.
pub fn vital_few(rows: &[ParetoRow], threshold_pct: f64) -> &[ParetoRow] {
    match rows.iter().position(|r| r.cum_pct >= threshold_pct) {
        Some(i) => &rows[..=i],
        None => rows,
    }
}

/// Blank root-cause worksheet for the top [`FIVE_WHYS_TOP_N`] issue types.
pub fn five_whys_template(rows: &[ParetoRow]) -> Vec<FiveWhysRow> {
    rows.iter()
        .take(FIVE_WHYS_TOP_N)
        .map(|r| FiveWhysRow::for_issue(r.issue_type.clone()))
        .collect()
}
