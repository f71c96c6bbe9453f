//! KPI and rollup computations over cleaned tables.
//!
//! Every function here is pure: it takes cleaned rows and returns owned
//! results. The batch exporter and the dashboard both call these, so a
//! metric is defined in exactly one place.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    AgentPerformance, Call, CsatBatch, Feedback, KpiSummary, MonthlyCallRollup,
    MonthlyIssueRollup, MonthlyTicketRollup, Ticket,
};

/// Feedback rows per CSAT trend point. Survey responses carry no date, so
/// the trend is taken over consecutive batches instead of months.
pub const CSAT_BATCH_SIZE: usize = 10;

// ── Accumulator ───────────────────────────────────────────────────────────────

/// Running count / sum pair for a grouped mean.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    /// Rows whose id column is non-empty (the grouped "count").
    counted: u64,
    /// Rows contributing to the mean.
    rows: u64,
    sum: f64,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64, has_id: bool) {
        if has_id {
            self.counted += 1;
        }
        self.rows += 1;
        self.sum += value;
    }

    fn mean(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.sum / self.rows as f64
        }
    }
}

/// Arithmetic mean, `0.0` for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0_u64), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ── Scalar KPIs ───────────────────────────────────────────────────────────────

/// Share of tickets whose status is exactly `"Resolved"`, as a percentage.
///
/// This is a proxy for first-contact resolution, not a true FCR rate.
pub fn fcr_proxy_pct(tickets: &[Ticket]) -> f64 {
    if tickets.is_empty() {
        return 0.0;
    }
    let resolved = tickets.iter().filter(|t| t.is_resolved()).count();
    resolved as f64 / tickets.len() as f64 * 100.0
}

/// Compute the five headline metrics. Values are unrounded; call
/// [`KpiSummary::rounded`] for display.
pub fn compute_kpis(tickets: &[Ticket], calls: &[Call], feedback: &[Feedback]) -> KpiSummary {
    KpiSummary {
        aht_min: mean(calls.iter().map(|c| c.duration_min as f64)),
        fcr_proxy_pct: fcr_proxy_pct(tickets),
        csat_mean: mean(feedback.iter().map(|f| f.csat as f64)),
        nps_mean: mean(feedback.iter().map(|f| f.nps as f64)),
        avg_resolution_hrs: mean(tickets.iter().map(|t| t.resolution_time_hrs as f64)),
    }
}

// ── Rollups ───────────────────────────────────────────────────────────────────

/// Ticket count and mean resolution per (month, issue type), sorted by month
/// then issue type. Undated tickets and tickets without an issue type are
/// left out.
pub fn tickets_by_month_and_issue(tickets: &[Ticket]) -> Vec<MonthlyIssueRollup> {
    let mut groups: BTreeMap<(&str, &str), MeanAccumulator> = BTreeMap::new();
    for t in tickets {
        let Some(month) = t.month.as_deref() else {
            continue;
        };
        if t.issue_type.is_empty() {
            continue;
        }
        groups
            .entry((month, t.issue_type.as_str()))
            .or_default()
            .push(t.resolution_time_hrs as f64, !t.ticket_id.is_empty());
    }

    groups
        .into_iter()
        .map(|((month, issue), acc)| MonthlyIssueRollup {
            month: month.to_string(),
            issue_type: issue.to_string(),
            ticket_count: acc.counted,
            avg_resolution_hrs: acc.mean(),
        })
        .collect()
}

/// Ticket count and mean resolution per month.
pub fn tickets_by_month(tickets: &[Ticket]) -> Vec<MonthlyTicketRollup> {
    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for t in tickets {
        if let Some(month) = t.month.as_deref() {
            groups
                .entry(month)
                .or_default()
                .push(t.resolution_time_hrs as f64, !t.ticket_id.is_empty());
        }
    }

    groups
        .into_iter()
        .map(|(month, acc)| MonthlyTicketRollup {
            month: month.to_string(),
            ticket_count: acc.counted,
            avg_resolution_hrs: acc.mean(),
        })
        .collect()
}

/// Call count and mean duration per month.
pub fn calls_by_month(calls: &[Call]) -> Vec<MonthlyCallRollup> {
    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for c in calls {
        if let Some(month) = c.month.as_deref() {
            groups
                .entry(month)
                .or_default()
                .push(c.duration_min as f64, !c.call_id.is_empty());
        }
    }

    groups
        .into_iter()
        .map(|(month, acc)| MonthlyCallRollup {
            month: month.to_string(),
            call_count: acc.counted,
            avg_duration_min: acc.mean(),
        })
        .collect()
}

/// Mean CSAT for each consecutive run of `batch_size` feedback rows.
///
/// A `batch_size` of zero is treated as one.
pub fn csat_by_batch(feedback: &[Feedback], batch_size: usize) -> Vec<CsatBatch> {
    feedback
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(batch, chunk)| CsatBatch {
            batch,
            responses: chunk.len() as u64,
            csat_mean: mean(chunk.iter().map(|f| f.csat as f64)),
        })
        .collect()
}

/// Tickets handled per agent joined with the same agent's call workload.
///
/// Every agent that appears on a ticket gets a row (sorted by name); call
/// figures are `None` when the agent has no calls.
pub fn agent_performance(tickets: &[Ticket], calls: &[Call]) -> Vec<AgentPerformance> {
    let mut ticket_groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for t in tickets.iter().filter(|t| !t.agent.is_empty()) {
        ticket_groups
            .entry(t.agent.as_str())
            .or_default()
            .push(t.resolution_time_hrs as f64, !t.ticket_id.is_empty());
    }

    let mut call_groups: HashMap<&str, MeanAccumulator> = HashMap::new();
    for c in calls.iter().filter(|c| !c.agent_id.is_empty()) {
        call_groups
            .entry(c.agent_id.as_str())
            .or_default()
            .push(c.duration_min as f64, !c.call_id.is_empty());
    }

    ticket_groups
        .into_iter()
        .map(|(agent, acc)| {
            let calls = call_groups.get(agent);
            AgentPerformance {
                agent: agent.to_string(),
                tickets_handled: acc.counted,
                avg_res_hrs: acc.mean(),
                calls_handled: calls.map(|c| c.counted),
                avg_call_min: calls.map(MeanAccumulator::mean),
            }
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
