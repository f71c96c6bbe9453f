use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::formatting::round_to;

/// Ticket priority, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse one of the three category labels (exact, case-sensitive match
    /// after trimming). Anything else is not a priority.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Status value counted by the first-contact-resolution proxy.
pub const RESOLVED_STATUS: &str = "Resolved";

/// A support ticket after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_id: String,
    /// `None` when the source value could not be parsed as a date.
    pub created_date: Option<NaiveDateTime>,
    /// Calendar month of `created_date`, formatted `YYYY-MM`.
    pub month: Option<String>,
    pub priority: Option<Priority>,
    pub status: String,
    pub issue_type: String,
    /// Whole hours; never negative once the cleaner has run.
    pub resolution_time_hrs: i64,
    pub agent: String,
    /// Tickets filed by the same customer. `None` for an empty customer id.
    pub customer_ticket_count: Option<u32>,
    pub is_repeat_customer: bool,
    /// Non-required input columns, aligned with [`Table::extra_columns`].
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Ticket {
    pub fn is_resolved(&self) -> bool {
        self.status == RESOLVED_STATUS
    }
}

/// A single call-log entry after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub call_id: String,
    pub agent_id: String,
    pub call_date: Option<NaiveDateTime>,
    pub month: Option<String>,
    pub duration_min: i64,
    #[serde(default)]
    pub extra: Vec<String>,
}

/// One survey response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub csat: i64,
    pub nps: i64,
    #[serde(default)]
    pub extra: Vec<String>,
}

/// Typed rows plus the names of any pass-through columns they carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    pub extra_columns: Vec<String>,
    pub rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            extra_columns: Vec::new(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep the column layout, replace the rows.
    pub fn with_rows(&self, rows: Vec<R>) -> Self {
        Self {
            extra_columns: self.extra_columns.clone(),
            rows,
        }
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// The five headline support metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Average handle time: mean call duration in minutes.
    #[serde(rename = "AHT_min")]
    pub aht_min: f64,
    /// Resolved / total tickets, as a percentage. A proxy, not true FCR.
    #[serde(rename = "FCR_proxy_pct")]
    pub fcr_proxy_pct: f64,
    #[serde(rename = "CSAT_mean")]
    pub csat_mean: f64,
    #[serde(rename = "NPS_mean")]
    pub nps_mean: f64,
    #[serde(rename = "Avg_resolution_hrs")]
    pub avg_resolution_hrs: f64,
}

impl KpiSummary {
    /// Export column names, in display order.
    pub const COLUMNS: [&'static str; 5] = [
        "AHT_min",
        "FCR_proxy_pct",
        "CSAT_mean",
        "NPS_mean",
        "Avg_resolution_hrs",
    ];

    /// Every metric rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            aht_min: round_to(self.aht_min, 2),
            fcr_proxy_pct: round_to(self.fcr_proxy_pct, 2),
            csat_mean: round_to(self.csat_mean, 2),
            nps_mean: round_to(self.nps_mean, 2),
            avg_resolution_hrs: round_to(self.avg_resolution_hrs, 2),
        }
    }

    /// Values in the same order as [`KpiSummary::COLUMNS`].
    pub fn values(&self) -> [f64; 5] {
        [
            self.aht_min,
            self.fcr_proxy_pct,
            self.csat_mean,
            self.nps_mean,
            self.avg_resolution_hrs,
        ]
    }
}

/// One issue type in a Pareto ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub issue_type: String,
    pub count: u64,
    pub cum_count: u64,
    pub cum_pct: f64,
}

/// Blank root-cause worksheet row for one of the top issue types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiveWhysRow {
    pub issue_type: String,
    pub why_1: String,
    pub why_2: String,
    pub why_3: String,
    pub why_4: String,
    pub why_5: String,
    pub recommended_action: String,
}

impl FiveWhysRow {
    pub fn for_issue(issue_type: impl Into<String>) -> Self {
        Self {
            issue_type: issue_type.into(),
            ..Default::default()
        }
    }
}

/// Ticket volume and resolution time for one (month, issue type) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIssueRollup {
    pub month: String,
    pub issue_type: String,
    pub ticket_count: u64,
    pub avg_resolution_hrs: f64,
}

/// Ticket volume and resolution time for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTicketRollup {
    pub month: String,
    pub ticket_count: u64,
    pub avg_resolution_hrs: f64,
}

/// Call volume and mean duration for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCallRollup {
    pub month: String,
    pub call_count: u64,
    pub avg_duration_min: f64,
}

/// Mean CSAT over a consecutive batch of feedback rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsatBatch {
    /// Zero-based batch index (row index / batch size).
    pub batch: usize,
    pub responses: u64,
    pub csat_mean: f64,
}

/// Ticket and call workload for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub agent: String,
    pub tickets_handled: u64,
    pub avg_res_hrs: f64,
    /// `None` when the agent has no calls in the current view.
    pub calls_handled: Option<u64>,
    pub avg_call_min: Option<f64>,
}
