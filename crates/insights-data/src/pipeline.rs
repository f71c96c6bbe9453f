//! Batch steps: clean, analyze, pareto.
//!
//! Each step reads its inputs from a [`DataFiles`] layout and fully
//! overwrites its outputs. Later steps read the cleaned CSVs, so `analyze`
//! and `pareto` can be re-run without cleaning again.

use std::time::Instant;

use chrono::Utc;
use insights_core::error::Result;
use insights_core::metrics::{calls_by_month, compute_kpis, tickets_by_month_and_issue};
use insights_core::models::{
    Call, Feedback, KpiSummary, MonthlyCallRollup, MonthlyIssueRollup, ParetoRow, Table, Ticket,
};
use insights_core::pareto::{five_whys_template, pareto_issues};
use insights_core::settings::DataFiles;
use tracing::info;

use crate::cleaner::{clean_calls, clean_feedback, clean_tickets};
use crate::export::write_insights_workbook;
use crate::reader::read_csv_table;
use crate::writer::{write_records_csv, write_table_csv};

const PARETO_HEADER: [&str; 4] = ["issue_type", "count", "cum_count", "cum_pct"];
const FIVE_WHYS_HEADER: [&str; 7] = [
    "issue_type",
    "why_1",
    "why_2",
    "why_3",
    "why_4",
    "why_5",
    "recommended_action",
];

// ── Public types ──────────────────────────────────────────────────────────────

/// The three cleaned tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportData {
    pub tickets: Table<Ticket>,
    pub calls: Table<Call>,
    pub feedback: Table<Feedback>,
}

/// Metadata produced alongside a step's result.
#[derive(Debug, Clone)]
pub struct StepMetadata {
    /// ISO-8601 timestamp when the step finished.
    pub generated_at: String,
    pub tickets: usize,
    pub calls: usize,
    pub feedback: usize,
    /// Wall-clock seconds spent reading and cleaning input.
    pub load_time_seconds: f64,
}

/// Output of [`run_analysis`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Unrounded KPIs.
    pub kpis: KpiSummary,
    pub tickets_by_month: Vec<MonthlyIssueRollup>,
    pub calls_by_month: Vec<MonthlyCallRollup>,
    pub metadata: StepMetadata,
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn load(tickets: &std::path::Path, calls: &std::path::Path, feedback: &std::path::Path) -> Result<SupportData> {
    Ok(SupportData {
        tickets: clean_tickets(&read_csv_table(tickets)?)?.table,
        calls: clean_calls(&read_csv_table(calls)?)?.table,
        feedback: clean_feedback(&read_csv_table(feedback)?)?.table,
    })
}

/// Read the cleaned CSVs written by [`run_clean`].
///
/// They pass through the cleaner again, which leaves cleaned data unchanged
/// and recovers the typed fields.
pub fn load_cleaned(files: &DataFiles) -> Result<SupportData> {
    load(
        &files.cleaned_tickets,
        &files.cleaned_calls,
        &files.cleaned_feedback,
    )
}

fn metadata(data: &SupportData, started: Instant) -> StepMetadata {
    StepMetadata {
        generated_at: Utc::now().to_rfc3339(),
        tickets: data.tickets.len(),
        calls: data.calls.len(),
        feedback: data.feedback.len(),
        load_time_seconds: started.elapsed().as_secs_f64(),
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Clean the raw exports and write the three cleaned CSVs.
pub fn run_clean(files: &DataFiles) -> Result<SupportData> {
    let data = load(&files.raw_tickets, &files.raw_calls, &files.raw_feedback)?;

    write_table_csv(&data.tickets, &files.cleaned_tickets)?;
    write_table_csv(&data.calls, &files.cleaned_calls)?;
    write_table_csv(&data.feedback, &files.cleaned_feedback)?;

    Ok(data)
}

/// KPIs and monthly rollups for already-loaded data.
pub fn analyze(data: &SupportData, started: Instant) -> AnalysisResult {
    AnalysisResult {
        kpis: compute_kpis(&data.tickets.rows, &data.calls.rows, &data.feedback.rows),
        tickets_by_month: tickets_by_month_and_issue(&data.tickets.rows),
        calls_by_month: calls_by_month(&data.calls.rows),
        metadata: metadata(data, started),
    }
}

/// Compute KPIs from the cleaned CSVs and write the insights workbook.
pub fn run_analysis(files: &DataFiles) -> Result<AnalysisResult> {
    let started = Instant::now();
    let data = load_cleaned(files)?;
    let result = analyze(&data, started);

    write_insights_workbook(
        &files.insights_workbook,
        &result.kpis,
        &result.tickets_by_month,
        &result.calls_by_month,
    )?;

    let k = result.kpis.rounded();
    info!(
        "KPIs: AHT {} min, FCR proxy {}%, CSAT {}, NPS {}, resolution {} hrs",
        k.aht_min, k.fcr_proxy_pct, k.csat_mean, k.nps_mean, k.avg_resolution_hrs
    );
    Ok(result)
}

/// Write a Pareto ranking to `path`.
pub fn write_pareto_csv(rows: &[ParetoRow], path: &std::path::Path) -> Result<()> {
    write_records_csv(rows, &PARETO_HEADER, path)
}

/// Rank issue types from the cleaned tickets and write the Pareto CSV and
/// the 5-Whys template.
pub fn run_pareto(files: &DataFiles) -> Result<Vec<ParetoRow>> {
    let tickets = clean_tickets(&read_csv_table(&files.cleaned_tickets)?)?.table;
    let rows = pareto_issues(&tickets.rows);

    write_pareto_csv(&rows, &files.pareto_csv)?;
    write_records_csv(&five_whys_template(&rows), &FIVE_WHYS_HEADER, &files.five_whys_csv)?;

    Ok(rows)
}

/// Clean, then analyze, then rank.
pub fn run_all(files: &DataFiles) -> Result<AnalysisResult> {
    run_clean(files)?;
    let result = run_analysis(files)?;
    run_pareto(files)?;
    info!(
        "Processed {} tickets, {} calls, {} feedback rows",
        result.metadata.tickets, result.metadata.calls, result.metadata.feedback
    );
    Ok(result)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::error::InsightsError;
    use tempfile::TempDir;

    fn seed(dir: &std::path::Path) -> DataFiles {
        std::fs::write(
            dir.join("support_tickets.csv"),
            "ticket_id,customer_id,created_date,priority,status,issue_type,resolution_time_hrs,agent\n\
             T1,C1,2024-01-05,High,Resolved,Login,4,amy\n\
             T2,C1,2024-01-20,Low,Open,Login,2,bob\n\
             T3,C2,2024-02-02,Medium,Resolved,Billing,-1,amy\n\
             T4,C3,2024-02-03,Medium,Resolved,Billing,6,amy\n\
             T5,C4,2024-02-09,Low,Open,Shipping,x,bob\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("call_logs.csv"),
            "call_id,agent_id,call_date,duration_min\n\
             K1,amy,2024-01-05 09:00:00,5\n\
             K2,bob,2024-02-01 10:00:00,8\n",
        )
        .unwrap();
        std::fs::write(dir.join("feedback.csv"), "csat,nps\n4,9\n5,10\n3,6\n").unwrap();
        DataFiles::in_dir(dir)
    }

    #[test]
    fn test_run_clean_writes_cleaned_files() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        let data = run_clean(&files).unwrap();

        assert_eq!(data.tickets.len(), 4);
        assert!(data.tickets.rows.iter().all(|t| t.resolution_time_hrs >= 0));

        let text = std::fs::read_to_string(&files.cleaned_tickets).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ticket_id,customer_id,created_date,priority,status,issue_type,resolution_time_hrs,agent,month,customer_ticket_count,is_repeat_customer"
        );
        assert_eq!(
            lines.next().unwrap(),
            "T1,C1,2024-01-05 00:00:00,High,Resolved,Login,4,amy,2024-01,2,1"
        );
        assert!(files.cleaned_calls.exists());
        assert!(files.cleaned_feedback.exists());
    }

    #[test]
    fn test_recleaning_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        let first = run_clean(&files).unwrap();
        let reloaded = load_cleaned(&files).unwrap();
        assert_eq!(first, reloaded);

        let before = std::fs::read_to_string(&files.cleaned_tickets).unwrap();
        write_table_csv(&reloaded.tickets, &files.cleaned_tickets).unwrap();
        let after = std::fs::read_to_string(&files.cleaned_tickets).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_run_analysis() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        run_clean(&files).unwrap();
        let result = run_analysis(&files).unwrap();

        assert_eq!(result.kpis.aht_min, 6.5);
        assert_eq!(result.kpis.fcr_proxy_pct, 50.0);
        assert_eq!(result.kpis.csat_mean, 4.0);
        assert_eq!(result.kpis.avg_resolution_hrs, 3.0);
        assert_eq!(result.tickets_by_month.len(), 3);
        assert_eq!(result.calls_by_month.len(), 2);
        assert_eq!(result.metadata.tickets, 4);
        assert!(files.insights_workbook.exists());
    }

    #[test]
    fn test_run_pareto_outputs() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        run_clean(&files).unwrap();
        let rows = run_pareto(&files).unwrap();

        assert_eq!(rows[0].issue_type, "Login");
        assert_eq!(rows[0].count, 2);
        assert!((rows.last().unwrap().cum_pct - 100.0).abs() < 1e-6);

        let pareto = std::fs::read_to_string(&files.pareto_csv).unwrap();
        assert!(pareto.starts_with("issue_type,count,cum_count,cum_pct\nLogin,2,2,50.0\n"));

        let whys = std::fs::read_to_string(&files.five_whys_csv).unwrap();
        assert_eq!(whys.lines().count(), 1 + rows.len());
    }

    #[test]
    fn test_run_all_end_to_end() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        let result = run_all(&files).unwrap();
        assert_eq!(result.metadata.feedback, 3);
        for path in [
            &files.cleaned_tickets,
            &files.cleaned_calls,
            &files.cleaned_feedback,
            &files.insights_workbook,
            &files.pareto_csv,
            &files.five_whys_csv,
        ] {
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let err = run_clean(&DataFiles::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, InsightsError::FileRead { .. }));
    }

    #[test]
    fn test_analysis_before_clean_fails() {
        let dir = TempDir::new().unwrap();
        let files = seed(dir.path());
        assert!(run_analysis(&files).is_err());
    }
}
