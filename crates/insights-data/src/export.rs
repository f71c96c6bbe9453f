//! XLSX workbooks for the analysis step and the dashboard export.

use std::path::Path;

use insights_core::error::{InsightsError, Result};
use insights_core::models::{
    Call, Feedback, KpiSummary, MonthlyCallRollup, MonthlyIssueRollup, Table, Ticket,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::records::{header_for, Cell, TabularRecord};

fn xlsx_err(e: XlsxError) -> InsightsError {
    InsightsError::Spreadsheet(e.to_string())
}

fn write_header(sheet: &mut Worksheet, header: &[String]) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, name) in header.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, name, &bold)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Text(s) => sheet.write_string(row, col, s).map(|_| ()),
        Cell::Int(i) => sheet.write_number(row, col, *i as f64).map(|_| ()),
        Cell::Float(f) => sheet.write_number(row, col, *f).map(|_| ()),
        Cell::Empty => Ok(()),
    }
    .map_err(xlsx_err)
}

fn add_sheet(
    workbook: &mut Workbook,
    name: &str,
    header: &[String],
    rows: impl IntoIterator<Item = Vec<Cell>>,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).map_err(xlsx_err)?;
    write_header(sheet, header)?;
    for (r, cells) in rows.into_iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            write_cell(sheet, r as u32 + 1, c as u16, cell)?;
        }
    }
    Ok(())
}

fn add_table_sheet<R: TabularRecord>(workbook: &mut Workbook, name: &str, table: &Table<R>) -> Result<()> {
    add_sheet(
        workbook,
        name,
        &header_for(table),
        table.rows.iter().map(TabularRecord::cells),
    )
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn add_kpi_sheet(workbook: &mut Workbook, kpis: &KpiSummary) -> Result<()> {
    let row: Vec<Cell> = kpis.rounded().values().into_iter().map(Cell::Float).collect();
    add_sheet(workbook, "KPIs", &strings(&KpiSummary::COLUMNS), [row])
}

fn save(mut workbook: Workbook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| InsightsError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    workbook.save(path).map_err(xlsx_err)
}

/// Build the analysis workbook: `KPIs`, `Tickets_by_Month`, `Calls_by_Month`.
pub fn insights_workbook(
    kpis: &KpiSummary,
    by_issue: &[MonthlyIssueRollup],
    by_month_calls: &[MonthlyCallRollup],
) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    add_kpi_sheet(&mut workbook, kpis)?;
    add_sheet(
        &mut workbook,
        "Tickets_by_Month",
        &strings(&["month", "issue_type", "ticket_count", "avg_resolution_hrs"]),
        by_issue.iter().map(|r| {
            vec![
                Cell::Text(r.month.clone()),
                Cell::Text(r.issue_type.clone()),
                Cell::Int(r.ticket_count as i64),
                Cell::Float(r.avg_resolution_hrs),
            ]
        }),
    )?;
    add_sheet(
        &mut workbook,
        "Calls_by_Month",
        &strings(&["month", "call_count", "avg_duration_min"]),
        by_month_calls.iter().map(|r| {
            vec![
                Cell::Text(r.month.clone()),
                Cell::Int(r.call_count as i64),
                Cell::Float(r.avg_duration_min),
            ]
        }),
    )?;
    Ok(workbook)
}

pub fn write_insights_workbook(
    path: &Path,
    kpis: &KpiSummary,
    by_issue: &[MonthlyIssueRollup],
    by_month_calls: &[MonthlyCallRollup],
) -> Result<()> {
    save(insights_workbook(kpis, by_issue, by_month_calls)?, path)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Build the dashboard export: `KPIs` plus the (filtered) source tables.
pub fn dashboard_workbook(
    kpis: &KpiSummary,
    tickets: &Table<Ticket>,
    calls: &Table<Call>,
    feedback: &Table<Feedback>,
) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    add_kpi_sheet(&mut workbook, kpis)?;
    add_table_sheet(&mut workbook, "Tickets", tickets)?;
    add_table_sheet(&mut workbook, "Calls", calls)?;
    add_table_sheet(&mut workbook, "Feedback", feedback)?;
    Ok(workbook)
}

pub fn write_dashboard_workbook(
    path: &Path,
    kpis: &KpiSummary,
    tickets: &Table<Ticket>,
    calls: &Table<Call>,
    feedback: &Table<Feedback>,
) -> Result<()> {
    save(dashboard_workbook(kpis, tickets, calls, feedback)?, path)?;
    info!(
        "Wrote {} ({} tickets, {} calls, {} feedback rows)",
        path.display(),
        tickets.len(),
        calls.len(),
        feedback.len()
    );
    Ok(())
}
