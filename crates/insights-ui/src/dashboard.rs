//! The filtered dashboard view and its screen layout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use insights_core::filters::MonthFilter;
use insights_core::metrics::{
    agent_performance, calls_by_month, compute_kpis, csat_by_batch, tickets_by_month,
    CSAT_BATCH_SIZE,
};
use insights_core::models::{AgentPerformance, Call, CsatBatch, KpiSummary, ParetoRow, Ticket};
use insights_core::pareto::{pareto_issues, vital_few};
use insights_data::pipeline::SupportData;

use crate::components::header::Header;
use crate::components::kpi_cards::KpiCards;
use crate::table_view::{
    render_agent_table, render_csat_table, render_no_data, render_pareto_table,
    render_trend_table, TrendRow,
};
use crate::themes::Theme;

/// Cumulative share that marks the end of the Pareto "vital few".
pub const VITAL_FEW_PCT: f64 = 80.0;

/// Everything the dashboard shows for one month filter.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub filter: MonthFilter,
    /// Tickets and calls restricted to `filter`; feedback is never filtered.
    pub data: SupportData,
    pub kpis: KpiSummary,
    pub pareto: Vec<ParetoRow>,
    pub vital_count: usize,
    pub trend: Vec<TrendRow>,
    pub csat_batches: Vec<CsatBatch>,
    pub agents: Vec<AgentPerformance>,
}

impl DashboardView {
    pub fn build(all: &SupportData, filter: &MonthFilter) -> Self {
        let data = SupportData {
            tickets: all.tickets.with_rows(filter.apply(&all.tickets.rows)),
            calls: all.calls.with_rows(filter.apply(&all.calls.rows)),
            feedback: all.feedback.clone(),
        };

        let tickets = &data.tickets.rows;
        let calls = &data.calls.rows;
        let pareto = pareto_issues(tickets);
        let vital_count = vital_few(&pareto, VITAL_FEW_PCT).len();

        Self {
            filter: filter.clone(),
            kpis: compute_kpis(tickets, calls, &data.feedback.rows),
            vital_count,
            pareto,
            trend: merge_trend(tickets, calls),
            csat_batches: csat_by_batch(&data.feedback.rows, CSAT_BATCH_SIZE),
            agents: agent_performance(tickets, calls),
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.tickets.is_empty() && self.data.calls.is_empty() && self.data.feedback.is_empty()
    }
}

/// Join the ticket and call monthly rollups on month. Months present on
/// only one side get zeros on the other.
fn merge_trend(tickets: &[Ticket], calls: &[Call]) -> Vec<TrendRow> {
    let mut rows: Vec<TrendRow> = tickets_by_month(tickets)
        .into_iter()
        .map(|t| TrendRow {
            month: t.month,
            tickets: t.ticket_count,
            avg_resolution_hrs: t.avg_resolution_hrs,
            calls: 0,
            avg_duration_min: 0.0,
        })
        .collect();

    for c in calls_by_month(calls) {
        match rows.iter_mut().find(|r| r.month == c.month) {
            Some(row) => {
                row.calls = c.call_count;
                row.avg_duration_min = c.avg_duration_min;
            }
            None => rows.push(TrendRow {
                month: c.month,
                tickets: 0,
                avg_resolution_hrs: 0.0,
                calls: c.call_count,
                avg_duration_min: c.avg_duration_min,
            }),
        }
    }

    rows.sort_by(|a, b| a.month.cmp(&b.month));
    rows
}

fn month_selector<'a>(options: &[MonthFilter], selected: usize, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled("Month: ", theme.label)];
    for (i, opt) in options.iter().enumerate() {
        let style = if i == selected {
            theme.month_selected
        } else {
            theme.dim
        };
        spans.push(Span::styled(format!(" {} ", opt), style));
    }
    Line::from(spans)
}

fn footer<'a>(status: &str, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(
        "←/→ month  e export xlsx  p export pareto  q quit",
        theme.dim,
    )];
    if !status.is_empty() {
        spans.push(Span::styled("  │  ", theme.separator));
        spans.push(Span::styled(status.to_string(), theme.info));
    }
    Line::from(spans)
}

/// Screen state needed beyond the view itself.
pub struct Chrome<'a> {
    pub source: &'a str,
    pub options: &'a [MonthFilter],
    pub selected: usize,
    pub status: &'a str,
}

/// Draw the whole dashboard into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    chrome: &Chrome,
    theme: &Theme,
) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let month_label = view.filter.to_string();
    let header = Header::new(chrome.source, &month_label, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), outer[0]);
    frame.render_widget(
        Paragraph::new(month_selector(chrome.options, chrome.selected, theme)),
        outer[1],
    );
    frame.render_widget(Paragraph::new(footer(chrome.status, theme)), outer[3]);

    if view.is_empty() {
        render_no_data(frame, outer[2], theme);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(6), Constraint::Min(6)])
        .split(outer[2]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(body[0]);
    let kpi_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(" KPIs ");
    frame.render_widget(
        Paragraph::new(Text::from(KpiCards::new(&view.kpis, theme).to_lines())).block(kpi_block),
        top[0],
    );
    render_csat_table(frame, top[1], &view.csat_batches, theme);

    render_pareto_table(frame, body[1], &view.pareto, view.vital_count, theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[2]);
    render_trend_table(frame, bottom[0], &view.trend, theme);
    render_agent_table(frame, bottom[1], &view.agents, theme);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::{Feedback, Table};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn ticket(id: &str, month: &str, issue: &str, status: &str, hrs: i64, agent: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            customer_id: "C1".to_string(),
            created_date: None,
            month: Some(month.to_string()),
            priority: None,
            status: status.to_string(),
            issue_type: issue.to_string(),
            resolution_time_hrs: hrs,
            agent: agent.to_string(),
            customer_ticket_count: Some(1),
            is_repeat_customer: false,
            extra: Vec::new(),
        }
    }

    fn call(id: &str, month: &str, agent: &str, minutes: i64) -> Call {
        Call {
            call_id: id.to_string(),
            agent_id: agent.to_string(),
            call_date: None,
            month: Some(month.to_string()),
            duration_min: minutes,
            extra: Vec::new(),
        }
    }

    fn sample_data() -> SupportData {
        SupportData {
            tickets: Table::new(vec![
                ticket("T1", "2024-01", "Login", "Resolved", 4, "amy"),
                ticket("T2", "2024-01", "Login", "Open", 2, "bob"),
                ticket("T3", "2024-02", "Billing", "Resolved", 6, "amy"),
            ]),
            calls: Table::new(vec![
                call("K1", "2024-01", "amy", 5),
                call("K2", "2024-03", "cat", 9),
            ]),
            feedback: Table::new(vec![
                Feedback { csat: 4, nps: 9, extra: Vec::new() },
                Feedback { csat: 5, nps: 10, extra: Vec::new() },
                Feedback { csat: 3, nps: 6, extra: Vec::new() },
            ]),
        }
    }

    #[test]
    fn test_view_all_months() {
        let view = DashboardView::build(&sample_data(), &MonthFilter::All);
        assert_eq!(view.data.tickets.len(), 3);
        assert_eq!(view.kpis.csat_mean, 4.0);
        assert_eq!(view.pareto[0].issue_type, "Login");
        assert_eq!(view.vital_count, 2);

        let months: Vec<&str> = view.trend.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(view.trend[2].tickets, 0);
        assert_eq!(view.trend[2].calls, 1);
    }

    #[test]
    fn test_view_filters_tickets_and_calls_not_feedback() {
        let view = DashboardView::build(&sample_data(), &MonthFilter::Month("2024-01".to_string()));
        assert_eq!(view.data.tickets.len(), 2);
        assert_eq!(view.data.calls.len(), 1);
        assert_eq!(view.data.feedback.len(), 3);
        assert_eq!(view.kpis.fcr_proxy_pct, 50.0);
        assert_eq!(view.kpis.aht_min, 5.0);

        let amy = view.agents.iter().find(|a| a.agent == "amy").unwrap();
        assert_eq!(amy.calls_handled, Some(1));
        let bob = view.agents.iter().find(|a| a.agent == "bob").unwrap();
        assert_eq!(bob.calls_handled, None);
    }

    #[test]
    fn test_view_month_without_rows() {
        let view = DashboardView::build(&sample_data(), &MonthFilter::Month("1999-12".to_string()));
        assert!(view.data.tickets.is_empty());
        assert!(view.pareto.is_empty());
        assert_eq!(view.kpis.fcr_proxy_pct, 0.0);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_render_dashboard() {
        let data = sample_data();
        let view = DashboardView::build(&data, &MonthFilter::All);
        let options = MonthFilter::options(&["2024-01".to_string(), "2024-02".to_string()]);
        let chrome = Chrome {
            source: "Data",
            options: &options,
            selected: 0,
            status: "Exported Data/CX_Insights_dashboard.xlsx",
        };
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(130, 40)).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &view, &chrome, &theme);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("CX INSIGHTS DASHBOARD"));
        assert!(text.contains("2024-02"));
        assert!(text.contains("KPIs"));
        assert!(text.contains("Exported"));
    }

    #[test]
    fn test_render_dashboard_no_data() {
        let view = DashboardView::build(&SupportData::default(), &MonthFilter::All);
        assert!(view.is_empty());
        let options = MonthFilter::options(&[]);
        let chrome = Chrome {
            source: "Data",
            options: &options,
            selected: 0,
            status: "",
        };
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &view, &chrome, &theme);
            })
            .unwrap();
    }
}
