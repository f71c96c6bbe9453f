//! Table panels for the dashboard: Pareto, monthly trend, CSAT batches and
//! agent performance.
//!
//! Each renders a bordered [`ratatui::widgets::Table`] with alternating row
//! styles.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use insights_core::formatting::{format_number, format_optional};
use insights_core::models::{AgentPerformance, CsatBatch, ParetoRow};

use crate::components::progress_bar::PercentBar;
use crate::themes::Theme;

/// One month of the combined ticket / call trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub month: String,
    pub tickets: u64,
    pub avg_resolution_hrs: f64,
    pub calls: u64,
    pub avg_duration_min: f64,
}

/// Shorten `text` to at most `max_width` display columns, marking the cut
/// with `…`.
pub fn truncate_label(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn row_style(theme: &Theme, i: usize) -> Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

fn header_row<'a>(names: &[&'a str], theme: &Theme) -> Row<'a> {
    Row::new(names.iter().map(|h| Cell::from(*h).style(theme.table_header))).height(1)
}

fn bordered(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {} ", title))
}

const ISSUE_WIDTH: u16 = 22;
const BAR_WIDTH: u16 = 16;

/// Pareto ranking with a cumulative-share bar. Rows in `vital_count` (the
/// leading rows that reach 80 %) are highlighted.
pub fn render_pareto_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[ParetoRow],
    vital_count: usize,
    theme: &Theme,
) {
    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let vital = i < vital_count;
            let style = if vital {
                theme.table_highlight
            } else {
                row_style(theme, i)
            };
            let bar = PercentBar::new(row.cum_pct, theme)
                .width(BAR_WIDTH)
                .style(if vital { theme.table_highlight } else { theme.info })
                .to_line();
            Row::new(vec![
                Cell::from(truncate_label(&row.issue_type, ISSUE_WIDTH as usize)),
                Cell::from(format_number(row.count as f64, 0)),
                Cell::from(format_number(row.cum_count as f64, 0)),
                Cell::from(bar),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(ISSUE_WIDTH),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Min(BAR_WIDTH + 7),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(&["Issue type", "Count", "Cum", "Cumulative %"], theme))
        .block(bordered("Pareto: issue types", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Tickets, resolution and calls per month.
pub fn render_trend_table(frame: &mut Frame, area: Rect, rows: &[TrendRow], theme: &Theme) {
    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.month.clone()),
                Cell::from(format_number(row.tickets as f64, 0)),
                Cell::from(format_number(row.avg_resolution_hrs, 2)),
                Cell::from(format_number(row.calls as f64, 0)),
                Cell::from(format_number(row.avg_duration_min, 2)),
            ])
            .style(row_style(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(9),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(
            &["Month", "Tickets", "Avg hrs", "Calls", "AHT min"],
            theme,
        ))
        .block(bordered("Monthly trend", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Mean CSAT per batch of consecutive survey responses.
pub fn render_csat_table(frame: &mut Frame, area: Rect, batches: &[CsatBatch], theme: &Theme) {
    let data_rows: Vec<Row> = batches
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Row::new(vec![
                Cell::from(format!("#{}", b.batch + 1)),
                Cell::from(format_number(b.responses as f64, 0)),
                Cell::from(Span::styled(
                    format_number(b.csat_mean, 2),
                    theme.csat_style(b.csat_mean),
                )),
            ])
            .style(row_style(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(6),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(&["Batch", "Responses", "CSAT"], theme))
        .block(bordered("CSAT trend", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Ticket and call workload per agent; `-` where an agent has no calls.
pub fn render_agent_table(
    frame: &mut Frame,
    area: Rect,
    agents: &[AgentPerformance],
    theme: &Theme,
) {
    let data_rows: Vec<Row> = agents
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Row::new(vec![
                Cell::from(truncate_label(&a.agent, 16)),
                Cell::from(format_number(a.tickets_handled as f64, 0)),
                Cell::from(format_number(a.avg_res_hrs, 2)),
                Cell::from(format_optional(a.calls_handled.map(|c| c as f64), 0)),
                Cell::from(format_optional(a.avg_call_min, 2)),
            ])
            .style(row_style(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(9),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(
            &["Agent", "Tickets", "Avg hrs", "Calls", "AHT min"],
            theme,
        ))
        .block(bordered("Agent performance", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when the filtered view has no tickets, calls or
/// feedback.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No support data found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Run `cx-insights --step clean` to produce the cleaned CSVs.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text))
            .block(Block::default().borders(Borders::ALL).title(" CX Insights ")),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn pareto() -> Vec<ParetoRow> {
        vec![
            ParetoRow {
                issue_type: "Login".to_string(),
                count: 6,
                cum_count: 6,
                cum_pct: 60.0,
            },
            ParetoRow {
                issue_type: "Billing".to_string(),
                count: 3,
                cum_count: 9,
                cum_pct: 90.0,
            },
            ParetoRow {
                issue_type: "Shipping".to_string(),
                count: 1,
                cum_count: 10,
                cum_pct: 100.0,
            },
        ]
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Billing", 10), "Billing");
        assert_eq!(truncate_label("Account access", 8), "Account…");
        assert_eq!(truncate_label("請求書の問題", 5), "請求…");
        assert_eq!(truncate_label("abc", 0), "");
    }

    #[test]
    fn test_render_pareto_table() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        let rows = pareto();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_pareto_table(frame, area, &rows, 2, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Pareto: issue types"));
        assert!(text.contains("Login"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_render_trend_and_csat_tables() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        let theme = Theme::light();
        let trend = vec![TrendRow {
            month: "2024-01".to_string(),
            tickets: 12,
            avg_resolution_hrs: 3.25,
            calls: 40,
            avg_duration_min: 6.5,
        }];
        let batches = vec![CsatBatch {
            batch: 0,
            responses: 10,
            csat_mean: 4.3,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                let half = Rect { width: area.width / 2, ..area };
                let right = Rect {
                    x: area.width / 2,
                    width: area.width / 2,
                    ..area
                };
                render_trend_table(frame, half, &trend, &theme);
                render_csat_table(frame, right, &batches, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("2024-01"));
        assert!(text.contains("3.25"));
        assert!(text.contains("4.30"));
    }

    #[test]
    fn test_render_agent_table_missing_calls() {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let theme = Theme::dark();
        let agents = vec![AgentPerformance {
            agent: "amy".to_string(),
            tickets_handled: 3,
            avg_res_hrs: 2.0,
            calls_handled: None,
            avg_call_min: None,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_agent_table(frame, area, &agents, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("amy"));
        assert!(text.contains('-'));
    }

    #[test]
    fn test_render_empty_tables_do_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let theme = Theme::classic();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_pareto_table(frame, area, &[], 0, &theme);
                render_trend_table(frame, area, &[], &theme);
                render_csat_table(frame, area, &[], &theme);
                render_agent_table(frame, area, &[], &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("No support data found"));
    }
}
