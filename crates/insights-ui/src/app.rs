//! Dashboard application state and TUI event loop.
//!
//! [`App`] owns the loaded tables, the month selector and the current
//! [`DashboardView`]. Key presses change the month or trigger exports; the
//! view is rebuilt from the shared metric functions on every change.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{info, warn};

use insights_core::error::{InsightsError, Result};
use insights_core::filters::{available_months, MonthFilter};
use insights_core::settings::DataFiles;
use insights_data::export::write_dashboard_workbook;
use insights_data::pipeline::{write_pareto_csv, SupportData};

use crate::dashboard::{render_dashboard, Chrome, DashboardView};
use crate::themes::Theme;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextMonth,
    PrevMonth,
    ExportWorkbook,
    ExportPareto,
    Quit,
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextMonth),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevMonth),
            KeyCode::Char('e') => Some(Action::ExportWorkbook),
            KeyCode::Char('p') => Some(Action::ExportPareto),
            _ => None,
        }
    }
}

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    /// Where input came from and exports go.
    pub files: DataFiles,
    /// Label for the header (the data directory).
    pub source: String,
    /// Unfiltered tables.
    pub data: SupportData,
    /// `All` followed by every ticket month, ascending.
    pub options: Vec<MonthFilter>,
    pub selected: usize,
    pub view: DashboardView,
    /// Result of the last export, shown in the footer.
    pub status: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: String, files: DataFiles, data: SupportData) -> Self {
        let options = MonthFilter::options(&available_months(&data.tickets.rows));
        let view = DashboardView::build(&data, &MonthFilter::All);
        Self {
            theme: Theme::from_name(theme_name),
            files,
            source,
            data,
            options,
            selected: 0,
            view,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn filter(&self) -> &MonthFilter {
        &self.options[self.selected]
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Move the month selector, wrapping at either end.
    fn select(&mut self, index: usize) {
        self.selected = index % self.options.len();
        self.view = DashboardView::build(&self.data, &self.options[self.selected]);
    }

    pub fn apply(&mut self, action: Action) {
        let n = self.options.len();
        match action {
            Action::NextMonth => self.select(self.selected + 1),
            Action::PrevMonth => self.select(self.selected + n - 1),
            Action::ExportWorkbook => {
                self.status = match self.export_workbook() {
                    Ok(()) => format!("Exported {}", self.files.dashboard_workbook.display()),
                    Err(e) => {
                        warn!("Dashboard export failed: {}", e);
                        format!("Export failed: {}", e)
                    }
                }
            }
            Action::ExportPareto => {
                self.status = match write_pareto_csv(&self.view.pareto, &self.files.pareto_csv) {
                    Ok(()) => format!("Exported {}", self.files.pareto_csv.display()),
                    Err(e) => {
                        warn!("Pareto export failed: {}", e);
                        format!("Export failed: {}", e)
                    }
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(action) = Action::from_key(key) {
            self.apply(action);
        }
    }

    /// Write the filtered view to the dashboard workbook.
    pub fn export_workbook(&self) -> Result<()> {
        let v = &self.view;
        write_dashboard_workbook(
            &self.files.dashboard_workbook,
            &v.kpis,
            &v.data.tickets,
            &v.data.calls,
            &v.data.feedback,
        )?;
        info!("Dashboard export for month filter {}", v.filter);
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chrome = Chrome {
            source: &self.source,
            options: &self.options,
            selected: self.selected,
            status: &self.status,
        };
        render_dashboard(frame, area, &self.view, &chrome, &self.theme);
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Esc` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread. Terminal failures surface as
    /// [`InsightsError::Terminal`].
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = enter_terminal()?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(&key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            // Let a pending Ctrl+C signal win the surrounding select.
            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        disable_raw_mode().map_err(terminal_error)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
        terminal.show_cursor().map_err(terminal_error)?;

        result.map_err(terminal_error)
    }
}

fn terminal_error(e: io::Error) -> InsightsError {
    InsightsError::Terminal(e.to_string())
}

/// Map a setup failure to [`InsightsError::Terminal`], running `restore`
/// first so raw mode is not left behind.
fn or_restore<T>(result: io::Result<T>, restore: impl FnOnce()) -> Result<T> {
    result.map_err(|e| {
        restore();
        terminal_error(e)
    })
}

fn open_alternate_screen() -> io::Result<Tui> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(terminal_error)?;
    or_restore(open_alternate_screen(), || {
        if let Err(e) = restore_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }
    })
}

/// Leave raw mode and the alternate screen. For callers that drop the
/// [`App::run`] future before it returns.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(terminal_error)?;
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show).map_err(terminal_error)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::{Call, Feedback, Table, Ticket};
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn ticket(id: &str, month: &str, issue: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            customer_id: "C1".to_string(),
            created_date: None,
            month: Some(month.to_string()),
            priority: None,
            status: "Resolved".to_string(),
            issue_type: issue.to_string(),
            resolution_time_hrs: 2,
            agent: "amy".to_string(),
            customer_ticket_count: Some(3),
            is_repeat_customer: true,
            extra: Vec::new(),
        }
    }

    fn app(dir: &std::path::Path) -> App {
        let data = SupportData {
            tickets: Table::new(vec![
                ticket("T1", "2024-02", "Login"),
                ticket("T2", "2024-01", "Billing"),
                ticket("T3", "2024-02", "Login"),
            ]),
            calls: Table::new(vec![Call {
                call_id: "K1".to_string(),
                agent_id: "amy".to_string(),
                call_date: None,
                month: Some("2024-01".to_string()),
                duration_min: 7,
                extra: Vec::new(),
            }]),
            feedback: Table::new(vec![Feedback {
                csat: 5,
                nps: 9,
                extra: Vec::new(),
            }]),
        };
        App::new("dark", "Data".to_string(), DataFiles::in_dir(dir), data)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_action_from_key() {
        assert_eq!(Action::from_key(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(Action::from_key(&key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(Action::from_key(&key(KeyCode::Char('c'))), None);
        assert_eq!(Action::from_key(&key(KeyCode::Right)), Some(Action::NextMonth));
        assert_eq!(Action::from_key(&key(KeyCode::Char('h'))), Some(Action::PrevMonth));
        assert_eq!(Action::from_key(&key(KeyCode::Char('e'))), Some(Action::ExportWorkbook));
        assert_eq!(Action::from_key(&key(KeyCode::Char('p'))), Some(Action::ExportPareto));
    }

    #[test]
    fn test_month_options() {
        let dir = TempDir::new().unwrap();
        let app = app(dir.path());
        assert_eq!(
            app.options,
            vec![
                MonthFilter::All,
                MonthFilter::Month("2024-01".to_string()),
                MonthFilter::Month("2024-02".to_string()),
            ]
        );
        assert_eq!(app.filter(), &MonthFilter::All);
        assert_eq!(app.view.data.tickets.len(), 3);
    }

    #[test]
    fn test_month_cycling_wraps() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());

        app.handle_key(&key(KeyCode::Right));
        assert_eq!(app.filter(), &MonthFilter::Month("2024-01".to_string()));
        assert_eq!(app.view.data.tickets.len(), 1);
        assert_eq!(app.view.data.calls.len(), 1);

        app.handle_key(&key(KeyCode::Char('l')));
        assert_eq!(app.view.data.tickets.len(), 2);
        assert_eq!(app.view.data.calls.len(), 0);
        assert_eq!(app.view.data.feedback.len(), 1);

        app.handle_key(&key(KeyCode::Right));
        assert_eq!(app.filter(), &MonthFilter::All);

        app.handle_key(&key(KeyCode::Left));
        assert_eq!(app.filter(), &MonthFilter::Month("2024-02".to_string()));
    }

    #[test]
    fn test_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        assert!(!app.should_quit);
        app.handle_key(&key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_export_workbook_of_filtered_view() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.apply(Action::NextMonth);
        app.apply(Action::ExportWorkbook);

        assert!(app.files.dashboard_workbook.exists());
        assert!(app.status.starts_with("Exported"), "status: {}", app.status);
    }

    #[test]
    fn test_export_pareto_of_filtered_view() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.apply(Action::PrevMonth);
        app.apply(Action::ExportPareto);

        let text = std::fs::read_to_string(&app.files.pareto_csv).unwrap();
        assert_eq!(text, "issue_type,count,cum_count,cum_pct\nLogin,2,2,100.0\n");
    }

    #[test]
    fn test_export_failure_reported_in_status() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let mut app = app(&blocker);
        app.apply(Action::ExportPareto);
        assert!(app.status.starts_with("Export failed"), "status: {}", app.status);
    }

    #[test]
    fn test_setup_failure_restores_terminal() {
        let restored = std::cell::Cell::new(false);
        let err = or_restore::<()>(Err(io::Error::other("no tty")), || restored.set(true))
            .unwrap_err();
        assert!(restored.get());
        assert!(matches!(err, InsightsError::Terminal(ref m) if m == "no tty"));

        let ok = or_restore(Ok(5), || panic!("restore must not run on success"));
        assert_eq!(ok.unwrap(), 5);
    }

    #[test]
    fn test_render_app() {
        let dir = TempDir::new().unwrap();
        let app = app(dir.path());
        let mut terminal = Terminal::new(TestBackend::new(130, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("CX INSIGHTS DASHBOARD"));
        assert!(text.contains("Login"));
    }
}
