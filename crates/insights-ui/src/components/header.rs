use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the dashboard title.
pub const ACCENTS: &str = "◆ ◇ ◆";

/// Dashboard header, four lines:
///
/// 1. Title with accent marks.
/// 2. A 60-column `=` separator.
/// 3. `[ data dir | month ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Directory the cleaned tables were loaded from.
    pub source: &'a str,
    /// Current month filter label (`All` or `YYYY-MM`).
    pub month: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, month: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            month,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENTS, self.theme.header_accent),
                Span::styled(" CX INSIGHTS DASHBOARD ", self.theme.header),
                Span::styled(ACCENTS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.month, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
