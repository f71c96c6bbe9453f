use crate::themes::Theme;
use insights_core::formatting::format_percent;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a progress bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── PercentBar ───────────────────────────────────────────────────────────────

/// Horizontal bar for a share in `[0, 100]`, e.g. the FCR proxy or a Pareto
/// cumulative percentage.
pub struct PercentBar<'a> {
    /// Clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
    /// Fill style; defaults to the theme's band for `percentage`.
    pub style: Option<Style>,
}

impl<'a> PercentBar<'a> {
    pub fn new(percentage: f64, theme: &'a Theme) -> Self {
        let percentage = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            percentage,
            theme,
            config: ProgressBarConfig::default(),
            style: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Number of filled cells for the current percentage.
    pub fn filled_cells(&self) -> u16 {
        ((self.percentage / 100.0) * self.config.width as f64).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells().min(self.config.width);
        let empty = self.config.width - filled;
        let bar_style = self
            .style
            .unwrap_or_else(|| self.theme.percent_style(self.percentage));

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(filled_str, bar_style),
            Span::styled(empty_str, self.theme.progress_empty),
            Span::styled(format!(" {}", format_percent(self.percentage)), self.theme.label),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
