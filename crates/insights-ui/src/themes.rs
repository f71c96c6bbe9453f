use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable values count as dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Score bands (higher is better) ───────────────────────────────────────
    pub score_good: Style,
    pub score_fair: Style,
    pub score_poor: Style,

    // ── Progress bars ────────────────────────────────────────────────────────
    pub progress_empty: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    /// Pareto rows inside the 80 % "vital few".
    pub table_highlight: Style,

    // ── Month selector ───────────────────────────────────────────────────────
    pub month_selected: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            score_good: Style::default().fg(Color::Green),
            score_fair: Style::default().fg(Color::Yellow),
            score_poor: Style::default().fg(Color::Red),

            progress_empty: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_highlight: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            month_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme: dark text, saturated accents.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            score_good: Style::default().fg(Color::Green),
            score_fair: Style::default().fg(Color::Yellow),
            score_poor: Style::default().fg(Color::Red),

            progress_empty: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_highlight: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            month_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            score_good: Style::default().fg(Color::Green),
            score_fair: Style::default().fg(Color::Yellow),
            score_poor: Style::default().fg(Color::Red),

            progress_empty: Style::default().fg(Color::DarkGray),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_highlight: Style::default().fg(Color::Yellow),

            month_selected: Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names (including `auto`) detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Band a percentage where higher is better (FCR proxy, Pareto share).
    ///
    /// * `≥ 80 %`  → `score_good`
    /// * `50–80 %` → `score_fair`
    /// * `< 50 %`  → `score_poor`
    pub fn percent_style(&self, percentage: f64) -> Style {
        if percentage >= 80.0 {
            self.score_good
        } else if percentage >= 50.0 {
            self.score_fair
        } else {
            self.score_poor
        }
    }

    /// Band a 1–5 CSAT mean.
    pub fn csat_style(&self, csat: f64) -> Style {
        if csat >= 4.0 {
            self.score_good
        } else if csat >= 3.0 {
            self.score_fair
        } else {
            self.score_poor
        }
    }

    /// Band a 0–10 NPS-style mean score.
    pub fn nps_style(&self, nps: f64) -> Style {
        if nps >= 9.0 {
            self.score_good
        } else if nps >= 7.0 {
            self.score_fair
        } else {
            self.score_poor
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.score_poor.fg, Some(Color::Red));
        assert_eq!(t.month_selected.bg, Some(Color::Cyan));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.value.add_modifier.contains(Modifier::BOLD));
        assert!(!t.table_highlight.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(Theme::from_name("auto").header.fg.is_some());
        assert!(Theme::from_name("does-not-exist").header.fg.is_some());
    }

    #[test]
    fn test_percent_style_bands() {
        let t = Theme::dark();
        assert_eq!(t.percent_style(0.0).fg, Some(Color::Red));
        assert_eq!(t.percent_style(49.9).fg, Some(Color::Red));
        assert_eq!(t.percent_style(50.0).fg, Some(Color::Yellow));
        assert_eq!(t.percent_style(80.0).fg, Some(Color::Green));
        assert_eq!(t.percent_style(100.0).fg, Some(Color::Green));
    }

    #[test]
    fn test_csat_and_nps_bands() {
        let t = Theme::dark();
        assert_eq!(t.csat_style(4.2).fg, Some(Color::Green));
        assert_eq!(t.csat_style(3.0).fg, Some(Color::Yellow));
        assert_eq!(t.csat_style(2.1).fg, Some(Color::Red));
        assert_eq!(t.nps_style(9.5).fg, Some(Color::Green));
        assert_eq!(t.nps_style(7.0).fg, Some(Color::Yellow));
        assert_eq!(t.nps_style(4.0).fg, Some(Color::Red));
    }
}
