use crate::components::progress_bar::PercentBar;
use crate::themes::Theme;
use insights_core::formatting::format_number;
use insights_core::models::KpiSummary;
use ratatui::text::{Line, Span};

const LABEL_WIDTH: usize = 16;

/// The five headline metrics, one line each. The FCR proxy line carries a
/// bar.
pub struct KpiCards<'a> {
    /// Shown rounded to two decimals.
    pub kpis: KpiSummary,
    pub theme: &'a Theme,
}

impl<'a> KpiCards<'a> {
    pub fn new(kpis: &KpiSummary, theme: &'a Theme) -> Self {
        Self {
            kpis: kpis.rounded(),
            theme,
        }
    }

    fn label(&self, text: &str) -> Span<'a> {
        Span::styled(format!("{:<width$}", text, width = LABEL_WIDTH), self.theme.label)
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let k = &self.kpis;

        let mut fcr = vec![self.label("FCR proxy")];
        fcr.extend(PercentBar::new(k.fcr_proxy_pct, self.theme).width(20).to_line().spans);

        vec![
            Line::from(vec![
                self.label("AHT"),
                Span::styled(format!("{} min", format_number(k.aht_min, 2)), self.theme.value),
            ]),
            Line::from(fcr),
            Line::from(vec![
                self.label("CSAT"),
                Span::styled(format_number(k.csat_mean, 2), self.theme.csat_style(k.csat_mean)),
            ]),
            Line::from(vec![
                self.label("NPS"),
                Span::styled(format_number(k.nps_mean, 2), self.theme.nps_style(k.nps_mean)),
            ]),
            Line::from(vec![
                self.label("Avg resolution"),
                Span::styled(
                    format!("{} hrs", format_number(k.avg_resolution_hrs, 2)),
                    self.theme.value,
                ),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
