use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Output format used for every date written back to a cleaned CSV.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Column names ──────────────────────────────────────────────────────────────

/// Canonical header form: surrounding whitespace (and a stray byte-order
/// mark) removed, lower-cased.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ── NumericCoercer ────────────────────────────────────────────────────────────

/// Lenient integer conversion for spreadsheet-style numeric cells.
pub struct NumericCoercer;

impl NumericCoercer {
    /// Parse `raw` as a number and truncate it toward zero.
    ///
    /// Accepts anything `f64` parsing accepts after trimming (`"12"`,
    /// `"4.7"`, `"1e3"`, `"-3"`). Returns `None` for empty, non-numeric or
    /// non-finite input so the caller can decide on the fill value.
    pub fn parse_int(raw: &str) -> Option<i64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(value.trunc() as i64)
    }

    /// Same as [`parse_int`](Self::parse_int) but substitutes `0` on failure.
    ///
    /// The boolean is `true` when the substitution happened.
    pub fn coerce_int(raw: &str) -> (i64, bool) {
        match Self::parse_int(raw) {
            Some(v) => (v, false),
            None => (0, true),
        }
    }
}

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the date and date-time spellings found in CSV exports.
pub struct DateParser;

impl DateParser {
    const FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y",
    ];

    /// Parse `raw` into a naive (wall-clock) date-time.
    ///
    /// Offsets in RFC 3339 input are dropped after conversion to the local
    /// time they describe, so the calendar month matches what was written.
    /// Ambiguous `a/b/YYYY` values are read month-first.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }

        for fmt in Self::FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        debug!("DateParser: could not parse date \"{}\"", s);
        None
    }

    /// Render a parsed value the way cleaned CSVs store it.
    pub fn format(dt: &NaiveDateTime) -> String {
        dt.format(DATE_OUTPUT_FORMAT).to_string()
    }
}

/// Calendar-month bucket, formatted `YYYY-MM` so that string order is
/// chronological order.
pub fn month_key(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m").to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // ── normalize_column_name ────────────────────────────────────────────────

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Ticket_ID "), "ticket_id");
        assert_eq!(normalize_column_name("CSAT"), "csat");
        assert_eq!(normalize_column_name("\u{feff}call_id"), "call_id");
    }

    // ── NumericCoercer ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_int_plain() {
        assert_eq!(NumericCoercer::parse_int("42"), Some(42));
        assert_eq!(NumericCoercer::parse_int(" 7 "), Some(7));
        assert_eq!(NumericCoercer::parse_int("-3"), Some(-3));
    }

    #[test]
    fn test_parse_int_truncates_fractions() {
        assert_eq!(NumericCoercer::parse_int("4.7"), Some(4));
        assert_eq!(NumericCoercer::parse_int("-2.9"), Some(-2));
        assert_eq!(NumericCoercer::parse_int("-0.5"), Some(0));
        assert_eq!(NumericCoercer::parse_int("1e3"), Some(1000));
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert_eq!(NumericCoercer::parse_int(""), None);
        assert_eq!(NumericCoercer::parse_int("n/a"), None);
        assert_eq!(NumericCoercer::parse_int("12 hrs"), None);
        assert_eq!(NumericCoercer::parse_int("inf"), None);
        assert_eq!(NumericCoercer::parse_int("NaN"), None);
    }

    #[test]
    fn test_coerce_int_flags_substitution() {
        assert_eq!(NumericCoercer::coerce_int("5"), (5, false));
        assert_eq!(NumericCoercer::coerce_int("five"), (0, true));
        assert_eq!(NumericCoercer::coerce_int(""), (0, true));
    }

    // ── DateParser ───────────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_only() {
        let dt = DateParser::parse("2024-03-15").unwrap();
        assert_eq!(DateParser::format(&dt), "2024-03-15 00:00:00");
    }

    #[test]
    fn test_parse_date_time_variants() {
        for s in [
            "2024-03-15 10:30:00",
            "2024-03-15T10:30:00",
            "2024-03-15T10:30:00.250",
            "2024-03-15 10:30",
            "03/15/2024 10:30:00",
        ] {
            let dt = DateParser::parse(s).unwrap_or_else(|| panic!("failed on {s}"));
            assert_eq!(month_key(&dt), "2024-03", "input {s}");
            assert_eq!(dt.hour(), 10, "input {s}");
        }
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_month() {
        let dt = DateParser::parse("2024-01-31T23:30:00-05:00").unwrap();
        assert_eq!(month_key(&dt), "2024-01");
    }

    #[test]
    fn test_parse_slash_dates_month_first_then_day_first() {
        let us = DateParser::parse("02/03/2024").unwrap();
        assert_eq!(month_key(&us), "2024-02");
        let eu = DateParser::parse("25/03/2024").unwrap();
        assert_eq!(month_key(&eu), "2024-03");
    }

    #[test]
    fn test_parse_invalid_returns_none() {
        assert!(DateParser::parse("").is_none());
        assert!(DateParser::parse("yesterday").is_none());
        assert!(DateParser::parse("2024-13-45").is_none());
    }

    #[test]
    fn test_format_is_reparseable() {
        let dt = DateParser::parse("2024-07-04 08:09:10").unwrap();
        let again = DateParser::parse(&DateParser::format(&dt)).unwrap();
        assert_eq!(dt, again);
    }

    #[test]
    fn test_month_key_zero_padded() {
        let dt = DateParser::parse("2024-01-05").unwrap();
        assert_eq!(month_key(&dt), "2024-01");
    }
}
