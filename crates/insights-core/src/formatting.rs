/// Round `value` to `decimals` places, ties to even.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::round_to;
///
/// assert_eq!(round_to(4.0, 2), 4.0);
/// assert_eq!(round_to(66.666_666, 2), 66.67);
/// assert_eq!(round_to(0.125, 2), 0.12);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Format a number with thousands separators and a fixed number of decimals.
///
/// ```
/// use insights_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(-9876.0, 0), "-9,876");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // Values that round to zero are printed unsigned.
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Format a percentage with one decimal and a trailing `%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format an optional metric, rendering `None` as `-`.
pub fn format_optional(value: Option<f64>, decimals: u32) -> String {
    value
        .map(|v| format_number(v, decimals))
        .unwrap_or_else(|| "-".to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
