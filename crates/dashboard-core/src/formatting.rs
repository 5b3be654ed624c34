/// Format a counter with thousands separators.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a check interval given in minutes.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_interval;
///
/// assert_eq!(format_interval(1), "every minute");
/// assert_eq!(format_interval(5), "every 5 minutes");
/// assert_eq!(format_interval(60), "every hour");
/// ```
pub fn format_interval(minutes: u32) -> String {
    match minutes {
        1 => "every minute".to_string(),
        60 => "every hour".to_string(),
        m => format!("every {} minutes", m),
    }
}

/// Human label for the bot's posting mode.
pub fn format_mode(test_mode: bool) -> &'static str {
    if test_mode {
        "Test Mode"
    } else {
        "Live Mode"
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Truncate `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
