//! Presentation helpers: currency, dates, chart labels, input masking
//!
//! Everything here is pure string formatting for the id-ID locale the app
//! ships with.

use chrono::{DateTime, Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Maximum length of a `YYYY-MM-DD` date
const DATE_LEN: usize = 10;

/// Format an amount as Indonesian Rupiah: `Rp 1.234.567,00`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}Rp {},{}", sign, group_thousands(whole), fraction)
}

/// Insert `.` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Short axis label for chart values: `1.5M`, `12K`, `500`
pub fn compact_axis_label(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", (value / 100_000.0).round() / 10.0)
    } else if value >= 1_000.0 {
        format!("{}K", (value / 1_000.0).round() as i64)
    } else {
        value.to_string()
    }
}

/// Live mask for a `YYYY-MM-DD` text field.
///
/// Called with the full field text after each edit. Returns the text to
/// show, or `None` when the edit would overflow the field and the previous
/// value must be kept.
pub fn mask_date_input(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    // A pasted run of bare digits gets its separators up front
    let cleaned = if !cleaned.contains('-') && cleaned.len() > 4 {
        let (year, rest) = cleaned.split_at(4);
        let (month, day) = rest.split_at(rest.len().min(2));
        [year, month, day]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("-")
    } else {
        cleaned
    };

    let formatted = if cleaned.len() == 4 && !cleaned.contains('-') {
        format!("{}-", cleaned)
    } else if cleaned.len() == 7 && cleaned.split('-').count() == 2 {
        format!("{}-", cleaned)
    } else {
        cleaned
    };

    (formatted.len() <= DATE_LEN).then_some(formatted)
}

/// Upper-cased first letters of each word, `U` for an empty name
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// Parse a server date: RFC 3339 date-time or a bare `YYYY-MM-DD`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    let date_part = text.split('T').next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `15 Januari 2024`, or `-` when the date is missing or unreadable
pub fn format_date_long(text: Option<&str>) -> String {
    match text.and_then(parse_date) {
        Some(d) => format!("{} {} {}", d.day(), MONTHS_LONG[d.month0() as usize], d.year()),
        None => "-".to_string(),
    }
}

/// `15 Jan 2024`
pub fn format_date_short(text: &str) -> String {
    match parse_date(text) {
        Some(d) => format!("{} {} {}", d.day(), MONTHS_SHORT[d.month0() as usize], d.year()),
        None => "-".to_string(),
    }
}

/// `15 Jan`
pub fn format_day_month(text: &str) -> String {
    match parse_date(text) {
        Some(d) => format!("{} {}", d.day(), MONTHS_SHORT[d.month0() as usize]),
        None => "-".to_string(),
    }
}
