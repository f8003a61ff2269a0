//! crates/sysfree_core/src/formatters.rs
//!
//! Pure conversions from raw values to display strings. Missing input always
//! renders as the empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_CURRENCY: &str = "$";
pub const DEFAULT_TRUNCATE_LENGTH: usize = 50;

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `formatCurrency(1234.5)` → `"$1,234.50"`.
pub fn format_currency(value: Option<f64>) -> String {
    format_currency_with(value, DEFAULT_CURRENCY, 2)
}

pub fn format_currency_with(value: Option<f64>, currency: &str, decimals: usize) -> String {
    match value {
        Some(v) => format!("{currency}{}", group_thousands(&format!("{v:.decimals$}"))),
        None => String::new(),
    }
}

/// Fixed decimals with thousands separators.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => group_thousands(&format!("{v:.decimals$}")),
        None => String::new(),
    }
}

/// Inserts `,` every three digits of the integer part.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `dd/mm/yyyy` for an ISO date or timestamp; anything unparseable renders as `""`.
pub fn format_date(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `dd/mm/yyyy HH:MM` for an ISO date or timestamp.
pub fn format_datetime(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Wall-clock time as written by the backend, offset discarded.
fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Cuts `text` to `max_length` characters and appends `...` when it was longer.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_length).collect();
    format!("{cut}...")
}

/// Lowercases the text and uppercases the first letter of each space-separated word.
pub fn capitalize_text(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
