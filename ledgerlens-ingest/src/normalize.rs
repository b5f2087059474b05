//! Cell-value normalization: monetary text and heterogeneous dates.
//!
//! Every function here is non-throwing by contract: a failed sub-parse
//! yields None (or the original string for dates) rather than an error,
//! which is what makes per-row partial extraction possible.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use ledgerlens_core::dates;

/// Leading `YYYY-MM-DD` / `YYYY/MM/DD` shape: a date leaking into a
/// numeric column, never a valid amount
static DATE_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{2}[-/]\d{2}").unwrap());

/// Word-boundary Cr/Dr markers with optional trailing period
static CR_DR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:cr|dr)\b\.?").unwrap());

/// Full datetime shape whose date part is already canonical
static DATETIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").unwrap());

/// Sentinel strings that mean "no value" in statement cells
const NULL_TOKENS: &[&str] = &["", "nan", "none", "n/a", "-"];

/// Parse monetary text into a signed value, or None.
///
/// Strips currency symbols and thousands separators, removes Cr./Dr.
/// tokens, and reads `(X)` as `-X`. Date-shaped strings are rejected
/// outright so date columns mis-detected as amounts never produce
/// numbers.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }

    if DATE_LIKE.is_match(trimmed) {
        debug!(value = trimmed, "rejected date-like amount");
        return None;
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '₹' | '$' | '€' | '£'))
        .collect();
    let stripped = CR_DR.replace_all(&stripped, "");
    let mut value = stripped.trim().to_string();

    if value.starts_with('(') && value.ends_with(')') {
        value = format!("-{}", &value[1..value.len() - 1]);
    }

    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            debug!(value = raw, "could not parse amount");
            None
        }
    }
}

/// Fixed ordered format list tried before any permissive fallback
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d-%b-%y", // 01-Feb-25
    "%d-%b-%Y",
    "%d - %b - %Y", // 01 - Feb - 2025
    "%Y-%m-%d",
];

/// Normalize heterogeneous date text to canonical `YYYY-MM-DD`.
///
/// Returns None for empty input. If no format matches and the permissive
/// fallback (day-first disabled) also fails, the original string is
/// returned unchanged, an explicit unparsed passthrough rather than an error.
pub fn normalize_date(raw: &str) -> Option<String> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    // Excel engines hand over datetimes as 'YYYY-MM-DD HH:MM:SS'
    if DATETIME_SHAPE.is_match(input) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
            return Some(dates::to_canonical(dt.date()));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(dates::to_canonical(date));
        }
    }

    if let Some(date) = dates::parse_permissive(input, false) {
        return Some(dates::to_canonical(date));
    }

    debug!(value = input, "failed to parse date, keeping original");
    Some(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_basic() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("₹ 500"), Some(500.0));
        assert_eq!(parse_amount("$99.99"), Some(99.99));
        assert_eq!(parse_amount("-42"), Some(-42.0));
    }

    #[test]
    fn test_parse_amount_null_tokens() {
        for raw in ["", "  ", "nan", "None", "N/A", "-"] {
            assert_eq!(parse_amount(raw), None, "{raw:?} should be null");
        }
    }

    #[test]
    fn test_parse_amount_rejects_date_like() {
        assert_eq!(parse_amount("2025-02-05"), None);
        assert_eq!(parse_amount("2025/02/05"), None);
        assert_eq!(parse_amount("2025-02-05 00:00:00"), None);
    }

    #[test]
    fn test_parse_amount_cr_dr_tokens() {
        assert_eq!(parse_amount("1,000.00 Cr."), Some(1000.0));
        assert_eq!(parse_amount("250.50 Dr"), Some(250.5));
        assert_eq!(parse_amount("CR 75"), Some(75.0));
    }

    #[test]
    fn test_parse_amount_parenthesized_negative() {
        assert_eq!(parse_amount("(100.00)"), Some(-100.0));
        assert_eq!(parse_amount("(1,500)"), Some(-1500.0));
    }

    #[test]
    fn test_parse_amount_garbage() {
        assert_eq!(parse_amount("TOTAL"), None);
        assert_eq!(parse_amount("12 34"), None);
    }

    #[test]
    fn test_normalize_date_datetime_shape() {
        assert_eq!(
            normalize_date("2025-02-04 00:00:00"),
            Some("2025-02-04".to_string())
        );
    }

    #[test]
    fn test_normalize_date_known_formats() {
        assert_eq!(normalize_date("01-02-2025"), Some("2025-02-01".to_string()));
        assert_eq!(normalize_date("01/02/2025"), Some("2025-02-01".to_string()));
        assert_eq!(normalize_date("01-Feb-25"), Some("2025-02-01".to_string()));
        assert_eq!(normalize_date("01-Feb-2025"), Some("2025-02-01".to_string()));
        assert_eq!(
            normalize_date("01 - Feb - 2025"),
            Some("2025-02-01".to_string())
        );
        assert_eq!(normalize_date("2025-02-01"), Some("2025-02-01".to_string()));
    }

    #[test]
    fn test_normalize_date_permissive_fallback_is_month_first() {
        // Not in the fixed list ('.' separators); falls back permissively
        // with day-first disabled
        assert_eq!(normalize_date("02.05.2025"), Some("2025-02-05".to_string()));
    }

    #[test]
    fn test_normalize_date_unparsed_passthrough() {
        assert_eq!(normalize_date("??/??/????"), Some("??/??/????".to_string()));
        assert_eq!(normalize_date("pending"), Some("pending".to_string()));
    }

    #[test]
    fn test_normalize_date_empty_is_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
    }
}
