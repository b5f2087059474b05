//! Date parsing helpers shared by normalization, metadata and insights.
//!
//! Statement sources mix `DD-MM-YYYY`, `DD/MM/YYYY`, `01-Feb-25`, ISO and
//! free-text forms. Everything canonicalizes to `YYYY-MM-DD`.

use chrono::NaiveDate;

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Format a date in the canonical `YYYY-MM-DD` form
pub fn to_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Parse a canonical `YYYY-MM-DD` string
pub fn parse_canonical(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), CANONICAL_FORMAT).ok()
}

fn month_from_name(name: &str) -> Option<u32> {
    let m = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(m)
}

/// Two-digit years pivot at 70: 70..=99 -> 19xx, 00..=69 -> 20xx
fn expand_year(y: i32) -> i32 {
    if y < 100 {
        if y >= 70 { 1900 + y } else { 2000 + y }
    } else {
        y
    }
}

/// Permissive parse over common statement date shapes.
///
/// `day_first` controls how an ambiguous numeric triple like `03/04/2025`
/// is read: day-month when true, month-day when false. Either way the
/// other order is tried when the preferred one is not a valid date.
pub fn parse_permissive(s: &str, day_first: bool) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // A trailing time component simply becomes a fourth token and is ignored
    let tokens: Vec<&str> = s
        .split(['-', '/', '.', ' ', ','])
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() < 3 {
        return None;
    }

    let (a, b, c) = (tokens[0], tokens[1], tokens[2]);

    // Month-name forms: "01 Feb 2025" / "Feb 01 2025"
    if let Some(month) = month_from_name(b) {
        let day: u32 = a.parse().ok()?;
        let year: i32 = c.parse().ok()?;
        return NaiveDate::from_ymd_opt(expand_year(year), month, day);
    }
    if let Some(month) = month_from_name(a) {
        let day: u32 = b.parse().ok()?;
        let year: i32 = c.parse().ok()?;
        return NaiveDate::from_ymd_opt(expand_year(year), month, day);
    }

    let na: i64 = a.parse().ok()?;
    let nb: i64 = b.parse().ok()?;
    let nc: i64 = c.parse().ok()?;

    // Four-digit leading token is unambiguously the year
    if a.len() == 4 {
        return NaiveDate::from_ymd_opt(na as i32, nb as u32, nc as u32);
    }

    let year = expand_year(nc as i32);
    let (first, second) = if day_first {
        ((nb as u32, na as u32), (na as u32, nb as u32)) // (m, d) preferred, then swapped
    } else {
        ((na as u32, nb as u32), (nb as u32, na as u32))
    };

    NaiveDate::from_ymd_opt(year, first.0, first.1)
        .or_else(|| NaiveDate::from_ymd_opt(year, second.0, second.1))
}
