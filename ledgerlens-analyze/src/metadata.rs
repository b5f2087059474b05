//! Account metadata extraction from header text.
//!
//! Works over a text blob: all page texts for documents, the first rows
//! of the raw grid for tabular sources. Each field tries an ordered
//! pattern list; the first match wins and fields are independent.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use ledgerlens_core::dates;
use ledgerlens_core::{AccountMetadata, StatementPeriod};
use ledgerlens_ingest::schema::ColumnRoles;
use ledgerlens_ingest::types::TabularSource;

fn patterns(list: &[&str]) -> Vec<Regex> {
    list.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static ACCOUNT_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)(?:account|a/c|acct)\s*(?:no|num|number)?\s*[:.]?\s*(\d{9,18})\b",
        r"(?i)\b(\d{3,5}(?:-\d{2,5}){2,})\b",
        r"(?i)\b(?:ind[o]\s*)?(\d{11})\b",
    ])
});

static ACCOUNT_HOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)(?:account\s*name|account\s*holder|customer\s*name|name)\s*:?\s*([A-Z][A-Z\s.&,']+?)\s*(?:account|bank|address|statement)",
        r"(?i)(?:^|\n)\s*([A-Z][A-Z\s.&,']+)\s+(?:A/C|Account|No)\s*:",
        r"(?i)\b([A-Z][a-z]+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s*\d{6,}",
    ])
});

static BANK_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)(?:bank\s*name|issued\s*by|bank)\s*:?\s*([A-Z][A-Z\s,.]+)\b",
        r"(?i)\b(STATE BANK OF INDIA|HDFC BANK|ICICI BANK|AXIS BANK|PUNJAB NATIONAL BANK|YES BANK|KOTAK MAHINDRA BANK|UNION BANK OF INDIA|CANARA BANK|INDIAN BANK|INDUSIND BANK|FEDERAL BANK|RBL BANK|BANDHAN BANK|IDFC FIRST BANK)\b",
        r"(?i)BANK NAME\s*:\s*([A-Z\s&.]+)",
    ])
});

static BRANCH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)(?:branch\s*name|branch)\s*:?\s*([A-Z][A-Z\s,.-]+)\b",
        r"(?i)BRANCH\s*:\s*([A-Z\s&.]+)",
    ])
});

static IFSC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)\b([A-Z]{4}0[A-Z0-9]{6})\b",
        r"(?i)(?:IFSC\s*Code|IFSC)\s*[:.]?\s*([A-Z]{4}0[A-Z0-9]{6})\b",
    ])
});

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"(?i)\b(?:\+91[-\s]?)?[6-9]\d{9}\b",
        r"(?i)(?:tel|phone|mobile|ph\.?)\s*[:.]?\s*(\+?\d[\d\s-]{7,}\d)\b",
    ])
});

static EMAIL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}\b"])
});

/// Literal date shapes collected for the statement period
static PERIOD_DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{4})\b",
        r"(?i)\b(\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4})\b",
        r"\b(\d{4}[/-]\d{1,2}[/-]\d{1,2})\b",
    ])
});

/// First match over an ordered pattern list; capture group 1 when the
/// pattern has one, the whole match otherwise
fn first_match(patterns: &[Regex], blob: &str) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(blob) {
            let text = caps.get(1).unwrap_or_else(|| caps.get(0).unwrap());
            let text = text.as_str().trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Statement period from every date-shaped substring in the blob,
/// parsed permissively day-first
pub fn statement_period_from_text(blob: &str) -> StatementPeriod {
    let mut found: Vec<NaiveDate> = Vec::new();
    for pattern in PERIOD_DATE_PATTERNS.iter() {
        for caps in pattern.captures_iter(blob) {
            if let Some(date) = dates::parse_permissive(&caps[1], true) {
                if !found.contains(&date) {
                    found.push(date);
                }
            }
        }
    }

    match found.len() {
        0 => StatementPeriod::Empty {},
        1 => StatementPeriod::Single {
            date: dates::to_canonical(found[0]),
        },
        _ => StatementPeriod::Range {
            from: dates::to_canonical(*found.iter().min().unwrap()),
            to: dates::to_canonical(*found.iter().max().unwrap()),
        },
    }
}

/// Extract account/bank/contact fields and the statement period from a
/// text blob. Every field is independent and best-effort.
pub fn extract_metadata_from_text(blob: &str) -> AccountMetadata {
    let metadata = AccountMetadata {
        account_number: first_match(&ACCOUNT_NUMBER_PATTERNS, blob),
        account_holder: first_match(&ACCOUNT_HOLDER_PATTERNS, blob),
        bank_name: first_match(&BANK_NAME_PATTERNS, blob),
        branch: first_match(&BRANCH_PATTERNS, blob),
        ifsc_code: first_match(&IFSC_PATTERNS, blob),
        phone: first_match(&PHONE_PATTERNS, blob),
        email: first_match(&EMAIL_PATTERNS, blob),
        statement_period: statement_period_from_text(blob),
    };

    debug!(?metadata, "extracted metadata");
    metadata
}

/// Tabular metadata: the header-region blob, with the statement period
/// overridden by the resolved date column's min/max whenever that column
/// yields at least one parseable date
pub fn extract_tabular_metadata(source: &TabularSource, roles: &ColumnRoles) -> AccountMetadata {
    let mut metadata = extract_metadata_from_text(&source.metadata_blob());

    let column_dates: Vec<NaiveDate> = source
        .records
        .iter()
        .filter_map(|record| record.get_role(roles.date.as_ref()))
        .filter_map(|cell| dates::parse_permissive(cell, true))
        .collect();

    if let (Some(min), Some(max)) = (column_dates.iter().min(), column_dates.iter().max()) {
        metadata.statement_period = StatementPeriod::Range {
            from: dates::to_canonical(*min),
            to: dates::to_canonical(*max),
        };
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_ingest::types::TabularSource;

    #[test]
    fn test_labeled_account_number() {
        let meta = extract_metadata_from_text("Account No: 123456789012 SAVINGS");
        assert_eq!(meta.account_number.as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_known_bank_name_alternation() {
        // The labeled pattern cannot complete at end of input, so the
        // fixed bank-name alternation answers
        let meta = extract_metadata_from_text("Welcome to HDFC BANK");
        assert_eq!(meta.bank_name.as_deref(), Some("HDFC BANK"));
    }

    #[test]
    fn test_ifsc_shape() {
        let meta = extract_metadata_from_text("IFSC: HDFC0001234 Branch: KORAMANGALA");
        assert_eq!(meta.ifsc_code.as_deref(), Some("HDFC0001234"));
        assert!(meta.branch.is_some());
    }

    #[test]
    fn test_phone_and_email() {
        let meta = extract_metadata_from_text("Contact: 9876543210 support@hdfcbank.com");
        assert_eq!(meta.phone.as_deref(), Some("9876543210"));
        assert_eq!(meta.email.as_deref(), Some("support@hdfcbank.com"));
    }

    #[test]
    fn test_period_two_dates_gives_range() {
        let period =
            statement_period_from_text("Statement from 01/01/2025 to 31/01/2025 inclusive");
        assert_eq!(
            period,
            StatementPeriod::Range {
                from: "2025-01-01".to_string(),
                to: "2025-01-31".to_string(),
            }
        );
    }

    #[test]
    fn test_period_single_date() {
        let period = statement_period_from_text("Generated on 15 Jan 2025");
        assert_eq!(
            period,
            StatementPeriod::Single {
                date: "2025-01-15".to_string(),
            }
        );
    }

    #[test]
    fn test_period_no_dates() {
        assert_eq!(
            statement_period_from_text("no dates here"),
            StatementPeriod::Empty {}
        );
    }

    #[test]
    fn test_period_duplicate_date_counts_once() {
        let period = statement_period_from_text("As of 01/01/2025, printed 01/01/2025");
        assert_eq!(
            period,
            StatementPeriod::Single {
                date: "2025-01-01".to_string(),
            }
        );
    }

    #[test]
    fn test_date_column_overrides_blob_period() {
        let grid: Vec<Vec<String>> = vec![
            vec!["Statement period 01/03/2020 to 31/03/2020".to_string()],
            vec!["Date".to_string(), "Narration".to_string(), "Amount".to_string()],
            vec!["05/01/2025".to_string(), "X".to_string(), "1".to_string()],
            vec!["20/01/2025".to_string(), "Y".to_string(), "2".to_string()],
        ];
        let source = TabularSource::from_grid(grid);
        let roles = ColumnRoles::resolve_tabular(&source.columns);
        let meta = extract_tabular_metadata(&source, &roles);
        assert_eq!(
            meta.statement_period,
            StatementPeriod::Range {
                from: "2025-01-05".to_string(),
                to: "2025-01-20".to_string(),
            }
        );
    }

    #[test]
    fn test_blob_period_kept_when_column_has_no_dates() {
        let grid: Vec<Vec<String>> = vec![
            vec!["Statement period 01/03/2020 to 31/03/2020".to_string()],
            vec!["Date".to_string(), "Narration".to_string(), "Amount".to_string()],
            vec!["pending".to_string(), "X".to_string(), "1".to_string()],
        ];
        let source = TabularSource::from_grid(grid);
        let roles = ColumnRoles::resolve_tabular(&source.columns);
        let meta = extract_tabular_metadata(&source, &roles);
        assert_eq!(
            meta.statement_period,
            StatementPeriod::Range {
                from: "2020-03-01".to_string(),
                to: "2020-03-31".to_string(),
            }
        );
    }
}
