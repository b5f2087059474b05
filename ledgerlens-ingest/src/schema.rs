//! Header-row detection and semantic column-role resolution.
//!
//! Bank exports label the same column a dozen different ways ("Narration",
//! "Particulars", "Transaction Details", ...) and often bury the header
//! under address banners. Detection works on normalized labels; resolution
//! always hands back the original label so lookups stay keyed on the
//! source's own names.

use tracing::debug;

/// Vocabulary a header row is recognized by (after normalization)
const HEADER_KEYWORDS: &[&str] = &[
    "date",
    "transaction_date",
    "value_date",
    "description",
    "narration",
    "remark",
    "particulars",
    "credit",
    "debit",
    "balance",
    "amount",
    "txn_type",
    "type",
    "chq_no",
    "cheque_number",
    "withdrawals",
    "deposits",
];

/// A row needs this many keyword-bearing cells to qualify as the header
const HEADER_MATCH_THRESHOLD: usize = 2;

pub const DATE_KEYWORDS: &[&str] = &["date", "txn_date", "transaction_date", "value_date"];
pub const CREDIT_KEYWORDS: &[&str] = &[
    "credit",
    "cr",
    "credit_amount",
    "received",
    "deposit",
    "cr_amount",
    "deposits",
];
pub const DEBIT_KEYWORDS: &[&str] = &[
    "debit",
    "dr",
    "debit_amount",
    "withdraw",
    "paid",
    "dr_amount",
    "withdrawals",
];
pub const AMOUNT_KEYWORDS: &[&str] = &["amount", "transaction_amount", "value"];
pub const NARRATION_KEYWORDS: &[&str] = &[
    "narration",
    "description",
    "remark",
    "details",
    "transaction_details",
];
/// Document tables additionally label the narration "Particulars"
pub const NARRATION_KEYWORDS_DOCUMENT: &[&str] = &[
    "narration",
    "description",
    "details",
    "remark",
    "particulars",
    "transaction_details",
];
pub const BALANCE_KEYWORDS: &[&str] = &[
    "balance",
    "closing_balance",
    "available_balance",
    "current_balance",
];
pub const ACCOUNT_KEYWORDS: &[&str] = &["account", "acc_no", "account_number"];

/// Normalize a column label into an identifier: trim, lowercase, drop
/// periods, map space and `/` `\` `-` to underscores.
pub fn clean_column_name(col: &str) -> String {
    col.trim()
        .to_lowercase()
        .replace('.', "")
        .replace([' ', '/', '\\', '-'], "_")
}

/// Scan the first `max_rows` rows for the header: the first row with at
/// least two cells containing a header keyword wins. Defaults to row 0.
pub fn detect_header_row(rows: &[Vec<String>], max_rows: usize) -> usize {
    for (i, row) in rows.iter().take(max_rows).enumerate() {
        let match_count = row
            .iter()
            .filter(|cell| {
                let cleaned = clean_column_name(cell);
                HEADER_KEYWORDS.iter().any(|kw| cleaned.contains(kw))
            })
            .count();
        if match_count >= HEADER_MATCH_THRESHOLD {
            debug!(row = i, matches = match_count, "detected header row");
            return i;
        }
    }
    debug!("no clear header row detected, defaulting to row 0");
    0
}

/// Two-pass column search: exact (case-insensitive) match against every
/// keyword first, substring match second. Exactness strictly precedes
/// partial matches across the whole keyword list, not per keyword.
/// Returns the original label.
pub fn find_column<S: AsRef<str>>(keywords: &[&str], columns: &[S]) -> Option<String> {
    let normalized: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .collect();

    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        for (i, col) in normalized.iter().enumerate() {
            if *col == keyword {
                return Some(columns[i].as_ref().to_string());
            }
        }
    }

    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        for (i, col) in normalized.iter().enumerate() {
            if col.contains(&keyword) {
                return Some(columns[i].as_ref().to_string());
            }
        }
    }

    None
}

/// Resolved semantic roles for one source or table. Computed once,
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRoles {
    pub date: Option<String>,
    pub narration: Option<String>,
    pub credit: Option<String>,
    pub debit: Option<String>,
    pub amount: Option<String>,
    pub balance: Option<String>,
    pub account: Option<String>,
}

impl ColumnRoles {
    /// Role resolution for a tabular (CSV/spreadsheet) source. The general
    /// amount column is searched only among non-date columns so a lone
    /// "Value Date" never masquerades as an amount.
    pub fn resolve_tabular(columns: &[String]) -> Self {
        let non_date: Vec<String> = columns
            .iter()
            .filter(|c| !c.to_lowercase().contains("date"))
            .cloned()
            .collect();

        Self {
            date: find_column(DATE_KEYWORDS, columns),
            narration: find_column(NARRATION_KEYWORDS, columns),
            credit: find_column(CREDIT_KEYWORDS, columns),
            debit: find_column(DEBIT_KEYWORDS, columns),
            amount: find_column(AMOUNT_KEYWORDS, &non_date),
            balance: find_column(BALANCE_KEYWORDS, columns),
            account: find_column(ACCOUNT_KEYWORDS, columns),
        }
    }

    /// Role resolution for one table of a document source
    pub fn resolve_document(columns: &[String]) -> Self {
        Self {
            date: find_column(DATE_KEYWORDS, columns),
            narration: find_column(NARRATION_KEYWORDS_DOCUMENT, columns),
            credit: find_column(CREDIT_KEYWORDS, columns),
            debit: find_column(DEBIT_KEYWORDS, columns),
            amount: find_column(AMOUNT_KEYWORDS, columns),
            balance: find_column(BALANCE_KEYWORDS, columns),
            account: find_column(ACCOUNT_KEYWORDS, columns),
        }
    }

    /// At least one of credit/debit/amount resolved
    pub fn has_amount_signal(&self) -> bool {
        self.credit.is_some() || self.debit.is_some() || self.amount.is_some()
    }

    /// Tabular precondition: date AND narration AND an amount signal
    pub fn has_required_tabular(&self) -> bool {
        self.date.is_some() && self.narration.is_some() && self.has_amount_signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_column_name() {
        assert_eq!(clean_column_name("  Txn Date "), "txn_date");
        assert_eq!(clean_column_name("Chq./Ref.No."), "chq_refno");
        assert_eq!(clean_column_name("Withdrawal-Amt"), "withdrawal_amt");
        assert_eq!(clean_column_name("A\\B"), "a_b");
    }

    #[test]
    fn test_detect_header_row_skips_banner() {
        let rows = vec![
            vec!["HDFC BANK LTD".to_string()],
            vec!["Statement for account 123".to_string()],
            vec![
                "Date".to_string(),
                "Narration".to_string(),
                "Debit".to_string(),
                "Credit".to_string(),
                "Balance".to_string(),
            ],
            vec!["01/02/2025".to_string(), "UPI/X".to_string()],
        ];
        assert_eq!(detect_header_row(&rows, 20), 2);
    }

    #[test]
    fn test_detect_header_row_defaults_to_zero() {
        let rows = vec![
            vec!["just".to_string(), "text".to_string()],
            vec!["more".to_string(), "text".to_string()],
        ];
        assert_eq!(detect_header_row(&rows, 20), 0);
    }

    #[test]
    fn test_single_keyword_row_is_not_header() {
        // One matching cell is below the threshold
        let rows = vec![
            vec!["Date of issue: 01/01/2025".to_string()],
            vec!["Date".to_string(), "Particulars".to_string(), "Amount".to_string()],
        ];
        assert_eq!(detect_header_row(&rows, 20), 1);
    }

    #[test]
    fn test_find_column_exact_beats_partial() {
        // "cr" appears as a substring of "cr_amount", but the exact match
        // for a later keyword must win over an earlier partial one
        let columns = cols(&["cr_amount", "credit"]);
        assert_eq!(
            find_column(&["credit", "cr"], &columns),
            Some("credit".to_string())
        );
    }

    #[test]
    fn test_find_column_partial_fallback() {
        let columns = cols(&["transaction_details_full"]);
        assert_eq!(
            find_column(&["narration", "transaction_details"], &columns),
            Some("transaction_details_full".to_string())
        );
    }

    #[test]
    fn test_find_column_returns_none() {
        assert_eq!(find_column(&["balance"], &cols(&["date", "amount"])), None);
    }

    #[test]
    fn test_resolve_tabular_excludes_date_from_amount() {
        // "value_date" contains the amount keyword "value" but is a date column
        let columns = cols(&["value_date", "narration", "debit"]);
        let roles = ColumnRoles::resolve_tabular(&columns);
        assert_eq!(roles.amount, None);
        assert_eq!(roles.date, Some("value_date".to_string()));
        assert_eq!(roles.debit, Some("debit".to_string()));
        assert!(roles.has_required_tabular());
    }

    #[test]
    fn test_resolve_document_accepts_particulars() {
        let columns = cols(&["date", "particulars", "amount"]);
        let roles = ColumnRoles::resolve_document(&columns);
        assert_eq!(roles.narration, Some("particulars".to_string()));
    }

    #[test]
    fn test_missing_required_columns() {
        let roles = ColumnRoles::resolve_tabular(&cols(&["narration", "credit"]));
        assert!(!roles.has_required_tabular());
        assert!(roles.has_amount_signal());
    }
}
