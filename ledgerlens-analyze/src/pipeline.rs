//! End-to-end analysis pipelines: raw source in, response envelope out.
//!
//! Rows are processed independently and emitted in input order; skips are
//! counted, never fatal. Source-level validation failures produce a 400
//! envelope, reader failures a 500 envelope with the raw error attached.

use std::path::Path;

use tracing::{debug, info, warn};

use ledgerlens_core::confidence::{score_transaction, summarize};
use ledgerlens_core::insights::aggregate_merchants;
use ledgerlens_core::{
    AccountMetadata, AnalysisError, AnalysisResponse, AnalysisResult, Transaction,
};
use ledgerlens_ingest::schema::ColumnRoles;
use ledgerlens_ingest::types::{DocumentSource, TabularSource};

use crate::assembler::{RowOutcome, assemble_row};
use crate::metadata::{extract_metadata_from_text, extract_tabular_metadata};

const MISSING_COLUMNS_MESSAGE: &str =
    "Missing critical columns (Date, Narration, and at least one of Credit/Debit/Amount).";
const NO_TABLES_MESSAGE: &str =
    "No structured transaction tables could be extracted from the PDF.";

/// Attach confidence scores, roll up the summary and merchant insights,
/// and wrap everything in a success envelope
fn finish(
    source_kind: &str,
    meta: AccountMetadata,
    mut transactions: Vec<Transaction>,
    skipped: usize,
) -> AnalysisResponse {
    for txn in &mut transactions {
        txn.confidence_score = score_transaction(txn);
    }

    let summary = summarize(&transactions);
    let insights = aggregate_merchants(&transactions);

    info!(
        parsed = transactions.len(),
        skipped,
        overall = summary.overall_score,
        "{source_kind} analysis complete"
    );

    AnalysisResponse::success(
        format!("{} transactions parsed from {}", transactions.len(), source_kind),
        AnalysisResult {
            account_info: Some(meta),
            transactions: Some(transactions),
            confidence_summary: Some(summary),
            merchant_insights: Some(insights),
            error: None,
        },
    )
}

/// Analyze a tabular (CSV/spreadsheet) source.
///
/// The whole source is rejected when the date or narration column cannot
/// be resolved, or when no credit/debit/amount column exists.
pub fn analyze_tabular(source: &TabularSource) -> AnalysisResponse {
    let roles = ColumnRoles::resolve_tabular(&source.columns);
    if !roles.has_required_tabular() {
        warn!(
            date = roles.date.as_deref(),
            narration = roles.narration.as_deref(),
            "missing critical columns for transaction parsing"
        );
        return AnalysisResponse::from_error(
            AnalysisError::Validation(MISSING_COLUMNS_MESSAGE.to_string()),
            "Excel/CSV",
        );
    }

    let mut transactions = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in source.records.iter().enumerate() {
        match assemble_row(record, &roles) {
            RowOutcome::Assembled(txn) => transactions.push(txn),
            RowOutcome::Skipped(reason) => {
                debug!(row = index, ?reason, "skipping row");
                skipped += 1;
            }
        }
    }

    let meta = extract_tabular_metadata(source, &roles);
    finish("Excel/CSV", meta, transactions, skipped)
}

/// Analyze a document source (page texts + extracted tables).
///
/// Tables resolve roles individually; a table is skipped only when both
/// the date/narration pair and every amount column are missing. A
/// document with no tables at all is a validation failure that still
/// carries text-derived metadata.
pub fn analyze_document(source: &DocumentSource) -> AnalysisResponse {
    if source.tables.is_empty() {
        warn!("no tables extracted from document");
        let meta = extract_metadata_from_text(&source.text_blob());
        return AnalysisResponse::bad_request_with_metadata(NO_TABLES_MESSAGE, meta);
    }

    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for (table_idx, table) in source.tables.iter().enumerate() {
        let columns = table.columns();
        let roles = ColumnRoles::resolve_document(&columns);

        let required_resolved = roles.date.is_some() && roles.narration.is_some();
        if !required_resolved && !roles.has_amount_signal() {
            warn!(table = table_idx, "skipping table due to missing critical columns");
            continue;
        }

        for (index, record) in table.records().iter().enumerate() {
            match assemble_row(record, &roles) {
                RowOutcome::Assembled(txn) => transactions.push(txn),
                RowOutcome::Skipped(reason) => {
                    debug!(table = table_idx, row = index, ?reason, "skipping row");
                    skipped += 1;
                }
            }
        }
    }

    let meta = extract_metadata_from_text(&source.text_blob());
    finish("PDF", meta, transactions, skipped)
}

/// Read and analyze a tabular statement file, mapping reader failures to
/// an internal-error envelope
pub fn analyze_tabular_file(path: impl AsRef<Path>) -> AnalysisResponse {
    match ledgerlens_ingest::load_tabular(path.as_ref()) {
        Ok(source) => analyze_tabular(&source),
        Err(err) => AnalysisResponse::from_error(
            AnalysisError::Unexpected(format!("{err:#}")),
            "Excel/CSV",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_ingest::types::RawTable;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_unresolvable_source_is_bad_request() {
        let source = TabularSource::from_grid(grid(&[
            &["foo", "bar"],
            &["1", "2"],
        ]));
        let resp = analyze_tabular(&source);
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.success, 0);
        assert!(resp.result.transactions.is_none());
    }

    #[test]
    fn test_document_without_tables_keeps_metadata() {
        let source = DocumentSource {
            pages: vec!["HDFC BANK LTD IFSC: HDFC0001234".to_string()],
            tables: vec![],
        };
        let resp = analyze_document(&source);
        assert_eq!(resp.status_code, 400);
        let meta = resp.result.account_info.expect("metadata should survive");
        assert_eq!(meta.ifsc_code.as_deref(), Some("HDFC0001234"));
        assert_eq!(resp.result.transactions, Some(vec![]));
    }

    #[test]
    fn test_document_table_skipped_without_any_columns() {
        let usable = RawTable {
            header: vec!["Date".into(), "Particulars".into(), "Amount".into()],
            rows: vec![vec!["01/02/2025".into(), "NEFT TRANSFER".into(), "100".into()]],
        };
        let junk = RawTable {
            header: vec!["foo".into(), "bar".into()],
            rows: vec![vec!["x".into(), "y".into()]],
        };
        let source = DocumentSource {
            pages: vec![String::new()],
            tables: vec![junk, usable],
        };
        let resp = analyze_document(&source);
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.result.transactions.unwrap().len(), 1);
    }

    #[test]
    fn test_emission_preserves_row_order() {
        let source = TabularSource::from_grid(grid(&[
            &["Date", "Narration", "Debit", "Credit"],
            &["03/02/2025", "THIRD ROW FIRST", "10", ""],
            &["01/02/2025", "SECOND ROW", "", "20"],
            &["02/02/2025", "LAST ROW", "30", ""],
        ]));
        let resp = analyze_tabular(&source);
        let txns = resp.result.transactions.unwrap();
        assert_eq!(txns[0].narration, "THIRD ROW FIRST");
        assert_eq!(txns[1].narration, "SECOND ROW");
        assert_eq!(txns[2].narration, "LAST ROW");
    }

    #[test]
    fn test_summary_counts_match_transactions() {
        let source = TabularSource::from_grid(grid(&[
            &["Date", "Narration", "Amount"],
            &["01/02/2025", "UPI/A@B/X/HDFC/123456789012", "100"],
            &["02/02/2025", "TOTAL", "n/a"], // skipped: no amount
            &["03/02/2025", "NEFT IN", "-50"],
        ]));
        let resp = analyze_tabular(&source);
        let txns = resp.result.transactions.as_ref().unwrap();
        let summary = resp.result.confidence_summary.as_ref().unwrap();
        assert_eq!(summary.total_transactions, txns.len());
        assert!(summary.high_confidence_txns <= summary.total_transactions);
        assert_eq!(txns.len(), 2);
    }
}
