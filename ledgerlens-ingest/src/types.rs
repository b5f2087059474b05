//! Raw source types handed to the analysis pipelines.
//!
//! A tabular source owns its unlabeled grid plus the labeled records
//! derived from the detected header row. A document source is the output
//! of an external extraction facility: page texts and raw tables, taken
//! as given.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::{clean_column_name, detect_header_row};

/// One input row as a mapping from (cleaned) column label to cell text.
/// Transient: discarded after assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    cells: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(cells: HashMap<String, String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells.get(label).map(String::as_str)
    }

    /// Cell for an optionally-resolved column role; an unresolved role or
    /// an absent cell both read as no value
    pub fn get_role(&self, role: Option<&String>) -> Option<&str> {
        role.and_then(|label| self.get(label))
    }
}

fn rows_to_records(columns: &[String], rows: &[Vec<String>]) -> Vec<RawRecord> {
    rows.iter()
        .map(|row| {
            let cells = columns
                .iter()
                .enumerate()
                .filter(|(_, label)| !label.is_empty())
                .map(|(i, label)| {
                    (
                        label.clone(),
                        row.get(i).map(|c| c.trim().to_string()).unwrap_or_default(),
                    )
                })
                .collect();
            RawRecord::new(cells)
        })
        .collect()
}

/// Header-candidate region scanned for account metadata
const METADATA_ROW_LIMIT: usize = 30;

/// A CSV/spreadsheet source after header detection
#[derive(Debug, Clone, Default)]
pub struct TabularSource {
    /// The full unlabeled grid as read from the file
    pub raw_rows: Vec<Vec<String>>,
    /// Index of the detected header row
    pub header_row: usize,
    /// Cleaned column labels from the header row
    pub columns: Vec<String>,
    /// Labeled data rows below the header, in input order
    pub records: Vec<RawRecord>,
}

impl TabularSource {
    /// Detect the header inside the raw grid and label every row below it.
    /// Columns with empty header cells are dropped.
    pub fn from_grid(raw_rows: Vec<Vec<String>>) -> Self {
        let header_row = detect_header_row(&raw_rows, 20);
        let columns: Vec<String> = raw_rows
            .get(header_row)
            .map(|row| row.iter().map(|c| clean_column_name(c)).collect())
            .unwrap_or_default();
        let data_start = (header_row + 1).min(raw_rows.len());
        let records = rows_to_records(&columns, &raw_rows[data_start..]);

        Self {
            raw_rows,
            header_row,
            columns,
            records,
        }
    }

    /// First rows of the raw grid flattened into a metadata text blob
    pub fn metadata_blob(&self) -> String {
        self.raw_rows
            .iter()
            .take(METADATA_ROW_LIMIT)
            .flat_map(|row| row.iter())
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One raw table from a document: a header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cleaned column labels for this table
    pub fn columns(&self) -> Vec<String> {
        self.header.iter().map(|c| clean_column_name(c)).collect()
    }

    /// Labeled records for this table's data rows
    pub fn records(&self) -> Vec<RawRecord> {
        rows_to_records(&self.columns(), &self.rows)
    }
}

/// A document source: ordered page texts plus the tables an external
/// extraction facility recovered from them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSource {
    pub pages: Vec<String>,
    pub tables: Vec<RawTable>,
}

impl DocumentSource {
    /// All page texts joined for document-wide metadata extraction
    pub fn text_blob(&self) -> String {
        self.pages.join("\n")
    }
}
