//! External table/text extraction facility for PDF statements.
//!
//! Shells out to `pdftotext -layout` and recovers lined-up tables from
//! the page text. The analysis engine treats the resulting pages and
//! tables as given input; everything here is best-effort plumbing.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

use ledgerlens_ingest::types::{DocumentSource, RawTable};

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Minimum cells for a line to be considered a table header
const MIN_TABLE_COLUMNS: usize = 3;

fn split_columns(line: &str) -> Vec<String> {
    COLUMN_GAP
        .split(line.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recover one table from a page of layout-preserved text: the first
/// line splitting into 3+ columns is the header, and every following
/// line with the same column count is a data row.
fn table_from_page(page: &str) -> Option<RawTable> {
    let split_lines: Vec<Vec<String>> = page.lines().map(split_columns).collect();
    let header_idx = split_lines
        .iter()
        .position(|cells| cells.len() >= MIN_TABLE_COLUMNS)?;
    let width = split_lines[header_idx].len();

    let rows: Vec<Vec<String>> = split_lines[header_idx + 1..]
        .iter()
        .filter(|cells| cells.len() == width)
        .cloned()
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(RawTable {
        header: split_lines[header_idx].clone(),
        rows,
    })
}

/// Run `pdftotext -layout <file> -` and capture stdout
fn run_pdftotext(path: &Path) -> Result<String> {
    which::which("pdftotext")
        .map_err(|_| anyhow::anyhow!("pdftotext not installed (poppler-utils)"))?;

    let file = path
        .to_str()
        .with_context(|| format!("invalid file path: {}", path.display()))?;

    let output = Command::new("pdftotext")
        .args(["-layout", file, "-"])
        .output()
        .context("failed to run pdftotext")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        );
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    if text.trim().is_empty() {
        bail!("PDF appears scanned or image-only, text extraction failed");
    }

    Ok(text)
}

/// Extract page texts and tables from a PDF statement
pub fn extract_document(path: &Path) -> Result<DocumentSource> {
    let text = run_pdftotext(path)?;

    let pages: Vec<String> = text
        .split('\u{c}')
        .filter(|page| !page.trim().is_empty())
        .map(str::to_string)
        .collect();

    let tables: Vec<RawTable> = pages.iter().filter_map(|page| table_from_page(page)).collect();

    Ok(DocumentSource { pages, tables })
}
