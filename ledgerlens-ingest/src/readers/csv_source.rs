//! CSV grid reader.
//!
//! Statements frequently carry banner rows with fewer cells than the data
//! region, so the reader is flexible and headerless: header detection
//! happens downstream over the raw grid.

use std::path::Path;

use anyhow::{Context, Result};

/// Read every CSV row as a plain row of text cells
pub fn read_grid(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(rows)
}
