//! File readers producing the unlabeled grid a `TabularSource` is built
//! from. The supported-extension decision lives with the caller; readers
//! only know how to turn their own format into rows of text cells.

pub mod csv_source;
pub mod spreadsheet;

use std::path::Path;

use anyhow::{Result, bail};

use crate::types::TabularSource;

/// Read a tabular statement file (.csv/.xlsx/.xls) into a source with a
/// detected header
pub fn load_tabular(path: impl AsRef<Path>) -> Result<TabularSource> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let grid = match ext.as_str() {
        "csv" => csv_source::read_grid(path)?,
        "xlsx" | "xls" => spreadsheet::read_grid(path)?,
        other => bail!("no tabular reader for extension '{other}'"),
    };

    Ok(TabularSource::from_grid(grid))
}
