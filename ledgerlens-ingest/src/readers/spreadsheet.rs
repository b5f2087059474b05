//! XLSX/XLS grid reader over calamine.
//!
//! Excel engines hand dates over as typed datetimes; those are rendered
//! as `YYYY-MM-DD HH:MM:SS` so the date normalizer's datetime branch
//! picks them up exactly like string cells.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Read the first worksheet as a plain row grid
pub fn read_grid(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no sheets: {}", path.display()))?
        .with_context(|| format!("reading first sheet of {}", path.display()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("UPI/X".into())), "UPI/X");
        assert_eq!(cell_to_string(&Data::Float(1500.0)), "1500");
        assert_eq!(cell_to_string(&Data::Float(99.5)), "99.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
    }
}
