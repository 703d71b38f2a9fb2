//! Spreadsheet ingestion.
//!
//! Reads the first worksheet of an XLSX file into a [`Table`], every cell
//! as text. Identifiers like "10024" must survive verbatim, so numeric
//! cells with an integral value are rendered without a decimal point and
//! date cells as ISO strings (which also makes the intake date sort
//! correctly as a string).

use crate::error::{NephroError, Result};
use crate::table::{Cell, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub fn load_worksheet(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(NephroError::FileNotFound(path.display().to_string()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| NephroError::ExcelLoad(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NephroError::ExcelLoad(format!("{}: kein Tabellenblatt", path.display())))?
        .map_err(|e| NephroError::ExcelLoad(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| cell_to_text(cell).unwrap_or_else(|| format!("column_{}", i)))
            .collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_text).collect());
    }
    Ok(table)
}

/// Load an auxiliary lookup table. A missing file is recoverable: warn and
/// continue without the join.
pub fn load_lookup(path: &Path, label: &str) -> Result<Option<Table>> {
    if !path.exists() {
        println!("⚠ {} nicht gefunden: {} (Join entfällt)", label, path.display());
        return Ok(None);
    }
    load_worksheet(path).map(Some)
}

fn cell_to_text(cell: &Data) -> Cell {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => {
                if naive.time() == chrono::NaiveTime::MIN {
                    naive.format("%Y-%m-%d").to_string()
                } else {
                    naive.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            None => return None,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
