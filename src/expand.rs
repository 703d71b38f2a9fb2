//! Semicolon row expansion.
//!
//! A cell like "COL4A3; COL4A4" records two findings in one row. Expansion
//! splits every delimited cell of a row and replicates the row once per
//! split position, aligning values positionally across the delimited
//! columns. A column with fewer values than the row's widest cell repeats
//! its last value; columns without the delimiter are copied into every
//! replica. Column order never changes.

use crate::table::{Cell, Table};

const DELIMITER: char = ';';

pub fn expand_delimited_rows(table: &Table) -> Table {
    let mut out = Table::new(table.headers().to_vec());

    for row in table.rows() {
        // Split values per column, only for cells actually containing the
        // delimiter (after dropping empty fragments).
        let mut splits: Vec<Option<Vec<String>>> = Vec::with_capacity(row.len());
        let mut max_splits = 1;
        for cell in row {
            let split = cell.as_deref().filter(|v| v.contains(DELIMITER)).map(|v| {
                v.split(DELIMITER)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            });
            match split {
                Some(parts) if !parts.is_empty() => {
                    max_splits = max_splits.max(parts.len());
                    splits.push(Some(parts));
                }
                // ";" alone carries no values; treat as not delimited.
                _ => splits.push(None),
            }
        }

        if splits.iter().all(Option::is_none) {
            out.push_row(row.clone());
            continue;
        }

        for position in 0..max_splits {
            let replica: Vec<Cell> = row
                .iter()
                .zip(&splits)
                .map(|(cell, split)| match split {
                    Some(parts) => {
                        // Past the end, repeat the column's own last value.
                        let idx = position.min(parts.len() - 1);
                        Some(parts[idx].clone())
                    }
                    None => cell.clone(),
                })
                .collect();
            out.push_row(replica);
        }
    }

    out.dedup_rows();
    out
}
