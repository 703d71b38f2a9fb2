//! Canonical column selection.
//!
//! The source spreadsheet is maintained by hand and header spellings have
//! drifted over the years. Each canonical column declares the accepted raw
//! spellings; the first one present wins. Missing optional columns are
//! reported, a missing patient identifier aborts the run.

use crate::config::ColumnSpec;
use crate::error::{NephroError, Result};
use crate::table::Table;

/// The one column the pipeline cannot work without.
pub const IDENTIFIER_COLUMN: &str = "Blutbuch_nummer";

/// Outcome of the header matching, for step reporting.
pub struct Selection {
    pub table: Table,
    /// (raw header actually used, canonical name) pairs.
    pub used: Vec<(String, String)>,
    /// Canonical names with no acceptable raw header in the file.
    pub missing: Vec<String>,
}

/// Project the raw table onto the canonical columns. Row order and count
/// are preserved; only the column axis changes.
pub fn select_columns(raw: &Table, specs: &[ColumnSpec]) -> Result<Selection> {
    let mut used = Vec::new();
    let mut missing = Vec::new();
    let mut indices = Vec::new();
    let mut headers = Vec::new();

    for spec in specs {
        let candidates = std::iter::once(spec.source.as_str())
            .chain(spec.alternatives.iter().map(|s| s.as_str()));
        match candidates.into_iter().find_map(|name| raw.column(name).map(|i| (name, i))) {
            Some((name, idx)) => {
                used.push((name.to_string(), spec.rename.clone()));
                indices.push(idx);
                headers.push(spec.rename.clone());
            }
            None => missing.push(spec.rename.clone()),
        }
    }

    if headers.is_empty() {
        return Err(NephroError::NoColumnsFound);
    }

    let mut table = Table::new(headers);
    for row in raw.rows() {
        table.push_row(indices.iter().map(|&i| row[i].clone()).collect());
    }

    Ok(Selection { table, used, missing })
}

/// The patient identifier column is mandatory; everything else degrades
/// gracefully.
pub fn require_identifier(table: &Table) -> Result<usize> {
    table
        .column(IDENTIFIER_COLUMN)
        .ok_or_else(|| NephroError::MissingColumn(IDENTIFIER_COLUMN.to_string()))
}

/// Build the long table: every row with reported-variant information, plus
/// exactly one representative row for each patient that has none — a
/// patient without a finding yet must still appear.
pub fn keep_informative_rows(table: &Table, genetic_columns: &[String], id_col: usize) -> Table {
    let genetic_idx: Vec<usize> =
        genetic_columns.iter().filter_map(|name| table.column(name)).collect();

    if genetic_idx.is_empty() {
        return table.clone();
    }

    let has_genetics =
        |row: &[crate::table::Cell]| genetic_idx.iter().any(|&i| row[i].is_some());

    let mut patients_with_genetics = std::collections::HashSet::new();
    for row in table.rows() {
        if has_genetics(row) {
            if let Some(id) = row[id_col].as_deref() {
                patients_with_genetics.insert(id.to_string());
            }
        }
    }

    let mut out = Table::new(table.headers().to_vec());
    let mut represented = std::collections::HashSet::new();
    for row in table.rows() {
        if has_genetics(row) {
            out.push_row(row.clone());
        } else if let Some(id) = row[id_col].as_deref() {
            // First row of a no-finding patient stands in for them.
            if !patients_with_genetics.contains(id) && represented.insert(id.to_string()) {
                out.push_row(row.clone());
            }
        }
    }
    out
}
