//! In-memory string table.
//!
//! The whole pipeline works on one tabular value: named columns, rows of
//! optional text cells. Everything is read as text so identifiers never get
//! coerced into numbers. `None` is true-missing; the literal null tokens a
//! spreadsheet export produces are normalized to `None` in
//! [`Table::clean_whitespace`].

use std::collections::{HashMap, HashSet};

pub type Cell = Option<String>;

/// Literal tokens that mean "no value" in exported spreadsheet cells.
const NULL_TOKENS: &[&str] = &["", "nan", "NaN", "null", "NULL"];

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Index of a named column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append a row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|c| c.as_deref())
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(r) = self.rows.get_mut(row) {
            if let Some(c) = r.get_mut(col) {
                *c = value;
            }
        }
    }

    /// Add a column on the right, one value per existing row.
    pub fn add_column(&mut self, name: &str, values: Vec<Cell>) {
        self.headers.push(name.to_string());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(values.get(i).cloned().flatten());
        }
    }

    /// Trim every cell and normalize null-like tokens to true-missing.
    pub fn clean_whitespace(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if let Some(v) = cell.take() {
                    let trimmed = v.trim();
                    if !NULL_TOKENS.contains(&trimmed) {
                        *cell = Some(trimmed.to_string());
                    }
                }
            }
        }
    }

    /// Propagate the nearest non-missing value downward through row order.
    /// Running it twice is the same as running it once.
    pub fn forward_fill(&mut self, col: usize) {
        let mut last: Cell = None;
        for row in &mut self.rows {
            match &row[col] {
                Some(v) => last = Some(v.clone()),
                None => row[col] = last.clone(),
            }
        }
    }

    /// Forward-fill every column. The tracking sheet leaves a cell blank to
    /// mean "same as the row above", across the board.
    pub fn forward_fill_all(&mut self) {
        for col in 0..self.headers.len() {
            self.forward_fill(col);
        }
    }

    /// Fill missing target cells with the first non-missing value seen for
    /// the same key anywhere in the table. Used where a secondary identifier
    /// is recorded on only one of a patient's rows.
    pub fn fill_within_group(&mut self, key_col: usize, target_col: usize) {
        let mut seen: HashMap<String, String> = HashMap::new();
        for row in &self.rows {
            if let (Some(key), Some(val)) = (&row[key_col], &row[target_col]) {
                seen.entry(key.clone()).or_insert_with(|| val.clone());
            }
        }
        for row in &mut self.rows {
            if row[target_col].is_none() {
                if let Some(key) = &row[key_col] {
                    row[target_col] = seen.get(key).cloned();
                }
            }
        }
    }

    /// Left join: append the lookup's non-key columns, matched by exact key
    /// equality. Unmatched keys leave missing cells on the right side.
    pub fn left_join(&mut self, lookup: &Table, key: &str) {
        let (Some(own_key), Some(other_key)) = (self.column(key), lookup.column(key)) else {
            return;
        };

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, row) in lookup.rows.iter().enumerate() {
            if let Some(k) = row[other_key].as_deref() {
                index.entry(k).or_insert(i);
            }
        }

        let extra_cols: Vec<usize> = (0..lookup.headers.len()).filter(|&c| c != other_key).collect();
        for &c in &extra_cols {
            self.headers.push(lookup.headers[c].clone());
        }
        for row in &mut self.rows {
            let matched = row[own_key].as_deref().and_then(|k| index.get(k)).copied();
            for &c in &extra_cols {
                row.push(matched.and_then(|i| lookup.rows[i][c].clone()));
            }
        }
    }

    /// Remove a column, if present.
    pub fn drop_column(&mut self, name: &str) {
        if let Some(col) = self.column(name) {
            self.headers.remove(col);
            for row in &mut self.rows {
                row.remove(col);
            }
        }
    }

    /// Keep only rows satisfying the predicate; order is preserved.
    pub fn retain<F: FnMut(&[Cell]) -> bool>(&mut self, mut predicate: F) {
        self.rows.retain(|row| predicate(row));
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    pub fn dedup_rows(&mut self) {
        let mut seen: HashSet<Vec<Cell>> = HashSet::new();
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Project to the named columns, in the given order.
    /// Unknown names are skipped.
    pub fn project(&self, names: &[&str]) -> Table {
        let indices: Vec<usize> = names.iter().filter_map(|n| self.column(n)).collect();
        let headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Table { headers, rows }
    }

    /// Distinct values of a column, in first-seen order.
    pub fn unique_values(&self, col: usize) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if let Some(v) = row[col].as_deref() {
                if seen.insert(v.to_string()) {
                    out.push(v.to_string());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    fn sample_table() -> Table {
        let mut t = Table::new(vec!["id".into(), "panel".into()]);
        t.push_row(cells(&["100", "Exom"]));
        t.push_row(cells(&["", "Exom"]));
        t.push_row(cells(&["200", ""]));
        t.push_row(cells(&["", ""]));
        t
    }

    #[test]
    fn test_forward_fill() {
        let mut t = sample_table();
        t.forward_fill(0);
        assert_eq!(t.cell(1, 0), Some("100"));
        assert_eq!(t.cell(3, 0), Some("200"));
    }

    #[test]
    fn test_forward_fill_idempotent() {
        let mut once = sample_table();
        once.forward_fill(0);
        let mut twice = once.clone();
        twice.forward_fill(0);
        assert_eq!(once.rows(), twice.rows());
    }

    #[test]
    fn test_forward_fill_leading_missing_stays_missing() {
        let mut t = Table::new(vec!["id".into()]);
        t.push_row(cells(&[""]));
        t.push_row(cells(&["100"]));
        t.forward_fill(0);
        assert_eq!(t.cell(0, 0), None);
        assert_eq!(t.cell(1, 0), Some("100"));
    }

    #[test]
    fn test_clean_whitespace_and_sentinels() {
        let mut t = Table::new(vec!["a".into()]);
        t.push_row(vec![Some("  x  ".into())]);
        t.push_row(vec![Some("nan".into())]);
        t.push_row(vec![Some("NULL".into())]);
        t.push_row(vec![Some("   ".into())]);
        t.clean_whitespace();
        assert_eq!(t.cell(0, 0), Some("x"));
        assert_eq!(t.cell(1, 0), None);
        assert_eq!(t.cell(2, 0), None);
        assert_eq!(t.cell(3, 0), None);
    }

    #[test]
    fn test_fill_within_group() {
        let mut t = Table::new(vec!["id".into(), "af".into()]);
        t.push_row(cells(&["100", ""]));
        t.push_row(cells(&["100", "AF-1"]));
        t.push_row(cells(&["200", ""]));
        t.fill_within_group(0, 1);
        assert_eq!(t.cell(0, 1), Some("AF-1"));
        assert_eq!(t.cell(2, 1), None);
    }

    #[test]
    fn test_left_join_unmatched_stays_missing() {
        let mut t = Table::new(vec!["Einsender".into()]);
        t.push_row(cells(&["Weber Charité"]));
        t.push_row(cells(&["Extern"]));

        let mut lookup = Table::new(vec!["Einsender".into(), "Standort".into()]);
        lookup.push_row(cells(&["Weber Charité", "Mitte"]));

        t.left_join(&lookup, "Einsender");
        assert_eq!(t.headers(), &["Einsender".to_string(), "Standort".to_string()]);
        assert_eq!(t.cell(0, 1), Some("Mitte"));
        assert_eq!(t.cell(1, 1), None);
    }

    #[test]
    fn test_dedup_rows_keeps_first() {
        let mut t = Table::new(vec!["a".into()]);
        t.push_row(cells(&["x"]));
        t.push_row(cells(&["y"]));
        t.push_row(cells(&["x"]));
        t.dedup_rows();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.cell(0, 0), Some("x"));
        assert_eq!(t.cell(1, 0), Some("y"));
    }

    #[test]
    fn test_unique_values_first_seen_order() {
        let mut t = Table::new(vec!["a".into()]);
        t.push_row(cells(&["Nephro"]));
        t.push_row(cells(&["Cardio"]));
        t.push_row(cells(&["Nephro"]));
        assert_eq!(t.unique_values(0), vec!["Nephro".to_string(), "Cardio".to_string()]);
    }
}
