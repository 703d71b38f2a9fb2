//! Cohort selection and per-patient aggregation.

use crate::config::CohortRules;
use crate::recode::outcome;
use crate::table::{Cell, Table};
use std::collections::HashMap;

/// Separator for the unique-join reductions.
pub const JOIN_SEPARATOR: &str = " | ";

/// Per-column reduction applied within a patient group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    /// Lexicographic maximum; ISO date strings make this "latest".
    Max,
    /// Distinct non-missing values in first-seen order, joined.
    JoinUnique,
}

/// Aggregated columns in output order. Absent columns are skipped.
const AGGREGATIONS: &[(&str, Reduction)] = &[
    ("Einsender", Reduction::JoinUnique),
    ("Eingang", Reduction::Max),
    ("Sub_panel", Reduction::JoinUnique),
    ("Standort", Reduction::JoinUnique),
    ("Datatransfer", Reduction::JoinUnique),
    ("Befunder", Reduction::JoinUnique),
    ("Gen", Reduction::JoinUnique),
    ("Outcome", Reduction::Max),
    ("Klassifizierung", Reduction::JoinUnique),
];

/// Keep the reporting cohort: requested panel, referrer from the
/// configured site, site column not excluded (vacuously true when the
/// lookup didn't contribute one), and a settled outcome.
pub fn filter_cohort(table: &mut Table, rules: &CohortRules) {
    let panel = table.column("Panel_oder_segregation");
    let einsender = table.column("Einsender");
    let standort = table.column("Standort");
    let outcome_col = table.column("Outcome");

    table.retain(|row| {
        if let Some(c) = panel {
            if row[c].as_deref() != Some(rules.panel.as_str()) {
                return false;
            }
        }
        if let Some(c) = einsender {
            let matched = row[c]
                .as_deref()
                .is_some_and(|v| v.contains(rules.einsender_contains.as_str()));
            if !matched {
                return false;
            }
        }
        if let Some(c) = standort {
            if row[c]
                .as_deref()
                .is_some_and(|v| v.contains(rules.standort_excludes.as_str()))
            {
                return false;
            }
        }
        if let Some(c) = outcome_col {
            if row[c].as_deref() == Some(outcome::IN_PROCESS) {
                return false;
            }
        }
        true
    });
}

/// One row per (sex, patient id), reductions per [`AGGREGATIONS`], plus the
/// derived single/multiple panels flag. Group order follows first
/// appearance in the input, so identical input gives identical output.
pub fn summarize_by_patient(table: &Table) -> Table {
    let sex = table.column("Geschlecht");
    let id = table.column("Blutbuch_nummer");

    let present: Vec<(&str, usize, Reduction)> = AGGREGATIONS
        .iter()
        .filter_map(|&(name, reduction)| table.column(name).map(|c| (name, c, reduction)))
        .collect();

    let mut headers = vec!["Geschlecht".to_string(), "Blutbuch_nummer".to_string()];
    headers.extend(present.iter().map(|(name, _, _)| name.to_string()));

    // Group rows by key, first-seen order.
    let mut order: Vec<(Cell, Cell)> = Vec::new();
    let mut groups: HashMap<(Cell, Cell), Vec<usize>> = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        let key = (
            sex.and_then(|c| row[c].clone()),
            id.and_then(|c| row[c].clone()),
        );
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            })
            .push(i);
    }

    let mut out = Table::new(headers);
    for key in order {
        let members = &groups[&key];
        let mut row: Vec<Cell> = vec![key.0.clone(), key.1.clone()];
        for &(_, col, reduction) in &present {
            row.push(reduce(table, members, col, reduction));
        }
        out.push_row(row);
    }

    add_panel_flags(&mut out);
    out
}

fn reduce(table: &Table, members: &[usize], col: usize, reduction: Reduction) -> Cell {
    match reduction {
        Reduction::Max => members
            .iter()
            .filter_map(|&i| table.cell(i, col))
            .max()
            .map(|v| v.to_string()),
        Reduction::JoinUnique => {
            let mut seen = std::collections::HashSet::new();
            let mut values = Vec::new();
            for &i in members {
                if let Some(v) = table.cell(i, col) {
                    if seen.insert(v) {
                        values.push(v);
                    }
                }
            }
            if values.is_empty() {
                None
            } else {
                Some(values.join(JOIN_SEPARATOR))
            }
        }
    }
}

/// Panel count = joined sub-panel entries; more than one means the patient
/// had several panels requested.
fn add_panel_flags(summary: &mut Table) {
    let sub_panel = summary.column("Sub_panel");
    let mut counts: Vec<Cell> = Vec::with_capacity(summary.n_rows());
    let mut flags: Vec<Cell> = Vec::with_capacity(summary.n_rows());
    for i in 0..summary.n_rows() {
        let count = match sub_panel.and_then(|c| summary.cell(i, c)) {
            Some(joined) => joined.matches(JOIN_SEPARATOR).count() + 1,
            None => 1,
        };
        counts.push(Some(count.to_string()));
        flags.push(Some(if count > 1 { "multiple" } else { "single" }.to_string()));
    }
    summary.add_column("Panels_requested_count", counts);
    summary.add_column("Panels_requested", flags);
}

/// Patient ids whose latest intake date is on or after the threshold.
/// ISO strings compare as dates.
pub fn eligible_patients(summary: &Table, min_eingang: &str) -> Vec<String> {
    let id = summary.column("Blutbuch_nummer");
    let eingang = summary.column("Eingang");
    let mut out = Vec::new();
    for i in 0..summary.n_rows() {
        let recent = eingang
            .and_then(|c| summary.cell(i, c))
            .is_some_and(|d| d >= min_eingang);
        if recent {
            if let Some(patient) = id.and_then(|c| summary.cell(i, c)) {
                out.push(patient.to_string());
            }
        }
    }
    out
}
