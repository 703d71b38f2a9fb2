//! Column-local recoding.
//!
//! Each vocabulary column gets its own rule table (see
//! [`crate::config::RecodeTables`]); rules never look beyond the row they
//! are applied to, so application order over rows does not matter. Unknown
//! values pass through unchanged — the tracking spreadsheet grows new
//! spellings faster than the tables do, and dropping them would lose data.

pub mod klassifizierung;
pub mod outcome;

use crate::config::RecodeTables;
use crate::error::Result;
use crate::table::Table;
use outcome::OutcomeClassifier;
use std::collections::HashMap;

/// Result of a dictionary recode: either the canonical value, or the input
/// handed back untouched. Callers that only want the value use
/// [`Recoded::into_value`]; tests can tell a deliberate identity mapping
/// from a plain miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recoded {
    Mapped(String),
    Unmapped(String),
}

impl Recoded {
    pub fn into_value(self) -> String {
        match self {
            Recoded::Mapped(v) | Recoded::Unmapped(v) => v,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Recoded::Mapped(_))
    }
}

/// Exact-match alias lookup.
pub fn recode_alias(value: &str, aliases: &HashMap<String, String>) -> Recoded {
    match aliases.get(value) {
        Some(canonical) => Recoded::Mapped(canonical.clone()),
        None => Recoded::Unmapped(value.to_string()),
    }
}

/// Binary checkbox column: a known "checked" token means yes, everything
/// else — including missing — means no.
pub fn recode_flag(value: Option<&str>, yes_values: &[String]) -> &'static str {
    match value {
        Some(v) if yes_values.iter().any(|y| y == v) => "yes",
        _ => "no",
    }
}

/// Apply the full recode pass the way the reporting pipeline needs it:
/// transfer flag, physician and referrer aliases, the derived outcome
/// column, the classification tiers, and last the gene cleanup (the
/// outcome rule reads the gene column as reported, so the cleanup must not
/// run before it).
pub fn apply_all(table: &mut Table, tables: &RecodeTables) -> Result<()> {
    if let Some(col) = table.column("Datatransfer") {
        for row in 0..table.n_rows() {
            let recoded = recode_flag(table.cell(row, col), &tables.datatransfer_yes);
            table.set(row, col, Some(recoded.to_string()));
        }
    }

    apply_alias_column(table, "Befunder", &tables.befunder_aliases);
    apply_alias_column(table, "Einsender", &tables.einsender_aliases);

    let classifier = OutcomeClassifier::new(&tables.outcome)?;
    let bemerkung = table.column("Bemerkung");
    let gen = table.column("Gen");
    let outcomes: Vec<Option<String>> = (0..table.n_rows())
        .map(|row| {
            let remark = bemerkung.and_then(|c| table.cell(row, c));
            let gene = gen.and_then(|c| table.cell(row, c));
            Some(classifier.derive(remark, gene))
        })
        .collect();
    table.add_column("Outcome", outcomes);

    if let Some(col) = table.column("Klassifizierung") {
        let cdna = table.column("cDNA");
        for row in 0..table.n_rows() {
            let recoded = klassifizierung::recode(
                table.cell(row, col),
                cdna.and_then(|c| table.cell(row, c)),
                gen.and_then(|c| table.cell(row, c)),
                &tables.klassifizierung_mapping,
                &tables.special_variant_rules,
            );
            table.set(row, col, recoded);
        }
    }

    apply_alias_column(table, "Gen", &tables.gen_aliases);

    Ok(())
}

/// Alias-recode a whole column in place. A canonical value of "" clears
/// the cell to missing.
pub fn apply_alias_column(table: &mut Table, name: &str, aliases: &HashMap<String, String>) {
    let Some(col) = table.column(name) else { return };
    for row in 0..table.n_rows() {
        if let Some(value) = table.cell(row, col) {
            let recoded = recode_alias(value, aliases).into_value();
            table.set(row, col, if recoded.is_empty() { None } else { Some(recoded) });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recode_flag() {
        let yes = vec!["X".to_string(), "x".to_string()];
        assert_eq!(recode_flag(Some("X"), &yes), "yes");
        assert_eq!(recode_flag(Some("x"), &yes), "yes");
        assert_eq!(recode_flag(Some("ja"), &yes), "no");
        assert_eq!(recode_flag(None, &yes), "no");
    }

    #[test]
    fn test_recode_alias_total() {
        let aliases: HashMap<String, String> =
            [("Weber".to_string(), "Weber Charité".to_string())].into();
        assert_eq!(
            recode_alias("Weber", &aliases),
            Recoded::Mapped("Weber Charité".to_string())
        );
        // Unknown input is forwarded, not dropped.
        assert_eq!(
            recode_alias("Niemand", &aliases),
            Recoded::Unmapped("Niemand".to_string())
        );
    }

    #[test]
    fn test_apply_alias_column_clears_empty_mapping() {
        let mut table = Table::new(vec!["Gen".into()]);
        table.push_row(vec![Some("negativ".into())]);
        table.push_row(vec![Some("COL4A5".into())]);

        let aliases: HashMap<String, String> = [("negativ".to_string(), String::new())].into();
        apply_alias_column(&mut table, "Gen", &aliases);
        assert_eq!(table.cell(0, 0), None);
        assert_eq!(table.cell(1, 0), Some("COL4A5"));
    }

    #[test]
    fn test_apply_all_order() {
        // The gene cleanup maps "negativ" away, but the outcome for that
        // row must still see the reported value.
        let mut table = Table::new(vec!["Bemerkung".into(), "Gen".into()]);
        table.push_row(vec![None, Some("negativ".into())]);

        let tables = RecodeTables::default();
        apply_all(&mut table, &tables).unwrap();

        let outcome_col = table.column("Outcome").unwrap();
        assert_eq!(table.cell(0, outcome_col), Some("positiv"));
        assert_eq!(table.cell(0, 1), None);
    }
}
