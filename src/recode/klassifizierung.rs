//! Variant classification tiers.
//!
//! Folds the free-form "Klasse …" spellings into the fixed taxonomy
//! {Risk factor, VUS, Likely pathogenic, Pathogenic}. Rows without a
//! classification fall back to variant-specific rules keyed on the cDNA or
//! gene column; rules apply in declaration order, first match wins.

use crate::config::{ClassMapping, VariantCondition, VariantRule};

pub fn recode(
    klassifizierung: Option<&str>,
    cdna: Option<&str>,
    gen: Option<&str>,
    mapping: &[ClassMapping],
    rules: &[VariantRule],
) -> Option<String> {
    if let Some(k) = klassifizierung {
        for tier in mapping {
            if tier.input_values.iter().any(|v| v == k) {
                return Some(tier.output_value.clone());
            }
        }
        // Unknown spellings are forwarded unchanged.
        return Some(k.to_string());
    }

    for rule in rules {
        let matched = match &rule.condition {
            VariantCondition::MissingKlassifizierungAndCdnaEquals { cdna_value } => {
                cdna == Some(cdna_value.as_str())
            }
            VariantCondition::MissingKlassifizierungAndCdnaIn { cdna_values } => {
                cdna.is_some_and(|c| cdna_values.iter().any(|v| v == c))
            }
            VariantCondition::MissingKlassifizierungAndGenEquals { gen_value } => {
                gen == Some(gen_value.as_str())
            }
        };
        if matched {
            return Some(rule.output_value.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecodeTables;

    fn recode_default(
        klassifizierung: Option<&str>,
        cdna: Option<&str>,
        gen: Option<&str>,
    ) -> Option<String> {
        let tables = RecodeTables::default();
        recode(
            klassifizierung,
            cdna,
            gen,
            &tables.klassifizierung_mapping,
            &tables.special_variant_rules,
        )
    }

    #[test]
    fn test_klasse_v_always_pathogenic() {
        assert_eq!(
            recode_default(Some("Klasse V"), Some("c.110A>C"), Some("COL4A5")),
            Some("Pathogenic".to_string())
        );
        assert_eq!(recode_default(Some("Klasse V"), None, None), Some("Pathogenic".to_string()));
    }

    #[test]
    fn test_klasse_iii_spellings_fold_to_vus() {
        for spelling in ["Klasse III", "Klasse III (heiß)", "Klasse IIII", "Klasse III-II"] {
            assert_eq!(recode_default(Some(spelling), None, None), Some("VUS".to_string()));
        }
    }

    #[test]
    fn test_missing_class_cdna_rule() {
        assert_eq!(
            recode_default(None, Some("c.4523-1G>A"), None),
            Some("Likely pathogenic".to_string())
        );
        assert_eq!(recode_default(None, Some("c.9661dup"), None), Some("Risk factor".to_string()));
        assert_eq!(recode_default(None, Some("c.110A>C"), None), Some("VUS".to_string()));
    }

    #[test]
    fn test_missing_class_gen_rule() {
        assert_eq!(
            recode_default(None, None, Some("HBA1/HBA2 Cluster Deletion berichtet")),
            Some("VUS".to_string())
        );
    }

    #[test]
    fn test_unknown_spelling_passes_through() {
        assert_eq!(
            recode_default(Some("Klasse ?"), None, None),
            Some("Klasse ?".to_string())
        );
    }

    #[test]
    fn test_no_match_stays_missing() {
        assert_eq!(recode_default(None, Some("c.999X>Y"), None), None);
    }
}
