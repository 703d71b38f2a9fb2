//! Pipeline configuration.
//!
//! Everything an operator may need to adjust without a code change lives
//! here: file locations, the column mapping with alternate header
//! spellings, and every recode rule table. The compiled-in defaults are the
//! production tables; a config file only has to name the input spreadsheet
//! and whatever it wants to override.

use crate::error::{NephroError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub file_paths: FilePaths,

    /// Canonical columns in output order, each with the accepted raw
    /// header spellings.
    #[serde(default = "default_column_mapping")]
    pub column_mapping: Vec<ColumnSpec>,

    /// Columns that carry reported-variant information. A row with none of
    /// them populated is a "no finding yet" row.
    #[serde(default = "default_genetic_columns")]
    pub genetic_columns: Vec<String>,

    #[serde(default)]
    pub recode: RecodeTables,

    #[serde(default)]
    pub cohort: CohortRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePaths {
    /// Main tracking spreadsheet. Required.
    pub input_excel_file: PathBuf,

    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    #[serde(default = "default_output_prefix")]
    pub output_filename_prefix: String,

    /// Curated referrer lookup (adds the Standort column). Optional.
    #[serde(default)]
    pub einsender_lookup_file: Option<PathBuf>,

    /// Curated sub-panel replacement lookup. Optional.
    #[serde(default)]
    pub sub_panel_lookup_file: Option<PathBuf>,

    /// Root of the scanned-report share (year folders below). Required for
    /// the transfer subcommand only.
    #[serde(default)]
    pub reports_root: Option<PathBuf>,

    /// Destination folder for copied reports. Required for transfer only.
    #[serde(default)]
    pub transfer_destination: Option<PathBuf>,
}

/// One canonical column: the preferred raw header plus accepted alternates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub source: String,
    pub rename: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl ColumnSpec {
    fn new(source: &str, rename: &str, alternatives: &[&str]) -> Self {
        Self {
            source: source.to_string(),
            rename: rename.to_string(),
            alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecodeTables {
    /// Tokens meaning "checked" in the data-transfer column.
    #[serde(default = "default_datatransfer_yes")]
    pub datatransfer_yes: Vec<String>,

    #[serde(default = "default_befunder_aliases")]
    pub befunder_aliases: HashMap<String, String>,

    #[serde(default = "default_einsender_aliases")]
    pub einsender_aliases: HashMap<String, String>,

    /// Gene symbol cleanup. Mapping to the empty string clears the value.
    #[serde(default = "default_gen_aliases")]
    pub gen_aliases: HashMap<String, String>,

    #[serde(default)]
    pub outcome: OutcomeRules,

    #[serde(default = "default_klassifizierung_mapping")]
    pub klassifizierung_mapping: Vec<ClassMapping>,

    /// Fallback rules for rows without a classification, evaluated in
    /// order; the first match wins.
    #[serde(default = "default_special_variant_rules")]
    pub special_variant_rules: Vec<VariantRule>,
}

impl Default for RecodeTables {
    fn default() -> Self {
        Self {
            datatransfer_yes: default_datatransfer_yes(),
            befunder_aliases: default_befunder_aliases(),
            einsender_aliases: default_einsender_aliases(),
            gen_aliases: default_gen_aliases(),
            outcome: OutcomeRules::default(),
            klassifizierung_mapping: default_klassifizierung_mapping(),
            special_variant_rules: default_special_variant_rules(),
        }
    }
}

/// Substring patterns for the derived outcome, case-sensitive.
/// The misspellings are real values from the remark column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRules {
    #[serde(default = "default_negative_patterns")]
    pub negative_patterns: Vec<String>,
    #[serde(default = "default_positive_patterns")]
    pub positive_patterns: Vec<String>,
}

impl Default for OutcomeRules {
    fn default() -> Self {
        Self {
            negative_patterns: default_negative_patterns(),
            positive_patterns: default_positive_patterns(),
        }
    }
}

/// Many-to-one classification folding: every input value maps to the one
/// output tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMapping {
    pub output_value: String,
    pub input_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRule {
    #[serde(flatten)]
    pub condition: VariantCondition,
    pub output_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum VariantCondition {
    MissingKlassifizierungAndCdnaEquals { cdna_value: String },
    MissingKlassifizierungAndCdnaIn { cdna_values: Vec<String> },
    MissingKlassifizierungAndGenEquals { gen_value: String },
}

/// Fixed predicates selecting the reporting cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortRules {
    #[serde(default = "default_panel")]
    pub panel: String,
    #[serde(default = "default_einsender_contains")]
    pub einsender_contains: String,
    #[serde(default = "default_standort_excludes")]
    pub standort_excludes: String,
    /// Earliest intake date (ISO) eligible for report transfer.
    #[serde(default = "default_min_eingang")]
    pub min_eingang: String,
}

impl Default for CohortRules {
    fn default() -> Self {
        Self {
            panel: default_panel(),
            einsender_contains: default_einsender_contains(),
            standort_excludes: default_standort_excludes(),
            min_eingang: default_min_eingang(),
        }
    }
}

impl Config {
    /// Load from a JSON file. A missing or malformed file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NephroError::Config(format!(
                "Konfigurationsdatei nicht gefunden: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| NephroError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Source root and destination for the transfer subcommand; both are
    /// required there.
    pub fn transfer_paths(&self) -> Result<(&Path, &Path)> {
        let root = self.file_paths.reports_root.as_deref().ok_or_else(|| {
            NephroError::Config("file_paths.reports_root fehlt (für transfer erforderlich)".into())
        })?;
        let dest = self.file_paths.transfer_destination.as_deref().ok_or_else(|| {
            NephroError::Config(
                "file_paths.transfer_destination fehlt (für transfer erforderlich)".into(),
            )
        })?;
        Ok((root, dest))
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("results")
}

fn default_output_prefix() -> String {
    "nierenfaelle_long_table".to_string()
}

fn default_column_mapping() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Geburtsjahr", "Geburtsjahr", &[]),
        ColumnSpec::new("Eingang/Freigabe", "Eingang", &["Eingang"]),
        ColumnSpec::new("Geschlecht", "Geschlecht", &[]),
        ColumnSpec::new("einsender", "Einsender", &["Einsender"]),
        ColumnSpec::new("Blutbuch-Nummer", "Blutbuch_nummer", &["Blutbuch Nummer"]),
        ColumnSpec::new("Index-Nummer", "Index_nummer", &["Index Nummer"]),
        ColumnSpec::new("AF-Nummer (MEDAT)", "AF_nummer", &["AF-Nummer"]),
        ColumnSpec::new("Panel / Segregation", "Panel_oder_segregation", &["Panel/Segregation"]),
        ColumnSpec::new("Sub-Panel", "Sub_panel", &["Sub Panel"]),
        ColumnSpec::new("Klinik", "Klinik", &[]),
        ColumnSpec::new("Befunddatum", "Befunddatum", &[]),
        ColumnSpec::new(
            "Datenübertragung ans CUBI gewünscht und korrekt ausgefüllt, Datum der Übermittelung wenn erledigt !",
            "Datatransfer",
            &["Datenübertragung ans CUBI"],
        ),
        ColumnSpec::new("Befunder", "Befunder", &[]),
        ColumnSpec::new("Bemerkung", "Bemerkung", &[]),
        // "Gen...17" is what a spreadsheet reader makes of a duplicated
        // "Gen" header; both spellings occur in exports.
        ColumnSpec::new("Gen...17", "Gen", &["Gen"]),
        ColumnSpec::new("cDNA", "cDNA", &[]),
        ColumnSpec::new("Protein...19", "Protein", &["Protein"]),
        ColumnSpec::new("Klassifizierung", "Klassifizierung", &[]),
    ]
}

fn default_genetic_columns() -> Vec<String> {
    ["Gen", "cDNA", "Protein", "Klassifizierung"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_datatransfer_yes() -> Vec<String> {
    vec!["X".to_string(), "x".to_string()]
}

fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn default_befunder_aliases() -> HashMap<String, String> {
    string_map(&[
        ("Johannes", "Grünhagen"),
        ("Johannes/Angela", "Grünhagen"),
        ("Grünhagen ablegen validieren", "Grünhagen"),
        ("in Arbeit Grünhagen", "Grünhagen"),
        ("Privat KVA erstellt am 13.12", "Grünhagen"),
        ("Grünhangen", "Grünhagen"),
        ("Angela/ Johannes", "Abad"),
        ("Angela/Johannes", "Abad"),
        ("Angela", "Abad"),
        ("Abad/Grünhagen", "Abad"),
        ("Privat KVA erstellt am 13.12.", "Abad"),
    ])
}

fn default_einsender_aliases() -> HashMap<String, String> {
    string_map(&[
        ("Bachmann", "Bachmann Charité"),
        ("Bachmann / Weber / Seelow", "Bachmann Charité"),
        ("Canaan-Kühl", "Canaan-Kühl Charité"),
        ("Grün Charité MVZ, gehört zum Cerkid", "Grün Charité"),
        ("Hawkins", "Hawkins Charité"),
        ("Liefeldt Charite", "Liefeldt Charité"),
        ("Rehfeldt Charié", "Rehfeldt Charité"),
        ("Schreiber Charié", "Schreiber Charité"),
        ("Schreiber", "Schreiber Charité"),
        ("Ulrike Weber", "Weber Charité"),
        ("Weber", "Weber Charité"),
        ("Ulrike Weber AGZ Charité", "Weber Charité"),
        ("Zöllner MVZ der Charité", "Zöllner Charité"),
        ("ZukunftCharité", "Zukunft Charité"),
        ("Berns Charité Station 32i", "Berns Charité"),
        ("Sima Charité", "Canaan-Kühl Charité"),
        ("Otto Charité", "Grün (ehem. Otto) Charité"),
    ])
}

fn default_gen_aliases() -> HashMap<String, String> {
    string_map(&[
        ("CCDC41(CEP83)", "CEP83"),
        ("CFHR1 CFHR3 homozygote Deletion", "CFHR1"),
        ("CFHR1 und CFHR3", "CFHR1"),
        ("Deletion homozygot", "CFHR1"),
        ("HBA1/HBA2 Cluster Deletion berichtet", "HBA1"),
        ("MT-ND5 (nicht bestätigt!)", "MT-ND5"),
        ("negativ", ""),
        ("SCNN1G [Ex2]", "SCNN1G"),
    ])
}

fn default_negative_patterns() -> Vec<String> {
    vec!["negativ".to_string(), "neagiv".to_string(), "neagtiv".to_string()]
}

fn default_positive_patterns() -> Vec<String> {
    vec!["positiv".to_string(), "Deletion COL4A4".to_string()]
}

fn default_klassifizierung_mapping() -> Vec<ClassMapping> {
    let tier = |output: &str, inputs: &[&str]| ClassMapping {
        output_value: output.to_string(),
        input_values: inputs.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        tier("Risk factor", &["Klasse II (Risiko-Poly)", "Klasse II, Risk Factor"]),
        tier(
            "VUS",
            &[
                "Klasse III",
                "Klasse III-IV",
                "Klasse III (heiß)",
                "Klasse III (kalt)",
                "Klasse III funct. Poly",
                "Klasse IIII",
                "Klasse III-II",
            ],
        ),
        tier("Likely pathogenic", &["Klasse IV", "Klasse IV - V", "Klasse IV - V?", "KlasseIV"]),
        tier("Pathogenic", &["Klasse V"]),
    ]
}

fn default_special_variant_rules() -> Vec<VariantRule> {
    vec![
        VariantRule {
            condition: VariantCondition::MissingKlassifizierungAndCdnaEquals {
                cdna_value: "c.4523-1G>A".to_string(),
            },
            output_value: "Likely pathogenic".to_string(),
        },
        VariantRule {
            condition: VariantCondition::MissingKlassifizierungAndCdnaIn {
                cdna_values: vec!["CFHR1 und CFHR3".to_string(), "c.9661dup".to_string()],
            },
            output_value: "Risk factor".to_string(),
        },
        VariantRule {
            condition: VariantCondition::MissingKlassifizierungAndCdnaEquals {
                cdna_value: "c.110A>C".to_string(),
            },
            output_value: "VUS".to_string(),
        },
        VariantRule {
            condition: VariantCondition::MissingKlassifizierungAndGenEquals {
                gen_value: "HBA1/HBA2 Cluster Deletion berichtet".to_string(),
            },
            output_value: "VUS".to_string(),
        },
        VariantRule {
            condition: VariantCondition::MissingKlassifizierungAndCdnaEquals {
                cdna_value: "c.647C>T hom".to_string(),
            },
            output_value: "Likely pathogenic".to_string(),
        },
    ]
}

fn default_panel() -> String {
    "Exom/Nephro".to_string()
}

fn default_einsender_contains() -> String {
    "Charité".to_string()
}

fn default_standort_excludes() -> String {
    "Other".to_string()
}

fn default_min_eingang() -> String {
    "2022-01-01".to_string()
}
