//! Output writing (CSV / Excel).

pub mod csv;
pub mod excel;

use crate::error::Result;
use crate::table::Table;
use std::path::{Path, PathBuf};

/// Output format selected on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unbekanntes Format: {}. Erlaubt: xlsx, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// `<dir>/<prefix>.<stamp>.<ext>` — the stamp keeps successive runs from
/// overwriting each other.
pub fn output_path(dir: &Path, prefix: &str, stamp: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}.{}", prefix, stamp, extension))
}

/// Write the table in the selected format.
pub fn write_table(table: &Table, format: OutputFormat, path: &Path, na_rep: &str) -> Result<()> {
    match format {
        OutputFormat::Xlsx => excel::write_xlsx(table, path, na_rep),
        OutputFormat::Csv => csv::write_csv(table, path, na_rep),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("excel".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_path() {
        let path = output_path(
            Path::new("results"),
            "nierenfaelle_long_table",
            "2026-08-06_12-00-00",
            "csv",
        );
        assert_eq!(
            path,
            PathBuf::from("results/nierenfaelle_long_table.2026-08-06_12-00-00.csv")
        );
    }
}
