//! CSV output.

use crate::error::Result;
use crate::table::Table;
use csv::Writer;
use std::path::Path;

pub fn write_csv(table: &Table, path: &Path, na_rep: &str) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or(na_rep)))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_with_na_rep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = Table::new(vec!["Blutbuch_nummer".into(), "transfered".into()]);
        table.push_row(vec![Some("10024".into()), Some("true".into())]);
        table.push_row(vec![Some("10025".into()), None]);

        write_csv(&table, &path, "NULL").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Blutbuch_nummer,transfered");
        assert_eq!(lines[1], "10024,true");
        assert_eq!(lines[2], "10025,NULL");
    }

    #[test]
    fn test_write_csv_quotes_embedded_separators() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        let mut table = Table::new(vec!["Bemerkung".into()]);
        table.push_row(vec![Some("negativ, erneut kontrolliert".into())]);

        write_csv(&table, &path, "").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"negativ, erneut kontrolliert\""));
    }
}
