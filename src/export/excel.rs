//! Excel output via rust_xlsxwriter.

use crate::error::Result;
use crate::table::Table;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub fn write_xlsx(table: &Table, path: &Path, na_rep: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet.write_string((r + 1) as u32, c as u16, cell.as_deref().unwrap_or(na_rep))?;
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(vec!["Blutbuch_nummer".into(), "Gen".into()]);
        table.push_row(vec![Some("10024".into()), Some("COL4A5".into())]);
        table.push_row(vec![Some("10025".into()), None]);

        write_xlsx(&table, &path, "").unwrap();
        assert!(path.exists());

        let back = loader::load_worksheet(&path).unwrap();
        assert_eq!(back.headers(), table.headers());
        assert_eq!(back.cell(0, 1), Some("COL4A5"));
        assert_eq!(back.cell(1, 1), None);
    }

    #[test]
    fn test_empty_table_writes_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        let table = Table::new(vec!["Blutbuch_nummer".into()]);
        write_xlsx(&table, &path, "").unwrap();

        let back = loader::load_worksheet(&path).unwrap();
        assert_eq!(back.n_rows(), 0);
        assert_eq!(back.headers(), &["Blutbuch_nummer".to_string()]);
    }
}
