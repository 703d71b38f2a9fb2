//! Scanned-report discovery.
//!
//! The report share is organized as `<root>/<year>/<case folder>/…`, where
//! the case folder starts with the Blutbuch number. Candidate enumeration
//! (a plain filesystem walk) is separated from the matching rules so the
//! rules are testable on bare path lists.

use crate::error::{NephroError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub path: PathBuf,
    /// Case folder directly below the year folder.
    pub subfolder: String,
    pub file_name: String,
    /// Parsed from the case folder name.
    pub blutbuch_nummer: String,
}

/// All PDF files below the year folders of the share root.
pub fn collect_candidates(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(NephroError::FolderNotFound(root.display().to_string()));
    }

    lazy_static::lazy_static! {
        static ref YEAR_RE: Regex = Regex::new(r"^20\d{2}$").unwrap();
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).into_iter().filter_map(|e| e.ok()) {
        let year_name = entry.file_name().to_string_lossy();
        if !entry.path().is_dir() || !YEAR_RE.is_match(&year_name) {
            continue;
        }
        for file in WalkDir::new(entry.path()).into_iter().filter_map(|e| e.ok()) {
            let path = file.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
            {
                candidates.push(path.to_path_buf());
            }
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Keep real report files and derive their patient id. Rules:
/// the file name must mention "Befund", routing slips ("Laufzettel") and
/// anything filed under a "Falscher …" folder are skipped, and files lying
/// directly in a year folder have no case folder to take an id from.
pub fn match_reports(candidates: &[PathBuf], root: &Path) -> Vec<ReportFile> {
    let mut reports = Vec::new();
    for path in candidates {
        let Ok(relative) = path.strip_prefix(root) else { continue };
        // Skip the year component; the case folder comes after it.
        let mut components = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string());
        let _year = components.next();
        let Some(subfolder) = components.next() else { continue };
        let Some(file_name) = components.last().or_else(|| {
            path.file_name().map(|n| n.to_string_lossy().to_string())
        }) else {
            continue;
        };
        if subfolder == file_name {
            // PDF directly below the year folder, no case folder.
            continue;
        }

        if relative.to_string_lossy().contains("Falscher") {
            continue;
        }
        let lower = file_name.to_lowercase();
        if !lower.contains("befund") || lower.contains("laufzettel") {
            continue;
        }

        reports.push(ReportFile {
            path: path.clone(),
            blutbuch_nummer: parse_blutbuch_nummer(&subfolder),
            subfolder,
            file_name,
        });
    }
    reports
}

pub fn scan_reports(root: &Path) -> Result<Vec<ReportFile>> {
    let candidates = collect_candidates(root)?;
    Ok(match_reports(&candidates, root))
}

/// The case folder is "<Blutbuch number><separator><free text>"; everything
/// from the first underscore, pipe or space on is dropped.
pub fn parse_blutbuch_nummer(subfolder: &str) -> String {
    subfolder
        .split(|c: char| c == '_' || c == '|' || c.is_whitespace())
        .next()
        .unwrap_or(subfolder)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn test_parse_blutbuch_nummer() {
        assert_eq!(parse_blutbuch_nummer("10024_Mustermann"), "10024");
        assert_eq!(parse_blutbuch_nummer("10024 Mustermann"), "10024");
        assert_eq!(parse_blutbuch_nummer("10024|alt"), "10024");
        assert_eq!(parse_blutbuch_nummer("10024"), "10024");
    }

    #[test]
    fn test_match_reports_rules() {
        let root = Path::new("/share/Nephro");
        let candidates = vec![
            PathBuf::from("/share/Nephro/2022/10024_Mustermann/Befund_10024.pdf"),
            PathBuf::from("/share/Nephro/2022/10024_Mustermann/Laufzettel_Befund.pdf"),
            PathBuf::from("/share/Nephro/2022/10025 Meier/befund final.pdf"),
            PathBuf::from("/share/Nephro/2022/10026_Schulz/Anschreiben.pdf"),
            PathBuf::from("/share/Nephro/2023/Falscher Ordner/Befund_999.pdf"),
            PathBuf::from("/share/Nephro/2023/loose_Befund.pdf"),
        ];

        let reports = match_reports(&candidates, root);
        let ids: Vec<&str> = reports.iter().map(|r| r.blutbuch_nummer.as_str()).collect();
        assert_eq!(ids, vec!["10024", "10025"]);
        assert_eq!(reports[0].file_name, "Befund_10024.pdf");
    }

    #[test]
    fn test_collect_candidates_year_folders_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2022/10024_Mustermann")).unwrap();
        fs::create_dir_all(root.join("Archiv/10099_Alt")).unwrap();
        File::create(root.join("2022/10024_Mustermann/Befund_10024.pdf")).unwrap();
        File::create(root.join("2022/10024_Mustermann/notizen.txt")).unwrap();
        File::create(root.join("Archiv/10099_Alt/Befund_10099.pdf")).unwrap();

        let candidates = collect_candidates(root).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].ends_with("2022/10024_Mustermann/Befund_10024.pdf"));
    }

    #[test]
    fn test_scan_reports_missing_root() {
        assert!(scan_reports(Path::new("/nonexistent/share")).is_err());
    }

    #[test]
    fn test_scan_reports_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2023/10031_Beispiel")).unwrap();
        File::create(root.join("2023/10031_Beispiel/Befund_v2.pdf")).unwrap();

        let reports = scan_reports(root).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].blutbuch_nummer, "10031");
        assert_eq!(reports[0].subfolder, "10031_Beispiel");
    }
}
