//! Fehlerfälle über die Crate-Grenze hinweg.

use nephro_reports_rust::config::Config;
use nephro_reports_rust::error::NephroError;
use nephro_reports_rust::{loader, scanner};
use std::path::Path;
use tempfile::tempdir;

/// Fehlende Übersicht ist ein harter Fehler.
#[test]
fn test_load_missing_worksheet() {
    let result = loader::load_worksheet(Path::new("/nonexistent/uebersicht.xlsx"));
    assert!(matches!(result, Err(NephroError::FileNotFound(_))));
}

/// Fehlende Konfigurationsdatei ist ein harter Fehler.
#[test]
fn test_load_missing_config() {
    let result = Config::load(Path::new("/nonexistent/config.json"));
    let err = result.unwrap_err();
    assert!(matches!(err, NephroError::Config(_)));
    assert!(format!("{}", err).contains("config.json"));
}

/// Kaputtes JSON in der Konfiguration ist ein harter Fehler.
#[test]
fn test_load_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ invalid").unwrap();

    let result = Config::load(&path);
    assert!(matches!(result, Err(NephroError::Config(_))));
}

/// Fehlender Befund-Ordner meldet den Pfad.
#[test]
fn test_scan_nonexistent_root() {
    let result = scanner::scan_reports(Path::new("/nonexistent/befunde"));
    let err = result.unwrap_err();
    assert!(matches!(err, NephroError::FolderNotFound(_)));
    assert!(format!("{}", err).contains("/nonexistent/befunde"));
}

/// Leerer Ordner ist kein Fehler, nur leer.
#[test]
fn test_scan_empty_root() {
    let dir = tempdir().unwrap();
    let result = scanner::scan_reports(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// Alle Fehlervarianten haben eine nicht-leere Meldung.
#[test]
fn test_error_display() {
    let errors = vec![
        NephroError::Config("Testfehler".to_string()),
        NephroError::FileNotFound("uebersicht.xlsx".to_string()),
        NephroError::FolderNotFound("/pfad/zu/befunden".to_string()),
        NephroError::ExcelLoad("kaputtes Blatt".to_string()),
        NephroError::MissingColumn("Blutbuch_nummer".to_string()),
        NephroError::NoColumnsFound,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "leere Fehlermeldung: {:?}", err);
    }
}

/// IO-Fehler werden durchgereicht.
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: NephroError = io_err.into();
    assert!(matches!(err, NephroError::Io(_)));
}

/// JSON-Fehler werden durchgereicht.
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: NephroError = json_err.into();
    assert!(matches!(err, NephroError::JsonParse(_)));
}
