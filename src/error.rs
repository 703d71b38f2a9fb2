use thiserror::Error;

#[derive(Error, Debug)]
pub enum NephroError {
    #[error("Konfigurationsfehler: {0}")]
    Config(String),

    #[error("Datei nicht gefunden: {0}")]
    FileNotFound(String),

    #[error("Ordner nicht gefunden: {0}")]
    FolderNotFound(String),

    #[error("Excel-Datei konnte nicht gelesen werden: {0}")]
    ExcelLoad(String),

    #[error("Pflichtspalte fehlt: {0}")]
    MissingColumn(String),

    #[error("Keine der erwarteten Spalten gefunden")]
    NoColumnsFound,

    #[error("Excel-Ausgabefehler: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV-Ausgabefehler: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("JSON-Fehler: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NephroError>;
