use crate::export::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nephro-reports")]
#[command(about = "Nierenfälle-Übersicht aufbereiten und Befunde übertragen", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pfad zur Konfigurationsdatei
    #[arg(short, long, default_value = "config.json", global = true)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Übersicht einlesen, rekodieren und als Long-Table exportieren
    Summarize {
        /// Ausgabeformat (xlsx/csv)
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        /// Ausgabeordner (überschreibt die Konfiguration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Befund-PDFs der gefilterten Kohorte kopieren und protokollieren
    Transfer {
        /// Ausgabeordner für die Transfer-Zusammenfassung
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
