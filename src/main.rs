use chrono::Utc;
use clap::Parser;
use nephro_reports_rust::{cli, cohort, config, error, expand, export, loader, normalizer, recode, scanner, transfer};

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use export::OutputFormat;
use std::path::PathBuf;

/// File name prefix of the per-patient transfer log.
const TRANSFER_PREFIX: &str = "befund_transfer_summarized";

fn main() {
    let cli = Cli::parse();

    let result = Config::load(&cli.config).and_then(|config| match cli.command {
        Commands::Summarize { format, output } => run_summarize(&config, format, output),
        Commands::Transfer { output } => run_transfer(&config, output),
    });

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

/// Excel-only variant: canonical columns, forward fill, long table,
/// classification recode, semicolon expansion, timestamped output.
fn run_summarize(config: &Config, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    println!("🧬 nephro-reports - Übersicht zusammenfassen\n");

    println!("[1/6] Übersicht einlesen…");
    let raw = loader::load_worksheet(&config.file_paths.input_excel_file)?;
    println!("✔ {} Zeilen, {} Spalten eingelesen\n", raw.n_rows(), raw.headers().len());

    println!("[2/6] Spalten vereinheitlichen…");
    let selection = normalizer::select_columns(&raw, &config.column_mapping)?;
    let mut table = selection.table;
    for (raw_name, canonical) in &selection.used {
        if raw_name != canonical {
            println!("✔ '{}' übernommen als '{}'", raw_name, canonical);
        }
    }
    for name in &selection.missing {
        println!("⚠ Spalte fehlt: {}", name);
    }
    table.clean_whitespace();
    println!("✔ {} Spalten ausgewählt, Zellen bereinigt\n", table.headers().len());

    println!("[3/6] Auffüllen und Panel-Filter…");
    if let Some(panel_col) = table.column("Panel_oder_segregation") {
        table.forward_fill(panel_col);
        let before = table.n_rows();
        let panel = config.cohort.panel.clone();
        table.retain(|row| row[panel_col].as_deref() == Some(panel.as_str()));
        println!(
            "✔ Panel-Filter '{}': {} Zeilen entfernt, {} verbleiben",
            panel,
            before - table.n_rows(),
            table.n_rows()
        );
    } else {
        println!("⚠ Panel-Spalte fehlt, Filter entfällt");
    }

    let id_col = normalizer::require_identifier(&table)?;
    table.forward_fill(id_col);
    if let Some(af_col) = table.column("AF_nummer") {
        table.fill_within_group(id_col, af_col);
        println!("✔ Blutbuch-Nummer und AF-Nummer aufgefüllt\n");
    } else {
        println!("✔ Blutbuch-Nummer aufgefüllt (keine AF-Nummer-Spalte)\n");
    }

    println!("[4/6] Long-Table aufbauen…");
    let informative = normalizer::keep_informative_rows(&table, &config.genetic_columns, id_col);

    let mut columns: Vec<&str> = vec![normalizer::IDENTIFIER_COLUMN];
    if informative.column("AF_nummer").is_some() {
        columns.push("AF_nummer");
    }
    if informative.column("Panel_oder_segregation").is_some() {
        columns.push("Panel_oder_segregation");
    }
    columns.extend(
        config
            .genetic_columns
            .iter()
            .filter(|name| informative.column(name).is_some())
            .map(|name| name.as_str()),
    );
    let mut long_table = informative.project(&columns);
    long_table.dedup_rows();
    let id_col = normalizer::require_identifier(&long_table)?;
    println!(
        "✔ {} eindeutige Kombinationen, {} Patienten\n",
        long_table.n_rows(),
        long_table.unique_values(id_col).len()
    );

    println!("[5/6] Klassifizierung rekodieren und Zeilen aufspalten…");
    if let Some(klass_col) = long_table.column("Klassifizierung") {
        let cdna_col = long_table.column("cDNA");
        let gen_col = long_table.column("Gen");
        for row in 0..long_table.n_rows() {
            let recoded = recode::klassifizierung::recode(
                long_table.cell(row, klass_col),
                cdna_col.and_then(|c| long_table.cell(row, c)),
                gen_col.and_then(|c| long_table.cell(row, c)),
                &config.recode.klassifizierung_mapping,
                &config.recode.special_variant_rules,
            );
            long_table.set(row, klass_col, recoded);
        }
        long_table.dedup_rows();
    } else {
        println!("⚠ Klassifizierung-Spalte fehlt, Rekodierung entfällt");
    }

    let before = long_table.n_rows();
    let final_table = expand::expand_delimited_rows(&long_table);
    println!(
        "✔ Semikolon-Aufspaltung: {} → {} Zeilen\n",
        before,
        final_table.n_rows()
    );

    println!("[6/6] Ergebnis schreiben…");
    let output_dir = output.unwrap_or_else(|| config.file_paths.output_directory.clone());
    std::fs::create_dir_all(&output_dir)?;
    let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let path = export::output_path(
        &output_dir,
        &config.file_paths.output_filename_prefix,
        &stamp,
        format.extension(),
    );
    export::write_table(&final_table, format, &path, "")?;

    let id_col = normalizer::require_identifier(&final_table)?;
    println!("✔ Gespeichert: {}", path.display());
    println!(
        "\n✅ Fertig: {} Zeilen, {} Patienten, Format {}",
        final_table.n_rows(),
        final_table.unique_values(id_col).len(),
        format
    );
    Ok(())
}

/// Transfer variant: full recode and cohort pass, then the matched
/// Befund-PDFs are copied and the transfer is logged per patient.
fn run_transfer(config: &Config, output: Option<PathBuf>) -> Result<()> {
    println!("🧬 nephro-reports - Befund-Transfer\n");
    let (reports_root, destination) = config.transfer_paths()?;

    println!("[1/7] Befund-PDFs suchen unter {}…", reports_root.display());
    // A network share can be unreachable; the run continues and simply
    // transfers nothing, the summary still gets written.
    let reports = match scanner::scan_reports(reports_root) {
        Ok(reports) => reports,
        Err(e) => {
            println!("⚠ Befundordner nicht erreichbar ({}), fahre ohne Scans fort", e);
            Vec::new()
        }
    };
    println!("✔ {} Befund-Dateien gefunden\n", reports.len());

    println!("[2/7] Übersicht und Lookup-Tabellen einlesen…");
    let raw = loader::load_worksheet(&config.file_paths.input_excel_file)?;
    let einsender_lookup = match &config.file_paths.einsender_lookup_file {
        Some(path) => loader::load_lookup(path, "Einsender-Tabelle")?,
        None => None,
    };
    let sub_panel_lookup = match &config.file_paths.sub_panel_lookup_file {
        Some(path) => loader::load_lookup(path, "Sub-Panel-Tabelle")?,
        None => None,
    };
    println!("✔ {} Zeilen eingelesen\n", raw.n_rows());

    println!("[3/7] Spalten vereinheitlichen und auffüllen…");
    let mut raw = raw;
    raw.forward_fill_all();
    let selection = normalizer::select_columns(&raw, &config.column_mapping)?;
    let mut table = selection.table;
    for name in &selection.missing {
        println!("⚠ Spalte fehlt: {}", name);
    }
    table.clean_whitespace();
    normalizer::require_identifier(&table)?;
    println!("✔ {} Spalten ausgewählt\n", table.headers().len());

    println!("[4/7] Rekodieren…");
    recode::apply_all(&mut table, &config.recode)?;
    if let Some(lookup) = &einsender_lookup {
        let mut lookup = lookup.clone();
        lookup.clean_whitespace();
        table.left_join(&lookup, "Einsender");
    }
    if let Some(lookup) = &sub_panel_lookup {
        let mut lookup = lookup.clone();
        lookup.clean_whitespace();
        table.left_join(&lookup, "Sub_panel");
        apply_sub_panel_replacement(&mut table);
    }
    println!("✔ Rekodierung und Joins abgeschlossen\n");

    println!("[5/7] Kohorte filtern und zusammenfassen…");
    let before = table.n_rows();
    cohort::filter_cohort(&mut table, &config.cohort);
    let summary = cohort::summarize_by_patient(&table);
    let eligible: std::collections::HashSet<String> =
        cohort::eligible_patients(&summary, &config.cohort.min_eingang).into_iter().collect();
    println!(
        "✔ {} von {} Zeilen in der Kohorte, {} Patienten ab {}\n",
        table.n_rows(),
        before,
        eligible.len(),
        config.cohort.min_eingang
    );

    println!("[6/7] Befunde kopieren nach {}…", destination.display());
    let matched: Vec<scanner::ReportFile> = reports
        .into_iter()
        .filter(|r| eligible.contains(&r.blutbuch_nummer))
        .collect();
    let outcome = transfer::transfer_reports(&matched, destination);
    println!("✔ {} kopiert, {} fehlgeschlagen\n", outcome.copied, outcome.failed);

    println!("[7/7] Transfer-Zusammenfassung schreiben…");
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let summary_table = transfer::summarize_transfers(&outcome.results, &date);
    let output_dir = output.unwrap_or_else(|| config.file_paths.output_directory.clone());
    std::fs::create_dir_all(&output_dir)?;
    let path = export::output_path(&output_dir, TRANSFER_PREFIX, &date, "csv");
    export::write_table(&summary_table, OutputFormat::Csv, &path, "NULL")?;
    println!("✔ Gespeichert: {}", path.display());

    println!("\n✅ Fertig: {} Patienten protokolliert", summary_table.n_rows());
    Ok(())
}

/// The sub-panel lookup contributes a `replace` column: where it matched,
/// the replacement becomes the sub-panel label; unmatched rows keep their
/// original label.
fn apply_sub_panel_replacement(table: &mut nephro_reports_rust::table::Table) {
    let (Some(sub_panel), Some(replace)) = (table.column("Sub_panel"), table.column("replace"))
    else {
        return;
    };
    for row in 0..table.n_rows() {
        if let Some(replacement) = table.cell(row, replace) {
            let replacement = replacement.to_string();
            table.set(row, sub_panel, Some(replacement));
        }
    }
    table.drop_column("replace");
}
