//! Report transfer.
//!
//! One blocking copy per matched report, in order. A failed copy is
//! recorded and skipped — the destination just lacks that file, the rest
//! of the batch is unaffected. No retries.

use crate::scanner::ReportFile;
use crate::table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

pub struct TransferOutcome {
    pub copied: usize,
    pub failed: usize,
    /// One row per report: path and whether the copy succeeded.
    pub results: Vec<(ReportFile, bool)>,
}

pub fn transfer_reports(reports: &[ReportFile], destination: &Path) -> TransferOutcome {
    if let Err(e) = std::fs::create_dir_all(destination) {
        println!("⚠ Zielordner nicht anlegbar: {} ({})", destination.display(), e);
    }

    let pb = ProgressBar::new(reports.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut outcome = TransferOutcome { copied: 0, failed: 0, results: Vec::new() };
    for report in reports {
        pb.set_message(report.file_name.clone());
        let target = destination.join(&report.file_name);
        let ok = match std::fs::copy(&report.path, &target) {
            Ok(_) => true,
            Err(e) => {
                pb.println(format!("⚠ Kopieren fehlgeschlagen: {} ({})", report.path.display(), e));
                false
            }
        };
        if ok {
            outcome.copied += 1;
        } else {
            outcome.failed += 1;
        }
        outcome.results.push((report.clone(), ok));
        pb.inc(1);
    }
    pb.finish_and_clear();
    outcome
}

/// Per-patient transfer summary: all copied paths and their success flags
/// joined with "; ", stamped with the transfer date.
pub fn summarize_transfers(results: &[(ReportFile, bool)], date: &str) -> Table {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: std::collections::HashMap<String, Vec<&(ReportFile, bool)>> =
        std::collections::HashMap::new();
    for entry in results {
        let id = entry.0.blutbuch_nummer.clone();
        grouped
            .entry(id.clone())
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(entry);
    }

    let mut table = Table::new(vec![
        "Blutbuch_nummer".to_string(),
        "value".to_string(),
        "transfered".to_string(),
        "date_transfered".to_string(),
    ]);
    for id in order {
        let entries = &grouped[&id];
        let paths: Vec<String> =
            entries.iter().map(|(r, _)| r.path.display().to_string()).collect();
        let flags: Vec<String> = entries.iter().map(|(_, ok)| ok.to_string()).collect();
        table.push_row(vec![
            Some(id),
            Some(paths.join("; ")),
            Some(flags.join("; ")),
            Some(date.to_string()),
        ]);
    }
    table
}
