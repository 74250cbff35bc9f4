// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain stdout progress for interactive runs.

use std::path::PathBuf;

use dhlabel_core::human_errors::humanize_error;
use dhlabel_core::types::{ShipmentCategory, ShipmentRecord};
use dhlabel_document::{FileFailure, ProgressReporter, RunSummary};

pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn files_found(&mut self, files: &[PathBuf]) {
        println!("Found {} PDF file(s):", files.len());
        print_files(files);
    }

    fn files_selected(&mut self, files: &[PathBuf]) {
        println!("Processing {} label(s):", files.len());
        print_files(files);
    }

    fn record(&mut self, _category: ShipmentCategory, record: &ShipmentRecord) {
        println!("{record}");
    }

    fn failure(&mut self, failure: &FileFailure) {
        println!("Skipped {}: {}", display_name(&failure.path), failure.error);
    }
}

fn print_files(files: &[PathBuf]) {
    for file in files {
        println!("  {}", display_name(file));
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Closing lines of a run.
pub fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    println!(
        "{} international, {} domestic label(s) read.",
        summary.international, summary.domestic
    );
    if let Some(pdf) = &summary.output_pdf {
        println!("Wrote {} page(s) to {}", summary.pages_written, pdf.display());
    }
    if let Some(csv) = &summary.output_csv {
        println!("Appended report rows to {}", csv.display());
    }
    if dry_run {
        println!("Dry run: nothing was written.");
    } else if summary.processed() == 0 {
        println!("No label could be read, so no PDF was written.");
    }

    if summary.is_clean() {
        println!("All files spliced");
        return;
    }

    println!("{} file(s) failed:", summary.failures.len());
    for failure in &summary.failures {
        let human = humanize_error(&failure.error);
        println!("  {}: {}", display_name(&failure.path), human.message);
        println!("    {}", human.suggestion);
    }
}
