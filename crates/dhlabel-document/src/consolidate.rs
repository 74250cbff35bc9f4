// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch consolidation — one run over an input directory.
//
// Order of work:
//   1. discover `*.pdf` files and drop the run's own output PDF
//   2. load and classify every file
//   3. international labels, in input order
//   4. domestic labels, in input order
//   5. write the consolidated PDF
//
// Per-label problems are collected as failures and the run continues;
// anything else aborts it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dhlabel_core::config::{LayoutConfig, RunConfig};
use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::{ShipmentCategory, ShipmentRecord};
use tracing::{debug, info, instrument, warn};

use crate::compose::PageCompositor;
use crate::label::{classify, read_shipment_record};
use crate::pdf::reader::LabelDocument;
use crate::pdf::writer::OutputWriter;
use crate::report::ReportSink;

/// A label that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: LabelError,
}

/// Receives progress events of a run.
///
/// Every method has an empty default so implementors pick what they show.
pub trait ProgressReporter {
    /// All PDFs found in the input directory.
    fn files_found(&mut self, _files: &[PathBuf]) {}
    /// The files left after excluding the run's own output.
    fn files_selected(&mut self, _files: &[PathBuf]) {}
    /// A label was placed and reported.
    fn record(&mut self, _category: ShipmentCategory, _record: &ShipmentRecord) {}
    /// A label was skipped.
    fn failure(&mut self, _failure: &FileFailure) {}
}

/// Reporter that ignores every event.
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Run-wide switches.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Date stamped onto customs pages.
    pub date: NaiveDate,
    /// Only classify and extract; write neither PDF nor CSV.
    pub dry_run: bool,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub international: usize,
    pub domestic: usize,
    pub failures: Vec<FileFailure>,
    pub pages_written: usize,
    /// Set when the consolidated PDF was written.
    pub output_pdf: Option<PathBuf>,
    /// Set when at least one report row was written.
    pub output_csv: Option<PathBuf>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.international + self.domestic
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// All `*.pdf` files (extension compared case-insensitively) directly inside
/// `dir`, sorted by file name.
pub fn discover_labels(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `files` without the output PDF of this run.
///
/// Paths are compared after canonicalisation when possible, so relative and
/// absolute spellings of the same file match.
pub fn exclude_output(files: &[PathBuf], output_pdf: &Path) -> Vec<PathBuf> {
    let canonical_output = std::fs::canonicalize(output_pdf).ok();
    files
        .iter()
        .filter(|file| {
            if file.as_path() == output_pdf {
                return false;
            }
            match (&canonical_output, std::fs::canonicalize(file)) {
                (Some(output), Ok(candidate)) => *output != candidate,
                _ => true,
            }
        })
        .cloned()
        .collect()
}

/// Run one consolidation.
#[instrument(skip_all, fields(input = %config.input_path.display(), output = %config.output_path.display()))]
pub fn consolidate(
    config: &RunConfig,
    layout: &LayoutConfig,
    options: &RunOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<RunSummary> {
    config.validate()?;

    let found = discover_labels(&config.input_path)?;
    if found.is_empty() {
        return Err(LabelError::NoInputFiles(config.input_path.clone()));
    }
    progress.files_found(&found);

    let output_pdf = config.output_pdf_path();
    let selected = exclude_output(&found, &output_pdf);
    if selected.is_empty() {
        return Err(LabelError::NoInputFiles(config.input_path.clone()));
    }
    progress.files_selected(&selected);
    info!(found = found.len(), selected = selected.len(), "input files collected");

    let mut summary = RunSummary::default();

    // Classification pass.
    let mut international = Vec::new();
    let mut domestic = Vec::new();
    for path in &selected {
        match LabelDocument::open(path) {
            Ok(label) => match classify(&label) {
                ShipmentCategory::International => international.push(label),
                ShipmentCategory::Domestic => domestic.push(label),
            },
            Err(error) => record_failure(&mut summary, progress, path, error)?,
        }
    }
    debug!(
        international = international.len(),
        domestic = domestic.len(),
        "labels classified"
    );

    let date_stamp = layout.format_date(options.date);
    let mut compositor = PageCompositor::new(layout, date_stamp);
    let report = ReportSink::new(config.output_csv_path());

    let batches = [
        (ShipmentCategory::International, &international),
        (ShipmentCategory::Domestic, &domestic),
    ];
    for (category, labels) in batches {
        for label in labels {
            let placed = read_shipment_record(label, category, layout).and_then(|record| {
                if !options.dry_run {
                    compositor.add(label, category)?;
                }
                Ok(record)
            });

            let record = match placed {
                Ok(record) => record,
                Err(error) => {
                    record_failure(&mut summary, progress, label.path(), error)?;
                    continue;
                }
            };

            if !options.dry_run {
                report.append(&record)?;
                summary.output_csv = Some(report.path().to_path_buf());
            }
            progress.record(category, &record);
            match category {
                ShipmentCategory::International => summary.international += 1,
                ShipmentCategory::Domestic => summary.domestic += 1,
            }
        }
    }

    if options.dry_run {
        info!(processed = summary.processed(), "dry run, nothing written");
        return Ok(summary);
    }

    if summary.processed() == 0 {
        warn!("no label could be processed, output PDF not written");
        return Ok(summary);
    }

    summary.pages_written = compositor.page_count();
    OutputWriter::write(compositor.into_output(), &output_pdf)?;
    summary.output_pdf = Some(output_pdf);

    info!(
        international = summary.international,
        domestic = summary.domestic,
        failures = summary.failures.len(),
        pages = summary.pages_written,
        "run complete"
    );
    Ok(summary)
}

/// Record a per-file error, or hand back any other error to abort the run.
fn record_failure(
    summary: &mut RunSummary,
    progress: &mut dyn ProgressReporter,
    path: &Path,
    error: LabelError,
) -> Result<()> {
    if !error.is_per_file() {
        return Err(error);
    }
    warn!(path = %path.display(), %error, "label skipped");
    let failure = FileFailure {
        path: path.to_path_buf(),
        error,
    };
    progress.failure(&failure);
    summary.failures.push(failure);
    Ok(())
}
