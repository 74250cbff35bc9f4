// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// dhlabel-document — Label processing for DHLabel.
//
// Reads carrier label PDFs, classifies them by page count, extracts the
// recipient and tracking number, packs the label regions onto A4 sheets and
// appends the shipment report.

pub mod compose;
pub mod consolidate;
pub mod label;
pub mod pdf;
pub mod report;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export the primary entry points so callers can use `dhlabel_document::consolidate` etc.
pub use compose::{DomesticSlot, PageCompositor};
pub use consolidate::{
    FileFailure, NoProgress, ProgressReporter, RunOptions, RunSummary, consolidate,
    discover_labels, exclude_output,
};
pub use pdf::output::OutputDocument;
pub use pdf::reader::LabelDocument;
pub use pdf::writer::OutputWriter;
pub use report::ReportSink;
