// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for DHLabel.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all DHLabel operations.
#[derive(Debug, Error)]
pub enum LabelError {
    // -- Run setup --
    #[error("{role} path is not an existing directory: {}", path.display())]
    InvalidDirectory { role: &'static str, path: PathBuf },

    #[error("no PDF files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    // -- Per-file label errors --
    #[error("cannot read {} as PDF: {reason}", path.display())]
    UnreadablePdf { path: PathBuf, reason: String },

    #[error("{} has {pages} pages, expected 1 (domestic) or 2 (international)", path.display())]
    UnsupportedPageCount { path: PathBuf, pages: usize },

    #[error("file name '{0}' does not follow <x>_<y>_<FirstName>_<LastName>.pdf")]
    MalformedFilename(String),

    #[error("tracking number marker '{marker}' not found in label text")]
    TrackingNumberNotFound { marker: String },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Output --
    #[error("cannot write {}: {reason}", path.display())]
    OutputWriteFailure { path: PathBuf, reason: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LabelError {
    /// Whether this error concerns a single label file.
    ///
    /// Per-file errors are collected and reported at the end of a run; every
    /// other error aborts the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnreadablePdf { .. }
                | Self::UnsupportedPageCount { .. }
                | Self::MalformedFilename(_)
                | Self::TrackingNumberNotFound { .. }
                | Self::PdfError(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelError>;
