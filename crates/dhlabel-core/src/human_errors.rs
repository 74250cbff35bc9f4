// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the end-of-run summary.
//
// Every technical error is mapped to plain language with a clear suggestion.
// The severity decides whether the failure skipped one label or stopped the
// whole run.

use crate::error::LabelError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// One label was skipped; the rest of the batch was printed.
    Skipped,
    /// The user must fix something (path, file name, permissions) and rerun.
    ActionRequired,
    /// Nothing was produced.
    Fatal,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `LabelError` into a `HumanError`.
pub fn humanize_error(err: &LabelError) -> HumanError {
    match err {
        LabelError::InvalidDirectory { role, path } => HumanError {
            message: format!("The {role} folder doesn't exist."),
            suggestion: format!("Check the path '{}' and run again.", path.display()),
            severity: Severity::ActionRequired,
        },

        LabelError::NoInputFiles(path) => HumanError {
            message: "No label PDFs were found.".into(),
            suggestion: format!(
                "Download the labels from the carrier portal into '{}' first.",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        LabelError::UnreadablePdf { .. } | LabelError::PdfError(_) => HumanError {
            message: "A label file is damaged or not a PDF.".into(),
            suggestion: "Download this label again from the carrier portal.".into(),
            severity: Severity::Skipped,
        },

        LabelError::UnsupportedPageCount { pages, .. } => HumanError {
            message: format!("A label has {pages} pages, which isn't a known label layout."),
            suggestion: "Only 1-page (domestic) and 2-page (international) labels can be combined. Print this one on its own.".into(),
            severity: Severity::Skipped,
        },

        LabelError::MalformedFilename(name) => HumanError {
            message: format!("The file name '{name}' doesn't contain a recipient name."),
            suggestion: "Keep the file name the portal gave it, e.g. 'label_123_Jane_Doe.pdf'.".into(),
            severity: Severity::Skipped,
        },

        LabelError::TrackingNumberNotFound { .. } => HumanError {
            message: "No tracking number was found on a label.".into(),
            suggestion: "The label template may have changed. Check the layout configuration.".into(),
            severity: Severity::Skipped,
        },

        LabelError::OutputWriteFailure { path, .. } => HumanError {
            message: "The combined labels couldn't be saved.".into(),
            suggestion: format!(
                "Check that '{}' is writable and not open in another program.",
                path.display()
            ),
            severity: Severity::Fatal,
        },

        LabelError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission to read or write a file was denied.".into(),
                    suggestion: "Check the folder permissions, or choose a different output folder.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    severity: Severity::Fatal,
                }
            }
        }

        LabelError::Config(_) => HumanError {
            message: "The layout configuration file couldn't be read.".into(),
            suggestion: "Check the JSON syntax of the file passed with --layout.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
