// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output writer — serialise the consolidated document to disk.
//
// The PDF is written to a temporary file in the destination directory and
// renamed over the target, so a failed run never leaves a truncated PDF.

use std::io::Write;
use std::path::Path;

use dhlabel_core::error::{LabelError, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::pdf::output::OutputDocument;

/// Writes finished output documents.
pub struct OutputWriter;

impl OutputWriter {
    /// Serialise `output` into PDF bytes.
    pub fn to_bytes(output: OutputDocument) -> Result<Vec<u8>> {
        let mut document = output.finish()?;
        let pruned = document.prune_objects();
        document.compress();

        let mut bytes = Vec::new();
        document.save_to(&mut bytes).map_err(|err| {
            LabelError::PdfError(format!("failed to serialise output PDF: {err}"))
        })?;

        debug!(
            pruned = pruned.len(),
            bytes = bytes.len(),
            "output serialised"
        );
        Ok(bytes)
    }

    /// Write `output` to `path` atomically. Returns the number of bytes
    /// written.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write(output: OutputDocument, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let write_failure = |reason: String| LabelError::OutputWriteFailure {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = Self::to_bytes(output)?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staging = NamedTempFile::new_in(directory).map_err(|err| write_failure(err.to_string()))?;
        staging
            .write_all(&bytes)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|err| write_failure(err.to_string()))?;
        staging
            .persist(path)
            .map_err(|err| write_failure(err.error.to_string()))?;

        info!(bytes = bytes.len(), "Wrote consolidated PDF to {}", path.display());
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use dhlabel_core::types::PaperSize;
    use lopdf::Document;

    use super::*;

    #[test]
    fn writes_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut output = OutputDocument::new(PaperSize::A4);
        output.add_blank_page();
        output.add_blank_page();
        let written = OutputWriter::write(output, &path).unwrap();

        assert!(written > 0);
        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn missing_directory_is_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");

        let mut output = OutputDocument::new(PaperSize::A4);
        output.add_blank_page();
        let result = OutputWriter::write(output, &path);

        assert!(matches!(result, Err(LabelError::OutputWriteFailure { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"stale").unwrap();

        let mut output = OutputDocument::new(PaperSize::A4);
        output.add_blank_page();
        OutputWriter::write(output, &path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
