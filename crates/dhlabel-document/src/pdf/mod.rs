// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading labels, composing and writing the consolidated
// document.

pub mod output;
pub mod reader;
pub mod writer;

pub use output::{FormId, FreeText, OutputDocument};
pub use reader::LabelDocument;
pub use writer::OutputWriter;
