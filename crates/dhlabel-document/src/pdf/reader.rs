// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label source reader — open a label PDF with `lopdf` and expose its pages:
// count, geometry, decoded content and inherited resources. Text inside a
// horizontal band is extracted with `pdfplumber`.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::PdfRect;
use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfplumber::{BBox, Pdf, TextOptions};
use tracing::{debug, info, instrument};

/// Page counts a carrier label may have.
const SUPPORTED_PAGE_COUNTS: std::ops::RangeInclusive<usize> = 1..=2;

/// Upper bound when walking `/Parent` links for inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

static NEXT_LABEL_ID: AtomicUsize = AtomicUsize::new(0);

/// A loaded label PDF.
///
/// Wraps `lopdf::Document` together with its page object IDs in page order.
/// The raw bytes are kept for text extraction.
pub struct LabelDocument {
    id: usize,
    document: Document,
    bytes: Vec<u8>,
    path: PathBuf,
    page_ids: Vec<ObjectId>,
}

impl LabelDocument {
    // -- Construction ---------------------------------------------------------

    /// Open a label from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening label: {}", path_ref.display());

        let bytes = std::fs::read(path_ref).map_err(|err| LabelError::UnreadablePdf {
            path: path_ref.to_path_buf(),
            reason: err.to_string(),
        })?;

        Self::from_owned_bytes(bytes, path_ref)
    }

    /// Load a label from bytes already in memory. `path` is only used to name
    /// the label (recipient parsing, diagnostics).
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8], path: impl AsRef<Path>) -> Result<Self> {
        Self::from_owned_bytes(data.to_vec(), path.as_ref())
    }

    fn from_owned_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self> {
        let document = Document::load_mem(&bytes).map_err(|err| LabelError::UnreadablePdf {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        // `get_pages` is keyed by 1-indexed page number, so values come out in
        // page order.
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        if !SUPPORTED_PAGE_COUNTS.contains(&page_ids.len()) {
            return Err(LabelError::UnsupportedPageCount {
                path: path.to_path_buf(),
                pages: page_ids.len(),
            });
        }

        debug!(pages = page_ids.len(), "label loaded");

        Ok(Self {
            id: NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed),
            document,
            bytes,
            path: path.to_path_buf(),
            page_ids,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Identifier unique among the labels loaded by this process.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used to derive the recipient.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page object IDs in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// Object ID of the page at 0-based `index`.
    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            LabelError::PdfError(format!(
                "page {} out of range (label has {} pages)",
                index,
                self.page_ids.len()
            ))
        })
    }

    /// The page's `/MediaBox`, following inheritance through the page tree.
    pub fn media_box(&self, index: usize) -> Result<PdfRect> {
        let page_id = self.page_id(index)?;
        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .ok_or_else(|| LabelError::PdfError(format!("page {index} has no /MediaBox")))?;

        rect_from_object(&self.document, media_box)
            .ok_or_else(|| LabelError::PdfError(format!("page {index} has a malformed /MediaBox")))
    }

    /// Decoded (decompressed, concatenated) content stream of a page.
    pub fn page_content(&self, index: usize) -> Result<Vec<u8>> {
        let page_id = self.page_id(index)?;
        self.document.get_page_content(page_id).map_err(|err| {
            LabelError::PdfError(format!("cannot read content of page {index}: {err}"))
        })
    }

    /// The page's `/Resources` dictionary, following inheritance. Pages
    /// without resources yield an empty dictionary.
    pub fn page_resources(&self, index: usize) -> Result<Dictionary> {
        let page_id = self.page_id(index)?;
        let resources = self
            .inherited_attribute(page_id, b"Resources")
            .map(|obj| resolve(&self.document, obj));

        match resources {
            Some(Object::Dictionary(dict)) => Ok(dict.clone()),
            Some(other) => Err(LabelError::PdfError(format!(
                "page {index} /Resources is not a dictionary: {other:?}"
            ))),
            None => Ok(Dictionary::new()),
        }
    }

    // -- Text -----------------------------------------------------------------

    /// Extract the text of the glyphs overlapping `band` (page space).
    ///
    /// Lines are ordered top to bottom and separated by `\n`; words within a
    /// line are ordered left to right.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn extract_text_in_band(&self, index: usize, band: PdfRect) -> Result<String> {
        let media_box = self.media_box(index)?.normalized();
        let band = band.normalized();

        // A malformed font program must cost this label only, not the run.
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            let pdf = Pdf::open(&self.bytes, None)?;
            let page = pdf.page(index)?;
            // pdfplumber measures `top`/`bottom` down from the top edge.
            let origin_y = f64::from(media_box.y1);
            let crop = BBox::new(
                f64::from(band.x1 - media_box.x1),
                page.height() - (f64::from(band.y2) - origin_y),
                f64::from(band.x2 - media_box.x1),
                page.height() - (f64::from(band.y1) - origin_y),
            );
            Ok::<_, pdfplumber::PdfError>(page.crop(crop).extract_text(&TextOptions::default()))
        }));

        match extracted {
            Ok(Ok(text)) => {
                debug!(chars = text.chars().count(), "text inside band");
                Ok(text)
            }
            Ok(Err(err)) => Err(LabelError::PdfError(format!(
                "cannot extract text of page {index}: {err}"
            ))),
            Err(_) => Err(LabelError::PdfError(format!(
                "text extraction of page {index} aborted on malformed page data"
            ))),
        }
    }

    /// Band of `height` points measured from the bottom edge of the page.
    pub fn bottom_band(&self, index: usize, height: f32) -> Result<PdfRect> {
        let media_box = self.media_box(index)?.normalized();
        Ok(PdfRect::new(
            media_box.x1,
            media_box.y1,
            media_box.x2,
            media_box.y1 + height,
        ))
    }

    // -- Helpers --------------------------------------------------------------

    /// Look up `key` on the page dictionary, then on its ancestors.
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.document.get_dictionary(page_id).ok();
        let mut depth = 0;

        while let Some(dict) = current {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                break;
            }
            current = match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => self.document.get_dictionary(*parent_id).ok(),
                _ => None,
            };
        }

        None
    }
}

/// Follow a single indirect reference; other objects are returned as-is.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Parse a 4-element rectangle array (possibly indirect).
pub(crate) fn rect_from_object(document: &Document, object: &Object) -> Option<PdfRect> {
    let Object::Array(values) = resolve(document, object) else {
        return None;
    };
    if values.len() != 4 {
        return None;
    }
    let coords: Vec<f32> = values
        .iter()
        .filter_map(|value| number(resolve(document, value)))
        .collect();
    match coords.as_slice() {
        [x1, y1, x2, y2] => Some(PdfRect::new(*x1, *y1, *x2, *y2)),
        _ => None,
    }
}
