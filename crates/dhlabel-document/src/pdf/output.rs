// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output document — the destination pages under construction.
//
// Source pages are imported as Form XObjects whose /BBox is the crop band,
// so everything outside the band is clipped. Destination pages reference
// those forms at vertical offsets; the page tree itself is only assembled in
// `OutputDocument::finish`.

use std::collections::HashMap;

use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::{PaperSize, PdfRect};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, instrument, warn};

use crate::pdf::reader::LabelDocument;

/// Resource name of the stamp font on annotation appearances.
const STAMP_FONT: &str = "Helv";

/// A cropped source page stored in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormId(ObjectId);

#[derive(Debug, Clone)]
struct Placement {
    form: FormId,
    offset_y: f32,
}

/// One page of the consolidated output.
#[derive(Debug, Clone, Default)]
struct DestinationPage {
    placements: Vec<Placement>,
    annotations: Vec<ObjectId>,
}

/// Free-text annotation parameters.
#[derive(Debug, Clone)]
pub struct FreeText<'t> {
    pub text: &'t str,
    pub rect: PdfRect,
    pub font_size: f32,
    pub color: [f32; 3],
}

/// Source object ID to copied object ID, for one source label.
type ImportMap = HashMap<ObjectId, ObjectId>;

/// The consolidated document being built.
pub struct OutputDocument {
    document: Document,
    paper_size: PaperSize,
    pages: Vec<DestinationPage>,
    /// Keyed by `LabelDocument::id`, so pages of one label share copied
    /// fonts and images.
    imported: HashMap<usize, ImportMap>,
}

impl OutputDocument {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            document: Document::with_version("1.5"),
            paper_size,
            pages: Vec::new(),
            imported: HashMap::new(),
        }
    }

    /// Append a blank destination page and return its 0-based index.
    pub fn add_blank_page(&mut self) -> usize {
        self.pages.push(DestinationPage::default());
        debug!(page = self.pages.len() - 1, "destination page allocated");
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of cropped regions merged into `page`.
    pub fn placements_on(&self, page: usize) -> usize {
        self.pages.get(page).map_or(0, |p| p.placements.len())
    }

    /// Vertical offsets of the regions merged into `page`, in merge order.
    pub fn offsets_on(&self, page: usize) -> Vec<f32> {
        self.pages
            .get(page)
            .map(|p| p.placements.iter().map(|placement| placement.offset_y).collect())
            .unwrap_or_default()
    }

    pub fn annotations_on(&self, page: usize) -> usize {
        self.pages.get(page).map_or(0, |p| p.annotations.len())
    }

    // -- Import ---------------------------------------------------------------

    /// Copy page `index` of `source` into this document as a Form XObject
    /// clipped to `crop`.
    #[instrument(skip(self, source), fields(source = %source.path().display()))]
    pub fn import_cropped_page(
        &mut self,
        source: &LabelDocument,
        index: usize,
        crop: PdfRect,
    ) -> Result<FormId> {
        let content = source.page_content(index)?;
        let resources = source.page_resources(index)?;

        let imported = self.imported.entry(source.id()).or_default();
        let resources = deep_clone_object(
            source.document(),
            &mut self.document,
            &Object::Dictionary(resources),
            imported,
        );
        let objects_imported = imported.len();

        let crop = crop.normalized();
        let form_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => Object::Integer(1),
            "BBox" => rect_array(&crop),
            "Matrix" => identity_matrix(),
            "Resources" => resources,
        };

        let form_id = self.document.add_object(Stream::new(form_dict, content));
        debug!(
            objects_imported,
            ?form_id,
            "source page imported as form"
        );
        Ok(FormId(form_id))
    }

    /// Draw `form` onto destination `page`, shifted vertically by `offset_y`.
    pub fn merge_form(&mut self, page: usize, form: FormId, offset_y: f32) -> Result<()> {
        let destination = self.pages.get_mut(page).ok_or_else(|| {
            LabelError::PdfError(format!("destination page {page} does not exist"))
        })?;
        destination.placements.push(Placement { form, offset_y });
        Ok(())
    }

    /// Attach a borderless, transparent free-text annotation to `page`.
    pub fn add_free_text(&mut self, page: usize, free_text: &FreeText<'_>) -> Result<()> {
        if page >= self.pages.len() {
            return Err(LabelError::PdfError(format!(
                "destination page {page} does not exist"
            )));
        }

        let rect = free_text.rect.normalized();
        let [r, g, b] = free_text.color;
        let default_appearance = format!(
            "/{STAMP_FONT} {} Tf {r} {g} {b} rg",
            free_text.font_size
        );

        let font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_resources = dictionary! {
            "Font" => dictionary! { STAMP_FONT => Object::Reference(font_id) },
        };

        let appearance = stamp_appearance(free_text, &rect)?;
        let appearance_id = self.document.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => rect_array(&PdfRect::new(0.0, 0.0, rect.width(), rect.height())),
                "Resources" => font_resources.clone(),
            },
            appearance,
        ));

        let annotation = dictionary! {
            "Type" => "Annot",
            "Subtype" => "FreeText",
            "Rect" => rect_array(&rect),
            "Contents" => Object::String(free_text.text.as_bytes().to_vec(), StringFormat::Literal),
            "DA" => Object::String(default_appearance.into_bytes(), StringFormat::Literal),
            "DR" => font_resources,
            // Print flag; the stamp must appear on paper.
            "F" => Object::Integer(4),
            "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
            "BS" => dictionary! { "W" => Object::Integer(0) },
            "AP" => dictionary! { "N" => Object::Reference(appearance_id) },
        };
        let annotation_id = self.document.add_object(annotation);
        self.pages[page].annotations.push(annotation_id);
        Ok(())
    }

    // -- Assembly -------------------------------------------------------------

    /// Build the page tree and return the finished `lopdf::Document`.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn finish(self) -> Result<Document> {
        let Self {
            mut document,
            paper_size,
            pages,
            ..
        } = self;

        let (width, height) = paper_size.dimensions_pt();
        let pages_id = document.new_object_id();
        let mut kids = Vec::with_capacity(pages.len());

        for page in &pages {
            let mut operations = Vec::new();
            let mut xobjects = Dictionary::new();

            for (slot, placement) in page.placements.iter().enumerate() {
                let name = format!("Lbl{slot}");
                xobjects.set(name.as_bytes().to_vec(), Object::Reference(placement.form.0));
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        Object::Integer(1),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(1),
                        Object::Integer(0),
                        Object::Real(placement.offset_y),
                    ],
                ));
                operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                operations.push(Operation::new("Q", vec![]));
            }

            let content = Content { operations }.encode().map_err(|err| {
                LabelError::PdfError(format!("cannot encode page content: {err}"))
            })?;
            let content_id = document.add_object(Stream::new(dictionary! {}, content));

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => rect_array(&PdfRect::new(0.0, 0.0, width, height)),
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! { "XObject" => xobjects },
            };
            if !page.annotations.is_empty() {
                page_dict.set(
                    "Annots",
                    page.annotations
                        .iter()
                        .map(|id| Object::Reference(*id))
                        .collect::<Vec<_>>(),
                );
            }
            kids.push(Object::Reference(document.add_object(page_dict)));
        }

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", Object::Reference(catalog_id));

        debug!(pages = count, "output page tree assembled");
        Ok(document)
    }
}

fn identity_matrix() -> Vec<Object> {
    [1, 0, 0, 1, 0, 0].into_iter().map(Object::Integer).collect()
}

fn rect_array(rect: &PdfRect) -> Vec<Object> {
    vec![
        Object::Real(rect.x1),
        Object::Real(rect.y1),
        Object::Real(rect.x2),
        Object::Real(rect.y2),
    ]
}

/// Appearance stream drawing the stamp text at the left of its box.
fn stamp_appearance(free_text: &FreeText<'_>, rect: &PdfRect) -> Result<Vec<u8>> {
    let [r, g, b] = free_text.color;
    let baseline = ((rect.height() - free_text.font_size) / 2.0).max(0.0);
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(STAMP_FONT.as_bytes().to_vec()),
                    Object::Real(free_text.font_size),
                ],
            ),
            Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("Td", vec![Object::Real(2.0), Object::Real(baseline)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    free_text.text.as_bytes().to_vec(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content
        .encode()
        .map_err(|err| LabelError::PdfError(format!("cannot encode stamp appearance: {err}")))
}

/// Deep-copy `object` from `source` into `target`, following references.
///
/// `imported` maps source object IDs to their copies, so shared resources
/// (fonts, images) are copied once and reference cycles terminate. `/Parent`
/// entries are dropped; forms do not belong to a page tree.
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    imported: &mut HashMap<ObjectId, ObjectId>,
) -> Object {
    match object {
        Object::Dictionary(dict) => Object::Dictionary(clone_dictionary(source, target, dict, imported)),
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| deep_clone_object(source, target, item, imported))
                .collect(),
        ),
        Object::Reference(source_id) => {
            if let Some(target_id) = imported.get(source_id) {
                return Object::Reference(*target_id);
            }
            match source.get_object(*source_id) {
                Ok(referenced) => {
                    let target_id = target.new_object_id();
                    imported.insert(*source_id, target_id);
                    let cloned = deep_clone_object(source, target, referenced, imported);
                    target.objects.insert(target_id, cloned);
                    Object::Reference(target_id)
                }
                Err(err) => {
                    warn!(?source_id, %err, "cannot resolve reference, using Null");
                    Object::Null
                }
            }
        }
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict, imported);
            let mut cloned = Stream::new(dict, stream.content.clone());
            // Keep the original filter chain; the bytes are still encoded.
            cloned.allows_compression = stream.allows_compression;
            Object::Stream(cloned)
        }
        other => other.clone(),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    imported: &mut HashMap<ObjectId, ObjectId>,
) -> Dictionary {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        cloned.set(key.clone(), deep_clone_object(source, target, value, imported));
    }
    cloned
}
