// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory label fixtures for tests and benchmarks.
//
// Compiled for this crate's unit tests and, through the `test-fixtures`
// feature, for integration tests, benches and dependent crates' tests.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

/// Text placed at `(x, y)` on a fixture page.
pub type PlacedText<'a> = (f32, f32, &'a str);

/// Content stream showing each text in 10pt Helvetica (`/F1`).
pub fn text_content(texts: &[PlacedText<'_>]) -> Vec<u8> {
    let mut operations = Vec::new();
    for (x, y, text) in texts {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(10)]),
            Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]),
            Operation::new(
                "Tj",
                vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }
    Content { operations }
        .encode()
        .expect("fixture content encodes")
}

/// Builds A4 label PDFs.
///
/// MediaBox and the `/F1` font resource live on the page tree root, so every
/// page inherits them and shares one font object.
#[derive(Debug, Default, Clone)]
pub struct LabelBuilder {
    pages: Vec<Vec<u8>>,
    to_unicode: Option<Vec<u8>>,
}

impl LabelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, texts: &[PlacedText<'_>]) -> Self {
        self.pages.push(text_content(texts));
        self
    }

    /// A page with a hand-written content stream.
    pub fn raw_page(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.pages.push(content.into());
        self
    }

    /// Attach a ToUnicode CMap stream to `/F1`.
    pub fn to_unicode(mut self, cmap: impl Into<Vec<u8>>) -> Self {
        self.to_unicode = Some(cmap.into());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        if let Some(cmap) = &self.to_unicode {
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, cmap.clone()));
            font.set("ToUnicode", Object::Reference(cmap_id));
        }
        let font_id = doc.add_object(font);

        let mut kids = Vec::new();
        for content in &self.pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("fixture PDF serialises");
        buf
    }
}

/// One page per entry of `pages`.
pub fn label_pdf(pages: &[&[PlacedText<'_>]]) -> Vec<u8> {
    pages
        .iter()
        .fold(LabelBuilder::new(), |builder, texts| builder.page(texts))
        .build()
}

fn address_page(recipient: &str, tracking: &str) -> Vec<u8> {
    let tracking_line = format!("Sendungsnr.: {tracking}");
    text_content(&[
        (50.0, 780.0, "DHL Paket"),
        (50.0, 700.0, recipient),
        (50.0, 40.0, tracking_line.as_str()),
    ])
}

/// A one-page domestic label.
pub fn domestic_label(recipient: &str, tracking: &str) -> Vec<u8> {
    LabelBuilder::new()
        .raw_page(address_page(recipient, tracking))
        .build()
}

/// A two-page international label: customs declaration, then address page.
pub fn international_label(recipient: &str, tracking: &str) -> Vec<u8> {
    LabelBuilder::new()
        .page(&[
            (50.0, 780.0, "CN23 Customs Declaration"),
            (50.0, 40.0, "Sendungsnr.: 999999999999"),
        ])
        .raw_page(address_page(recipient, tracking))
        .build()
}

/// Write `bytes` as `<dir>/<name>` and return the path.
pub fn write_label(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("fixture label written");
    path
}
