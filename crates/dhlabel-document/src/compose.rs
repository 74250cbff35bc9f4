// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — packs cropped label regions onto A4 destination pages.
//
// International shipments take a whole page: address block on top, customs
// declaration directly below, plus a date stamp. Domestic shipments share a
// page two at a time: the first fills the top half, the second the bottom.

use dhlabel_core::config::LayoutConfig;
use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::ShipmentCategory;
use tracing::{debug, instrument};

use crate::label::classify::{address_page_index, customs_page_index};
use crate::pdf::output::{FreeText, OutputDocument};
use crate::pdf::reader::LabelDocument;

/// Where the next domestic label goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomesticSlot {
    /// No page has a free bottom half; the next label opens a page.
    NeedsNewPage,
    /// `page` has its top half filled and its bottom half free.
    HasOpenHalfPage { page: usize },
}

/// Builds the output document from classified labels.
pub struct PageCompositor<'l> {
    layout: &'l LayoutConfig,
    output: OutputDocument,
    domestic_slot: DomesticSlot,
    date_stamp: String,
}

impl<'l> PageCompositor<'l> {
    /// `date_stamp` is written onto every international page.
    pub fn new(layout: &'l LayoutConfig, date_stamp: impl Into<String>) -> Self {
        Self {
            layout,
            output: OutputDocument::new(layout.paper_size),
            domestic_slot: DomesticSlot::NeedsNewPage,
            date_stamp: date_stamp.into(),
        }
    }

    /// Place a label according to its category. Returns the destination page.
    pub fn add(&mut self, label: &LabelDocument, category: ShipmentCategory) -> Result<usize> {
        match category {
            ShipmentCategory::International => self.add_international(label),
            ShipmentCategory::Domestic => self.add_domestic(label),
        }
    }

    /// One international shipment on a page of its own.
    #[instrument(skip_all, fields(path = %label.path().display()))]
    pub fn add_international(&mut self, label: &LabelDocument) -> Result<usize> {
        let category = ShipmentCategory::International;
        let customs_index = customs_page_index(category).ok_or_else(|| {
            LabelError::PdfError("international label without customs page".into())
        })?;
        let crop = self.layout.crop_band();

        // Import both regions before allocating, so a failure leaves no
        // half-filled page behind.
        let address = self
            .output
            .import_cropped_page(label, address_page_index(category), crop)?;
        let customs = self.output.import_cropped_page(label, customs_index, crop)?;

        let page = self.output.add_blank_page();
        self.output.merge_form(page, address, 0.0)?;
        self.output
            .merge_form(page, customs, self.layout.customs_offset())?;
        self.output.add_free_text(
            page,
            &FreeText {
                text: &self.date_stamp,
                rect: self.layout.stamp_rect,
                font_size: self.layout.stamp_font_size,
                color: self.layout.stamp_color,
            },
        )?;

        debug!(page, "international shipment placed");
        Ok(page)
    }

    /// One domestic shipment in the next free half page.
    #[instrument(skip_all, fields(path = %label.path().display(), slot = ?self.domestic_slot))]
    pub fn add_domestic(&mut self, label: &LabelDocument) -> Result<usize> {
        let form = self.output.import_cropped_page(
            label,
            address_page_index(ShipmentCategory::Domestic),
            self.layout.crop_band(),
        )?;

        let page = match self.domestic_slot {
            DomesticSlot::NeedsNewPage => {
                let page = self.output.add_blank_page();
                self.output.merge_form(page, form, 0.0)?;
                self.domestic_slot = DomesticSlot::HasOpenHalfPage { page };
                page
            }
            DomesticSlot::HasOpenHalfPage { page } => {
                self.output
                    .merge_form(page, form, self.layout.lower_half_offset())?;
                self.domestic_slot = DomesticSlot::NeedsNewPage;
                page
            }
        };

        debug!(page, "domestic shipment placed");
        Ok(page)
    }

    pub fn domestic_slot(&self) -> DomesticSlot {
        self.domestic_slot
    }

    pub fn page_count(&self) -> usize {
        self.output.page_count()
    }

    pub fn output(&self) -> &OutputDocument {
        &self.output
    }

    pub fn into_output(self) -> OutputDocument {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::label_pdf;

    fn domestic(name: &str) -> LabelDocument {
        let bytes = label_pdf(&[&[(40.0, 600.0, name)]]);
        LabelDocument::from_bytes(&bytes, format!("a_b_{name}_X.pdf")).unwrap()
    }

    fn international(name: &str) -> LabelDocument {
        let bytes = label_pdf(&[&[(40.0, 600.0, "CN23")], &[(40.0, 600.0, name)]]);
        LabelDocument::from_bytes(&bytes, format!("a_b_{name}_X.pdf")).unwrap()
    }

    #[test]
    fn domestic_labels_share_pages() {
        let layout = LayoutConfig::default();
        let mut compositor = PageCompositor::new(&layout, "2026-10-17");

        assert_eq!(compositor.add_domestic(&domestic("A")).unwrap(), 0);
        assert_eq!(
            compositor.domestic_slot(),
            DomesticSlot::HasOpenHalfPage { page: 0 }
        );
        assert_eq!(compositor.add_domestic(&domestic("B")).unwrap(), 0);
        assert_eq!(compositor.domestic_slot(), DomesticSlot::NeedsNewPage);
        assert_eq!(compositor.add_domestic(&domestic("C")).unwrap(), 1);

        let output = compositor.output();
        assert_eq!(output.page_count(), 2);
        assert_eq!(output.offsets_on(0), vec![0.0, -421.0]);
        assert_eq!(output.offsets_on(1), vec![0.0]);
        assert_eq!(output.annotations_on(0), 0);
    }

    #[test]
    fn international_label_fills_one_page_with_stamp() {
        let layout = LayoutConfig::default();
        let mut compositor = PageCompositor::new(&layout, "2026-10-17");

        assert_eq!(compositor.add_international(&international("A")).unwrap(), 0);
        assert_eq!(compositor.add_international(&international("B")).unwrap(), 1);

        let output = compositor.output();
        assert_eq!(output.page_count(), 2);
        assert_eq!(output.offsets_on(0), vec![0.0, -401.0]);
        assert_eq!(output.annotations_on(0), 1);
        assert_eq!(output.annotations_on(1), 1);
    }

    #[test]
    fn categories_pack_independently() {
        let layout = LayoutConfig::default();
        let mut compositor = PageCompositor::new(&layout, "2026-10-17");

        compositor
            .add(&international("I"), ShipmentCategory::International)
            .unwrap();
        for name in ["A", "B", "C"] {
            compositor
                .add(&domestic(name), ShipmentCategory::Domestic)
                .unwrap();
        }

        let output = compositor.output();
        assert_eq!(output.page_count(), 3);
        assert_eq!(output.placements_on(0), 2);
        assert_eq!(output.placements_on(1), 2);
        assert_eq!(output.placements_on(2), 1);
    }

    #[test]
    fn domestic_label_as_international_fails_without_page() {
        let layout = LayoutConfig::default();
        let mut compositor = PageCompositor::new(&layout, "2026-10-17");

        assert!(compositor.add_international(&domestic("A")).is_err());
        assert_eq!(compositor.page_count(), 0);
    }

    #[test]
    fn address_page_is_on_top_and_customs_below() {
        use crate::pdf::writer::OutputWriter;
        use pdfplumber::{BBox, Pdf, TextOptions};

        let layout = LayoutConfig::default();
        let mut compositor = PageCompositor::new(&layout, "2026-10-17");
        let bytes = label_pdf(&[
            &[(40.0, 600.0, "CUSTOMS-PAGE")],
            &[(40.0, 600.0, "ADDRESS-PAGE")],
        ]);
        let label = LabelDocument::from_bytes(&bytes, "a_b_Jane_Doe.pdf").unwrap();
        compositor.add_international(&label).unwrap();

        let written = OutputWriter::to_bytes(compositor.into_output()).unwrap();
        let pdf = Pdf::open(&written, None).unwrap();
        let page = pdf.page(0).unwrap();
        let half = page.height() / 2.0;
        let text_in = |top: f64, bottom: f64| {
            page.crop(BBox::new(0.0, top, page.width(), bottom))
                .extract_text(&TextOptions::default())
        };

        let upper = text_in(0.0, half);
        let lower = text_in(half, page.height());
        assert!(upper.contains("ADDRESS-PAGE"), "upper half: {upper:?}");
        assert!(!upper.contains("CUSTOMS-PAGE"), "upper half: {upper:?}");
        assert!(lower.contains("CUSTOMS-PAGE"), "lower half: {lower:?}");
    }
}
