// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label classifier — domestic or international, by page count.
//
// Only international labels carry the CN22/CN23 customs declaration as an
// extra page, so the page count alone decides the category.

use dhlabel_core::types::ShipmentCategory;

use crate::pdf::reader::LabelDocument;

pub fn classify(label: &LabelDocument) -> ShipmentCategory {
    ShipmentCategory::from_page_count(label.page_count())
}

/// Index of the page carrying the address block and tracking number.
///
/// International labels put the customs declaration first and the address
/// second.
pub fn address_page_index(category: ShipmentCategory) -> usize {
    match category {
        ShipmentCategory::Domestic => 0,
        ShipmentCategory::International => 1,
    }
}

/// Index of the customs declaration page, if the category has one.
pub fn customs_page_index(category: ShipmentCategory) -> Option<usize> {
    match category {
        ShipmentCategory::Domestic => None,
        ShipmentCategory::International => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::label_pdf;

    #[test]
    fn page_count_decides_category() {
        let domestic = LabelDocument::from_bytes(&label_pdf(&[&[]]), "d.pdf").unwrap();
        let international = LabelDocument::from_bytes(&label_pdf(&[&[], &[]]), "i.pdf").unwrap();

        assert_eq!(classify(&domestic), ShipmentCategory::Domestic);
        assert_eq!(classify(&international), ShipmentCategory::International);
    }

    #[test]
    fn international_address_is_second_page() {
        assert_eq!(address_page_index(ShipmentCategory::International), 1);
        assert_eq!(customs_page_index(ShipmentCategory::International), Some(0));
        assert_eq!(address_page_index(ShipmentCategory::Domestic), 0);
        assert_eq!(customs_page_index(ShipmentCategory::Domestic), None);
    }
}
