// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metadata extractor — recipient from the file name, tracking number from
// the text near the bottom of the address page.

use dhlabel_core::config::LayoutConfig;
use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::{ShipmentCategory, ShipmentRecord};
use tracing::{debug, instrument};

use crate::label::classify::address_page_index;
use crate::pdf::reader::LabelDocument;

/// Recipient display name from a `<x>_<y>_<FirstName>_<LastName>[.ext]` name.
///
/// Tokens after the fourth are ignored. The last-name token loses everything
/// from its first `.` on.
pub fn extract_recipient(file_name: &str) -> Result<String> {
    let tokens: Vec<&str> = file_name.split('_').collect();
    let malformed = || LabelError::MalformedFilename(file_name.to_string());

    if tokens.len() < 4 {
        return Err(malformed());
    }

    let first = tokens[2];
    let last = tokens[3].split('.').next().unwrap_or_default();
    if first.is_empty() || last.is_empty() {
        return Err(malformed());
    }

    Ok(format!("{first} {last}"))
}

/// Tracking number following `marker` in `text`.
///
/// The value starts `offset` characters after the start of the marker and
/// runs to the end of the line.
pub fn extract_tracking_number(text: &str, marker: &str, offset: usize) -> Result<String> {
    let not_found = || LabelError::TrackingNumberNotFound {
        marker: marker.to_string(),
    };

    let start = text.find(marker).ok_or_else(not_found)?;
    let value: String = text[start..]
        .chars()
        .skip(offset)
        .take_while(|ch| *ch != '\n')
        .collect();

    let value = value.trim();
    if value.is_empty() {
        return Err(not_found());
    }
    Ok(value.to_string())
}

/// Derive the shipment record of a loaded label.
#[instrument(skip_all, fields(path = %label.path().display(), %category))]
pub fn read_shipment_record(
    label: &LabelDocument,
    category: ShipmentCategory,
    layout: &LayoutConfig,
) -> Result<ShipmentRecord> {
    let recipient = extract_recipient(&label.file_name())?;

    let page = address_page_index(category);
    let band = label.bottom_band(page, layout.tracking_band_height)?;
    let text = label.extract_text_in_band(page, band)?;
    let tracking_number =
        extract_tracking_number(&text, &layout.tracking_marker, layout.tracking_value_offset)?;

    debug!(%recipient, %tracking_number, "shipment record extracted");
    Ok(ShipmentRecord::new(recipient, tracking_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::label_pdf;

    const MARKER: &str = "Sendungsnr.:";

    #[test]
    fn recipient_from_file_name() {
        assert_eq!(extract_recipient("A_B_Jane_Doe.pdf").unwrap(), "Jane Doe");
    }

    #[test]
    fn recipient_without_extension() {
        assert_eq!(extract_recipient("A_B_Jane_Doe").unwrap(), "Jane Doe");
    }

    #[test]
    fn extra_tokens_are_ignored() {
        assert_eq!(
            extract_recipient("label_0815_Max_Mustermann_copy.pdf").unwrap(),
            "Max Mustermann"
        );
    }

    #[test]
    fn short_file_name_is_malformed() {
        assert!(matches!(
            extract_recipient("A_Jane_Doe.pdf"),
            Err(LabelError::MalformedFilename(name)) if name == "A_Jane_Doe.pdf"
        ));
    }

    #[test]
    fn empty_name_token_is_malformed() {
        assert!(extract_recipient("A_B__Doe.pdf").is_err());
        assert!(extract_recipient("A_B_Jane_.pdf").is_err());
    }

    #[test]
    fn tracking_number_after_marker() {
        let text = "Gewicht 2kg\nSendungsnr.: 00340434161094123456\nMore text";
        assert_eq!(
            extract_tracking_number(text, MARKER, 13).unwrap(),
            "00340434161094123456"
        );
    }

    #[test]
    fn tracking_number_at_end_of_text() {
        let text = "Sendungsnr.: 00340434161094123456";
        assert_eq!(
            extract_tracking_number(text, MARKER, 13).unwrap(),
            "00340434161094123456"
        );
    }

    #[test]
    fn missing_marker_is_error() {
        let result = extract_tracking_number("no tracking here\n", MARKER, 13);
        assert!(matches!(
            result,
            Err(LabelError::TrackingNumberNotFound { .. })
        ));
    }

    #[test]
    fn marker_without_value_is_error() {
        assert!(extract_tracking_number("Sendungsnr.:\nnext", MARKER, 13).is_err());
    }

    #[test]
    fn record_from_domestic_label() {
        let bytes = label_pdf(&[&[
            (40.0, 700.0, "Jane Doe, Hauptstr. 1"),
            (40.0, 50.0, "Sendungsnr.: 00340434161094123456"),
        ]]);
        let label = LabelDocument::from_bytes(&bytes, "/tmp/x_y_Jane_Doe.pdf").unwrap();
        let record =
            read_shipment_record(&label, ShipmentCategory::Domestic, &LayoutConfig::default())
                .unwrap();
        assert_eq!(
            record,
            ShipmentRecord::new("Jane Doe", "00340434161094123456")
        );
    }

    #[test]
    fn record_reads_second_page_of_international_label() {
        let bytes = label_pdf(&[
            &[(40.0, 50.0, "Sendungsnr.: 11111111111111111111")],
            &[(40.0, 50.0, "Sendungsnr.: 22222222222222222222")],
        ]);
        let label = LabelDocument::from_bytes(&bytes, "x_y_John_Roe.pdf").unwrap();
        let record = read_shipment_record(
            &label,
            ShipmentCategory::International,
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(record.tracking_number, "22222222222222222222");
    }

    #[test]
    fn tracking_number_above_band_is_not_found() {
        let bytes = label_pdf(&[&[(40.0, 500.0, "Sendungsnr.: 00340434161094123456")]]);
        let label = LabelDocument::from_bytes(&bytes, "x_y_Jane_Doe.pdf").unwrap();
        let result =
            read_shipment_record(&label, ShipmentCategory::Domestic, &LayoutConfig::default());
        assert!(matches!(
            result,
            Err(LabelError::TrackingNumberNotFound { .. })
        ));
    }
}
