// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run and layout configuration.
//
// `RunConfig` carries where to read labels from and where to write the
// consolidated output. `LayoutConfig` carries every constant tied to the
// carrier's label template, so a template change is a config edit.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};
use crate::types::{PaperSize, PdfRect};

/// Prefix of every output file name.
pub const OUTPUT_PREFIX: &str = "DHLabels_";

/// Paths for one consolidation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory scanned for `*.pdf` labels.
    pub input_path: PathBuf,
    /// Directory receiving the consolidated PDF and CSV report.
    pub output_path: PathBuf,
    /// File name of both outputs, without extension.
    pub output_base_name: String,
}

impl RunConfig {
    /// Build a config whose output name is stamped with `date`.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            output_base_name: Self::default_base_name(date),
        }
    }

    /// `DHLabels_<YYYY-MM-DD>`.
    pub fn default_base_name(date: NaiveDate) -> String {
        format!("{OUTPUT_PREFIX}{}", date.format("%Y-%m-%d"))
    }

    /// Override the output base name.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.output_base_name = base_name.into();
        self
    }

    /// Check that both paths are existing directories.
    pub fn validate(&self) -> Result<()> {
        ensure_dir("input", &self.input_path)?;
        ensure_dir("output", &self.output_path)?;
        Ok(())
    }

    pub fn output_pdf_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}.pdf", self.output_base_name))
    }

    pub fn output_csv_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}.csv", self.output_base_name))
    }
}

fn ensure_dir(role: &'static str, path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(LabelError::InvalidDirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}

/// Geometry and text constants of the carrier label template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Paper size of source labels and destination pages.
    pub paper_size: PaperSize,
    /// Distance above the page middle where the kept crop band starts.
    pub crop_top_margin: f32,
    /// Height of the band, measured from the page bottom, searched for the
    /// tracking number.
    pub tracking_band_height: f32,
    /// Literal text preceding the tracking number.
    pub tracking_marker: String,
    /// Characters between the start of the marker and the tracking number.
    pub tracking_value_offset: usize,
    /// Rectangle of the date stamp on international pages.
    pub stamp_rect: PdfRect,
    pub stamp_font_size: f32,
    /// RGB components in 0..=1.
    pub stamp_color: [f32; 3],
    /// `chrono` format string of the date stamp.
    pub date_format: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            crop_top_margin: 20.0,
            tracking_band_height: 90.0,
            tracking_marker: "Sendungsnr.:".to_string(),
            tracking_value_offset: 13,
            stamp_rect: PdfRect::new(500.0, 50.0, 200.0, 100.0),
            stamp_font_size: 12.0,
            stamp_color: [0.0, 0.0, 0.0],
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Load a layout from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The part of a source page that is kept: from `height/2 + margin` up to
    /// the top edge.
    pub fn crop_band(&self) -> PdfRect {
        let (width, height) = self.paper_size.dimensions_pt();
        PdfRect::new(0.0, height / 2.0 + self.crop_top_margin, width, height)
    }

    /// Vertical shift placing a cropped customs page directly below the
    /// address block of an international shipment.
    pub fn customs_offset(&self) -> f32 {
        -(self.paper_size.height() / 2.0 - self.crop_top_margin)
    }

    /// Vertical shift placing a cropped domestic label in the lower half.
    pub fn lower_half_offset(&self) -> f32 {
        -self.paper_size.height() / 2.0
    }

    /// Render `date` the way it is stamped on customs pages.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn output_paths_carry_date() {
        let config = RunConfig::new("/in", "/out", date());
        assert_eq!(config.output_base_name, "DHLabels_2026-10-17");
        assert_eq!(
            config.output_pdf_path(),
            PathBuf::from("/out/DHLabels_2026-10-17.pdf")
        );
        assert_eq!(
            config.output_csv_path(),
            PathBuf::from("/out/DHLabels_2026-10-17.csv")
        );
    }

    #[test]
    fn validate_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path(), dir.path().join("missing"), date());
        match config.validate() {
            Err(LabelError::InvalidDirectory { role, .. }) => assert_eq!(role, "output"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_existing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path(), dir.path(), date());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_geometry_matches_a4_template() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.crop_band(), PdfRect::new(0.0, 441.0, 595.0, 842.0));
        assert_eq!(layout.customs_offset(), -401.0);
        assert_eq!(layout.lower_half_offset(), -421.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let layout: LayoutConfig =
            serde_json::from_str(r#"{ "tracking_marker": "Tracking:" }"#).unwrap();
        assert_eq!(layout.tracking_marker, "Tracking:");
        assert_eq!(layout.tracking_value_offset, 13);
        assert_eq!(layout.paper_size, PaperSize::A4);
    }

    #[test]
    fn layout_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "crop_top_margin": 30.0 }"#).unwrap();
        let layout = LayoutConfig::from_json_file(&path).unwrap();
        assert_eq!(layout.crop_top_margin, 30.0);
    }

    #[test]
    fn malformed_layout_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LayoutConfig::from_json_file(&path),
            Err(LabelError::Config(_))
        ));
    }
}
