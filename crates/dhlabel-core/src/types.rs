// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for DHLabel.

use serde::{Deserialize, Serialize};

/// Shipment category, derived solely from a label's page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentCategory {
    /// Single-page label, no customs form.
    Domestic,
    /// Two-page label: customs declaration (CN22/CN23) plus address page.
    International,
}

impl ShipmentCategory {
    /// Classify a label by its page count.
    ///
    /// One page is domestic, anything more is international. Callers must not
    /// pass zero; the reader rejects empty documents before classification.
    pub fn from_page_count(page_count: usize) -> Self {
        debug_assert!(page_count >= 1, "labels always have at least one page");
        if page_count > 1 {
            Self::International
        } else {
            Self::Domestic
        }
    }
}

impl std::fmt::Display for ShipmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domestic => write!(f, "domestic"),
            Self::International => write!(f, "international"),
        }
    }
}

/// Recipient and tracking number derived from one label file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub recipient: String,
    pub tracking_number: String,
}

impl ShipmentRecord {
    pub fn new(recipient: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            tracking_number: tracking_number.into(),
        }
    }
}

impl std::fmt::Display for ShipmentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - ({})", self.recipient, self.tracking_number)
    }
}

/// Standard paper sizes, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Dimensions in points (width, height), rounded to whole points for the
    /// ISO sizes the way common PDF toolkits do.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    pub fn width(&self) -> f32 {
        self.dimensions_pt().0
    }

    pub fn height(&self) -> f32 {
        self.dimensions_pt().1
    }
}

/// Axis-aligned rectangle in PDF user space, stored as two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl PdfRect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Same rectangle with corners ordered lower-left, upper-right.
    pub fn normalized(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).abs()
    }
}
