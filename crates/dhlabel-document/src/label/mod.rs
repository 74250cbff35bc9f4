// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label module — shipment classification and metadata extraction.

pub mod classify;
pub mod metadata;

pub use classify::classify;
pub use metadata::{extract_recipient, extract_tracking_number, read_shipment_record};
