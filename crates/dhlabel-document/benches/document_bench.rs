// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the label pipeline in the dhlabel-document crate.
// Measures tracking number extraction and page composition on synthetic
// in-memory labels.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use dhlabel_core::config::LayoutConfig;
use dhlabel_core::types::ShipmentCategory;
use dhlabel_document::fixtures::{domestic_label, international_label};
use dhlabel_document::label::read_shipment_record;
use dhlabel_document::{LabelDocument, OutputWriter, PageCompositor};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn load(pages: usize, index: usize) -> LabelDocument {
    let tracking = format!("0034043416{index:010}");
    let bytes = match pages {
        2 => international_label("Jane Doe", &tracking),
        _ => domestic_label("Jane Doe", &tracking),
    };
    LabelDocument::from_bytes(&bytes, format!("{index}_x_Jane_Doe.pdf")).unwrap()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Extract the shipment record of one domestic label.
fn bench_record_extraction(c: &mut Criterion) {
    let layout = LayoutConfig::default();
    let label = load(1, 0);

    c.bench_function("read_shipment_record (domestic)", |b| {
        b.iter(|| {
            read_shipment_record(black_box(&label), ShipmentCategory::Domestic, &layout).unwrap()
        });
    });
}

/// Compose and serialise a batch of 5 international and 20 domestic labels.
fn bench_composition(c: &mut Criterion) {
    let layout = LayoutConfig::default();
    let international: Vec<_> = (0..5).map(|i| load(2, i)).collect();
    let domestic: Vec<_> = (5..25).map(|i| load(1, i)).collect();

    c.bench_function("compose + write (5 intl, 20 domestic)", |b| {
        b.iter(|| {
            let mut compositor = PageCompositor::new(&layout, "2026-10-17");
            for label in &international {
                compositor
                    .add(label, ShipmentCategory::International)
                    .unwrap();
            }
            for label in &domestic {
                compositor.add(label, ShipmentCategory::Domestic).unwrap();
            }
            OutputWriter::to_bytes(black_box(compositor.into_output())).unwrap()
        });
    });
}

criterion_group!(benches, bench_record_extraction, bench_composition);
criterion_main!(benches);
