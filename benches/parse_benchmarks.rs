//! # NFC-e Import Benchmarks
//!
//! Measures the CPU side of the import pipeline:
//! - XML parsing of the reference document and of documents with many line items
//! - Access key derivation and validation
//! - End-to-end batches against the in-memory store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nfce_import::{derive_access_key, parse_document, DocumentSource, Importer, MemoryStore};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{access_key, DocBuilder, ItemSpec, ALL_TAXES};

fn document_with_items(count: usize) -> String {
    let items = (0..count)
        .map(|_| ItemSpec {
            code: "001",
            imposto: ALL_TAXES,
        })
        .collect();
    DocBuilder::new(access_key(1)).items(items).build()
}

/// Benchmark: parsing the reference document
pub fn benchmark_parse_example(c: &mut Criterion) {
    let bytes = common::example_document();
    c.bench_function("parse_example_document", |b| {
        b.iter(|| black_box(parse_document(black_box(&bytes))))
    });
}

/// Benchmark: parsing cost as the number of line items grows
pub fn benchmark_parse_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line_items");

    for size in [1, 10, 100, 500].iter() {
        let xml = document_with_items(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| black_box(parse_document(xml.as_bytes())))
        });
    }

    group.finish();
}

pub fn benchmark_access_key(c: &mut Criterion) {
    let raw = format!("NFe{}", common::EXAMPLE_KEY);
    c.bench_function("derive_access_key", |b| {
        b.iter(|| black_box(derive_access_key(black_box(&raw))))
    });
}

/// Benchmark: batches against the in-memory store, half of them duplicates
pub fn benchmark_memory_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_batch");

    for size in [10, 100].iter() {
        let sources: Vec<DocumentSource> = (0..*size)
            .map(|n| {
                DocumentSource::new(
                    format!("{}.xml", n),
                    DocBuilder::new(access_key(n / 2)).build(),
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &sources, |b, sources| {
            b.iter(|| {
                let mut importer = Importer::new(MemoryStore::new());
                black_box(importer.import_batch(sources.iter().cloned().map(Ok)))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_example,
    benchmark_parse_scaling,
    benchmark_access_key,
    benchmark_memory_batch
);

criterion_main!(benches);
