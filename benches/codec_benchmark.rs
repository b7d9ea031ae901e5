//! Benchmarks for the span model codecs.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use udfconv::{RichDocCodec, RichDocument, RichParagraph, RichRun, UdfCodec};

/// Creates a synthetic petition with the given number of paragraphs.
fn create_document(paragraphs: usize) -> RichDocument {
    let mut doc = RichDocument::new();
    for i in 0..paragraphs {
        doc.add_paragraph(
            RichParagraph::new()
                .with_run(RichRun::new(format!("{}. ", i + 1)).bold(true))
                .with_run(RichRun::new(
                    "Davacı vekili olarak müvekkilim adına aşağıdaki hususları arz ederim. ",
                ))
                .with_run(RichRun::new("Gereğinin yapılmasını saygılarımla talep ederim.").italic(true)),
        );
    }
    doc
}

/// Benchmark rich text → span model → UDF bytes.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("udf_encode");

    for count in [10, 100, 1000] {
        let doc = create_document(count);
        group.bench_function(format!("{}_paragraphs", count), |b| {
            b.iter(|| {
                let model = RichDocCodec::encode(black_box(&doc));
                UdfCodec::new().encode(&model).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark UDF bytes → span model → rich text.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("udf_decode");

    for count in [10, 100, 1000] {
        let udf = UdfCodec::new()
            .encode(&RichDocCodec::encode(&create_document(count)))
            .unwrap();
        group.bench_function(format!("{}_paragraphs", count), |b| {
            b.iter(|| {
                let model = UdfCodec::new().decode(black_box(&udf)).unwrap();
                RichDocCodec::decode(&model)
            });
        });
    }

    group.finish();
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let udf = UdfCodec::new()
        .encode(&RichDocCodec::encode(&create_document(1)))
        .unwrap();

    c.bench_function("detect_udf", |b| {
        b.iter(|| udfconv::detect_format_from_bytes(black_box(&udf)).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_format_detection);
criterion_main!(benches);
