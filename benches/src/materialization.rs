mod common;

use std::hint::black_box;

use catalog::prelude::*;
use common::{generate_records, generate_source};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

/// Benchmark the three-way batch sort in isolation
fn bench_sort_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_batch");

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || generate_records(count),
                |records| black_box(sort_batch(records)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark end-to-end materialization for different batch sizes
fn bench_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialization");
    group.sample_size(20);
    let runtime = Runtime::new().unwrap();
    let num_records = 50_000;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("products.txt"),
        generate_source(num_records, 100),
    )
    .unwrap();

    group.throughput(Throughput::Elements(num_records as u64));
    for batch_size in [1_000, 10_000, num_records] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &batch_size| {
                b.to_async(&runtime).iter(|| async {
                    let pipeline = MaterializationPipeline::with_policy(
                        DataLayout::new(dir.path(), "products.txt"),
                        PipelineConfig {
                            batch_size,
                            atomic_publish: true,
                        },
                        SilentSkip,
                    );
                    black_box(pipeline.run(&CancellationToken::new()).await.unwrap())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark early and late page reads against a materialized view
fn bench_get_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_page");
    let runtime = Runtime::new().unwrap();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("products.txt"), generate_source(50_000, 0)).unwrap();
    let layout = DataLayout::new(dir.path(), "products.txt");
    runtime
        .block_on(
            MaterializationPipeline::with_policy(
                layout.clone(),
                PipelineConfig::default(),
                SilentSkip,
            )
            .run(&CancellationToken::new()),
        )
        .unwrap();
    let reader = PageReader::new(layout, ReaderConfig::default());

    for page_number in [1, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(page_number),
            &page_number,
            |b, &page_number| {
                b.to_async(&runtime).iter(|| async {
                    black_box(
                        reader
                            .get_page(SortKey::Price, page_number, 50)
                            .await
                            .unwrap(),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sort_batch, bench_materialization, bench_get_page);
criterion_main!(benches);
