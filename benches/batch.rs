//! Run these benches with `cargo bench --bench batch -- --verbose`
use column_moisture::{BatchConfig, BatchProcessor, Sounding};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(batch_benches);

criterion_group!(
    name = batch_benches;
    config = build_tester();
    targets = sequential_batch_bench, parallel_batch_bench
);

fn soundings() -> Vec<Sounding> {
    utils::load_all_test_files()
        .iter()
        .cloned()
        .cycle()
        .take(3_000)
        .collect()
}

fn sequential_batch_bench(c: &mut Criterion) {
    let snds = soundings();
    let processor = BatchProcessor::new(BatchConfig {
        parallel: false,
        ..BatchConfig::default()
    });

    c.bench_function("sequential_batch", |b| {
        b.iter(|| black_box(processor.process_soundings(&snds)));
    });
}

fn parallel_batch_bench(c: &mut Criterion) {
    let snds = soundings();
    let processor = BatchProcessor::new(BatchConfig::default());

    c.bench_function("parallel_batch", |b| {
        b.iter(|| black_box(processor.process_soundings(&snds)));
    });
}
