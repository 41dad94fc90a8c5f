use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use iris_knn::samples::synthetic_samples;
use iris_knn::{Hyperparameter, KnnDistance, Partitioner, ShufflingPartitioner};
use std::sync::Arc;

fn bench_evaluate(c: &mut Criterion) {
    let (training, testing) = ShufflingPartitioner::default()
        .with_seed(42)
        .partition(synthetic_samples(5_000, 42))
        .into_parts();
    let training = Arc::new(training);

    let mut group = c.benchmark_group("evaluate_k3");
    group.sample_size(10);
    for metric in KnnDistance::ALL_BASIC {
        group.bench_with_input(BenchmarkId::from_parameter(metric.name()), &metric, |b, &metric| {
            let mut h = Hyperparameter::new(3, metric, &training);
            b.iter(|| black_box(h.evaluate(&testing).unwrap()))
        });
    }
    group.finish();
}

fn bench_classify_single(c: &mut Criterion) {
    let samples = synthetic_samples(5_000, 7);
    let query = *samples[0].sample();
    c.bench_function("classify_single_5000", |b| {
        b.iter(|| black_box(iris_knn::classify(5, &KnnDistance::Manhattan, &samples, &query).unwrap()))
    });
}

criterion_group!(benches, bench_evaluate, bench_classify_single);
criterion_main!(benches);
