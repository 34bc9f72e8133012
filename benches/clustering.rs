use dbscan::cluster::{Clustering, Dbscan, IndexKind};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

/// Four square blobs, roughly the layout of a classic make_blobs benchmark.
fn blobs(n: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let centers = [(0.0, 0.0), (10.0, 10.0), (2.5, 2.0), (-3.0, 0.0)];
    (0..n)
        .map(|i| {
            let (cx, cy) = centers[i % centers.len()];
            vec![cx + rng.random::<f64>() - 0.5, cy + rng.random::<f64>() - 0.5]
        })
        .collect()
}

fn bench_dbscan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dbscan");
    group.sample_size(10);

    let mut rng = StdRng::seed_from_u64(42);
    for n in [1_000, 20_000] {
        let data = blobs(n, &mut rng);

        group.bench_with_input(BenchmarkId::new("grid", n), &data, |b, data| {
            let model = Dbscan::new(0.1, 20);
            b.iter(|| model.fit_predict(black_box(data)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("grid_parallel", n), &data, |b, data| {
            let model = Dbscan::new(0.1, 20).with_parallel(true);
            b.iter(|| model.fit_predict(black_box(data)).unwrap())
        });

        if n <= 1_000 {
            group.bench_with_input(BenchmarkId::new("brute_force", n), &data, |b, data| {
                let model = Dbscan::new(0.1, 20).with_index(IndexKind::BruteForce);
                b.iter(|| model.fit_predict(black_box(data)).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_dbscan);
criterion_main!(benches);
