// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Hilbert Key Benchmarks
//!
//! Compares sequential and rayon batch key computation across batch sizes to
//! locate the point where the parallel path pays off.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ramses_hilbert::{HilbertIndexer, Point};

/// Deterministic scattered points in the unit cube
fn create_points(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let t = (i as f64 + 0.5) / count as f64;
            Point::new(t, (t * 7.31).fract(), (t * 13.77).fract())
        })
        .collect()
}

fn bench_compute_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_keys");

    for &count in &[1_000usize, 10_000, 100_000, 1_000_000] {
        let points = create_points(count);
        group.throughput(Throughput::Elements(count as u64));

        let sequential = HilbertIndexer::new(17)
            .unwrap()
            .with_parallel_threshold(usize::MAX);
        group.bench_with_input(BenchmarkId::new("sequential", count), &points, |b, pts| {
            b.iter(|| sequential.compute_keys(black_box(pts)).unwrap())
        });

        let parallel = HilbertIndexer::new(17).unwrap().with_parallel_threshold(1);
        group.bench_with_input(BenchmarkId::new("parallel", count), &points, |b, pts| {
            b.iter(|| parallel.compute_keys(black_box(pts)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_keys);
criterion_main!(benches);
