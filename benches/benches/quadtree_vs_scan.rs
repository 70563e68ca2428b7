// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use strata_index::{BoundingBox, QuadTree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

const WIDTH: f32 = 1920.0;
const HEIGHT: f32 = 1080.0;

fn screen() -> BoundingBox<f32> {
    BoundingBox::new(0.0, 0.0, WIDTH, HEIGHT)
}

fn gen_uniform_points(count: usize, seed: u64) -> Vec<(f32, f32)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| (rng.next_f32() * WIDTH, rng.next_f32() * HEIGHT))
        .collect()
}

/// Raster-like rows: dense in X, a handful of distinct Y values.
fn gen_banded_points(rows: usize, per_row: usize, seed: u64) -> Vec<(f32, f32)> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(rows * per_row);
    for r in 0..rows {
        let y = (r as f32 + 0.5) * HEIGHT / rows as f32;
        for _ in 0..per_row {
            out.push((rng.next_f32() * WIDTH, y));
        }
    }
    out
}

fn build_tree(points: &[(f32, f32)]) -> QuadTree<f32, u32> {
    let mut tree = QuadTree::new(screen());
    for (i, &(x, y)) in points.iter().enumerate() {
        assert!(tree.insert(x, y, i as u32), "({x}, {y}) is off screen");
    }
    tree
}

fn scan_nearest(points: &[(f32, f32)], x: f32, y: f32, r: f32) -> Option<usize> {
    let mut best = None;
    let mut best_d = r * r;
    for (i, &(px, py)) in points.iter().enumerate() {
        let d = (px - x) * (px - x) + (py - y) * (py - y);
        if d <= best_d {
            best_d = d;
            best = Some(i);
        }
    }
    best
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("uniform_n{n}"), |b| {
            b.iter(|| black_box(build_tree(&points).len()));
        });
    }
    let banded = gen_banded_points(50, 200, 0xBADC_F00D_1234_5678);
    group.bench_function("banded_50x200", |b| {
        b.iter(|| black_box(build_tree(&banded).depth()));
    });
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n, 0xFACE_FEED_CAFE_BABE);
        let tree = build_tree(&points);
        let queries = gen_uniform_points(256, 0x1234_5678_9ABC_DEF0);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("quadtree_n{n}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for &(x, y) in &queries {
                    found += usize::from(tree.find_nearest(x, y, 10.0).is_some());
                }
                black_box(found)
            });
        });
        group.bench_function(format!("scan_n{n}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for &(x, y) in &queries {
                    found += usize::from(scan_nearest(&points, x, y, 10.0).is_some());
                }
                black_box(found)
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_query");
    let points = gen_uniform_points(50_000, 0xC1A5_7E55_9999_ABCD);
    let tree = build_tree(&points);
    let window = BoundingBox::new(400.0, 300.0, 800.0, 600.0);
    group.bench_function("quadtree_50k", |b| {
        b.iter_batched(
            Vec::new,
            |mut out| {
                tree.query(&window, &mut out);
                black_box(out.len())
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("scan_50k", |b| {
        b.iter(|| {
            black_box(
                points
                    .iter()
                    .filter(|&&(x, y)| window.contains_point(x, y))
                    .count(),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_nearest, bench_query);
criterion_main!(benches);
