// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Affine;
use strata_index::BoundingBox;
use strata_layout::{LayoutRequest, RowLayoutStrategy, SeriesDescriptor, SeriesType};
use strata_scene::{
    EntityId, GapDetector, GlyphStyle, MappedElement, RasterBuilder, RasterWindow, SceneBuilder,
    adapters,
};

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

/// Sorted event times over `[0, duration)`.
fn gen_events(count: usize, duration: f32, seed: u64) -> Vec<f32> {
    let mut rng = Rng::new(seed);
    let mut out: Vec<f32> = (0..count).map(|_| rng.next_f32() * duration).collect();
    out.sort_by(f32::total_cmp);
    out
}

fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    let events = gen_events(20_000, 600_000.0, 0xCAFE_F00D_DEAD_BEEF);
    let ids: Vec<EntityId> = (0..events.len() as u64).map(EntityId).collect();
    for &trials in &[50usize, 200] {
        let centers: Vec<f32> = (0..trials)
            .map(|i| (i as f32 + 0.5) * 600_000.0 / trials as f32)
            .collect();
        let series = (0..trials)
            .map(|i| SeriesDescriptor::new(format!("trial_{i}"), SeriesType::DigitalEvent, true))
            .collect();
        let rows = RowLayoutStrategy
            .compute(&LayoutRequest::new(series, -1.0, 1.0))
            .layouts;
        let window = RasterWindow::new(-2_000.0, 2_000.0);
        let bounds = BoundingBox::new(-2_000.0, -1.0, 2_000.0, 1.0);

        group.bench_function(format!("glyph_batch_t{trials}"), |b| {
            b.iter(|| {
                black_box(RasterBuilder::new(window).build(&events, &ids, &rows, &centers).len())
            });
        });
        group.bench_function(format!("index_t{trials}"), |b| {
            b.iter(|| {
                black_box(
                    adapters::event_index_raster(&events, &ids, &rows, &centers, window, bounds)
                        .len(),
                )
            });
        });
    }
    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let times: Vec<f32> = (0..100_000).map(|i| i as f32).collect();
    let values: Vec<f32> = times.iter().map(|_| rng.next_f32() * 2.0 - 1.0).collect();
    let lines = GapDetector::with_time_threshold(2.0).segment(&times, &values, EntityId(0));
    let events = gen_events(5_000, 100_000.0, 0xFACE_FEED_CAFE_BABE);
    let bounds = BoundingBox::new(0.0, -1.0, 100_000.0, 1.0);

    group.throughput(Throughput::Elements((times.len() + events.len()) as u64));
    group.bench_function("build_with_index", |b| {
        b.iter(|| {
            let mut builder = SceneBuilder::new();
            builder
                .add_poly_line_batch_cloned(&lines)
                .add_glyphs(
                    "events",
                    events.iter().zip(1_u64..).map(|(&x, id)| MappedElement {
                        x,
                        y: 0.5,
                        entity_id: EntityId(id),
                    }),
                    &GlyphStyle {
                        model_matrix: Affine::IDENTITY,
                        ..GlyphStyle::default()
                    },
                )
                .build_spatial_index(bounds);
            black_box(builder.build().indexed_point_count())
        });
    });
    group.bench_function("sampled_line_index", |b| {
        b.iter(|| black_box(adapters::poly_line_sampled_index(&lines, 50.0, bounds).len()));
    });
    group.finish();
}

criterion_group!(benches, bench_raster, bench_scene);
criterion_main!(benches);
