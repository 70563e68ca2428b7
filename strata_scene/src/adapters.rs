// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a spatial index straight from one primitive source, without a full scene.
//!
//! Each point adapter returns a fresh [`QuadTree`] over `bounds`. Points outside `bounds` are
//! skipped (and counted in a single log line) rather than tripping the tree's insertion
//! assertion. Mismatched parallel inputs produce an empty index and a warning; the `try_`
//! variants return an [`AdapterError`] instead.
//!
//! The box adapters bulk-load an [`RTree`] of world-space extents instead, for picking whole
//! rectangles or lines by area. They need no bounds.

use strata_index::{BoundingBox, QuadTree, RTree, RTreeEntry};
use strata_layout::SeriesLayout;

use crate::batches::{
    EntityId, RenderableGlyphBatch, RenderablePolyLineBatch, RenderableRectangleBatch, to_world,
};
use crate::raster::{RasterWindow, check_raster_inputs, raster_placements};

/// The index type every point adapter and scene produces.
pub type SceneIndex = QuadTree<f32, EntityId>;

/// Index of world-space extents produced by the box adapters.
pub type SceneBoxIndex = RTree<f32, EntityId>;

/// An endpoint closer than this fraction of the sampling interval to the last sample is
/// already covered by it.
const ENDPOINT_SLACK: f64 = 1.0e-3;

/// Why an adapter refused its input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AdapterError {
    /// A parallel array does not match the array it annotates.
    #[error("{what}: expected {expected} entries, got {actual}")]
    LengthMismatch {
        /// Which input was short or long.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Sampling interval that is zero, negative or not finite.
    #[error("sampling interval {0} must be positive and finite")]
    InvalidInterval(f32),
    /// Index bounds with max below min on some axis.
    #[error("index bounds are inverted")]
    EmptyBounds,
}

/// Inserts into a tree, counting points outside its bounds.
pub(crate) struct IndexFiller<'a> {
    tree: &'a mut SceneIndex,
    pub(crate) skipped: usize,
}

impl<'a> IndexFiller<'a> {
    pub(crate) fn new(tree: &'a mut SceneIndex) -> Self {
        Self { tree, skipped: 0 }
    }

    pub(crate) fn insert(&mut self, x: f32, y: f32, id: EntityId) {
        if self.tree.accepts(x, y) {
            self.tree.insert(x, y, id);
        } else {
            self.skipped += 1;
        }
    }

    pub(crate) fn report(&self, source: &str) {
        if self.skipped > 0 {
            log::warn!(
                "{source}: skipped {} points outside index bounds {:?}",
                self.skipped,
                self.tree.bounds()
            );
        }
    }
}

fn check_bounds(bounds: &BoundingBox<f32>) -> Result<(), AdapterError> {
    if bounds.is_empty() {
        Err(AdapterError::EmptyBounds)
    } else {
        Ok(())
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), AdapterError> {
    if expected == actual {
        Ok(())
    } else {
        Err(AdapterError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn or_empty(
    source: &str,
    bounds: BoundingBox<f32>,
    result: Result<SceneIndex, AdapterError>,
) -> SceneIndex {
    result.unwrap_or_else(|err| {
        log::warn!("{source}: {err}; returning an empty index");
        SceneIndex::new(bounds)
    })
}

/// Index pre-positioned world points.
pub fn try_event_index_from_positions(
    positions: &[[f32; 2]],
    ids: &[EntityId],
    bounds: BoundingBox<f32>,
) -> Result<SceneIndex, AdapterError> {
    check_bounds(&bounds)?;
    check_len("entity ids", positions.len(), ids.len())?;
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    for (&[x, y], &id) in positions.iter().zip(ids) {
        fill.insert(x, y, id);
    }
    fill.report("event index");
    Ok(tree)
}

/// Lenient [`try_event_index_from_positions`].
pub fn event_index_from_positions(
    positions: &[[f32; 2]],
    ids: &[EntityId],
    bounds: BoundingBox<f32>,
) -> SceneIndex {
    or_empty(
        "event index",
        bounds,
        try_event_index_from_positions(positions, ids, bounds),
    )
}

/// Index events of one stacked series: each at `(time, band center)`.
pub fn try_event_index_stacked(
    times: &[f32],
    ids: &[EntityId],
    layout: &SeriesLayout,
    bounds: BoundingBox<f32>,
) -> Result<SceneIndex, AdapterError> {
    check_bounds(&bounds)?;
    check_len("entity ids", times.len(), ids.len())?;
    let y = layout.y_transform.offset;
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    for (&t, &id) in times.iter().zip(ids) {
        fill.insert(t, y, id);
    }
    fill.report("stacked event index");
    Ok(tree)
}

/// Lenient [`try_event_index_stacked`].
pub fn event_index_stacked(
    times: &[f32],
    ids: &[EntityId],
    layout: &SeriesLayout,
    bounds: BoundingBox<f32>,
) -> SceneIndex {
    or_empty(
        "stacked event index",
        bounds,
        try_event_index_stacked(times, ids, layout, bounds),
    )
}

/// Index a raster: every row contributes every event inside `window`, at
/// `(time - trial_centers[row], row band center)`.
pub fn try_event_index_raster(
    times: &[f32],
    ids: &[EntityId],
    rows: &[SeriesLayout],
    trial_centers: &[f32],
    window: RasterWindow,
    bounds: BoundingBox<f32>,
) -> Result<SceneIndex, AdapterError> {
    check_bounds(&bounds)?;
    check_raster_inputs(times, ids, rows, trial_centers)?;
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    for (x, y, id) in raster_placements(times, ids, rows, trial_centers, window) {
        fill.insert(x, y, id);
    }
    fill.report("raster event index");
    Ok(tree)
}

/// Lenient [`try_event_index_raster`].
pub fn event_index_raster(
    times: &[f32],
    ids: &[EntityId],
    rows: &[SeriesLayout],
    trial_centers: &[f32],
    window: RasterWindow,
    bounds: BoundingBox<f32>,
) -> SceneIndex {
    or_empty(
        "raster event index",
        bounds,
        try_event_index_raster(times, ids, rows, trial_centers, window, bounds),
    )
}

/// Every glyph with a payload, at its world position.
pub(crate) fn fill_glyphs(fill: &mut IndexFiller<'_>, batch: &RenderableGlyphBatch) {
    for (i, &[x, y]) in batch.positions.iter().enumerate() {
        if let Some(id) = batch.entity_at(i) {
            let (wx, wy) = to_world(&batch.model_matrix, x, y);
            fill.insert(wx, wy, id);
        }
    }
}

/// Every rectangle with a payload, at its world center.
pub(crate) fn fill_rectangles(fill: &mut IndexFiller<'_>, batch: &RenderableRectangleBatch) {
    for i in 0..batch.len() {
        if let (Some(id), Some((cx, cy))) = (batch.entity_at(i), batch.center(i)) {
            let (wx, wy) = to_world(&batch.model_matrix, cx, cy);
            fill.insert(wx, wy, id);
        }
    }
}

/// Every vertex of every line with a payload.
pub(crate) fn fill_poly_line_vertices(fill: &mut IndexFiller<'_>, batch: &RenderablePolyLineBatch) {
    for line in 0..batch.line_count() {
        let Some(id) = batch.entity_at(line) else {
            continue;
        };
        for [x, y] in batch.line_vertices(line) {
            let (wx, wy) = to_world(&batch.model_matrix, x, y);
            fill.insert(wx, wy, id);
        }
    }
}

/// Index a glyph batch.
pub fn glyph_index(batch: &RenderableGlyphBatch, bounds: BoundingBox<f32>) -> SceneIndex {
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    fill_glyphs(&mut fill, batch);
    fill.report("glyph index");
    tree
}

/// Index a rectangle batch by rectangle centers.
pub fn rectangle_index(batch: &RenderableRectangleBatch, bounds: BoundingBox<f32>) -> SceneIndex {
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    fill_rectangles(&mut fill, batch);
    fill.report("rectangle index");
    tree
}

/// Index every polyline vertex.
pub fn poly_line_vertex_index(
    batch: &RenderablePolyLineBatch,
    bounds: BoundingBox<f32>,
) -> SceneIndex {
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    fill_poly_line_vertices(&mut fill, batch);
    fill.report("polyline vertex index");
    tree
}

/// Index points spaced `interval` apart in world arc length along each line, plus each
/// line's endpoints.
///
/// The final endpoint is skipped when the last sample already sits on it, up to rounding.
///
/// Keeps very long lines from flooding the index while still covering them evenly.
#[allow(
    clippy::cast_possible_truncation,
    reason = "interpolated points go back into the f32 world index"
)]
pub fn try_poly_line_sampled_index(
    batch: &RenderablePolyLineBatch,
    interval: f32,
    bounds: BoundingBox<f32>,
) -> Result<SceneIndex, AdapterError> {
    check_bounds(&bounds)?;
    if !(interval > 0.0 && interval.is_finite()) {
        return Err(AdapterError::InvalidInterval(interval));
    }
    let step = f64::from(interval);
    let mut tree = SceneIndex::new(bounds);
    let mut fill = IndexFiller::new(&mut tree);
    for line in 0..batch.line_count() {
        let Some(id) = batch.entity_at(line) else {
            continue;
        };
        let mut points = batch.line_vertices(line).map(|[x, y]| {
            batch.model_matrix * kurbo::Point::new(f64::from(x), f64::from(y))
        });
        let Some(first) = points.next() else {
            continue;
        };
        fill.insert(first.x as f32, first.y as f32, id);

        let mut prev = first;
        let mut travelled = 0.0;
        let mut last_sample = 0.0;
        let mut next = step;
        for p in points {
            let len = prev.distance(p);
            while next <= travelled + len {
                let s = prev.lerp(p, (next - travelled) / len);
                fill.insert(s.x as f32, s.y as f32, id);
                last_sample = next;
                next += step;
            }
            travelled += len;
            prev = p;
        }
        if travelled - last_sample > step * ENDPOINT_SLACK {
            fill.insert(prev.x as f32, prev.y as f32, id);
        }
    }
    fill.report("sampled polyline index");
    Ok(tree)
}

/// Lenient [`try_poly_line_sampled_index`].
pub fn poly_line_sampled_index(
    batch: &RenderablePolyLineBatch,
    interval: f32,
    bounds: BoundingBox<f32>,
) -> SceneIndex {
    or_empty(
        "sampled polyline index",
        bounds,
        try_poly_line_sampled_index(batch, interval, bounds),
    )
}

/// Every rectangle with a payload, by its world extent.
pub fn rectangle_box_index(batch: &RenderableRectangleBatch) -> SceneBoxIndex {
    SceneBoxIndex::bulk_load((0..batch.len()).filter_map(|i| {
        let id = batch.entity_at(i)?;
        let [x0, y0, x1, y1] = batch.world_rect(i)?;
        Some(RTreeEntry {
            bounds: BoundingBox::new(x0, y0, x1, y1),
            data: id,
        })
    }))
}

/// Every line with a payload, by the world extent of its vertices.
pub fn poly_line_box_index(batch: &RenderablePolyLineBatch) -> SceneBoxIndex {
    SceneBoxIndex::bulk_load((0..batch.line_count()).filter_map(|line| {
        let id = batch.entity_at(line)?;
        let mut world = batch
            .line_vertices(line)
            .map(|[x, y]| to_world(&batch.model_matrix, x, y));
        let (x, y) = world.next()?;
        let bounds = world.fold(BoundingBox::new(x, y, x, y), |b, (x, y)| {
            BoundingBox::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y))
        });
        Some(RTreeEntry { bounds, data: id })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batches::Color;
    use crate::raster::tests::{CENTERS, EVENTS, WINDOW, event_ids, trial_rows};
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::{Affine, Vec2};
    use strata_layout::SeriesLayoutResult;

    fn bounds() -> BoundingBox<f32> {
        BoundingBox::new(-1000.0, -2.0, 1000.0, 2.0)
    }

    #[test]
    fn raster_index_contains_every_row_copy() {
        let rows = trial_rows();
        let tree = event_index_raster(&EVENTS, &event_ids(), &rows, &CENTERS, WINDOW, bounds());
        assert_eq!(tree.len(), 14);

        let row1 = rows[1].y_transform.offset;
        let row2 = rows[2].y_transform.offset;
        let hit = tree.find_nearest(0.0, row1, 1.0).map(|p| p.data);
        assert_eq!(hit, Some(EntityId(4)));
        let hit = tree.find_nearest(-500.0, row2, 1.0).map(|p| p.data);
        assert_eq!(hit, Some(EntityId(4)));
    }

    #[test]
    fn stacked_events_sit_on_band_center() {
        let layout = SeriesLayout::new("ev", SeriesLayoutResult::new(0.5, 1.0), 0);
        let tree = event_index_stacked(
            &[10.0, 20.0],
            &[EntityId(1), EntityId(2)],
            &layout,
            bounds(),
        );
        let mut out = Vec::new();
        tree.query(&BoundingBox::new(-1000.0, 0.49, 1000.0, 0.51), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn mismatch_yields_empty_or_error() {
        let positions = [[0.0, 0.0], [1.0, 1.0]];
        let tree = event_index_from_positions(&positions, &[EntityId(1)], bounds());
        assert!(tree.is_empty());
        assert_eq!(
            try_event_index_from_positions(&positions, &[EntityId(1)], bounds()).unwrap_err(),
            AdapterError::LengthMismatch {
                what: "entity ids",
                expected: 2,
                actual: 1
            }
        );
        let inverted = BoundingBox::new(1.0, 1.0, -1.0, -1.0);
        assert_eq!(
            try_event_index_from_positions(&positions, &[EntityId(1), EntityId(2)], inverted)
                .unwrap_err(),
            AdapterError::EmptyBounds
        );
    }

    #[test]
    fn out_of_bounds_points_are_skipped() {
        let positions = [[0.0, 0.0], [5000.0, 0.0], [10.0, 1.0]];
        let ids = [EntityId(1), EntityId(2), EntityId(3)];
        let tree = event_index_from_positions(&positions, &ids, bounds());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn batch_indexes_apply_model_matrix() {
        let glyphs = RenderableGlyphBatch {
            positions: vec![[1.0, 0.0], [2.0, 0.0]],
            entity_ids: vec![EntityId(1), EntityId(2)],
            colors: vec![Color::WHITE; 2],
            model_matrix: Affine::translate(Vec2::new(100.0, 1.0)),
            ..Default::default()
        };
        let tree = glyph_index(&glyphs, bounds());
        assert_eq!(tree.find_nearest(102.0, 1.0, 0.1).map(|p| p.data), Some(EntityId(2)));

        let rects = RenderableRectangleBatch {
            bounds: vec![[0.0, -1.0, 100.0, 2.0]],
            entity_ids: vec![EntityId(7)],
            ..Default::default()
        };
        let tree = rectangle_index(&rects, bounds());
        let center = tree.iter().next().map(|p| (p.x, p.y, p.data));
        assert_eq!(center, Some((50.0, 0.0, EntityId(7))));
    }

    #[test]
    fn every_polyline_vertex_is_indexed() {
        let mut batch = RenderablePolyLineBatch::default();
        batch.push_line([[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]], Some(EntityId(1)));
        batch.push_line([[0.0, 1.0], [5.0, 1.0]], Some(EntityId(2)));
        let tree = poly_line_vertex_index(&batch, bounds());
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.find_nearest(5.0, 1.0, 0.5).map(|p| p.data), Some(EntityId(2)));

        // No per-line id and no batch id: nothing to report, nothing indexed.
        let anonymous = RenderablePolyLineBatch {
            vertices: vec![0.0, 0.0, 1.0, 1.0],
            ..Default::default()
        };
        assert!(poly_line_vertex_index(&anonymous, bounds()).is_empty());
    }

    #[test]
    fn sampled_index_spacing_and_endpoints() {
        let mut batch = RenderablePolyLineBatch::default();
        batch.push_line([[0.0, 0.0], [10.0, 0.0]], Some(EntityId(1)));
        let tree = poly_line_sampled_index(&batch, 2.5, bounds());
        let mut xs: Vec<f32> = tree.iter().map(|p| p.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);

        // Endpoint is added when the last sample falls short of it.
        let tree = poly_line_sampled_index(&batch, 4.0, bounds());
        let mut xs: Vec<f32> = tree.iter().map(|p| p.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![0.0, 4.0, 8.0, 10.0]);
    }

    #[test]
    fn sampled_index_follows_corners() {
        let mut batch = RenderablePolyLineBatch::default();
        batch.push_line([[0.0, 0.0], [3.0, 0.0], [3.0, 1.0]], Some(EntityId(1)));
        let tree = poly_line_sampled_index(&batch, 2.0, bounds());
        // 0, 2, then 4 lands one unit up the vertical leg, which is also the endpoint.
        assert_eq!(tree.len(), 3);
        assert!(tree.find_nearest(3.0, 1.0, 1.0e-3).is_some());
    }

    #[test]
    fn sampled_index_does_not_repeat_the_endpoint() {
        let mut batch = RenderablePolyLineBatch::default();
        batch.push_line((0..=100_u8).map(|i| [f32::from(i) * 0.1, 0.0]), Some(EntityId(1)));
        let tree = poly_line_sampled_index(&batch, 1.0, bounds());
        let mut xs: Vec<f32> = tree.iter().map(|p| p.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs.len(), 11);
        assert!(xs.windows(2).all(|w| w[1] - w[0] > 0.5));
        assert!((xs[10] - 10.0).abs() < 1.0e-4);
    }

    #[test]
    fn rectangle_boxes_match_a_scan() {
        let rects = RenderableRectangleBatch {
            bounds: (0..40_u8)
                .map(|i| [f32::from(i) * 5.0, -1.0, 8.0, f32::from(i % 4) * 0.5])
                .collect(),
            entity_ids: (0..40).map(EntityId).collect(),
            model_matrix: Affine::translate(Vec2::new(10.0, 0.0)),
            ..Default::default()
        };
        let tree = rectangle_box_index(&rects);
        // Zero-height rectangles are still indexed.
        assert_eq!(tree.len(), 40);

        let query = BoundingBox::new(52.0, -0.9, 81.0, 0.0);
        let mut out = Vec::new();
        tree.query(&query, &mut out);
        let mut got: Vec<EntityId> = out.iter().map(|e| e.data).collect();
        got.sort();
        let want: Vec<EntityId> = (0..rects.len())
            .filter(|&i| {
                let [x0, y0, x1, y1] = rects.world_rect(i).unwrap();
                BoundingBox::new(x0, y0, x1, y1).intersects(&query)
            })
            .filter_map(|i| rects.entity_at(i))
            .collect();
        assert!(!want.is_empty());
        assert_eq!(got, want);

        let mut under = Vec::new();
        tree.query_point(16.0, -0.7, &mut under);
        assert_eq!(under.iter().map(|e| e.data).collect::<Vec<_>>(), vec![EntityId(1)]);
    }

    #[test]
    fn line_boxes_use_per_line_ids() {
        let mut batch = RenderablePolyLineBatch {
            global_entity_id: Some(EntityId(100)),
            model_matrix: Affine::translate(Vec2::new(0.0, 1.0)),
            ..Default::default()
        };
        batch.push_line([[0.0, 0.0], [4.0, 1.0], [2.0, -1.0]], None);
        batch.push_line([[10.0, 0.0], [12.0, 0.5]], Some(EntityId(7)));
        batch.push_line(core::iter::empty(), Some(EntityId(8)));
        let tree = poly_line_box_index(&batch);
        assert_eq!(tree.len(), 2);

        let mut hits = Vec::new();
        tree.query_point(3.0, 1.5, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data, EntityId(100));
        assert_eq!(hits[0].bounds, BoundingBox::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(tree.find_nearest(13.0, 1.2, 1.5).map(|e| e.data), Some(EntityId(7)));
    }

    #[test]
    fn invalid_interval() {
        let batch = RenderablePolyLineBatch::default();
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = try_poly_line_sampled_index(&batch, bad, bounds()).unwrap_err();
            assert!(matches!(err, AdapterError::InvalidInterval(_)));
            assert!(poly_line_sampled_index(&batch, bad, bounds()).is_empty());
        }
    }
}
