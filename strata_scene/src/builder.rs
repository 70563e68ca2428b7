// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fluent accumulation of batches into a [`RenderableScene`].

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use kurbo::Affine;
use strata_index::BoundingBox;
use strata_view::{ViewState, sanitize};

use crate::adapters::{
    IndexFiller, SceneIndex, fill_glyphs, fill_poly_line_vertices, fill_rectangles,
};
use crate::batches::{
    EntityId, GlyphStyle, PickableKinds, PolyLineStyle, RectangleStyle, RenderableGlyphBatch,
    RenderablePolyLineBatch, RenderableRectangleBatch,
};
use crate::scene::RenderableScene;

/// One positioned point with its payload, as produced by a series mapper.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MappedElement {
    /// Model-space X.
    pub x: f32,
    /// Model-space Y.
    pub y: f32,
    /// Payload.
    pub entity_id: EntityId,
}

/// One positioned rectangle with its payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MappedRect {
    /// Min-corner X.
    pub x: f32,
    /// Min-corner Y.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Payload.
    pub entity_id: EntityId,
}

/// One line of a multi-line series with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedLine<V = Vec<[f32; 2]>> {
    /// Payload for every vertex of the line.
    pub entity_id: EntityId,
    /// Model-space vertices, in drawing order.
    pub vertices: V,
}

/// Batch counts by kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchCounts {
    /// Polyline batches.
    pub poly_lines: usize,
    /// Glyph batches.
    pub glyphs: usize,
    /// Rectangle batches.
    pub rectangles: usize,
}

/// Accumulates batches, then moves them out as a [`RenderableScene`].
///
/// Every mutator returns `&mut Self` for chaining. [`build`](Self::build) transfers everything
/// to the caller and leaves the builder empty, so a second `build` without new batches returns
/// an empty scene.
///
/// ```
/// use strata_index::BoundingBox;
/// use strata_scene::{EntityId, GlyphStyle, MappedElement, SceneBuilder};
///
/// let mut builder = SceneBuilder::new();
/// builder
///     .set_bounds(BoundingBox::new(0.0, -1.0, 100.0, 1.0))
///     .add_glyphs(
///         "spikes",
///         [10.0_f32, 20.0].map(|x| MappedElement { x, y: 0.0, entity_id: EntityId(x as u64) }),
///         &GlyphStyle::default(),
///     );
/// let scene = builder.build();
///
/// let index = scene.spatial_index.as_ref().unwrap();
/// let hit = index.find_nearest(19.0, 0.0, 2.0).unwrap();
/// assert_eq!(scene.series_key_for(hit.data), Some("spikes"));
/// assert!(builder.build().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    scene: RenderableScene,
    bounds: Option<BoundingBox<f32>>,
    pickable: PickableKinds,
    selected: BTreeSet<EntityId>,
}

impl SceneBuilder {
    /// An empty builder with identity matrices and every batch kind pickable.
    pub fn new() -> Self {
        Self::default()
    }

    /// World bounds of the spatial index that [`build`](Self::build) creates when no index was
    /// built explicitly.
    pub fn set_bounds(&mut self, bounds: BoundingBox<f32>) -> &mut Self {
        self.bounds = Some(bounds);
        self
    }

    /// Take view and projection from a camera.
    pub fn set_view_state(&mut self, view: &ViewState) -> &mut Self {
        let m = view.matrices();
        self.set_matrices(m.view, m.projection)
    }

    /// Set view and projection directly. Non-finite matrices are replaced by the identity.
    pub fn set_matrices(&mut self, view: Affine, projection: Affine) -> &mut Self {
        self.scene.view_matrix = sanitize(view);
        self.scene.projection_matrix = sanitize(projection);
        self
    }

    /// Entities to flag as selected in rectangle batches at build time.
    pub fn set_selected_entities(
        &mut self,
        selected: impl IntoIterator<Item = EntityId>,
    ) -> &mut Self {
        self.selected = selected.into_iter().collect();
        self
    }

    /// Which batch kinds go into the spatial index.
    pub fn set_pickable_kinds(&mut self, kinds: PickableKinds) -> &mut Self {
        self.pickable = kinds;
        self
    }

    /// Append a polyline batch.
    pub fn add_poly_line_batch(&mut self, batch: RenderablePolyLineBatch) -> &mut Self {
        self.scene.poly_line_batches.push(batch);
        self
    }

    /// Append a copy of a polyline batch.
    pub fn add_poly_line_batch_cloned(&mut self, batch: &RenderablePolyLineBatch) -> &mut Self {
        self.add_poly_line_batch(batch.clone())
    }

    /// Append a glyph batch.
    pub fn add_glyph_batch(&mut self, batch: RenderableGlyphBatch) -> &mut Self {
        self.scene.glyph_batches.push(batch);
        self
    }

    /// Append a copy of a glyph batch.
    pub fn add_glyph_batch_cloned(&mut self, batch: &RenderableGlyphBatch) -> &mut Self {
        self.add_glyph_batch(batch.clone())
    }

    /// Append a rectangle batch.
    pub fn add_rectangle_batch(&mut self, batch: RenderableRectangleBatch) -> &mut Self {
        self.scene.rectangle_batches.push(batch);
        self
    }

    /// Append a copy of a rectangle batch.
    pub fn add_rectangle_batch_cloned(&mut self, batch: &RenderableRectangleBatch) -> &mut Self {
        self.add_rectangle_batch(batch.clone())
    }

    fn record_key(&mut self, entity: EntityId, series_key: &str) {
        self.scene
            .entity_to_series_key
            .insert(entity, String::from(series_key));
    }

    /// Add one glyph batch for a series, remembering which series each entity belongs to.
    pub fn add_glyphs(
        &mut self,
        series_key: &str,
        elements: impl IntoIterator<Item = MappedElement>,
        style: &GlyphStyle,
    ) -> &mut Self {
        let mut batch = RenderableGlyphBatch {
            glyph_type: style.glyph_type,
            size: style.size,
            model_matrix: style.model_matrix,
            ..RenderableGlyphBatch::default()
        };
        for e in elements {
            batch.positions.push([e.x, e.y]);
            batch.entity_ids.push(e.entity_id);
            batch.colors.push(style.color);
            self.record_key(e.entity_id, series_key);
        }
        let index = self.scene.glyph_batches.len();
        self.scene
            .glyph_batch_keys
            .insert(index, String::from(series_key));
        self.add_glyph_batch(batch)
    }

    /// Add one rectangle batch for a series.
    pub fn add_rectangles(
        &mut self,
        series_key: &str,
        elements: impl IntoIterator<Item = MappedRect>,
        style: &RectangleStyle,
    ) -> &mut Self {
        let mut batch = RenderableRectangleBatch {
            model_matrix: style.model_matrix,
            ..RenderableRectangleBatch::default()
        };
        for e in elements {
            batch.bounds.push([e.x, e.y, e.width, e.height]);
            batch.entity_ids.push(e.entity_id);
            batch.colors.push(style.color);
            self.record_key(e.entity_id, series_key);
        }
        let index = self.scene.rectangle_batches.len();
        self.scene
            .rectangle_batch_keys
            .insert(index, String::from(series_key));
        self.add_rectangle_batch(batch)
    }

    /// Add a single continuous line for a series.
    pub fn add_poly_line(
        &mut self,
        series_key: &str,
        vertices: impl IntoIterator<Item = [f32; 2]>,
        entity_id: EntityId,
        style: &PolyLineStyle,
    ) -> &mut Self {
        self.add_poly_lines(
            series_key,
            [MappedLine {
                entity_id,
                vertices,
            }],
            style,
        )
    }

    /// Add one polyline batch holding several lines of a series, each with its own payload.
    pub fn add_poly_lines<V>(
        &mut self,
        series_key: &str,
        lines: impl IntoIterator<Item = MappedLine<V>>,
        style: &PolyLineStyle,
    ) -> &mut Self
    where
        V: IntoIterator<Item = [f32; 2]>,
    {
        let mut batch = RenderablePolyLineBatch {
            thickness: style.thickness,
            color: style.color,
            model_matrix: style.model_matrix,
            ..RenderablePolyLineBatch::default()
        };
        for line in lines {
            batch.push_line(line.vertices, Some(line.entity_id));
            self.record_key(line.entity_id, series_key);
        }
        let index = self.scene.poly_line_batches.len();
        self.scene
            .poly_line_batch_keys
            .insert(index, String::from(series_key));
        self.add_poly_line_batch(batch)
    }

    /// Rebuild the spatial index over every pickable batch, in insertion order.
    ///
    /// Each coordinate goes through its batch's model matrix. Points outside `bounds` are left
    /// out of the index and reported in one warning.
    pub fn build_spatial_index(&mut self, bounds: BoundingBox<f32>) -> &mut Self {
        let mut tree = SceneIndex::new(bounds);
        let mut fill = IndexFiller::new(&mut tree);
        if self.pickable.contains(PickableKinds::POLYLINES) {
            for batch in &self.scene.poly_line_batches {
                fill_poly_line_vertices(&mut fill, batch);
            }
        }
        if self.pickable.contains(PickableKinds::GLYPHS) {
            for batch in &self.scene.glyph_batches {
                fill_glyphs(&mut fill, batch);
            }
        }
        if self.pickable.contains(PickableKinds::RECTANGLES) {
            for batch in &self.scene.rectangle_batches {
                fill_rectangles(&mut fill, batch);
            }
        }
        fill.report("scene index");
        log::trace!("scene index rebuilt with {} points", tree.len());
        self.scene.spatial_index = Some(tree);
        self
    }

    /// Whether an index has been built since the last [`build`](Self::build).
    pub fn has_spatial_index(&self) -> bool {
        self.scene.spatial_index.is_some()
    }

    /// Batches accumulated so far.
    pub fn batch_counts(&self) -> BatchCounts {
        BatchCounts {
            poly_lines: self.scene.poly_line_batches.len(),
            glyphs: self.scene.glyph_batches.len(),
            rectangles: self.scene.rectangle_batches.len(),
        }
    }

    /// Rectangle batch index → series key.
    pub fn rectangle_batch_keys(&self) -> &alloc::collections::BTreeMap<usize, String> {
        &self.scene.rectangle_batch_keys
    }

    /// Glyph batch index → series key.
    pub fn glyph_batch_keys(&self) -> &alloc::collections::BTreeMap<usize, String> {
        &self.scene.glyph_batch_keys
    }

    /// Move the accumulated scene out and reset the builder.
    ///
    /// If bounds were set and no index was built, one is built now. Rectangle selection flags
    /// are filled from the selected entities.
    pub fn build(&mut self) -> RenderableScene {
        if self.scene.spatial_index.is_none()
            && let Some(bounds) = self.bounds
            && !self.scene.is_empty()
        {
            self.build_spatial_index(bounds);
        }
        for batch in &mut self.scene.rectangle_batches {
            batch.selection_flags = batch
                .entity_ids
                .iter()
                .map(|id| self.selected.contains(id))
                .collect::<Vec<_>>();
        }
        self.scene.selected_entities = mem::take(&mut self.selected);
        let scene = mem::take(&mut self.scene);
        self.reset();
        log::debug!(
            "built scene: {} polyline, {} glyph, {} rectangle batches, {} indexed points",
            scene.poly_line_batches.len(),
            scene.glyph_batches.len(),
            scene.rectangle_batches.len(),
            scene.indexed_point_count()
        );
        scene
    }

    /// Drop everything accumulated, including bounds and selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batches::Color;
    use alloc::vec;
    use kurbo::{Rect, Vec2};

    fn bounds() -> BoundingBox<f32> {
        BoundingBox::new(-10.0, -2.0, 350.0, 2.0)
    }

    fn spikes(xs: &[f32], first_id: u64) -> Vec<MappedElement> {
        xs.iter()
            .zip(first_id..)
            .map(|(&x, id)| MappedElement {
                x,
                y: 0.5,
                entity_id: EntityId(id),
            })
            .collect()
    }

    #[test]
    fn second_build_is_empty() {
        let mut builder = SceneBuilder::new();
        builder
            .add_glyphs("a", spikes(&[1.0, 2.0], 0), &GlyphStyle::default())
            .build_spatial_index(bounds());
        let first = builder.build();
        assert_eq!(first.glyph_batches.len(), 1);
        assert_eq!(first.indexed_point_count(), 2);

        let second = builder.build();
        assert!(second.is_empty());
        assert!(second.spatial_index.is_none());
        assert!(second.entity_to_series_key.is_empty());
        assert_eq!(builder.batch_counts(), BatchCounts::default());
    }

    #[test]
    fn keyed_helpers_record_series() {
        let mut builder = SceneBuilder::new();
        builder
            .set_bounds(bounds())
            .add_glyphs("events", spikes(&[10.0, 20.0], 0), &GlyphStyle::default())
            .add_rectangles(
                "trials",
                [MappedRect {
                    x: 100.0,
                    y: -1.0,
                    width: 50.0,
                    height: 2.0,
                    entity_id: EntityId(50),
                }],
                &RectangleStyle::default(),
            )
            .add_poly_line(
                "lfp",
                [[200.0, 0.0], [210.0, 1.0]],
                EntityId(99),
                &PolyLineStyle::default(),
            );
        assert_eq!(builder.rectangle_batch_keys().get(&0).map(String::as_str), Some("trials"));
        assert_eq!(builder.glyph_batch_keys().get(&0).map(String::as_str), Some("events"));
        let scene = builder.build();

        assert_eq!(scene.series_key_for(EntityId(1)), Some("events"));
        assert_eq!(scene.series_key_for(EntityId(50)), Some("trials"));
        assert_eq!(scene.series_key_for(EntityId(99)), Some("lfp"));
        assert_eq!(scene.series_key_for(EntityId(7)), None);
        assert_eq!(scene.poly_line_batch_keys.get(&0).map(String::as_str), Some("lfp"));

        // Built implicitly from the bounds: 2 glyphs, 1 rectangle center, 2 vertices.
        let index = scene.spatial_index.as_ref().unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(index.find_nearest(125.0, 0.0, 1.0).map(|p| p.data), Some(EntityId(50)));
        assert_eq!(index.find_nearest(210.0, 1.0, 1.0).map(|p| p.data), Some(EntityId(99)));
    }

    #[test]
    fn multi_line_series_keeps_per_line_ids() {
        let lines = [
            MappedLine {
                entity_id: EntityId(11),
                vertices: vec![[0.0, 0.0], [10.0, 0.0]],
            },
            MappedLine {
                entity_id: EntityId(12),
                vertices: vec![[0.0, 1.0], [10.0, 1.0], [20.0, 1.0]],
            },
        ];
        let mut builder = SceneBuilder::new();
        builder
            .add_poly_lines("trials", lines, &PolyLineStyle::default())
            .add_poly_line("lfp", [[0.0, -1.0]], EntityId(13), &PolyLineStyle::default())
            .build_spatial_index(bounds());
        let scene = builder.build();

        let batch = &scene.poly_line_batches[0];
        assert_eq!(batch.line_count(), 2);
        assert_eq!(batch.global_entity_id, None);
        assert_eq!(batch.entity_at(0), Some(EntityId(11)));
        assert_eq!(batch.entity_at(1), Some(EntityId(12)));
        assert_eq!(batch.line_range(1), Some(2..5));

        // A single line carries its id per line only.
        let single = &scene.poly_line_batches[1];
        assert_eq!(single.global_entity_id, None);
        assert_eq!(single.entity_ids, vec![Some(EntityId(13))]);

        assert_eq!(scene.series_key_for(EntityId(12)), Some("trials"));
        assert_eq!(scene.series_key_for(EntityId(13)), Some("lfp"));
        assert_eq!(scene.poly_line_batch_keys.get(&0).map(String::as_str), Some("trials"));
        let index = scene.spatial_index.as_ref().unwrap();
        assert_eq!(index.len(), 6);
        assert_eq!(index.find_nearest(20.0, 1.0, 0.5).map(|p| p.data), Some(EntityId(12)));
        assert_eq!(index.find_nearest(10.0, 0.0, 0.5).map(|p| p.data), Some(EntityId(11)));
    }

    #[test]
    fn index_applies_model_matrices() {
        let style = GlyphStyle {
            model_matrix: Affine::translate(Vec2::new(100.0, 0.0)),
            ..GlyphStyle::default()
        };
        let mut builder = SceneBuilder::new();
        builder
            .add_glyphs("shifted", spikes(&[5.0], 3), &style)
            .build_spatial_index(bounds());
        let scene = builder.build();
        let index = scene.spatial_index.as_ref().unwrap();
        assert!(index.find_nearest(5.0, 0.5, 1.0).is_none());
        assert_eq!(index.find_nearest(105.0, 0.5, 1.0).map(|p| p.data), Some(EntityId(3)));
    }

    #[test]
    fn pickable_kinds_filter_index() {
        let mut builder = SceneBuilder::new();
        builder
            .add_glyphs("g", spikes(&[1.0], 0), &GlyphStyle::default())
            .add_poly_line("l", [[0.0, 0.0], [1.0, 1.0]], EntityId(9), &PolyLineStyle::default())
            .set_pickable_kinds(PickableKinds::GLYPHS)
            .build_spatial_index(bounds());
        assert!(builder.has_spatial_index());
        assert_eq!(builder.build().indexed_point_count(), 1);
    }

    #[test]
    fn out_of_bounds_points_are_skipped() {
        let mut builder = SceneBuilder::new();
        builder
            .add_glyphs("g", spikes(&[1.0, 1000.0, 2.0], 0), &GlyphStyle::default())
            .build_spatial_index(bounds());
        assert_eq!(builder.build().indexed_point_count(), 2);
    }

    #[test]
    fn batches_keep_insertion_order_and_move_or_copy() {
        let a = RenderableGlyphBatch {
            positions: vec![[0.0, 0.0]],
            size: 1.0,
            ..Default::default()
        };
        let b = RenderableGlyphBatch {
            size: 2.0,
            ..a.clone()
        };
        let mut builder = SceneBuilder::new();
        builder.add_glyph_batch_cloned(&a).add_glyph_batch(b);
        assert_eq!(a.size, 1.0);
        let scene = builder.build();
        assert_eq!(scene.glyph_batches[0].size, 1.0);
        assert_eq!(scene.glyph_batches[1].size, 2.0);
        // No bounds and no explicit index: nothing to index against.
        assert!(scene.spatial_index.is_none());
    }

    #[test]
    fn selection_flags_and_matrices() {
        let rects = RenderableRectangleBatch {
            bounds: vec![[0.0, 0.0, 1.0, 1.0], [2.0, 0.0, 1.0, 1.0]],
            entity_ids: vec![EntityId(1), EntityId(2)],
            colors: vec![Color::WHITE; 2],
            ..Default::default()
        };
        let view = ViewState::new(Rect::new(0.0, -1.0, 1000.0, 1.0), 800, 600);
        let mut builder = SceneBuilder::new();
        builder
            .set_view_state(&view)
            .set_selected_entities([EntityId(2)])
            .add_rectangle_batch_cloned(&rects);
        let scene = builder.build();
        assert_eq!(scene.rectangle_batches[0].selection_flags, [false, true]);
        assert!(scene.is_selected(EntityId(2)));
        assert_eq!(scene.projection_matrix, view.matrices().projection);

        let mut builder = SceneBuilder::new();
        builder.set_matrices(Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]), Affine::scale(2.0));
        let scene = builder.build();
        assert_eq!(scene.view_matrix, Affine::IDENTITY);
        assert_eq!(scene.projection_matrix, Affine::scale(2.0));
    }

    #[test]
    fn resize_rebuild_keeps_only_contained_points() {
        let (times, values) = crate::gaps::tests::two_runs();
        let batch = crate::GapDetector::with_time_threshold(50.0).segment(&times, &values, EntityId(1));
        let mut builder = SceneBuilder::new();
        builder.add_poly_line_batch_cloned(&batch).build_spatial_index(bounds());
        assert_eq!(builder.build().indexed_point_count(), 202);

        // Narrower viewport after a resize.
        let narrow = BoundingBox::new(50.0, -2.0, 250.0, 2.0);
        let expected = times
            .iter()
            .zip(&values)
            .filter(|&(&t, &v)| narrow.contains_point(t, v))
            .count();
        let mut builder = SceneBuilder::new();
        builder.add_poly_line_batch(batch).build_spatial_index(narrow);
        let scene = builder.build();
        assert_eq!(scene.indexed_point_count(), expected);
        assert_eq!(expected, 102);
        let index = scene.spatial_index.as_ref().unwrap();
        assert!(index.iter().all(|p| narrow.contains_point(p.x, p.y)));
    }
}
