// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The finished scene handed to the renderer and the interaction layer.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Affine;

use crate::adapters::SceneIndex;
use crate::batches::{
    EntityId, RenderableGlyphBatch, RenderablePolyLineBatch, RenderableRectangleBatch,
};

/// Everything needed to draw and hit-test one frame.
///
/// Produced by [`SceneBuilder::build`](crate::SceneBuilder::build). A scene is a frozen value; a
/// host may keep the previous frame's scene for queries while building the next one.
#[derive(Clone, Debug, Default)]
pub struct RenderableScene {
    /// Polyline batches in insertion order.
    pub poly_line_batches: Vec<RenderablePolyLineBatch>,
    /// Glyph batches in insertion order.
    pub glyph_batches: Vec<RenderableGlyphBatch>,
    /// Rectangle batches in insertion order.
    pub rectangle_batches: Vec<RenderableRectangleBatch>,
    /// World → camera.
    pub view_matrix: Affine,
    /// Camera → NDC.
    pub projection_matrix: Affine,
    /// Index over the pickable batches, when one was built.
    pub spatial_index: Option<SceneIndex>,
    /// Payload → series key, for entities added through the keyed builder methods.
    pub entity_to_series_key: BTreeMap<EntityId, String>,
    /// Rectangle batch index → series key.
    pub rectangle_batch_keys: BTreeMap<usize, String>,
    /// Glyph batch index → series key.
    pub glyph_batch_keys: BTreeMap<usize, String>,
    /// Polyline batch index → series key.
    pub poly_line_batch_keys: BTreeMap<usize, String>,
    /// Entities marked selected when the scene was built.
    pub selected_entities: BTreeSet<EntityId>,
}

impl RenderableScene {
    /// Whether the scene has no batches.
    pub fn is_empty(&self) -> bool {
        self.poly_line_batches.is_empty()
            && self.glyph_batches.is_empty()
            && self.rectangle_batches.is_empty()
    }

    /// Series an entity belongs to, if it was added with a key.
    pub fn series_key_for(&self, entity: EntityId) -> Option<&str> {
        self.entity_to_series_key.get(&entity).map(String::as_str)
    }

    /// Whether `entity` was selected at build time.
    pub fn is_selected(&self, entity: EntityId) -> bool {
        self.selected_entities.contains(&entity)
    }

    /// Number of indexed points (zero without an index).
    pub fn indexed_point_count(&self) -> usize {
        self.spatial_index.as_ref().map_or(0, SceneIndex::len)
    }
}
