// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive batches: the GPU-facing geometry of a scene.
//!
//! Each batch is a single draw call's worth of one primitive kind. Geometry is stored in model
//! space as flat `f32` arrays; the batch's `model_matrix` places it in world space.

use alloc::vec::Vec;
use kurbo::{Affine, Point};

/// Opaque payload identifying the data element a primitive came from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

/// Linear RGBA.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub [f32; 4]);

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);

    /// From components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Shape drawn for each glyph instance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphType {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled square.
    Square,
    /// Vertical tick, as in event rasters.
    Tick,
    /// Diagonal cross.
    Cross,
}

bitflags::bitflags! {
    /// Which batch kinds are inserted into a scene's spatial index.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PickableKinds: u8 {
        /// Every vertex of every polyline.
        const POLYLINES  = 0b0000_0001;
        /// Every glyph position.
        const GLYPHS     = 0b0000_0010;
        /// Every rectangle center.
        const RECTANGLES = 0b0000_0100;
    }
}

impl Default for PickableKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Model-space point to world space.
#[allow(
    clippy::cast_possible_truncation,
    reason = "world geometry is f32; the transform runs in f64 only for precision"
)]
pub(crate) fn to_world(model: &Affine, x: f32, y: f32) -> (f32, f32) {
    let p = *model * Point::new(f64::from(x), f64::from(y));
    (p.x as f32, p.y as f32)
}

/// A set of polylines sharing thickness, color and placement.
///
/// `vertices` is `[x0, y0, x1, y1, …]`. Line `i` covers vertices
/// `line_start_indices[i] .. line_start_indices[i] + line_vertex_counts[i]`, counted in
/// vertices, not floats. When the topology arrays are empty, all vertices form one line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderablePolyLineBatch {
    /// Interleaved model-space coordinates.
    pub vertices: Vec<f32>,
    /// First vertex of each line.
    pub line_start_indices: Vec<u32>,
    /// Vertex count of each line.
    pub line_vertex_counts: Vec<u32>,
    /// Per-line payloads, index-aligned with the lines. Empty means every line uses
    /// `global_entity_id`, as does a `None` entry or a line past the end of this table.
    pub entity_ids: Vec<Option<EntityId>>,
    /// Payload for lines without their own.
    pub global_entity_id: Option<EntityId>,
    /// Stroke width in pixels.
    pub thickness: f32,
    /// Stroke color.
    pub color: Color,
    /// Model space → world space.
    pub model_matrix: Affine,
}

impl Default for RenderablePolyLineBatch {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            line_start_indices: Vec::new(),
            line_vertex_counts: Vec::new(),
            entity_ids: Vec::new(),
            global_entity_id: None,
            thickness: 1.0,
            color: Color::WHITE,
            model_matrix: Affine::IDENTITY,
        }
    }
}

impl RenderablePolyLineBatch {
    /// Append a line, returning its index.
    ///
    /// The per-line table stays empty while no line has its own id. Once one does, earlier
    /// lines are padded with `None` so `entity_ids[i]` always belongs to line `i`.
    pub fn push_line(
        &mut self,
        points: impl IntoIterator<Item = [f32; 2]>,
        entity_id: Option<EntityId>,
    ) -> usize {
        let start = self.vertex_count();
        if self.line_start_indices.is_empty() && start > 0 {
            // Make the implicit single line explicit before appending.
            self.line_start_indices.push(0);
            self.line_vertex_counts
                .push(u32::try_from(start).unwrap_or(u32::MAX));
        }
        for [x, y] in points {
            self.vertices.push(x);
            self.vertices.push(y);
        }
        let count = self.vertex_count() - start;
        self.line_start_indices
            .push(u32::try_from(start).unwrap_or(u32::MAX));
        self.line_vertex_counts
            .push(u32::try_from(count).unwrap_or(u32::MAX));
        let line = self.line_count() - 1;
        if entity_id.is_some() || !self.entity_ids.is_empty() {
            self.entity_ids.resize(line, None);
            self.entity_ids.push(entity_id);
        }
        line
    }

    /// Total vertices across all lines.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        if self.line_start_indices.is_empty() {
            usize::from(self.vertex_count() > 0)
        } else {
            self.line_start_indices.len()
        }
    }

    /// Vertex range of line `line`, clamped to the vertex buffer.
    pub fn line_range(&self, line: usize) -> Option<core::ops::Range<usize>> {
        let total = self.vertex_count();
        if self.line_start_indices.is_empty() {
            return (line == 0 && total > 0).then_some(0..total);
        }
        let start = *self.line_start_indices.get(line)? as usize;
        let count = self.line_vertex_counts.get(line).map_or(0, |&c| c as usize);
        let start = start.min(total);
        Some(start..(start + count).min(total))
    }

    /// Model-space vertices of line `line`.
    pub fn line_vertices(&self, line: usize) -> impl Iterator<Item = [f32; 2]> + '_ {
        let range = self.line_range(line).unwrap_or(0..0);
        self.vertices[2 * range.start..2 * range.end]
            .chunks_exact(2)
            .map(|c| [c[0], c[1]])
    }

    /// Payload of line `line`: its own id, else the batch id.
    pub fn entity_at(&self, line: usize) -> Option<EntityId> {
        self.entity_ids
            .get(line)
            .copied()
            .flatten()
            .or(self.global_entity_id)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.line_count()
    }

    /// Whether there is no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Instanced markers sharing a shape and size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderableGlyphBatch {
    /// Model-space center of each glyph.
    pub positions: Vec<[f32; 2]>,
    /// Per-glyph payloads. Empty means every glyph uses `global_entity_id`.
    pub entity_ids: Vec<EntityId>,
    /// Per-glyph colors.
    pub colors: Vec<Color>,
    /// Payload for glyphs without their own.
    pub global_entity_id: Option<EntityId>,
    /// Marker shape.
    pub glyph_type: GlyphType,
    /// Marker size in pixels.
    pub size: f32,
    /// Model space → world space.
    pub model_matrix: Affine,
}

impl Default for RenderableGlyphBatch {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            entity_ids: Vec::new(),
            colors: Vec::new(),
            global_entity_id: None,
            glyph_type: GlyphType::Circle,
            size: 5.0,
            model_matrix: Affine::IDENTITY,
        }
    }
}

impl RenderableGlyphBatch {
    /// Payload of glyph `i`.
    pub fn entity_at(&self, i: usize) -> Option<EntityId> {
        self.entity_ids.get(i).copied().or(self.global_entity_id)
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no glyphs.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Instanced axis-aligned rectangles, typically intervals.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderableRectangleBatch {
    /// `[x, y, width, height]` per rectangle in model space; `(x, y)` is the min corner.
    pub bounds: Vec<[f32; 4]>,
    /// Per-rectangle payloads.
    pub entity_ids: Vec<EntityId>,
    /// Per-rectangle colors.
    pub colors: Vec<Color>,
    /// Per-rectangle selection state, filled in when a scene is built.
    pub selection_flags: Vec<bool>,
    /// Model space → world space.
    pub model_matrix: Affine,
}

impl RenderableRectangleBatch {
    /// Payload of rectangle `i`.
    pub fn entity_at(&self, i: usize) -> Option<EntityId> {
        self.entity_ids.get(i).copied()
    }

    /// Model-space center of rectangle `i`.
    pub fn center(&self, i: usize) -> Option<(f32, f32)> {
        self.bounds
            .get(i)
            .map(|&[x, y, w, h]| (x + 0.5 * w, y + 0.5 * h))
    }

    /// World-space `(x0, y0, x1, y1)` of rectangle `i`, normalized so `x0 <= x1` and `y0 <= y1`.
    pub fn world_rect(&self, i: usize) -> Option<[f32; 4]> {
        let [x, y, w, h] = *self.bounds.get(i)?;
        let (ax, ay) = to_world(&self.model_matrix, x, y);
        let (bx, by) = to_world(&self.model_matrix, x + w, y + h);
        Some([ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)])
    }

    /// Number of rectangles.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Whether there are no rectangles.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Glyph appearance for [`SceneBuilder::add_glyphs`](crate::SceneBuilder::add_glyphs).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphStyle {
    /// Marker shape.
    pub glyph_type: GlyphType,
    /// Marker size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Placement.
    pub model_matrix: Affine,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            glyph_type: GlyphType::Circle,
            size: 5.0,
            color: Color::WHITE,
            model_matrix: Affine::IDENTITY,
        }
    }
}

/// Rectangle appearance.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectangleStyle {
    /// Fill color.
    pub color: Color,
    /// Placement.
    pub model_matrix: Affine,
}

impl Default for RectangleStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            model_matrix: Affine::IDENTITY,
        }
    }
}

/// Polyline appearance.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolyLineStyle {
    /// Stroke width in pixels.
    pub thickness: f32,
    /// Stroke color.
    pub color: Color,
    /// Placement.
    pub model_matrix: Affine,
}

impl Default for PolyLineStyle {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: Color::WHITE,
            model_matrix: Affine::IDENTITY,
        }
    }
}
