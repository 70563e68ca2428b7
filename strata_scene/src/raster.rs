// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event rasters: the same event stream replayed once per trial row, aligned to each trial.

use alloc::vec::Vec;

use strata_layout::SeriesLayout;

use crate::adapters::AdapterError;
use crate::batches::{EntityId, GlyphStyle, RenderableGlyphBatch};

/// Time window around each trial center, inclusive at both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterWindow {
    /// Earliest relative time shown (usually negative).
    pub start: f32,
    /// Latest relative time shown.
    pub end: f32,
}

impl RasterWindow {
    /// `[start, end]`.
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Whether a relative time is inside the window.
    pub fn contains(&self, t: f32) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Check that parallel raster inputs line up.
pub(crate) fn check_raster_inputs(
    times: &[f32],
    ids: &[EntityId],
    rows: &[SeriesLayout],
    trial_centers: &[f32],
) -> Result<(), AdapterError> {
    if ids.len() != times.len() {
        return Err(AdapterError::LengthMismatch {
            what: "entity ids",
            expected: times.len(),
            actual: ids.len(),
        });
    }
    if trial_centers.len() != rows.len() {
        return Err(AdapterError::LengthMismatch {
            what: "trial centers",
            expected: rows.len(),
            actual: trial_centers.len(),
        });
    }
    Ok(())
}

/// Every `(relative_time, row_y, id)` of the raster, row by row, events in input order.
///
/// Inputs must already have passed [`check_raster_inputs`].
pub(crate) fn raster_placements<'a>(
    times: &'a [f32],
    ids: &'a [EntityId],
    rows: &'a [SeriesLayout],
    trial_centers: &'a [f32],
    window: RasterWindow,
) -> impl Iterator<Item = (f32, f32, EntityId)> + 'a {
    rows.iter()
        .zip(trial_centers)
        .flat_map(move |(row, &center)| {
            let y = row.y_transform.offset;
            times
                .iter()
                .zip(ids)
                .map(move |(&t, &id)| (t - center, y, id))
                .filter(move |&(rel, _, _)| window.contains(rel))
        })
}

/// Builds the glyph batch for an event raster.
///
/// Row `i` is placed at `rows[i]`'s band center and aligned so `trial_centers[i]` sits at x = 0.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterBuilder {
    /// Relative time window.
    pub window: RasterWindow,
    /// Appearance of every tick.
    pub style: GlyphStyle,
}

impl RasterBuilder {
    /// A raster over `window` drawn with ticks.
    pub fn new(window: RasterWindow) -> Self {
        Self {
            window,
            style: GlyphStyle {
                glyph_type: crate::GlyphType::Tick,
                ..GlyphStyle::default()
            },
        }
    }

    /// Same builder with a different style.
    pub fn with_style(mut self, style: GlyphStyle) -> Self {
        self.style = style;
        self
    }

    /// Build the batch, or report mismatched inputs.
    pub fn try_build(
        &self,
        times: &[f32],
        ids: &[EntityId],
        rows: &[SeriesLayout],
        trial_centers: &[f32],
    ) -> Result<RenderableGlyphBatch, AdapterError> {
        check_raster_inputs(times, ids, rows, trial_centers)?;
        let mut positions = Vec::new();
        let mut entity_ids = Vec::new();
        for (x, y, id) in raster_placements(times, ids, rows, trial_centers, self.window) {
            positions.push([x, y]);
            entity_ids.push(id);
        }
        let colors = alloc::vec![self.style.color; positions.len()];
        Ok(RenderableGlyphBatch {
            positions,
            entity_ids,
            colors,
            global_entity_id: None,
            glyph_type: self.style.glyph_type,
            size: self.style.size,
            model_matrix: self.style.model_matrix,
        })
    }

    /// Build the batch; mismatched inputs give an empty batch.
    pub fn build(
        &self,
        times: &[f32],
        ids: &[EntityId],
        rows: &[SeriesLayout],
        trial_centers: &[f32],
    ) -> RenderableGlyphBatch {
        self.try_build(times, ids, rows, trial_centers)
            .unwrap_or_else(|err| {
                log::warn!("raster batch not built: {err}");
                RenderableGlyphBatch {
                    glyph_type: self.style.glyph_type,
                    size: self.style.size,
                    model_matrix: self.style.model_matrix,
                    ..RenderableGlyphBatch::default()
                }
            })
    }
}
