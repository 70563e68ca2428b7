// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout strategies.
//!
//! - `stacked`: stackable series share the viewport equally; the rest span all of it.
//! - `row`: every series gets an equal row, ignoring the stackable flag.
//! - `spatial`: a 2D fit/fill transform for spatial data; series all get the full viewport.
//!
//! Stacked and row use the same band formula. For `n` bands over `[y_min, y_max]` with
//! `h = (y_max - y_min) / n`, band `i` has height `h` and center `y_min + h * (i + 0.5)`.

use alloc::vec::Vec;

use crate::types::{LayoutRequest, LayoutResponse, SeriesLayout, SeriesLayoutResult};

pub mod row;
pub mod spatial;
pub mod stacked;

pub use row::RowLayoutStrategy;
pub use spatial::{
    SpatialLayoutConfig, SpatialLayoutMode, SpatialLayoutResult, SpatialLayoutStrategy,
    SpatialTransform,
};
pub use stacked::StackedLayoutStrategy;

/// Band `index` of `count` equal bands over the request viewport.
///
/// The height is not clamped, so an inverted viewport yields negative heights.
#[allow(
    clippy::cast_precision_loss,
    reason = "series counts are far below f32's exact integer range"
)]
pub(crate) fn equal_band(request: &LayoutRequest, index: usize, count: usize) -> SeriesLayoutResult {
    let height = request.viewport_height() / count as f32;
    SeriesLayoutResult::new(
        request.viewport_y_min + height * (index as f32 + 0.5),
        height,
    )
}

/// The whole viewport as one band.
pub(crate) fn full_canvas(request: &LayoutRequest) -> SeriesLayoutResult {
    SeriesLayoutResult::new(request.viewport_center(), request.viewport_height())
}

/// Build a response by asking `place` for each series' band, in request order.
pub(crate) fn respond_with(
    request: &LayoutRequest,
    mut place: impl FnMut(usize) -> SeriesLayoutResult,
) -> LayoutResponse {
    let layouts: Vec<SeriesLayout> = request
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| SeriesLayout::new(s.id.clone(), place(i), i))
        .collect();
    LayoutResponse { layouts }
}
