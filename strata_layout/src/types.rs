// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout inputs and outputs: series descriptors, requests, per-series placements.

use alloc::string::String;
use alloc::vec::Vec;

use crate::transform::LayoutTransform;

/// What kind of data a series carries. Strategies may place kinds differently.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeriesType {
    /// Continuous sampled signal.
    Analog,
    /// Discrete timestamps.
    DigitalEvent,
    /// Start/end spans.
    DigitalInterval,
}

/// One series to be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesDescriptor {
    /// Caller-chosen key, echoed back in [`SeriesLayout::series_id`].
    pub id: String,
    /// Series kind.
    pub series_type: SeriesType,
    /// Stackable series share the viewport; the rest always span all of it.
    pub is_stackable: bool,
}

impl SeriesDescriptor {
    /// Describe a series.
    pub fn new(id: impl Into<String>, series_type: SeriesType, is_stackable: bool) -> Self {
        Self {
            id: id.into(),
            series_type,
            is_stackable,
        }
    }
}

/// Everything a strategy needs to place a set of series.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutRequest {
    /// Series in display order; index 0 gets the lowest band.
    pub series: Vec<SeriesDescriptor>,
    /// Bottom of the viewport in world units.
    pub viewport_y_min: f32,
    /// Top of the viewport in world units.
    pub viewport_y_max: f32,
    /// Global amplitude zoom applied when composing series transforms.
    pub global_zoom: f32,
    /// Global vertical scale applied when composing series transforms.
    pub global_vertical_scale: f32,
    /// Global vertical pan in world units, applied through the view matrix.
    pub vertical_pan_offset: f32,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            series: Vec::new(),
            viewport_y_min: -1.0,
            viewport_y_max: 1.0,
            global_zoom: 1.0,
            global_vertical_scale: 1.0,
            vertical_pan_offset: 0.0,
        }
    }
}

impl LayoutRequest {
    /// A request over `[y_min, y_max]` with default globals.
    pub fn new(series: Vec<SeriesDescriptor>, viewport_y_min: f32, viewport_y_max: f32) -> Self {
        Self {
            series,
            viewport_y_min,
            viewport_y_max,
            ..Self::default()
        }
    }

    /// `viewport_y_max - viewport_y_min`. Not clamped; may be zero or negative.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_y_max - self.viewport_y_min
    }

    /// Midpoint of the viewport.
    pub fn viewport_center(&self) -> f32 {
        0.5 * (self.viewport_y_min + self.viewport_y_max)
    }

    /// Number of series of a given kind.
    pub fn count_series_of_type(&self, series_type: SeriesType) -> usize {
        self.series
            .iter()
            .filter(|s| s.series_type == series_type)
            .count()
    }

    /// Number of stackable series.
    pub fn count_stackable_series(&self) -> usize {
        self.series.iter().filter(|s| s.is_stackable).count()
    }

    /// View translation for the global vertical pan.
    pub fn view_y_offset(&self) -> f32 {
        self.vertical_pan_offset
    }
}

/// Vertical band allocated to a series.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesLayoutResult {
    /// Band center in world Y.
    pub allocated_y_center: f32,
    /// Full band height in world units.
    pub allocated_height: f32,
}

impl SeriesLayoutResult {
    /// A band centered at `center` with total height `height`.
    pub const fn new(center: f32, height: f32) -> Self {
        Self {
            allocated_y_center: center,
            allocated_height: height,
        }
    }

    /// Lower band edge. A negative height spans the same range as its absolute value.
    pub fn y_min(&self) -> f32 {
        self.allocated_y_center - 0.5 * self.allocated_height.abs()
    }

    /// Upper band edge.
    pub fn y_max(&self) -> f32 {
        self.allocated_y_center + 0.5 * self.allocated_height.abs()
    }

    /// Whether `y` falls inside the band (inclusive), for either sign of height.
    pub fn contains_y(&self, y: f32) -> bool {
        self.y_min() <= y && y <= self.y_max()
    }

    /// The band as a transform mapping local `[-1, 1]` onto it.
    pub fn to_transform(&self) -> LayoutTransform {
        LayoutTransform::new(self.allocated_y_center, 0.5 * self.allocated_height)
    }
}

/// Placement of one series.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesLayout {
    /// Id from the matching [`SeriesDescriptor`].
    pub series_id: String,
    /// Local `[-1, 1]` → world Y: offset is the band center, gain the half-height.
    pub y_transform: LayoutTransform,
    /// Position of the series in the request.
    pub series_index: usize,
}

impl SeriesLayout {
    /// Build a layout from a band.
    pub fn new(series_id: impl Into<String>, result: SeriesLayoutResult, series_index: usize) -> Self {
        Self {
            series_id: series_id.into(),
            y_transform: result.to_transform(),
            series_index,
        }
    }

    /// The band this layout covers.
    pub fn result(&self) -> SeriesLayoutResult {
        SeriesLayoutResult::new(self.y_transform.offset, 2.0 * self.y_transform.gain)
    }
}

/// One layout per requested series, in request order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResponse {
    /// Placements, parallel to [`LayoutRequest::series`].
    pub layouts: Vec<SeriesLayout>,
}

impl LayoutResponse {
    /// Placement for a series id.
    pub fn find_layout(&self, series_id: &str) -> Option<&SeriesLayout> {
        self.layouts.iter().find(|l| l.series_id == series_id)
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// The narrowest band containing `y`; earlier series win ties.
    ///
    /// Full-canvas series contain every `y`, so a stacked series under the cursor is
    /// preferred over them.
    pub fn layout_at_y(&self, y: f32) -> Option<&SeriesLayout> {
        let mut best: Option<&SeriesLayout> = None;
        for l in self.layouts.iter().filter(|l| l.result().contains_y(y)) {
            if best.is_none_or(|b| l.y_transform.gain.abs() < b.y_transform.gain.abs()) {
                best = Some(l);
            }
        }
        best
    }
}
