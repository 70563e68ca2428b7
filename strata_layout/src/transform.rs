// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional affine transforms for series placement, and their composition.

use kurbo::Affine;

use crate::types::SeriesLayout;

/// `y ↦ y * gain + offset`.
///
/// Layouts hand these out with `offset` = band center and `gain` = half band height, so local
/// `[-1, 1]` fills the band.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutTransform {
    /// Added after scaling.
    pub offset: f32,
    /// Scale factor.
    pub gain: f32,
}

impl Default for LayoutTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayoutTransform {
    /// `y ↦ y`.
    pub const IDENTITY: Self = Self {
        offset: 0.0,
        gain: 1.0,
    };

    /// `y ↦ y * gain + offset`.
    pub const fn new(offset: f32, gain: f32) -> Self {
        Self { offset, gain }
    }

    /// Apply to a local value.
    pub fn apply(&self, v: f32) -> f32 {
        v * self.gain + self.offset
    }

    /// Map a world value back to local. A zero gain collapses everything, so only the
    /// offset is removed.
    pub fn inverse(&self, w: f32) -> f32 {
        if self.gain == 0.0 {
            w - self.offset
        } else {
            (w - self.offset) / self.gain
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn compose(&self, inner: &Self) -> Self {
        Self {
            offset: self.gain * inner.offset + self.offset,
            gain: self.gain * inner.gain,
        }
    }

    /// Model matrix that transforms Y only; X passes through.
    pub fn to_affine_y(&self) -> Affine {
        Affine::new([
            1.0,
            0.0,
            0.0,
            f64::from(self.gain),
            0.0,
            f64::from(self.offset),
        ])
    }
}

/// Display parameters for a continuous signal.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalogScaling {
    /// Sample mean, centered on the band.
    pub data_mean: f32,
    /// Sample standard deviation; `±3σ` fills the band.
    pub std_dev: f32,
    /// Per-series scale applied before user scaling.
    pub intrinsic_scale: f32,
    /// User amplitude scale.
    pub user_scale_factor: f32,
    /// User vertical offset in world units.
    pub user_vertical_offset: f32,
    /// Fraction of the band the `±3σ` range occupies.
    pub margin_factor: f32,
}

impl Default for AnalogScaling {
    fn default() -> Self {
        Self {
            data_mean: 0.0,
            std_dev: 1.0,
            intrinsic_scale: 1.0,
            user_scale_factor: 1.0,
            user_vertical_offset: 0.0,
            margin_factor: 0.8,
        }
    }
}

/// Data value → world Y for a continuous signal.
///
/// The value is centered on `data_mean`, scaled so `±3σ` covers `margin_factor` of the band,
/// then multiplied by intrinsic, user, global zoom and global vertical scale. A non-positive
/// `std_dev` is treated as `1`.
pub fn compose_analog_y_transform(
    layout: &SeriesLayout,
    scaling: &AnalogScaling,
    global_zoom: f32,
    global_vertical_scale: f32,
) -> LayoutTransform {
    let std_dev = if scaling.std_dev > 0.0 {
        scaling.std_dev
    } else {
        1.0
    };
    let normalize = LayoutTransform::new(-scaling.data_mean / (3.0 * std_dev), 1.0 / (3.0 * std_dev));
    let amplify = LayoutTransform::new(
        0.0,
        scaling.intrinsic_scale
            * scaling.user_scale_factor
            * global_zoom
            * global_vertical_scale
            * scaling.margin_factor,
    );
    let place = LayoutTransform::new(
        layout.y_transform.offset + scaling.user_vertical_offset,
        layout.y_transform.gain,
    );
    place.compose(&amplify).compose(&normalize)
}

/// Local `[-1, 1]` → world Y for interval rectangles.
///
/// The band is shrunk by `margin_factor`, `global_zoom` and `global_vertical_scale` around its
/// center.
pub fn compose_interval_y_transform(
    layout: &SeriesLayout,
    margin_factor: f32,
    global_zoom: f32,
    global_vertical_scale: f32,
) -> LayoutTransform {
    LayoutTransform::new(
        layout.y_transform.offset,
        layout.y_transform.gain * margin_factor * global_zoom * global_vertical_scale,
    )
}

/// Local `[-1, 1]` → world Y for event ticks.
///
/// A positive `event_height` overrides the band height; otherwise the band is shrunk by
/// `margin_factor`.
pub fn compose_event_y_transform(
    layout: &SeriesLayout,
    event_height: f32,
    margin_factor: f32,
    global_vertical_scale: f32,
) -> LayoutTransform {
    let half = if event_height > 0.0 {
        0.5 * event_height
    } else {
        layout.y_transform.gain * margin_factor
    };
    LayoutTransform::new(layout.y_transform.offset, half * global_vertical_scale)
}
