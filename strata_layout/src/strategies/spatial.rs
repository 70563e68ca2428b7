// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial layout: map a 2D data box into a viewport box.

use kurbo::Affine;
use strata_index::BoundingBox;

use crate::types::{LayoutRequest, LayoutResponse};

use super::{full_canvas, respond_with};

/// How data space is scaled into the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpatialLayoutMode {
    /// Uniform scale so the data fits entirely; centered. Preserves aspect ratio.
    #[default]
    Fit,
    /// Independent X/Y scales so the data fills the viewport exactly.
    Fill,
    /// No transform; data coordinates are already world coordinates.
    Identity,
}

/// Spatial strategy settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialLayoutConfig {
    /// Scaling mode.
    pub mode: SpatialLayoutMode,
    /// Fraction of data width/height added on every side before fitting.
    pub padding: f32,
}

impl Default for SpatialLayoutConfig {
    fn default() -> Self {
        Self {
            mode: SpatialLayoutMode::Fit,
            padding: 0.0,
        }
    }
}

/// Per-axis scale and offset: `x' = x * x_scale + x_offset`, same for Y.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialTransform {
    /// X scale.
    pub x_scale: f32,
    /// Y scale.
    pub y_scale: f32,
    /// X offset, applied after scaling.
    pub x_offset: f32,
    /// Y offset, applied after scaling.
    pub y_offset: f32,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpatialTransform {
    /// Leaves points unchanged.
    pub const IDENTITY: Self = Self {
        x_scale: 1.0,
        y_scale: 1.0,
        x_offset: 0.0,
        y_offset: 0.0,
    };

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.apply_x(x), self.apply_y(y))
    }

    /// Transform an X coordinate.
    pub fn apply_x(&self, x: f32) -> f32 {
        x * self.x_scale + self.x_offset
    }

    /// Transform a Y coordinate.
    pub fn apply_y(&self, y: f32) -> f32 {
        y * self.y_scale + self.y_offset
    }

    /// Viewport point back to data space. A zero scale only removes the offset on that axis.
    pub fn inverse_apply(&self, x: f32, y: f32) -> (f32, f32) {
        let inv = |v: f32, scale: f32, offset: f32| {
            if scale == 0.0 {
                v - offset
            } else {
                (v - offset) / scale
            }
        };
        (
            inv(x, self.x_scale, self.x_offset),
            inv(y, self.y_scale, self.y_offset),
        )
    }

    /// As a model matrix.
    pub fn to_affine(&self) -> Affine {
        Affine::new([
            f64::from(self.x_scale),
            0.0,
            0.0,
            f64::from(self.y_scale),
            f64::from(self.x_offset),
            f64::from(self.y_offset),
        ])
    }
}

/// Output of [`SpatialLayoutStrategy::compute_transform`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialLayoutResult {
    /// Data → viewport.
    pub transform: SpatialTransform,
    /// Data bounds after padding; this is what was fitted.
    pub effective_data_bounds: BoundingBox<f32>,
}

/// Fits 2D data (points, lines, masks) into a viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialLayoutStrategy {
    /// Mode and padding.
    pub config: SpatialLayoutConfig,
}

impl SpatialLayoutStrategy {
    /// A strategy with the given mode and no padding.
    pub fn new(mode: SpatialLayoutMode) -> Self {
        Self {
            config: SpatialLayoutConfig {
                mode,
                ..SpatialLayoutConfig::default()
            },
        }
    }

    /// A strategy from a full config.
    pub fn with_config(config: SpatialLayoutConfig) -> Self {
        Self { config }
    }

    /// Compute the data → viewport transform.
    ///
    /// Degenerate (non-positive width or height) data or viewport bounds, after padding,
    /// produce the identity.
    pub fn compute_transform(
        &self,
        data_bounds: &BoundingBox<f32>,
        viewport_bounds: &BoundingBox<f32>,
    ) -> SpatialLayoutResult {
        let pad_x = data_bounds.width() * self.config.padding;
        let pad_y = data_bounds.height() * self.config.padding;
        let effective = BoundingBox::new(
            data_bounds.min_x - pad_x,
            data_bounds.min_y - pad_y,
            data_bounds.max_x + pad_x,
            data_bounds.max_y + pad_y,
        );
        let identity = SpatialLayoutResult {
            transform: SpatialTransform::IDENTITY,
            effective_data_bounds: effective,
        };
        if self.config.mode == SpatialLayoutMode::Identity {
            return identity;
        }
        if effective.is_degenerate() || viewport_bounds.is_degenerate() {
            log::debug!(
                "degenerate spatial bounds (data {effective:?}, viewport {viewport_bounds:?}), using identity"
            );
            return identity;
        }

        let sx = viewport_bounds.width() / effective.width();
        let sy = viewport_bounds.height() / effective.height();
        let transform = match self.config.mode {
            SpatialLayoutMode::Fill => SpatialTransform {
                x_scale: sx,
                y_scale: sy,
                x_offset: viewport_bounds.min_x - effective.min_x * sx,
                y_offset: viewport_bounds.min_y - effective.min_y * sy,
            },
            SpatialLayoutMode::Fit => {
                let s = sx.min(sy);
                let (dcx, dcy) = effective.center();
                let (vcx, vcy) = viewport_bounds.center();
                SpatialTransform {
                    x_scale: s,
                    y_scale: s,
                    x_offset: vcx - dcx * s,
                    y_offset: vcy - dcy * s,
                }
            }
            SpatialLayoutMode::Identity => SpatialTransform::IDENTITY,
        };
        SpatialLayoutResult {
            transform,
            effective_data_bounds: effective,
        }
    }

    /// Series-layout view of this strategy: every series gets the full viewport.
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        let band = full_canvas(request);
        respond_with(request, |_| band)
    }
}
