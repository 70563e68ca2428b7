// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View/projection matrices and GPU export.

use kurbo::{Affine, Point, Rect, Vec2};

/// Global camera transforms shared by every batch in a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewProjectionMatrices {
    /// World → camera space.
    pub view: Affine,
    /// Camera space → normalized device coordinates `[-1, 1]²`.
    pub projection: Affine,
}

impl Default for ViewProjectionMatrices {
    fn default() -> Self {
        Self {
            view: Affine::IDENTITY,
            projection: Affine::IDENTITY,
        }
    }
}

impl ViewProjectionMatrices {
    /// `projection * view * model`.
    pub fn mvp(&self, model: Affine) -> Affine {
        self.projection * self.view * model
    }

    /// Transform a point through `model`, view and projection into NDC.
    pub fn to_ndc(&self, model: Affine, p: Point) -> Point {
        self.mvp(model) * p
    }
}

/// Orthographic projection mapping `window` onto NDC `[-1, 1]²`, Y up.
///
/// A window with zero, negative or non-finite extent yields the identity.
pub fn orthographic(window: Rect) -> Affine {
    let w = window.x1 - window.x0;
    let h = window.y1 - window.y0;
    if !(w > 0.0 && h > 0.0 && window.is_finite()) {
        log::debug!("degenerate projection window {window:?}, using identity");
        return Affine::IDENTITY;
    }
    Affine::new([
        2.0 / w,
        0.0,
        0.0,
        2.0 / h,
        -(window.x1 + window.x0) / w,
        -(window.y1 + window.y0) / h,
    ])
}

/// View matrix for a global vertical pan: content moves up by `offset` world units.
pub fn vertical_pan_view(offset: f64) -> Affine {
    Affine::translate(Vec2::new(0.0, offset))
}

/// Replace a matrix containing NaN or infinity with the identity.
pub fn sanitize(m: Affine) -> Affine {
    if m.as_coeffs().iter().all(|c| c.is_finite()) {
        m
    } else {
        log::debug!("non-finite matrix {m:?}, using identity");
        Affine::IDENTITY
    }
}

/// Expand a 2D affine into a column-major 4×4 matrix for GPU upload.
///
/// Z passes through unchanged.
#[allow(
    clippy::cast_possible_truncation,
    reason = "GPU uniforms are f32; world coordinates are bounded well within f32 range"
)]
pub fn affine_to_mat4(m: Affine) -> [f32; 16] {
    let [a, b, c, d, e, f] = m.as_coeffs();
    [
        a as f32, b as f32, 0.0, 0.0, //
        c as f32, d as f32, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        e as f32, f as f32, 0.0, 1.0,
    ]
}
