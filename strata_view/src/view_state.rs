// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera state for a 2D plot: data extent, zoom, pan, padding and viewport size.

use kurbo::{Point, Rect};

use crate::matrices::{ViewProjectionMatrices, orthographic};

/// Smallest zoom factor reachable through [`ViewState::apply_zoom_delta`].
pub const MIN_ZOOM: f64 = 1.0e-6;

/// Largest zoom factor reachable through [`ViewState::apply_zoom_delta`].
pub const MAX_ZOOM: f64 = 1.0e6;

/// Interactive camera over a data rectangle.
///
/// World space is Y-up. Screen space is in pixels with the origin at the top-left corner and Y
/// growing downwards.
///
/// At zoom `1` and pan `0` the visible region is the data rectangle grown by
/// [`padding_factor`](Self::padding_factor) around its center. Zoom shrinks the visible extent
/// per axis; pan moves the center by a fraction of the data extent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    /// Extent of the plotted data in world units.
    pub data_bounds: Rect,
    /// Whether `data_bounds` describes real data. When false the view shows `[-1, 1]²`.
    pub data_bounds_valid: bool,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Horizontal zoom factor; `2` shows half the width.
    pub zoom_level_x: f64,
    /// Vertical zoom factor.
    pub zoom_level_y: f64,
    /// Horizontal pan as a fraction of the data width.
    pub pan_offset_x: f64,
    /// Vertical pan as a fraction of the data height.
    pub pan_offset_y: f64,
    /// Multiplier on the data extent at zoom 1, leaving a margin around the data.
    pub padding_factor: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            data_bounds: Rect::new(-1.0, -1.0, 1.0, 1.0),
            data_bounds_valid: false,
            viewport_width: 1,
            viewport_height: 1,
            zoom_level_x: 1.0,
            zoom_level_y: 1.0,
            pan_offset_x: 0.0,
            pan_offset_y: 0.0,
            padding_factor: 1.1,
        }
    }
}

fn positive_extent(r: Rect) -> bool {
    r.width() > 0.0 && r.height() > 0.0 && r.is_finite()
}

impl ViewState {
    /// A view over `data_bounds` rendered into a `width × height` pixel viewport.
    pub fn new(data_bounds: Rect, width: u32, height: u32) -> Self {
        let mut state = Self::default();
        state.set_data_bounds(data_bounds);
        state.set_viewport_size(width, height);
        state
    }

    /// Replace the data extent. Zero-area or non-finite bounds mark the data as invalid.
    pub fn set_data_bounds(&mut self, bounds: Rect) {
        self.data_bounds = bounds;
        self.data_bounds_valid = positive_extent(bounds);
    }

    /// Record a viewport resize.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Restore zoom `1` and pan `0`, fitting the padded data to the viewport.
    pub fn reset_view(&mut self) {
        self.zoom_level_x = 1.0;
        self.zoom_level_y = 1.0;
        self.pan_offset_x = 0.0;
        self.pan_offset_y = 0.0;
    }

    /// The world rectangle currently visible in the viewport.
    ///
    /// Center: data center plus pan times data extent. Half extent: data extent times padding,
    /// halved, divided by zoom. Each axis is independent. Invalid data bounds yield `[-1, 1]²`.
    pub fn visible_world_bounds(&self) -> Rect {
        if !self.data_bounds_valid {
            return Rect::new(-1.0, -1.0, 1.0, 1.0);
        }
        let data = self.data_bounds;
        let center = data.center();
        let cx = center.x + self.pan_offset_x * data.width();
        let cy = center.y + self.pan_offset_y * data.height();
        let half_w = data.width() * self.padding_factor / 2.0 / self.zoom_level_x;
        let half_h = data.height() * self.padding_factor / 2.0 / self.zoom_level_y;
        Rect::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// View and projection matrices for the current state.
    ///
    /// The camera is entirely expressed by the projection window, so the view is identity.
    pub fn matrices(&self) -> ViewProjectionMatrices {
        ViewProjectionMatrices {
            view: kurbo::Affine::IDENTITY,
            projection: orthographic(self.visible_world_bounds()),
        }
    }

    fn viewport_px(&self) -> Option<(f64, f64)> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return None;
        }
        Some((
            f64::from(self.viewport_width),
            f64::from(self.viewport_height),
        ))
    }

    /// Convert a pixel position to world coordinates.
    ///
    /// An empty viewport maps every pixel to the center of the visible region.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let visible = self.visible_world_bounds();
        let Some((w, h)) = self.viewport_px() else {
            return visible.center();
        };
        Point::new(
            visible.x0 + screen.x / w * visible.width(),
            visible.y1 - screen.y / h * visible.height(),
        )
    }

    /// Convert a world position to pixel coordinates.
    ///
    /// A degenerate visible region maps every point to the viewport center.
    pub fn world_to_screen(&self, world: Point) -> Point {
        let visible = self.visible_world_bounds();
        let (w, h) = self.viewport_px().unwrap_or((0.0, 0.0));
        if !positive_extent(visible) {
            return Point::new(w / 2.0, h / 2.0);
        }
        Point::new(
            (world.x - visible.x0) / visible.width() * w,
            (visible.y1 - world.y) / visible.height() * h,
        )
    }

    /// Zoom and pan so that `target` exactly fills the viewport.
    ///
    /// X and Y zoom are set independently, so both edges of `target` land on the viewport
    /// edges. Returns `false` and leaves the state untouched when `target` or the data bounds
    /// have no area.
    pub fn apply_box_zoom(&mut self, target: Rect) -> bool {
        if !self.data_bounds_valid || !positive_extent(target) {
            return false;
        }
        let data = self.data_bounds;
        self.zoom_level_x = data.width() * self.padding_factor / target.width();
        self.zoom_level_y = data.height() * self.padding_factor / target.height();
        self.center_on(target.center());
        true
    }

    /// Zoom uniformly so that all of `target` is visible and centered.
    ///
    /// Both zoom factors are scaled by the same amount, keeping the current aspect ratio; the
    /// tighter axis of `target` fills the viewport. Returns `false` on degenerate input.
    pub fn apply_box_zoom_uniform(&mut self, target: Rect) -> bool {
        if !self.data_bounds_valid || !positive_extent(target) {
            return false;
        }
        let visible = self.visible_world_bounds();
        if !positive_extent(visible) {
            return false;
        }
        let scale = (visible.width() / target.width()).min(visible.height() / target.height());
        self.zoom_level_x *= scale;
        self.zoom_level_y *= scale;
        self.center_on(target.center());
        true
    }

    /// Pan by a pixel delta, as when dragging the content with the mouse.
    ///
    /// Dragging right or down moves the content with the cursor.
    pub fn apply_pan_delta(&mut self, dx_px: f64, dy_px: f64) -> bool {
        let Some((w, h)) = self.viewport_px() else {
            return false;
        };
        if !self.data_bounds_valid {
            return false;
        }
        let visible = self.visible_world_bounds();
        let dx_world = -dx_px / w * visible.width();
        let dy_world = dy_px / h * visible.height();
        self.pan_offset_x += dx_world / self.data_bounds.width();
        self.pan_offset_y += dy_world / self.data_bounds.height();
        true
    }

    /// Multiply both zoom factors by `factor`, keeping the world point under `anchor_px` fixed.
    ///
    /// Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`. Non-positive or non-finite factors are
    /// rejected.
    pub fn apply_zoom_delta(&mut self, factor: f64, anchor_px: Point) -> bool {
        if !(factor.is_finite() && factor > 0.0) || !self.data_bounds_valid {
            return false;
        }
        let before = self.screen_to_world(anchor_px);
        self.zoom_level_x = (self.zoom_level_x * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom_level_y = (self.zoom_level_y * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_world(anchor_px);
        self.pan_offset_x += (before.x - after.x) / self.data_bounds.width();
        self.pan_offset_y += (before.y - after.y) / self.data_bounds.height();
        true
    }

    fn center_on(&mut self, world: Point) {
        let data = self.data_bounds;
        let center = data.center();
        self.pan_offset_x = (world.x - center.x) / data.width();
        self.pan_offset_y = (world.y - center.y) / data.height();
    }
}
