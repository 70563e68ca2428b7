// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata View: coordinate transforms for interactive 2D plots.
//!
//! Three coordinate systems meet in a plot:
//!
//! - **Screen**: pixels, origin top-left, Y down.
//! - **World**: the continuous, Y-up space that batches are positioned in after layout.
//! - **Domain**: what the user reads off an axis (a trial number, milliseconds, millivolts).
//!
//! [`ViewState`] holds the camera (data extent, per-axis zoom, pan, padding and viewport size)
//! and converts between screen and world. Its [`ViewState::matrices`] produce the view and
//! orthographic projection a renderer needs, as [`kurbo::Affine`]s; [`affine_to_mat4`] turns
//! those into GPU-ready column-major arrays.
//!
//! [`AxisMapping`] converts between world and domain and formats tick labels. Factories such as
//! [`linear_axis`] and [`trial_index_axis`] guarantee the two directions are inverses.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use strata_view::ViewState;
//!
//! let mut view = ViewState::new(Rect::new(0.0, -1.0, 1000.0, 1.0), 800, 600);
//! view.padding_factor = 1.0;
//!
//! // The middle of the screen is the middle of the data.
//! let w = view.screen_to_world(Point::new(400.0, 300.0));
//! assert!((w.x - 500.0).abs() < 1e-9 && w.y.abs() < 1e-9);
//!
//! // Box zoom onto the first tenth of the data.
//! assert!(view.apply_box_zoom(Rect::new(0.0, -1.0, 100.0, 1.0)));
//! let visible = view.visible_world_bounds();
//! assert!((visible.x1 - 100.0).abs() < 1e-9);
//!
//! view.reset_view();
//! assert_eq!(view.zoom_level_x, 1.0);
//! ```
//!
//! Degenerate geometry never produces NaN here: zero or negative extents fall back to the
//! identity transform (or leave the state unchanged for zoom operations).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod axis;
pub mod matrices;
pub mod view_state;

pub use axis::{
    AxisMapping, format_trimmed, identity_axis, linear_axis, relative_time_axis, trial_index_axis,
};
pub use matrices::{
    ViewProjectionMatrices, affine_to_mat4, orthographic, sanitize, vertical_pan_view,
};
pub use view_state::{MAX_ZOOM, MIN_ZOOM, ViewState};
