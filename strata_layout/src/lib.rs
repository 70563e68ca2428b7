// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Layout: vertical placement of plot series.
//!
//! A [`LayoutRequest`] lists the series to show and the viewport's world Y extent. A strategy
//! turns it into a [`LayoutResponse`] holding one [`SeriesLayout`] per series, in request order.
//! Each layout's [`LayoutTransform`] maps local `[-1, 1]` onto the series' band: the offset is the
//! band center and the gain is half its height.
//!
//! Strategies:
//!
//! - [`StackedLayoutStrategy`]: stackable series (for example analog traces) share the viewport
//!   equally; full-canvas series (for example intervals) always span all of it.
//! - [`RowLayoutStrategy`]: one equal row per series, for rasters.
//! - [`SpatialLayoutStrategy`]: a Fit/Fill 2D transform for spatial data.
//!
//! [`LayoutEngine`] holds one of these and can swap it at runtime.
//!
//! The `compose_*` helpers build the final per-series model transform from a layout plus
//! display parameters (data statistics, user scale, global zoom).
//!
//! # Example
//!
//! ```rust
//! use strata_layout::{
//!     LayoutEngine, LayoutRequest, SeriesDescriptor, SeriesType, StackedLayoutStrategy,
//!     compose_interval_y_transform,
//! };
//!
//! let request = LayoutRequest::new(
//!     vec![
//!         SeriesDescriptor::new("lfp", SeriesType::Analog, true),
//!         SeriesDescriptor::new("emg", SeriesType::Analog, true),
//!         SeriesDescriptor::new("trials", SeriesType::DigitalInterval, false),
//!     ],
//!     -1.0,
//!     1.0,
//! );
//! let response = LayoutEngine::with_strategy(StackedLayoutStrategy).compute(&request);
//!
//! let lfp = response.find_layout("lfp").unwrap();
//! assert_eq!(lfp.result().allocated_y_center, -0.5);
//!
//! // The interval still covers the whole canvas, shrunk by its margin.
//! let trials = response.find_layout("trials").unwrap();
//! let t = compose_interval_y_transform(trials, 0.95, 1.0, 1.0);
//! assert!((t.apply(1.0) - 0.95).abs() < 1e-6);
//! ```
//!
//! Empty requests produce empty responses. Zero or inverted viewports are not rejected; they
//! produce zero or negative band heights. Band containment and [`LayoutResponse::layout_at_y`]
//! use the absolute height.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod engine;
pub mod strategies;
pub mod transform;
pub mod types;

pub use engine::{LayoutEngine, LayoutStrategy};
pub use strategies::{
    RowLayoutStrategy, SpatialLayoutConfig, SpatialLayoutMode, SpatialLayoutResult,
    SpatialLayoutStrategy, SpatialTransform, StackedLayoutStrategy,
};
pub use transform::{
    AnalogScaling, LayoutTransform, compose_analog_y_transform, compose_event_y_transform,
    compose_interval_y_transform,
};
pub use types::{
    LayoutRequest, LayoutResponse, SeriesDescriptor, SeriesLayout, SeriesLayoutResult, SeriesType,
};
