// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Scene: GPU-ready primitive batches plus a hit-test index, built together.
//!
//! A plot frame is assembled in four steps:
//!
//! 1. A [`LayoutEngine`](strata_layout::LayoutEngine) places each series vertically.
//! 2. Per-series mappers (outside this crate) turn samples into world positions.
//! 3. A [`SceneBuilder`] collects those positions into typed batches
//!    ([`RenderablePolyLineBatch`], [`RenderableGlyphBatch`], [`RenderableRectangleBatch`]) and
//!    indexes them in a [`QuadTree`](strata_index::QuadTree) keyed by [`EntityId`].
//! 4. [`SceneBuilder::build`] moves everything out as a [`RenderableScene`] and resets the
//!    builder.
//!
//! The renderer draws the scene's batches with its view and projection matrices. The interaction
//! layer asks a [`SceneHitTester`] what lies under the cursor, and gets back the entity and the
//! series key it was added under.
//!
//! ## Adapters
//!
//! Some subsystems only need an index, not a scene. The functions in [`adapters`] build one
//! directly from events (plain, stacked or replayed per trial in a raster), glyphs, rectangles,
//! polyline vertices or arc-length samples along long polylines. [`adapters::rectangle_box_index`]
//! and [`adapters::poly_line_box_index`] index whole rectangles or lines by extent instead.
//!
//! ## Supplementary builders
//!
//! - [`RasterBuilder`]: the glyph batch for a trial-aligned event raster.
//! - [`GapDetector`]: splits a sampled signal into polylines wherever the data has gaps.
//!
//! ## Example
//!
//! ```
//! use strata_index::BoundingBox;
//! use strata_layout::{LayoutEngine, LayoutRequest, SeriesDescriptor, SeriesType, StackedLayoutStrategy};
//! use strata_scene::{EntityId, GapDetector, HitKind, SceneBuilder, SceneHitTester};
//!
//! let layout = LayoutEngine::with_strategy(StackedLayoutStrategy).compute(&LayoutRequest::new(
//!     vec![SeriesDescriptor::new("lfp", SeriesType::Analog, true)],
//!     -1.0,
//!     1.0,
//! ));
//!
//! // Two recording blocks with a dropout between them.
//! let times: Vec<f32> = (0..50).chain(80..120).map(|t| t as f32).collect();
//! let values = vec![0.25; times.len()];
//! let mut lines = GapDetector::with_time_threshold(5.0).segment(&times, &values, EntityId(1));
//! assert_eq!(lines.line_count(), 2);
//! lines.model_matrix = layout.layouts[0].y_transform.to_affine_y();
//!
//! let mut builder = SceneBuilder::new();
//! builder
//!     .add_poly_line_batch(lines)
//!     .build_spatial_index(BoundingBox::new(0.0, -1.0, 200.0, 1.0));
//! let scene = builder.build();
//!
//! let hit = SceneHitTester::default().hit_test(30.0, 0.25, &scene, &layout);
//! assert_eq!(hit.kind, HitKind::Point);
//! assert_eq!(hit.entity_id, Some(EntityId(1)));
//!
//! // Inside the dropout only the series band is under the cursor.
//! let hit = SceneHitTester::default().hit_test(65.0, 0.25, &scene, &layout);
//! assert_eq!(hit.kind, HitKind::SeriesRegion);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod batches;
mod builder;
mod gaps;
mod raster;
mod scene;

pub use adapters::{AdapterError, SceneBoxIndex, SceneIndex};
pub use batches::{
    Color, EntityId, GlyphStyle, GlyphType, PickableKinds, PolyLineStyle, RectangleStyle,
    RenderableGlyphBatch, RenderablePolyLineBatch, RenderableRectangleBatch,
};
pub use builder::{BatchCounts, MappedElement, MappedLine, MappedRect, SceneBuilder};
pub use gaps::GapDetector;
pub use hit_test::{HitKind, HitTestConfig, HitTestResult, SceneHitTester};
pub use raster::{RasterBuilder, RasterWindow};
pub use scene::RenderableScene;
