// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Index: generic 2D spatial indexes for plot hit testing.
//!
//! Strata Index answers the two questions an interactive plot asks on every mouse move:
//! "which items are inside this rectangle" and "which item is closest to the cursor".
//!
//! - [`QuadTree`] stores points with an opaque payload (usually an entity id) inside fixed
//!   root bounds. Query by rectangle ([`QuadTree::query`], [`QuadTree::query_refs`]) or find the
//!   nearest point within a radius ([`QuadTree::find_nearest`]).
//! - [`RTree`] stores boxes (mask extents, line bounds, intervals) and answers the same two
//!   questions for extents, with a box at distance zero from every point it contains.
//!
//! Both are generic over the scalar type `T` (`f32`, `f64` or `i64`) and do not depend on any
//! geometry crate. Squared distances and areas are accumulated in a widened type
//! (f32→f64, i64→i128).
//!
//! The indexes are built for a rebuild-per-frame workflow: thousands of items, inserted from
//! scratch whenever the view or data changes. There is no removal, update, or interior locking;
//! an index is single-writer and queries must not overlap with mutation.
//!
//! # Example
//!
//! ```rust
//! use strata_index::{BoundingBox, QuadTree};
//!
//! let mut tree: QuadTree<f32, u32> = QuadTree::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
//! assert!(tree.insert(10.0, 10.0, 1));
//! assert!(tree.insert(60.0, 40.0, 2));
//!
//! // Nearest point to the cursor, at most 5 units away.
//! let hit = tree.find_nearest(58.0, 41.0, 5.0).unwrap();
//! assert_eq!(hit.data, 2);
//!
//! // Everything in the lower-left quarter.
//! let mut out = Vec::new();
//! tree.query(&BoundingBox::new(0.0, 0.0, 50.0, 50.0), &mut out);
//! assert_eq!(out.len(), 1);
//! ```
//!
//! ## Bounds are a precondition
//!
//! Every inserted point must lie inside the root bounds (edges inclusive). Inserting outside is
//! a caller bug: debug builds assert, release builds return `false` and store nothing. Use
//! [`QuadTree::accepts`] to filter first when the input is not known to fit.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.

#![no_std]

extern crate alloc;

pub mod quadtree;
pub mod rtree;
pub mod types;

pub use quadtree::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, Iter, QuadTree, QuadTreeLimits, QuadTreePoint};
pub use rtree::{DEFAULT_MAX_CHILDREN, DEFAULT_MIN_CHILDREN, RTree, RTreeEntry};
pub use types::{BoundingBox, Scalar};
