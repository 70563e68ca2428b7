// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point quadtree: structure, insertion, queries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::{BoundingBox, Scalar, ScalarAcc, distance_sq, le, lt};

/// Points a leaf holds before it splits.
pub const DEFAULT_CAPACITY: usize = 16;

/// Depth at which nodes stop splitting and keep appending.
pub const DEFAULT_MAX_DEPTH: usize = 8;

const NW: usize = 0;
const NE: usize = 1;
const SW: usize = 2;
const SE: usize = 3;

/// Subdivision limits for a [`QuadTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadTreeLimits {
    /// Maximum number of points a leaf stores before it subdivides.
    pub capacity: usize,
    /// Maximum node depth. Nodes at this depth never subdivide.
    pub max_depth: usize,
}

impl Default for QuadTreeLimits {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A stored point with its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadTreePoint<T, P> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
    /// Opaque payload, typically an entity id.
    pub data: P,
}

#[derive(Clone)]
struct Node<T, P> {
    bounds: BoundingBox<T>,
    depth: usize,
    points: Vec<QuadTreePoint<T, P>>,
    // NW, NE, SW, SE. A node is a leaf iff this is `None`.
    children: Option<Box<[Self; 4]>>,
}

impl<T: Scalar, P: Copy> Node<T, P> {
    fn new(bounds: BoundingBox<T>, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, point: QuadTreePoint<T, P>, limits: &QuadTreeLimits) {
        if self.children.is_none() {
            if self.points.len() < limits.capacity || self.depth >= limits.max_depth {
                self.points.push(point);
                return;
            }
            self.subdivide(limits);
        }
        let q = quadrant(&self.bounds, point.x, point.y);
        if let Some(children) = self.children.as_mut() {
            children[q].insert(point, limits);
        }
    }

    fn subdivide(&mut self, limits: &QuadTreeLimits) {
        let b = self.bounds;
        let (cx, cy) = b.center();
        let depth = self.depth + 1;
        let mut children = Box::new([
            Self::new(BoundingBox::new(b.min_x, cy, cx, b.max_y), depth),
            Self::new(BoundingBox::new(cx, cy, b.max_x, b.max_y), depth),
            Self::new(BoundingBox::new(b.min_x, b.min_y, cx, cy), depth),
            Self::new(BoundingBox::new(cx, b.min_y, b.max_x, cy), depth),
        ]);
        for p in core::mem::take(&mut self.points) {
            children[quadrant(&b, p.x, p.y)].insert(p, limits);
        }
        self.children = Some(children);
    }

    fn query(&self, range: &BoundingBox<T>, out: &mut Vec<QuadTreePoint<T, P>>) {
        if !self.bounds.intersects(range) {
            return;
        }
        out.extend(
            self.points
                .iter()
                .filter(|p| range.contains_point(p.x, p.y))
                .copied(),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, out);
            }
        }
    }

    fn query_refs<'a>(&'a self, range: &BoundingBox<T>, out: &mut Vec<&'a QuadTreePoint<T, P>>) {
        if !self.bounds.intersects(range) {
            return;
        }
        out.extend(
            self.points
                .iter()
                .filter(|p| range.contains_point(p.x, p.y)),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_refs(range, out);
            }
        }
    }

    fn nearest<'a>(
        &'a self,
        x: T,
        y: T,
        best_sq: &mut ScalarAcc<T>,
        best: &mut Option<&'a QuadTreePoint<T, P>>,
    ) {
        for p in &self.points {
            let d = distance_sq(p.x, p.y, x, y);
            // The radius itself is inclusive; after the first hit only strictly closer points win.
            let better = if best.is_none() {
                d <= *best_sq
            } else {
                d < *best_sq
            };
            if better {
                *best_sq = d;
                *best = Some(p);
            }
        }
        if let Some(children) = &self.children {
            let first = quadrant(&self.bounds, x, y);
            let order = [first, (first + 1) % 4, (first + 2) % 4, (first + 3) % 4];
            for q in order {
                let child = &children[q];
                if window_reaches(&child.bounds, x, y, *best_sq) {
                    child.nearest(x, y, best_sq, best);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.points.len()
            + self
                .children
                .as_ref()
                .map_or(0, |c| c.iter().map(Self::len).sum())
    }

    fn max_depth(&self) -> usize {
        self.children.as_ref().map_or(self.depth, |c| {
            c.iter().map(Self::max_depth).max().unwrap_or(self.depth)
        })
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |c| c.iter().map(Self::node_count).sum())
    }
}

/// Quadrant of `(x, y)` relative to the center of `b`.
///
/// `y < cy` selects the southern pair and `x < cx` the western one, so a point exactly on the
/// center lines resolves north/east.
fn quadrant<T: Scalar>(b: &BoundingBox<T>, x: T, y: T) -> usize {
    let (cx, cy) = b.center();
    match (lt(y, cy), lt(x, cx)) {
        (false, true) => NW,
        (false, false) => NE,
        (true, true) => SW,
        (true, false) => SE,
    }
}

/// Whether the square window of radius `sqrt(best_sq)` around `(x, y)` touches `b`.
fn window_reaches<T: Scalar>(b: &BoundingBox<T>, x: T, y: T, best_sq: ScalarAcc<T>) -> bool {
    let gap = |v: T, lo: T, hi: T| {
        if lt(v, lo) {
            T::widen(T::sub(lo, v))
        } else if lt(hi, v) {
            T::widen(T::sub(v, hi))
        } else {
            T::widen(T::zero())
        }
    };
    let gx = gap(x, b.min_x, b.max_x);
    let gy = gap(y, b.min_y, b.max_y);
    le(gx * gx, best_sq) && le(gy * gy, best_sq)
}

/// A point quadtree over a fixed root rectangle.
///
/// Leaves hold up to [`QuadTreeLimits::capacity`] points; a full leaf splits into four equal
/// quadrants around its center and pushes its points down. Nodes at
/// [`QuadTreeLimits::max_depth`] keep appending instead, so many coincident points stay bounded.
///
/// The tree is meant to be rebuilt from scratch whenever the underlying geometry changes.
/// There is no removal or update.
#[derive(Clone)]
pub struct QuadTree<T: Scalar, P: Copy> {
    root: Node<T, P>,
    limits: QuadTreeLimits,
}

impl<T: Scalar, P: Copy> Debug for QuadTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.root.bounds)
            .field("limits", &self.limits)
            .field("len", &self.len())
            .field("nodes", &self.root.node_count())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P: Copy> QuadTree<T, P> {
    /// Create an empty tree rooted at `bounds` with the default limits.
    pub fn new(bounds: BoundingBox<T>) -> Self {
        Self::with_limits(bounds, QuadTreeLimits::default())
    }

    /// Create an empty tree rooted at `bounds` with explicit limits.
    pub fn with_limits(bounds: BoundingBox<T>, limits: QuadTreeLimits) -> Self {
        Self {
            root: Node::new(bounds, 0),
            limits,
        }
    }

    /// Root bounds.
    pub fn bounds(&self) -> BoundingBox<T> {
        self.root.bounds
    }

    /// Subdivision limits.
    pub fn limits(&self) -> QuadTreeLimits {
        self.limits
    }

    /// Whether `(x, y)` may be inserted.
    pub fn accepts(&self, x: T, y: T) -> bool {
        self.root.bounds.contains_point(x, y)
    }

    /// Insert a point.
    ///
    /// The point must lie inside the root bounds. Violating that is a caller bug: debug builds
    /// panic, release builds leave the tree untouched and return `false`.
    pub fn insert(&mut self, x: T, y: T, data: P) -> bool {
        let inside = self.root.bounds.contains_point(x, y);
        debug_assert!(
            inside,
            "point ({x:?}, {y:?}) outside quadtree bounds {:?}",
            self.root.bounds
        );
        if !inside {
            return false;
        }
        self.root.insert(QuadTreePoint { x, y, data }, &self.limits);
        true
    }

    /// Append copies of every point inside `range` (inclusive edges) to `out`.
    ///
    /// Results come in storage order, not sorted by distance.
    pub fn query(&self, range: &BoundingBox<T>, out: &mut Vec<QuadTreePoint<T, P>>) {
        self.root.query(range, out);
    }

    /// Like [`QuadTree::query`] but yields references to the stored points.
    pub fn query_refs<'a>(&'a self, range: &BoundingBox<T>, out: &mut Vec<&'a QuadTreePoint<T, P>>) {
        self.root.query_refs(range, out);
    }

    /// Closest stored point within `max_distance` of `(x, y)`, if any.
    ///
    /// Branch-and-bound: a child is only searched when the square window of the current best
    /// radius reaches it, and the radius shrinks as closer points are found. Among equidistant
    /// points the first one reached wins; which one that is depends on subdivision history and
    /// is not specified.
    pub fn find_nearest(&self, x: T, y: T, max_distance: T) -> Option<&QuadTreePoint<T, P>> {
        if lt(max_distance, T::zero()) {
            return None;
        }
        let r = T::widen(max_distance);
        let mut best_sq = r * r;
        let mut best = None;
        self.root.nearest(x, y, &mut best_sq, &mut best);
        best
    }

    /// Drop all points and all child nodes.
    pub fn clear(&mut self) {
        self.root = Node::new(self.root.bounds, 0);
    }

    /// Total number of stored points across all nodes.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether no points are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest node (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Iterate all stored points in storage order.
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter {
            stack: alloc::vec![&self.root],
            current: core::slice::Iter::default(),
        }
    }
}

impl<'a, T: Scalar, P: Copy> IntoIterator for &'a QuadTree<T, P> {
    type Item = &'a QuadTreePoint<T, P>;
    type IntoIter = Iter<'a, T, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over the points of a [`QuadTree`].
pub struct Iter<'a, T, P> {
    stack: Vec<&'a Node<T, P>>,
    current: core::slice::Iter<'a, QuadTreePoint<T, P>>,
}

impl<T, P> Debug for Iter<'_, T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .field("pending_points", &self.current.len())
            .finish()
    }
}

impl<'a, T, P> Iterator for Iter<'a, T, P> {
    type Item = &'a QuadTreePoint<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(p) = self.current.next() {
                return Some(p);
            }
            let node = self.stack.pop()?;
            self.current = node.points.iter();
            if let Some(children) = &node.children {
                self.stack.extend(children.iter().rev());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Deterministic xorshift generator for randomized cross-checks.
    struct Rng(u64);

    impl Rng {
        fn next_u64(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
            let unit = (self.next_u64() >> 40) as f32 / (1_u64 << 24) as f32;
            lo + unit * (hi - lo)
        }
    }

    fn random_points(n: usize, seed: u64, lo: f32, hi: f32) -> Vec<(f32, f32)> {
        let mut rng = Rng(seed);
        (0..n)
            .map(|_| (rng.next_f32(lo, hi), rng.next_f32(lo, hi)))
            .collect()
    }

    fn assert_contained<T: Scalar, P: Copy>(node: &Node<T, P>) {
        for p in &node.points {
            assert!(
                node.bounds.contains_point(p.x, p.y),
                "point {:?},{:?} escaped node {:?}",
                p.x,
                p.y,
                node.bounds
            );
        }
        if let Some(children) = &node.children {
            assert!(node.points.is_empty(), "interior node kept points");
            for c in children.iter() {
                assert_eq!(c.depth, node.depth + 1, "child depth");
                assert_contained(c);
            }
        }
    }

    #[test]
    fn empty_tree() {
        let tree: QuadTree<f32, u32> = QuadTree::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert!(tree.find_nearest(50.0, 50.0, 1000.0).is_none());
        let mut out = Vec::new();
        tree.query(&tree.bounds(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn single_point_insert_and_query() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        assert!(tree.insert(50.0, 50.0, 7_u32));
        assert_eq!(tree.len(), 1);

        let mut out = Vec::new();
        tree.query(&BoundingBox::new(40.0, 40.0, 60.0, 60.0), &mut out);
        assert_eq!(out, vec![QuadTreePoint { x: 50.0, y: 50.0, data: 7 }]);
    }

    #[test]
    fn boundary_points_are_accepted() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        assert!(tree.insert(0.0, 0.0, 1_u32));
        assert!(tree.insert(100.0, 100.0, 2));
        assert!(tree.insert(0.0, 100.0, 3));
        assert!(tree.insert(100.0, 0.0, 4));
        assert_eq!(tree.len(), 4);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "outside quadtree bounds")]
    fn out_of_bounds_insert_asserts_in_debug() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        tree.insert(150.0, 50.0, 1_u32);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn out_of_bounds_insert_is_rejected_in_release() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        assert!(!tree.insert(150.0, 50.0, 1_u32));
        assert!(!tree.insert(50.0, -0.5, 2));
        assert!(tree.is_empty());
    }

    #[test]
    fn exceeding_capacity_subdivides() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        for i in 0..=DEFAULT_CAPACITY {
            let v = 1.0 + i as f32 * 5.0;
            assert!(tree.insert(v, v, i));
        }
        assert_eq!(tree.len(), DEFAULT_CAPACITY + 1);
        assert!(tree.depth() >= 1);
        assert_contained(&tree.root);
    }

    #[test]
    fn center_point_resolves_north_east() {
        let b = BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0);
        assert_eq!(quadrant(&b, 50.0, 50.0), NE);
        assert_eq!(quadrant(&b, 49.9, 50.0), NW);
        assert_eq!(quadrant(&b, 50.0, 49.9), SE);
        assert_eq!(quadrant(&b, 49.9, 49.9), SW);
    }

    #[test]
    fn containment_holds_after_many_inserts() {
        let bounds = BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0);
        let mut tree = QuadTree::new(bounds);
        let pts = random_points(2000, 0x9e37_79b9_7f4a_7c15, 0.0, 100.0);
        for (i, &(x, y)) in pts.iter().enumerate() {
            assert!(tree.insert(x, y, i));
        }
        assert_eq!(tree.len(), pts.len());
        assert!(tree.depth() <= DEFAULT_MAX_DEPTH);
        assert_contained(&tree.root);
        assert_eq!(tree.iter().count(), pts.len());
    }

    #[test]
    fn range_query_matches_linear_scan() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        let pts = random_points(1000, 42, 0.0, 100.0);
        for (i, &(x, y)) in pts.iter().enumerate() {
            tree.insert(x, y, i);
        }
        let range = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
        let mut out = Vec::new();
        tree.query(&range, &mut out);
        let mut got: Vec<usize> = out.iter().map(|p| p.data).collect();
        got.sort_unstable();
        let expected: Vec<usize> = pts
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| range.contains_point(*x, *y))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(got, expected);

        let mut refs = Vec::new();
        tree.query_refs(&range, &mut refs);
        assert_eq!(refs.len(), expected.len());
    }

    #[test]
    fn query_outside_root_is_empty() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        for i in 0..50 {
            tree.insert(i as f32, i as f32, i);
        }
        let mut out = Vec::new();
        tree.query(&BoundingBox::new(200.0, 200.0, 300.0, 300.0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn nearest_matches_brute_force() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        let pts = random_points(1000, 7, 0.0, 100.0);
        for (i, &(x, y)) in pts.iter().enumerate() {
            tree.insert(x, y, i);
        }
        let queries = random_points(200, 99, -10.0, 110.0);
        for &(qx, qy) in &queries {
            for max_d in [0.5_f32, 3.0, 25.0] {
                let r2 = f64::from(max_d) * f64::from(max_d);
                let brute = pts
                    .iter()
                    .map(|&(x, y)| distance_sq(x, y, qx, qy))
                    .filter(|d| *d <= r2)
                    .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))));
                let found = tree
                    .find_nearest(qx, qy, max_d)
                    .map(|p| distance_sq(p.x, p.y, qx, qy));
                assert_eq!(found, brute, "query ({qx}, {qy}) radius {max_d}");
            }
        }
    }

    #[test]
    fn nearest_respects_radius() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        tree.insert(10.0, 10.0, 1_u32);
        assert!(tree.find_nearest(13.0, 14.0, 4.9).is_none());
        assert_eq!(tree.find_nearest(13.0, 14.0, 5.0).map(|p| p.data), Some(1));
        assert!(tree.find_nearest(10.0, 10.0, -1.0).is_none());
    }

    #[test]
    fn mouse_cursor_scenario() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 1920.0, 1080.0));
        for i in 0..15_i32 {
            let x = 100.0 + 100.0 * i as f32;
            let y = 100.0 + 50.0 * i as f32;
            assert!(tree.insert(x, y, i));
        }
        let cases: [(f32, f32, f32, Option<i32>); 5] = [
            (105.0, 105.0, 10.0, Some(0)),
            (205.0, 155.0, 15.0, Some(1)),
            (1505.0, 805.0, 20.0, Some(14)),
            (50.0, 50.0, 100.0, Some(0)),
            (1600.0, 900.0, 50.0, None),
        ];
        for (x, y, r, expected) in cases {
            assert_eq!(
                tree.find_nearest(x, y, r).map(|p| p.data),
                expected,
                "cursor at ({x}, {y})"
            );
        }
    }

    #[test]
    fn clustered_points_stop_at_max_depth() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        let pts = random_points(100, 3, 50.0, 51.0);
        for (i, &(x, y)) in pts.iter().enumerate() {
            assert!(tree.insert(x, y, i));
        }
        assert_eq!(tree.len(), 100);
        assert!(tree.depth() <= DEFAULT_MAX_DEPTH);
        let mut out = Vec::new();
        tree.query(&BoundingBox::new(50.0, 50.0, 51.0, 51.0), &mut out);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn duplicate_coordinates_are_all_kept() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        for i in 0..40_u32 {
            assert!(tree.insert(25.0, 75.0, i));
        }
        assert_eq!(tree.len(), 40);
        assert_eq!(tree.depth(), DEFAULT_MAX_DEPTH);
        let hit = tree.find_nearest(25.0, 75.0, 1.0);
        assert!(hit.is_some_and(|p| p.x == 25.0 && p.y == 75.0));
    }

    #[test]
    fn large_coordinates() {
        let mut tree = QuadTree::new(BoundingBox::new(-1.0e6_f32, -1.0e6, 1.0e6, 1.0e6));
        assert!(tree.insert(-1.0e6, -1.0e6, 1_u8));
        assert!(tree.insert(1.0e6, 1.0e6, 2));
        assert!(tree.insert(0.0, 0.0, 3));
        assert_eq!(tree.find_nearest(9.0e5, 9.0e5, 2.0e5).map(|p| p.data), Some(2));
        assert_eq!(tree.find_nearest(1.0, -1.0, 10.0).map(|p| p.data), Some(3));
    }

    #[test]
    fn clear_then_reuse() {
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 100.0, 100.0));
        for (i, &(x, y)) in random_points(100, 11, 0.0, 100.0).iter().enumerate() {
            tree.insert(x, y, i);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.insert(10.0, 10.0, 0));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn rebuild_after_resize_keeps_contained_points() {
        let pts = random_points(500, 1234, 0.0, 800.0);
        let mut tree = QuadTree::new(BoundingBox::new(0.0_f32, 0.0, 800.0, 800.0));
        for (i, &(x, y)) in pts.iter().enumerate() {
            tree.insert(x, y, i);
        }
        assert_eq!(tree.len(), pts.len());

        // Viewport shrinks; rebuild against the new bounds.
        let resized = BoundingBox::new(0.0_f32, 0.0, 400.0, 300.0);
        let mut rebuilt = QuadTree::new(resized);
        let mut kept = 0;
        for (i, &(x, y)) in pts.iter().enumerate() {
            if rebuilt.accepts(x, y) {
                assert!(rebuilt.insert(x, y, i));
                kept += 1;
            }
        }
        let expected = pts
            .iter()
            .filter(|(x, y)| resized.contains_point(*x, *y))
            .count();
        assert_eq!(kept, expected);
        assert_eq!(rebuilt.len(), expected);
    }

    #[test]
    fn integer_coordinates() {
        let mut tree: QuadTree<i64, char> = QuadTree::new(BoundingBox::new(0, 0, 1000, 1000));
        tree.insert(10, 10, 'a');
        tree.insert(990, 990, 'b');
        tree.insert(500, 500, 'c');
        assert_eq!(tree.find_nearest(495, 505, 20).map(|p| p.data), Some('c'));
        let mut out = Vec::new();
        tree.query(&BoundingBox::new(0, 0, 500, 500), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn custom_limits() {
        let limits = QuadTreeLimits {
            capacity: 2,
            max_depth: 3,
        };
        let mut tree = QuadTree::with_limits(BoundingBox::new(0.0_f32, 0.0, 8.0, 8.0), limits);
        for i in 0..20_u32 {
            tree.insert(0.5, 0.5, i);
        }
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 20);
        assert_eq!(tree.limits(), limits);
    }
}
