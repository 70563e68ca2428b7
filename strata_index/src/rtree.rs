// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding-box R-tree: insertion with area-cost splits, packed bulk loading, queries.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::types::{BoundingBox, Scalar, ScalarAcc, area, distance_sq_to_box, le, lt};

/// Children a node holds before it splits.
pub const DEFAULT_MAX_CHILDREN: usize = 8;

/// Fewest children either half of a split may receive.
pub const DEFAULT_MIN_CHILDREN: usize = 4;

/// A stored box with its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RTreeEntry<T, P> {
    /// Extent of the item.
    pub bounds: BoundingBox<T>,
    /// Opaque payload, typically an entity id.
    pub data: P,
}

impl<T: Scalar, P> RTreeEntry<T, P> {
    /// Whether `(x, y)` lies inside the entry's box (edges inclusive).
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.bounds.contains_point(x, y)
    }

    /// Squared distance from `(x, y)` to the box; zero inside.
    pub fn distance_sq(&self, x: T, y: T) -> ScalarAcc<T> {
        distance_sq_to_box(&self.bounds, x, y)
    }
}

#[derive(Clone)]
enum Children<T, P> {
    Leaf(Vec<RTreeEntry<T, P>>),
    // Arena indices.
    Inner(Vec<usize>),
}

impl<T, P> Children<T, P> {
    fn len(&self) -> usize {
        match self {
            Self::Leaf(entries) => entries.len(),
            Self::Inner(nodes) => nodes.len(),
        }
    }
}

#[derive(Clone)]
struct RNode<T, P> {
    bounds: BoundingBox<T>,
    children: Children<T, P>,
}

/// An R-tree over axis-aligned boxes.
///
/// Where a [`QuadTree`](crate::QuadTree) indexes points inside fixed root bounds, an `RTree`
/// indexes extents (masks, lines, intervals) and grows to cover whatever it is given. Nodes
/// live in an arena; an overflowing node splits along the axis and position that minimize
/// `area(left) * |left| + area(right) * |right|`, and the split propagates up to a new root.
///
/// Like the quadtree, it is meant to be rebuilt whenever the indexed geometry changes. For a
/// one-shot build, [`RTree::bulk_load`] packs the tree in a single pass.
#[derive(Clone)]
pub struct RTree<T: Scalar, P: Copy> {
    max_children: usize,
    min_children: usize,
    root: Option<usize>,
    nodes: Vec<RNode<T, P>>,
    len: usize,
}

impl<T: Scalar, P: Copy> Default for RTree<T, P> {
    fn default() -> Self {
        Self::with_node_capacity(DEFAULT_MAX_CHILDREN, DEFAULT_MIN_CHILDREN)
    }
}

impl<T: Scalar, P: Copy> Debug for RTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("len", &self.len)
            .field("nodes", &self.nodes.len())
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P: Copy> RTree<T, P> {
    /// An empty tree with the default node capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree whose nodes split above `max_children`, giving each half at least
    /// `min_children`. `max_children` is raised to 2 and `min_children` clamped to
    /// `1..=max_children / 2`.
    pub fn with_node_capacity(max_children: usize, min_children: usize) -> Self {
        let max_children = max_children.max(2);
        Self {
            max_children,
            min_children: min_children.clamp(1, max_children / 2),
            root: None,
            nodes: Vec::new(),
            len: 0,
        }
    }

    /// Build a packed tree from `entries` in one pass (sort-tile-recursive).
    ///
    /// Entries with inverted boxes are dropped, as [`insert`](Self::insert) would reject them.
    pub fn bulk_load(entries: impl IntoIterator<Item = RTreeEntry<T, P>>) -> Self {
        let mut tree = Self::new();
        let items: Vec<_> = entries
            .into_iter()
            .filter(|e| !e.bounds.is_empty())
            .collect();
        tree.len = items.len();
        if items.is_empty() {
            return tree;
        }
        let max = tree.max_children;
        let mut level: Vec<usize> = tile(items, max, |e: &RTreeEntry<T, P>| e.bounds)
            .into_iter()
            .map(|t| tree.push_node(Children::Leaf(t)))
            .collect();
        while level.len() > 1 {
            let tiles = {
                let nodes = &tree.nodes;
                tile(level, max, |&i: &usize| nodes[i].bounds)
            };
            level = tiles
                .into_iter()
                .map(|t| tree.push_node(Children::Inner(t)))
                .collect();
        }
        tree.root = level.first().copied();
        tree
    }

    /// Insert a box. Returns `false` and stores nothing when the box is inverted.
    pub fn insert(&mut self, bounds: BoundingBox<T>, data: P) -> bool {
        if bounds.is_empty() {
            return false;
        }
        let entry = RTreeEntry { bounds, data };
        match self.root {
            None => {
                let root = self.push_node(Children::Leaf(alloc::vec![entry]));
                self.root = Some(root);
            }
            Some(root) => {
                if let Some(sibling) = self.insert_at(root, entry) {
                    let new_root = self.push_node(Children::Inner(alloc::vec![root, sibling]));
                    self.root = Some(new_root);
                }
            }
        }
        self.len += 1;
        true
    }

    /// Descend to a leaf, growing bounds on the way. Returns the arena index of a new sibling
    /// when `idx` had to split.
    fn insert_at(&mut self, idx: usize, entry: RTreeEntry<T, P>) -> Option<usize> {
        let node = &mut self.nodes[idx];
        node.bounds = node.bounds.union(&entry.bounds);
        let kids = match &mut node.children {
            Children::Leaf(entries) => {
                entries.push(entry);
                if entries.len() <= self.max_children {
                    return None;
                }
                let full = core::mem::take(entries);
                let (left, right) =
                    split(full, self.min_children, |e: &RTreeEntry<T, P>| e.bounds);
                return Some(self.split_node(idx, Children::Leaf(left), Children::Leaf(right)));
            }
            Children::Inner(kids) => kids.clone(),
        };

        let slot = best_child(&self.nodes, &kids, &entry.bounds);
        let sibling = self.insert_at(kids[slot], entry)?;
        let Children::Inner(kids) = &mut self.nodes[idx].children else {
            return None;
        };
        kids.insert(slot + 1, sibling);
        if kids.len() <= self.max_children {
            return None;
        }
        let full = core::mem::take(kids);
        let (left, right) = {
            let nodes = &self.nodes;
            split(full, self.min_children, |&i: &usize| nodes[i].bounds)
        };
        Some(self.split_node(idx, Children::Inner(left), Children::Inner(right)))
    }

    /// Keep `left` in `idx`, push `right` as a new node, return its index.
    fn split_node(&mut self, idx: usize, left: Children<T, P>, right: Children<T, P>) -> usize {
        let old = self.nodes[idx].bounds;
        self.nodes[idx] = RNode {
            bounds: children_bounds(&self.nodes, &left).unwrap_or(old),
            children: left,
        };
        self.push_node(right)
    }

    fn push_node(&mut self, children: Children<T, P>) -> usize {
        let zero = T::zero();
        let bounds = children_bounds(&self.nodes, &children)
            .unwrap_or(BoundingBox::new(zero, zero, zero, zero));
        self.nodes.push(RNode { bounds, children });
        self.nodes.len() - 1
    }

    fn visit<'a>(&'a self, range: &BoundingBox<T>, mut f: impl FnMut(&'a RTreeEntry<T, P>)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = alloc::vec![root];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if !node.bounds.intersects(range) {
                continue;
            }
            match &node.children {
                Children::Leaf(entries) => {
                    for e in entries.iter().filter(|e| e.bounds.intersects(range)) {
                        f(e);
                    }
                }
                Children::Inner(kids) => stack.extend(kids.iter().copied()),
            }
        }
    }

    /// Append copies of every entry whose box intersects `range` (touching counts) to `out`.
    pub fn query(&self, range: &BoundingBox<T>, out: &mut Vec<RTreeEntry<T, P>>) {
        self.visit(range, |e| out.push(*e));
    }

    /// Like [`RTree::query`] but yields references to the stored entries.
    pub fn query_refs<'a>(&'a self, range: &BoundingBox<T>, out: &mut Vec<&'a RTreeEntry<T, P>>) {
        self.visit(range, |e| out.push(e));
    }

    /// Append every entry whose box contains `(x, y)` to `out`.
    pub fn query_point(&self, x: T, y: T, out: &mut Vec<RTreeEntry<T, P>>) {
        self.query(&BoundingBox::new(x, y, x, y), out);
    }

    /// Entry whose box is closest to `(x, y)`, within `max_distance`. A box containing the
    /// point is at distance zero.
    ///
    /// Children are searched in order of their distance to the point, and the search stops
    /// at the first child farther than the best entry so far. Ties go to the first entry
    /// reached.
    pub fn find_nearest(&self, x: T, y: T, max_distance: T) -> Option<&RTreeEntry<T, P>> {
        if lt(max_distance, T::zero()) {
            return None;
        }
        let r = T::widen(max_distance);
        let mut best_sq = r * r;
        let mut best = None;
        if let Some(root) = self.root {
            self.nearest_in(root, x, y, &mut best_sq, &mut best);
        }
        best
    }

    fn nearest_in<'a>(
        &'a self,
        idx: usize,
        x: T,
        y: T,
        best_sq: &mut ScalarAcc<T>,
        best: &mut Option<&'a RTreeEntry<T, P>>,
    ) {
        // The radius itself is inclusive; after the first hit only strictly closer entries win.
        let within = |d: ScalarAcc<T>, best_sq: ScalarAcc<T>, found: bool| {
            if found { lt(d, best_sq) } else { le(d, best_sq) }
        };
        match &self.nodes[idx].children {
            Children::Leaf(entries) => {
                for e in entries {
                    let d = e.distance_sq(x, y);
                    if within(d, *best_sq, best.is_some()) {
                        *best_sq = d;
                        *best = Some(e);
                    }
                }
            }
            Children::Inner(kids) => {
                let mut order: Vec<(ScalarAcc<T>, usize)> = kids
                    .iter()
                    .map(|&k| (distance_sq_to_box(&self.nodes[k].bounds, x, y), k))
                    .collect();
                order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
                for (d, k) in order {
                    if !within(d, *best_sq, best.is_some()) {
                        break;
                    }
                    self.nearest_in(k, x, y, best_sq, best);
                }
            }
        }
    }

    /// Drop every entry and node.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.len = 0;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Union of every stored box, or `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox<T>> {
        self.root.map(|r| self.nodes[r].bounds)
    }

    /// Levels from the root to the leaves; 0 when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut next = self.root;
        while let Some(i) = next {
            height += 1;
            next = match &self.nodes[i].children {
                Children::Inner(kids) => kids.first().copied(),
                Children::Leaf(_) => None,
            };
        }
        height
    }

    /// Iterate all stored entries in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &RTreeEntry<T, P>> + '_ {
        self.nodes.iter().flat_map(|n| match &n.children {
            Children::Leaf(entries) => entries.as_slice(),
            Children::Inner(_) => &[][..],
        })
    }
}

fn children_bounds<T: Scalar, P>(
    nodes: &[RNode<T, P>],
    children: &Children<T, P>,
) -> Option<BoundingBox<T>> {
    match children {
        Children::Leaf(entries) => entries.iter().map(|e| e.bounds).reduce(|a, b| a.union(&b)),
        Children::Inner(kids) => kids
            .iter()
            .map(|&k| nodes[k].bounds)
            .reduce(|a, b| a.union(&b)),
    }
}

/// Child whose box grows least to take `bounds`; smaller area breaks ties.
fn best_child<T: Scalar, P>(nodes: &[RNode<T, P>], kids: &[usize], bounds: &BoundingBox<T>) -> usize {
    let mut best = 0;
    let mut best_cost: Option<(ScalarAcc<T>, ScalarAcc<T>)> = None;
    for (slot, &k) in kids.iter().enumerate() {
        let b = &nodes[k].bounds;
        let own = area(b);
        let cost = (area(&b.union(bounds)) - own, own);
        let better = best_cost.is_none_or(|(grow, size)| {
            lt(cost.0, grow) || (!lt(grow, cost.0) && lt(cost.1, size))
        });
        if better {
            best = slot;
            best_cost = Some(cost);
        }
    }
    best
}

fn sort_on_axis<T: Scalar, C>(items: &mut [C], axis: usize, bbox_of: &impl Fn(&C) -> BoundingBox<T>) {
    let key = |c: &C| {
        let (cx, cy) = bbox_of(c).center();
        if axis == 0 { cx } else { cy }
    };
    items.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
}

fn running_union<'a, T: Scalar + 'a>(
    boxes: impl Iterator<Item = &'a BoundingBox<T>>,
) -> Vec<BoundingBox<T>> {
    let mut out: Vec<BoundingBox<T>> = Vec::new();
    for b in boxes {
        let next = out.last().map_or(*b, |prev| prev.union(b));
        out.push(next);
    }
    out
}

/// Split an overflowing child list in two.
///
/// Both axes are tried; along each, children are sorted by center and every cut leaving at
/// least `min_children` per side is scored with prefix and suffix unions.
fn split<T: Scalar, C: Clone>(
    items: Vec<C>,
    min_children: usize,
    bbox_of: impl Fn(&C) -> BoundingBox<T>,
) -> (Vec<C>, Vec<C>) {
    let n = items.len();
    let min = min_children.clamp(1, (n / 2).max(1));
    let mut best: Option<(ScalarAcc<T>, usize, usize)> = None;
    for axis in 0..2 {
        let mut sorted = items.clone();
        sort_on_axis(&mut sorted, axis, &bbox_of);
        let boxes: Vec<_> = sorted.iter().map(&bbox_of).collect();
        let prefix = running_union(boxes.iter());
        let mut suffix = running_union(boxes.iter().rev());
        suffix.reverse();
        for k in min..=(n - min) {
            let cost = area(&prefix[k - 1]) * T::acc_from_usize(k)
                + area(&suffix[k]) * T::acc_from_usize(n - k);
            if best.is_none_or(|(c, _, _)| lt(cost, c)) {
                best = Some((cost, axis, k));
            }
        }
    }
    let (axis, k) = best.map_or((0, n / 2), |(_, axis, k)| (axis, k));
    let mut left = items;
    sort_on_axis(&mut left, axis, &bbox_of);
    let right = left.split_off(k);
    (left, right)
}

/// Sort-tile-recursive grouping: vertical slices by center x, then runs of `max_children` by
/// center y within each slice.
fn tile<T: Scalar, C>(
    mut items: Vec<C>,
    max_children: usize,
    bbox_of: impl Fn(&C) -> BoundingBox<T>,
) -> Vec<Vec<C>> {
    let n = items.len();
    let groups = n.div_ceil(max_children);
    let mut slices = 1_usize;
    while slices * slices < groups {
        slices += 1;
    }
    sort_on_axis(&mut items, 0, &bbox_of);
    let slice_len = n.div_ceil(slices).max(1);
    let mut tiles = Vec::with_capacity(groups);
    let mut rest = items.into_iter();
    loop {
        let mut slice: Vec<C> = rest.by_ref().take(slice_len).collect();
        if slice.is_empty() {
            break;
        }
        sort_on_axis(&mut slice, 1, &bbox_of);
        let mut cells = slice.into_iter();
        loop {
            let cell: Vec<C> = cells.by_ref().take(max_children).collect();
            if cell.is_empty() {
                break;
            }
            tiles.push(cell);
        }
    }
    tiles
}
