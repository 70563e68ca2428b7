// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Strata Index: insert, range query, nearest neighbor, rebuild.

use strata_index::{BoundingBox, QuadTree};

fn main() {
    let mut tree: QuadTree<f32, u32> = QuadTree::new(BoundingBox::new(0.0, 0.0, 1920.0, 1080.0));
    for i in 0..15_u32 {
        let (x, y) = (100.0 + 100.0 * i as f32, 100.0 + 50.0 * i as f32);
        if !tree.insert(x, y, i) {
            println!("point {i} at ({x}, {y}) is off screen");
        }
    }
    println!("{} points, depth {}", tree.len(), tree.depth());

    // Hover near the second point.
    match tree.find_nearest(205.0, 155.0, 15.0) {
        Some(p) => println!("hover hit: {} at ({}, {})", p.data, p.x, p.y),
        None => println!("hover: nothing"),
    }

    // Rubber-band selection.
    let mut selected = Vec::new();
    tree.query(&BoundingBox::new(0.0, 0.0, 500.0, 300.0), &mut selected);
    let ids: Vec<_> = selected.iter().map(|p| p.data).collect();
    println!("selected: {ids:?}");

    // Resize: rebuild over the new viewport, keeping what still fits.
    let points: Vec<_> = tree.iter().copied().collect();
    let mut resized = QuadTree::new(BoundingBox::new(0.0, 0.0, 1280.0, 720.0));
    let mut dropped = 0;
    for p in points {
        if !(resized.accepts(p.x, p.y) && resized.insert(p.x, p.y, p.data)) {
            dropped += 1;
        }
    }
    println!("after resize: {} points, {dropped} dropped", resized.len());
}
