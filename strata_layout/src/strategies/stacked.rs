// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked layout: stackable series share the viewport, full-canvas series overlay it.

use alloc::vec::Vec;

use crate::types::{LayoutRequest, LayoutResponse};

use super::{equal_band, full_canvas, respond_with};

/// Stackable series divide the viewport equally, in request order. Non-stackable series each
/// receive the whole viewport regardless of how many stackable series are present.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackedLayoutStrategy;

impl StackedLayoutStrategy {
    /// Place every series.
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        let stack_count = request.count_stackable_series();
        // Position of each series among the stackable ones.
        let mut next = 0_usize;
        let slots: Vec<Option<usize>> = request
            .series
            .iter()
            .map(|s| {
                s.is_stackable.then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();
        respond_with(request, |i| match slots[i] {
            Some(slot) => equal_band(request, slot, stack_count),
            None => full_canvas(request),
        })
    }
}
