// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strategy selection.

use crate::strategies::{RowLayoutStrategy, SpatialLayoutStrategy, StackedLayoutStrategy};
use crate::types::{LayoutRequest, LayoutResponse};

/// The set of layout strategies.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutStrategy {
    /// See [`StackedLayoutStrategy`].
    Stacked(StackedLayoutStrategy),
    /// See [`RowLayoutStrategy`].
    Row(RowLayoutStrategy),
    /// See [`SpatialLayoutStrategy`].
    Spatial(SpatialLayoutStrategy),
}

impl LayoutStrategy {
    /// Place every series in `request`, preserving order.
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        match self {
            Self::Stacked(s) => s.compute(request),
            Self::Row(s) => s.compute(request),
            Self::Spatial(s) => s.compute(request),
        }
    }
}

impl From<StackedLayoutStrategy> for LayoutStrategy {
    fn from(s: StackedLayoutStrategy) -> Self {
        Self::Stacked(s)
    }
}

impl From<RowLayoutStrategy> for LayoutStrategy {
    fn from(s: RowLayoutStrategy) -> Self {
        Self::Row(s)
    }
}

impl From<SpatialLayoutStrategy> for LayoutStrategy {
    fn from(s: SpatialLayoutStrategy) -> Self {
        Self::Spatial(s)
    }
}

/// Holds the active strategy; swappable at runtime.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutEngine {
    strategy: Option<LayoutStrategy>,
}

impl LayoutEngine {
    /// An engine with no strategy; [`compute`](Self::compute) returns empty responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with `strategy` installed.
    pub fn with_strategy(strategy: impl Into<LayoutStrategy>) -> Self {
        Self {
            strategy: Some(strategy.into()),
        }
    }

    /// Replace the active strategy.
    pub fn set_strategy(&mut self, strategy: impl Into<LayoutStrategy>) {
        self.strategy = Some(strategy.into());
    }

    /// The active strategy, if any.
    pub fn strategy(&self) -> Option<&LayoutStrategy> {
        self.strategy.as_ref()
    }

    /// Run the active strategy.
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        match &self.strategy {
            Some(s) => s.compute(request),
            None => {
                log::debug!("layout requested with no strategy installed");
                LayoutResponse::default()
            }
        }
    }
}
