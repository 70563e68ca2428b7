// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Equal rows, one per series.

use crate::types::{LayoutRequest, LayoutResponse};

use super::{equal_band, respond_with};

/// Every series gets an equal-height row in request order; the stackable flag is ignored.
///
/// Used for rasters, where each row is one trial.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowLayoutStrategy;

impl RowLayoutStrategy {
    /// Place every series.
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        let count = request.series.len();
        respond_with(request, |i| equal_band(request, i, count))
    }
}
