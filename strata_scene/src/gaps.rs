// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split a sampled signal into separate polylines wherever the data has gaps.

use crate::adapters::AdapterError;
use crate::batches::{EntityId, RenderablePolyLineBatch};

/// Breaks a `(time, value)` series into segments so missing data is not bridged by a line.
///
/// A new segment starts whenever consecutive samples are further apart in time than
/// `time_threshold`, or differ in value by more than `value_threshold`. Either threshold may be
/// disabled. Segments with fewer than `min_segment_length` samples are dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapDetector {
    /// Largest time step still drawn as connected.
    pub time_threshold: Option<f32>,
    /// Largest value jump still drawn as connected.
    pub value_threshold: Option<f32>,
    /// Shortest segment kept, in samples.
    pub min_segment_length: usize,
}

impl Default for GapDetector {
    fn default() -> Self {
        Self {
            time_threshold: None,
            value_threshold: None,
            min_segment_length: 2,
        }
    }
}

impl GapDetector {
    /// Split on time steps larger than `threshold`.
    pub fn with_time_threshold(threshold: f32) -> Self {
        Self {
            time_threshold: Some(threshold),
            ..Self::default()
        }
    }

    /// Split on value jumps larger than `threshold`.
    pub fn with_value_threshold(threshold: f32) -> Self {
        Self {
            value_threshold: Some(threshold),
            ..Self::default()
        }
    }

    fn is_gap(&self, (t0, v0): (f32, f32), (t1, v1): (f32, f32)) -> bool {
        self.time_threshold.is_some_and(|th| t1 - t0 > th)
            || self.value_threshold.is_some_and(|th| (v1 - v0).abs() > th)
    }

    /// Segment the series into one batch; every line carries `entity` as the batch payload.
    pub fn try_segment(
        &self,
        times: &[f32],
        values: &[f32],
        entity: EntityId,
    ) -> Result<RenderablePolyLineBatch, AdapterError> {
        if times.len() != values.len() {
            return Err(AdapterError::LengthMismatch {
                what: "values",
                expected: times.len(),
                actual: values.len(),
            });
        }
        let mut batch = RenderablePolyLineBatch {
            global_entity_id: Some(entity),
            ..RenderablePolyLineBatch::default()
        };
        let samples: alloc::vec::Vec<(f32, f32)> =
            times.iter().copied().zip(values.iter().copied()).collect();
        let min_len = self.min_segment_length.max(1);
        let mut start = 0;
        for end in 1..=samples.len() {
            let split = end == samples.len() || self.is_gap(samples[end - 1], samples[end]);
            if !split {
                continue;
            }
            if end - start >= min_len {
                batch.push_line(samples[start..end].iter().map(|&(t, v)| [t, v]), None);
            }
            start = end;
        }
        log::trace!(
            "segmented {} samples into {} lines",
            samples.len(),
            batch.line_count()
        );
        Ok(batch)
    }

    /// Lenient [`try_segment`](Self::try_segment): mismatched inputs give an empty batch.
    pub fn segment(&self, times: &[f32], values: &[f32], entity: EntityId) -> RenderablePolyLineBatch {
        self.try_segment(times, values, entity)
            .unwrap_or_else(|err| {
                log::warn!("gap segmentation skipped: {err}");
                RenderablePolyLineBatch {
                    global_entity_id: Some(entity),
                    ..RenderablePolyLineBatch::default()
                }
            })
    }
}
