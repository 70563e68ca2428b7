// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mappings between world coordinates, domain values and tick labels.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

type MapFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
type LabelFn = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Bidirectional mapping between world coordinates and a domain, plus label formatting.
///
/// The two mapping functions must be mutual inverses; every factory in this module upholds
/// that. Cloning is cheap (shared closures).
#[derive(Clone)]
pub struct AxisMapping {
    world_to_domain: MapFn,
    domain_to_world: MapFn,
    format_label: LabelFn,
    title: String,
}

impl core::fmt::Debug for AxisMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisMapping")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl AxisMapping {
    /// Build a mapping from its parts. `world_to_domain` and `domain_to_world` must be inverses.
    pub fn new(
        title: impl Into<String>,
        world_to_domain: impl Fn(f64) -> f64 + Send + Sync + 'static,
        domain_to_world: impl Fn(f64) -> f64 + Send + Sync + 'static,
        format_label: impl Fn(f64) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            world_to_domain: Arc::new(world_to_domain),
            domain_to_world: Arc::new(domain_to_world),
            format_label: Arc::new(format_label),
            title: title.into(),
        }
    }

    /// Same mapping with a different title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Axis title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// World coordinate → domain value.
    pub fn to_domain(&self, world: f64) -> f64 {
        (self.world_to_domain)(world)
    }

    /// Domain value → world coordinate.
    pub fn to_world(&self, domain: f64) -> f64 {
        (self.domain_to_world)(domain)
    }

    /// Tick label for a domain value.
    pub fn label(&self, domain: f64) -> String {
        (self.format_label)(domain)
    }

    /// Tick label for the domain value at a world coordinate.
    pub fn label_at_world(&self, world: f64) -> String {
        self.label(self.to_domain(world))
    }
}

/// Format with `precision` decimals, then drop trailing zeros and a dangling decimal point.
///
/// `-0` is printed as `0`.
///
/// ```
/// use strata_view::format_trimmed;
///
/// assert_eq!(format_trimmed(2.50, 3), "2.5");
/// assert_eq!(format_trimmed(3.0, 2), "3");
/// assert_eq!(format_trimmed(-0.0001, 2), "0");
/// ```
pub fn format_trimmed(value: f64, precision: usize) -> String {
    let mut s = format!("{value:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// World and domain coincide.
pub fn identity_axis(title: impl Into<String>, precision: usize) -> AxisMapping {
    AxisMapping::new(title, |w| w, |d| d, move |d| format_trimmed(d, precision))
}

/// `domain = world * scale + offset`.
///
/// A zero or non-finite `scale` degrades to the identity scale.
pub fn linear_axis(
    title: impl Into<String>,
    scale: f64,
    offset: f64,
    precision: usize,
) -> AxisMapping {
    let scale = if scale != 0.0 && scale.is_finite() {
        scale
    } else {
        log::debug!("linear axis scale {scale} unusable, using 1");
        1.0
    };
    AxisMapping::new(
        title,
        move |w| w * scale + offset,
        move |d| (d - offset) / scale,
        move |d| format_trimmed(d, precision),
    )
}

/// Trials stacked over the normalized world range `[-1, 1]`.
///
/// World `-1` is trial `0` and world `1` is trial `count`; labels are whole numbers. A zero
/// count behaves like a single trial.
pub fn trial_index_axis(count: usize) -> AxisMapping {
    let n = count.max(1) as f64;
    AxisMapping::new(
        "Trial",
        move |w| (w + 1.0) / 2.0 * n,
        move |d| d / n * 2.0 - 1.0,
        |d| format_trimmed(d, 0),
    )
}

/// Time relative to an alignment event; world X is already in time units.
///
/// Positive offsets carry an explicit `+`.
pub fn relative_time_axis(title: impl Into<String>, precision: usize) -> AxisMapping {
    AxisMapping::new(
        title,
        |w| w,
        |d| d,
        move |d| {
            let s = format_trimmed(d, precision);
            if d > 0.0 && s != "0" {
                format!("+{s}")
            } else {
                s
            }
        },
    )
}
