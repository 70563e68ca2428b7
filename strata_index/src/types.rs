// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// No ordering between the min and max corners is assumed. Inverted or zero-area boxes are
/// valid values; use [`BoundingBox::is_empty`] and [`BoundingBox::is_degenerate`] to detect them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (bottom)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (top)
    pub max_y: T,
}

impl<T> BoundingBox<T> {
    /// Create a new box from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> BoundingBox<T> {
    /// Whether this box contains the point. Edges are inclusive.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether two boxes overlap. Touching edges count as overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// The intersection of two boxes (may be empty).
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
        }
    }

    /// The smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// Return true if the box is inverted (max below min on either axis). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }
}

impl<T: Scalar> BoundingBox<T> {
    /// `max_x - min_x`. Negative for inverted boxes.
    pub fn width(&self) -> T {
        T::sub(self.max_x, self.min_x)
    }

    /// `max_y - min_y`. Negative for inverted boxes.
    pub fn height(&self) -> T {
        T::sub(self.max_y, self.min_y)
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (T, T) {
        (
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
        )
    }

    /// True when width or height is zero or negative.
    ///
    /// Components that divide by an extent treat such boxes as "no mapping" and fall back to
    /// an identity transform.
    pub fn is_degenerate(&self) -> bool {
        !lt(T::zero(), self.width()) || !lt(T::zero(), self.height())
    }
}

impl BoundingBox<f32> {
    /// Create a box from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl BoundingBox<f64> {
    /// Create a box from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl BoundingBox<i64> {
    /// Create a box from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

/// Numeric scalar abstraction for index coordinates.
///
/// Provides the handful of operations subdivision, node splitting and nearest-neighbor search
/// need, plus a widened accumulator type for squared distances and areas (f32→f64, i64→i128) so
/// that large coordinates do not lose precision or overflow when multiplied.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for squared distances.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Midpoint between a and b (quadrant split point).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a count to the accumulator type (for split cost weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        f64::from(v)
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        i128::from(v)
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        i128::try_from(n).unwrap_or(i128::MAX)
    }
}

/// Squared euclidean distance between two points in the widened accumulator.
#[inline]
pub fn distance_sq<T: Scalar>(ax: T, ay: T, bx: T, by: T) -> T::Acc {
    let dx = T::widen(T::sub(ax, bx));
    let dy = T::widen(T::sub(ay, by));
    dx * dx + dy * dy
}

/// Squared distance from a point to the nearest point of a box; zero inside (edges inclusive).
#[inline]
pub fn distance_sq_to_box<T: Scalar>(b: &BoundingBox<T>, x: T, y: T) -> T::Acc {
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
    gx * gx + gy * gy
}

/// Area of a box in the widened accumulator. Inverted extents count as zero.
#[inline]
pub fn area<T: Scalar>(b: &BoundingBox<T>) -> T::Acc {
    let clamp = |v: T| if lt(v, T::zero()) { T::zero() } else { v };
    T::widen(clamp(b.width())) * T::widen(clamp(b.height()))
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
