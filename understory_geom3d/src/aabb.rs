// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

use glam::{DMat4, DVec3};

use crate::matrix::is_affine;
use crate::ray::Ray3;

/// Axis-aligned box in 3D, stored as inclusive `min`/`max` corners.
///
/// ## Empty boxes
///
/// [`Aabb3::EMPTY`] has `min = +∞` and `max = -∞`. It is the identity of
/// [`union`](Self::union), contains no point, and intersects nothing. Any box
/// with `min > max` on some axis is treated as empty.
///
/// ## Infinite boxes
///
/// [`Aabb3::EVERYTHING`] is returned when a transform cannot be bounded (for
/// example a projective transform that sends part of the box through
/// infinity). It is conservative: it intersects every non-degenerate ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb3 {
    /// The empty box.
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    /// The box covering all of space.
    pub const EVERYTHING: Self = Self {
        min: DVec3::NEG_INFINITY,
        max: DVec3::INFINITY,
    };

    /// Creates a box from two corners, ordering components per axis.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing all `points`; [`Aabb3::EMPTY`] for no points.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    /// Returns `true` if the box contains no point.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    /// Returns `true` if both corners are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Extent per axis; zero for an empty box.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Center point. Not meaningful for empty or infinite boxes.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns `true` if the boxes overlap (touching counts).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.cmple(other.max).all()
            && other.min.cmple(self.max).all()
    }

    /// The eight corners, in `x`-fastest order.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            DVec3::new(lo.x, lo.y, lo.z),
            DVec3::new(hi.x, lo.y, lo.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(lo.x, hi.y, hi.z),
            DVec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Tight axis-aligned box of this box transformed by `m`.
    ///
    /// Affine matrices use the center/extent form, which is exact for the
    /// transformed corners. Projective matrices transform and divide each
    /// corner; if any corner lands on or behind the `w = 0` plane the result is
    /// [`Aabb3::EVERYTHING`]. The empty box stays empty under any matrix.
    #[must_use]
    pub fn transform(&self, m: &DMat4) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        if !self.is_finite() || !m.is_finite() {
            return Self::EVERYTHING;
        }
        if is_affine(m) {
            let center = m.transform_point3(self.center());
            let half = (self.max - self.min) * 0.5;
            let extent = m.x_axis.truncate().abs() * half.x
                + m.y_axis.truncate().abs() * half.y
                + m.z_axis.truncate().abs() * half.z;
            return Self {
                min: center - extent,
                max: center + extent,
            };
        }
        let mut out = Self::EMPTY;
        for corner in self.corners() {
            let h = *m * corner.extend(1.0);
            if h.w <= 0.0 {
                return Self::EVERYTHING;
            }
            let p = h.truncate() / h.w;
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }

    /// Ray (or line) versus box, using the slab method.
    ///
    /// Returns `false` for empty boxes and degenerate rays. Touching the
    /// boundary counts as an intersection.
    #[must_use]
    pub fn intersects_ray(&self, ray: &Ray3) -> bool {
        self.ray_interval(ray).is_some()
    }

    /// Parameter interval `[t_enter, t_exit]` of the ray inside the box.
    ///
    /// For a [`RayKind::Ray`](crate::RayKind::Ray) the interval is clipped to
    /// `t >= 0`; for a line it is not clipped.
    #[must_use]
    pub fn ray_interval(&self, ray: &Ray3) -> Option<(f64, f64)> {
        if self.is_empty() || ray.is_degenerate() {
            return None;
        }
        let (mut t_min, mut t_max) = if ray.is_ray() {
            (0.0, f64::INFINITY)
        } else {
            (f64::NEG_INFINITY, f64::INFINITY)
        };
        let origin = ray.origin.to_array();
        let direction = ray.direction.to_array();
        let lo = self.min.to_array();
        let hi = self.max.to_array();
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d == 0.0 {
                if o < lo[axis] || o > hi[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo[axis] - o) * inv;
            let mut t1 = (hi[axis] - o) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some((t_min, t_max))
    }
}
