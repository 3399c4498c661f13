// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rays and lines in 3D.

use glam::{DMat4, DVec3};

use crate::matrix::{is_affine, transform_point};

/// Whether a [`Ray3`] is a half-line or a full line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Points with parameter `t >= 0` only.
    #[default]
    Ray,
    /// Points with any parameter `t`.
    ///
    /// A ray becomes a line once it has been carried through a projective
    /// transform, because the image of a half-line may wrap through infinity.
    Line,
}

/// A ray (or line) with an origin and a direction.
///
/// The direction is not required to be normalized; parameters returned by
/// intersection routines are in units of `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray3 {
    /// Origin of the ray.
    pub origin: DVec3,
    /// Direction of the ray.
    pub direction: DVec3,
    /// Half-line or line semantics.
    pub kind: RayKind,
}

impl Ray3 {
    /// Creates a half-line starting at `origin`.
    #[must_use]
    pub const fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            kind: RayKind::Ray,
        }
    }

    /// Creates a full line through `origin`.
    #[must_use]
    pub const fn line(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            kind: RayKind::Line,
        }
    }

    /// Returns `true` for half-line semantics.
    #[inline]
    #[must_use]
    pub fn is_ray(&self) -> bool {
        self.kind == RayKind::Ray
    }

    /// Returns the same origin and direction with line semantics.
    #[must_use]
    pub fn as_line(self) -> Self {
        Self {
            kind: RayKind::Line,
            ..self
        }
    }

    /// Point at parameter `t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Returns `true` if the direction is zero or not finite.
    ///
    /// Degenerate rays never intersect anything.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.origin.is_finite()
            || !self.direction.is_finite()
            || self.direction == DVec3::ZERO
    }

    /// Carries the ray through `m`.
    ///
    /// For affine `m` the kind is preserved. For projective `m` the result is
    /// always a [`RayKind::Line`] through the images of two points of the
    /// input line. Points whose image is at infinity are skipped in favor of
    /// other points on the line, so the result is `None` only when no two
    /// distinct finite images exist.
    #[must_use]
    pub fn transform(&self, m: &DMat4) -> Option<Self> {
        if is_affine(m) {
            let origin = m.transform_point3(self.origin);
            let direction = m.transform_vector3(self.direction);
            let out = Self {
                origin,
                direction,
                kind: self.kind,
            };
            return (!out.is_degenerate()).then_some(out);
        }
        // A projective map sends at most one point of a line to infinity.
        const SAMPLES: [f64; 5] = [0.0, 1.0, -1.0, 2.0, -2.0];
        let mut images = SAMPLES
            .iter()
            .filter_map(|&t| transform_point(m, self.at(t)));
        let origin = images.next()?;
        images
            .map(|ahead| Self::line(origin, ahead - origin))
            .find(|out| !out.is_degenerate())
    }
}
