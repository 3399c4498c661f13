// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray/line versus triangle intersection.

use glam::DVec3;

use crate::ray::Ray3;

/// Relative tolerance below which a triangle is treated as parallel to the ray.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A ray/triangle intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the intersection, in units of the ray direction.
    pub t: f64,
    /// Barycentric weights `(w1, w2, w3)` of the vertices `(v1, v2, v3)`.
    ///
    /// The weights sum to one and each lies in `[0, 1]`; the intersection
    /// point equals `w1 * v1 + w2 * v2 + w3 * v3`.
    pub barycentric: DVec3,
    /// `true` if the vertices appear counter-clockwise from the ray origin.
    pub front_facing: bool,
}

/// Intersects a ray (or line) with the triangle `(v1, v2, v3)`.
///
/// Uses the Möller–Trumbore formulation. Triangles that are degenerate or
/// parallel to the ray never intersect. For [`RayKind::Ray`](crate::RayKind::Ray)
/// intersections behind the origin (`t < 0`) are rejected; lines accept any `t`.
#[must_use]
pub fn intersect_triangle(ray: &Ray3, v1: DVec3, v2: DVec3, v3: DVec3) -> Option<TriangleHit> {
    if ray.is_degenerate() {
        return None;
    }
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    let scale = e1.length() * e2.length() * ray.direction.length();
    let tolerance = PARALLEL_EPSILON * scale;
    if !det.is_finite() || (det > -tolerance && det < tolerance) {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - v1;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    if ray.is_ray() && t < 0.0 {
        return None;
    }
    Some(TriangleHit {
        t,
        barycentric: DVec3::new((1.0 - u - v).max(0.0), u, v),
        front_facing: det > 0.0,
    })
}
