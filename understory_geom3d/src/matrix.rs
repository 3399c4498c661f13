// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small matrix helpers shared by the box, ray, and stack code.

use glam::{DMat4, DVec3, DVec4};

/// Returns `true` if `m` has no projective component.
///
/// An affine matrix maps the plane at infinity to itself, so rays stay rays
/// and points never need a perspective divide.
#[inline]
#[must_use]
pub fn is_affine(m: &DMat4) -> bool {
    m.row(3) == DVec4::W
}

/// Returns `true` if `m` is exactly the identity.
#[inline]
#[must_use]
pub fn is_identity(m: &DMat4) -> bool {
    *m == DMat4::IDENTITY
}

/// Inverts `m`, or returns `None` when it is singular or not finite.
#[must_use]
pub fn try_invert(m: &DMat4) -> Option<DMat4> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}

/// Transforms a point, applying the perspective divide when `m` is projective.
///
/// Returns `None` if the point maps to infinity (homogeneous `w == 0`) or the
/// result is not finite.
#[must_use]
pub fn transform_point(m: &DMat4, p: DVec3) -> Option<DVec3> {
    if is_affine(m) {
        let out = m.transform_point3(p);
        return out.is_finite().then_some(out);
    }
    let h = *m * p.extend(1.0);
    if h.w == 0.0 {
        return None;
    }
    let out = h.truncate() / h.w;
    out.is_finite().then_some(out)
}
