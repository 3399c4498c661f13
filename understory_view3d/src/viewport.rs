// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport helpers shared by both camera kinds.

use glam::{DMat4, DVec3, DVec4};
use kurbo::{Point, Size};

/// Maps a viewport point into `[-1, 1] × [-1, 1]`, with `+y` up.
///
/// The top-left corner of the viewport maps to `(-1, 1)` and the bottom-right
/// corner to `(1, -1)`.
#[must_use]
pub fn normalized_point(p: Point, viewport: Size) -> Point {
    Point::new(
        2.0 * p.x / viewport.width - 1.0,
        1.0 - 2.0 * p.y / viewport.height,
    )
}

/// Width over height.
#[must_use]
pub fn aspect_ratio(viewport: Size) -> f64 {
    viewport.width / viewport.height
}

/// Returns `true` if the viewport has a positive, finite area.
#[must_use]
pub fn is_usable_viewport(viewport: Size) -> bool {
    viewport.width > 0.0
        && viewport.height > 0.0
        && viewport.width.is_finite()
        && viewport.height.is_finite()
}

/// Matrix from normalized device coordinates to viewport coordinates.
///
/// This is the inverse of [`normalized_point`] in `x` and `y`; `z` passes
/// through unchanged.
#[must_use]
pub fn viewport_matrix(viewport: Size) -> DMat4 {
    let hw = viewport.width * 0.5;
    let hh = viewport.height * 0.5;
    DMat4::from_cols(
        DVec4::new(hw, 0.0, 0.0, 0.0),
        DVec4::new(0.0, -hh, 0.0, 0.0),
        DVec4::new(0.0, 0.0, 1.0, 0.0),
        DVec4::new(hw, hh, 0.0, 1.0),
    )
}

/// Right-handed world-to-camera matrix looking along `look` from `position`.
///
/// The camera looks down its local `-Z` axis with `+Y` up. Returns `None` if
/// `look` is zero or parallel to `up`.
#[must_use]
pub fn view_matrix(position: DVec3, look: DVec3, up: DVec3) -> Option<DMat4> {
    let z_axis = (-look).normalize_or_zero();
    let x_axis = up.cross(z_axis).normalize_or_zero();
    if z_axis == DVec3::ZERO || x_axis == DVec3::ZERO {
        return None;
    }
    let y_axis = z_axis.cross(x_axis);
    Some(DMat4::from_cols(
        DVec4::new(x_axis.x, y_axis.x, z_axis.x, 0.0),
        DVec4::new(x_axis.y, y_axis.y, z_axis.y, 0.0),
        DVec4::new(x_axis.z, y_axis.z, z_axis.z, 0.0),
        DVec4::new(
            -x_axis.dot(position),
            -y_axis.dot(position),
            -z_axis.dot(position),
            1.0,
        ),
    ))
}
