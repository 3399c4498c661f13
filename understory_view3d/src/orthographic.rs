// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat4, DVec3, DVec4};
use kurbo::{Point, Size};
use understory_geom3d::{Aabb3, Ray3, is_identity, try_invert};

use crate::CameraRay;
use crate::viewport::{
    aspect_ratio, is_usable_viewport, normalized_point, view_matrix, viewport_matrix,
};

/// Fraction of the scene's front-face depth kept as margin when the near
/// plane is pulled toward the scene.
const NEAR_PLANE_RELATIVE_MARGIN: f64 = 0.1;

/// Absolute margin, in camera-space units, kept in front of the scene when the
/// near plane is pulled toward it.
const NEAR_PLANE_ABSOLUTE_MARGIN: f64 = 1.0;

/// Camera with parallel projection.
///
/// Unlike [`PerspectiveCamera`](crate::PerspectiveCamera), the near plane may
/// sit at or behind the eye (including negative distances).
#[derive(Clone, Debug, PartialEq)]
pub struct OrthographicCamera {
    /// Eye position in world space.
    pub position: DVec3,
    /// Viewing direction. Need not be normalized.
    pub look_direction: DVec3,
    /// Approximate up direction.
    pub up_direction: DVec3,
    /// Width of the view volume in camera-space units; the height follows from
    /// the viewport aspect ratio.
    pub width: f64,
    /// Signed distance from the eye to the near plane along the look direction.
    pub near_plane_distance: f64,
    /// Signed distance from the eye to the far plane; may be `f64::INFINITY`.
    pub far_plane_distance: f64,
    /// Extra world transform applied to the camera itself.
    pub transform: DMat4,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            look_direction: DVec3::NEG_Z,
            up_direction: DVec3::Y,
            width: 2.0,
            near_plane_distance: 0.125,
            far_plane_distance: f64::INFINITY,
            transform: DMat4::IDENTITY,
        }
    }
}

impl OrthographicCamera {
    /// World-to-camera matrix, including the inverse of [`Self::transform`].
    #[must_use]
    pub fn view_matrix(&self) -> Option<DMat4> {
        let view = view_matrix(self.position, self.look_direction, self.up_direction)?;
        if is_identity(&self.transform) {
            return Some(view);
        }
        Some(view * try_invert(&self.transform)?)
    }

    /// Camera-to-clip matrix for the configured planes.
    #[must_use]
    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        orthographic_projection(
            self.width,
            aspect_ratio,
            self.near_plane_distance,
            self.far_plane_distance,
        )
    }

    /// Builds the world-space picking ray through viewport point `p`.
    ///
    /// Every ray points along the camera's forward axis; only the origin
    /// varies per pixel. The origin lies on the near plane, but when the
    /// configured near plane is far in front of `scene_bounds` it is pulled
    /// toward the scene to preserve precision. The size of that shift is
    /// reported as [`CameraRay::distance_adjustment`], which must be added to
    /// every hit distance measured from the returned ray.
    ///
    /// `scene_bounds` is in world space; pass [`Aabb3::EMPTY`] to disable the
    /// correction.
    #[must_use]
    pub fn ray_from_viewport_point(
        &self,
        p: Point,
        viewport: Size,
        scene_bounds: &Aabb3,
    ) -> Option<CameraRay> {
        if !is_usable_viewport(viewport) || !(self.width > 0.0) {
            return None;
        }
        let np = normalized_point(p, viewport);
        let aspect = aspect_ratio(viewport);
        let w = self.width;
        let h = w / aspect;

        let view = self.view_matrix()?;
        let inverse_view = try_invert(&view)?;

        // The camera looks down -Z, so the scene's front face in camera space
        // is its *largest* z and distances along the look direction are -z.
        let mut zn = self.near_plane_distance;
        let mut distance_adjustment = 0.0;
        let camera_bounds = scene_bounds.transform(&view);
        if !camera_bounds.is_empty() && camera_bounds.is_finite() {
            let scene_near = -with_near_margin(camera_bounds.max.z);
            if scene_near > zn {
                distance_adjustment = scene_near - zn;
                zn = scene_near;
                log::debug!(
                    "orthographic near plane {} -> {zn}, adjustment {distance_adjustment}",
                    self.near_plane_distance
                );
            }
        }

        let origin =
            inverse_view.transform_point3(DVec3::new(np.x * w * 0.5, np.y * h * 0.5, -zn));
        let direction = inverse_view.transform_vector3(DVec3::NEG_Z).normalize_or_zero();
        if direction == DVec3::ZERO || !origin.is_finite() {
            return None;
        }

        let projection = orthographic_projection(w, aspect, zn, self.far_plane_distance);
        Some(CameraRay {
            ray: Ray3::new(origin, direction),
            hit_test_projection: viewport_matrix(viewport) * projection * view,
            distance_adjustment,
        })
    }
}

/// Moves the camera-space depth `z` of the scene's front face toward the eye
/// by a margin proportional to its magnitude plus a constant.
fn with_near_margin(z: f64) -> f64 {
    z + NEAR_PLANE_RELATIVE_MARGIN * z.abs() + NEAR_PLANE_ABSOLUTE_MARGIN
}

fn orthographic_projection(width: f64, aspect_ratio: f64, zn: f64, zf: f64) -> DMat4 {
    let height = width / aspect_ratio;
    let m22 = 1.0 / (zn - zf);
    let m32 = zn * m22;
    DMat4::from_cols(
        DVec4::new(2.0 / width, 0.0, 0.0, 0.0),
        DVec4::new(0.0, 2.0 / height, 0.0, 0.0),
        DVec4::new(0.0, 0.0, m22, 0.0),
        DVec4::new(0.0, 0.0, m32, 1.0),
    )
}
