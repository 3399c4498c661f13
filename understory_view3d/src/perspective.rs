// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat4, DVec3, DVec4};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `tan`
use kurbo::{Point, Size};
use understory_geom3d::{Ray3, is_identity, transform_point, try_invert};

use crate::CameraRay;
use crate::viewport::{
    aspect_ratio, is_usable_viewport, normalized_point, view_matrix, viewport_matrix,
};

/// Camera with perspective foreshortening.
///
/// The field of view is **horizontal** and given in degrees; the vertical
/// extent follows from the viewport aspect ratio.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position in world space.
    pub position: DVec3,
    /// Viewing direction. Need not be normalized.
    pub look_direction: DVec3,
    /// Approximate up direction. Need not be normalized or orthogonal to
    /// `look_direction`.
    pub up_direction: DVec3,
    /// Horizontal field of view in degrees.
    pub field_of_view: f64,
    /// Distance from the eye to the near plane along the look direction.
    pub near_plane_distance: f64,
    /// Distance from the eye to the far plane; may be `f64::INFINITY`.
    pub far_plane_distance: f64,
    /// Extra world transform applied to the camera itself.
    pub transform: DMat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            look_direction: DVec3::NEG_Z,
            up_direction: DVec3::Y,
            field_of_view: 45.0,
            near_plane_distance: 0.125,
            far_plane_distance: f64::INFINITY,
            transform: DMat4::IDENTITY,
        }
    }
}

impl PerspectiveCamera {
    /// World-to-camera matrix, including the inverse of [`Self::transform`].
    #[must_use]
    pub fn view_matrix(&self) -> Option<DMat4> {
        let view = view_matrix(self.position, self.look_direction, self.up_direction)?;
        if is_identity(&self.transform) {
            return Some(view);
        }
        Some(view * try_invert(&self.transform)?)
    }

    /// Camera-to-clip matrix for the given aspect ratio.
    ///
    /// Maps the visible frustum to `x, y ∈ [-1, 1]` after the perspective
    /// divide, with the near plane at `z = 0` and the far plane at `z = -1`
    /// (or approaching `-1` for an infinite far plane).
    #[must_use]
    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        let zn = self.near_plane_distance;
        let zf = self.far_plane_distance;
        let half_width_depth_ratio = (self.field_of_view.to_radians() * 0.5).tan();
        let w = 1.0 / half_width_depth_ratio;
        let h = aspect_ratio / half_width_depth_ratio;
        let m22 = if zf.is_finite() { zf / (zn - zf) } else { -1.0 };
        let m32 = zn * m22;
        DMat4::from_cols(
            DVec4::new(w, 0.0, 0.0, 0.0),
            DVec4::new(0.0, h, 0.0, 0.0),
            DVec4::new(0.0, 0.0, m22, -1.0),
            DVec4::new(0.0, 0.0, m32, 0.0),
        )
    }

    /// Builds the world-space picking ray through viewport point `p`.
    ///
    /// The ray starts on the near plane rather than at the eye, so content in
    /// front of the near plane is never picked. The distance adjustment is
    /// always zero for perspective cameras.
    ///
    /// Returns `None` for an empty viewport, a degenerate orientation, a field
    /// of view outside `(0°, 180°)`, or a singular camera transform.
    #[must_use]
    pub fn ray_from_viewport_point(&self, p: Point, viewport: Size) -> Option<CameraRay> {
        if !is_usable_viewport(viewport) {
            return None;
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return None;
        }
        let np = normalized_point(p, viewport);
        let aspect = aspect_ratio(viewport);
        let half_width_depth_ratio = (self.field_of_view.to_radians() * 0.5).tan();
        let w = 1.0 / half_width_depth_ratio;
        let h = aspect / half_width_depth_ratio;

        // Direction through `p` in camera space, on the plane z = -1.
        let camera_direction = DVec3::new(np.x / w, np.y / h, -1.0);

        let mut view = view_matrix(self.position, self.look_direction, self.up_direction)?;
        let inverse_view = try_invert(&view)?;
        let world_direction = inverse_view.transform_vector3(camera_direction);

        let mut origin = self.position + self.near_plane_distance * world_direction;
        let mut direction = world_direction.normalize_or_zero();

        if !is_identity(&self.transform) {
            origin = transform_point(&self.transform, origin)?;
            direction = self
                .transform
                .transform_vector3(direction)
                .normalize_or_zero();
            view *= try_invert(&self.transform)?;
        }
        if direction == DVec3::ZERO {
            return None;
        }

        let projection = self.projection_matrix(aspect);
        Some(CameraRay {
            ray: Ray3::new(origin, direction),
            hit_test_projection: viewport_matrix(viewport) * projection * view,
            distance_adjustment: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    fn camera_90() -> PerspectiveCamera {
        PerspectiveCamera {
            field_of_view: 90.0,
            ..PerspectiveCamera::default()
        }
    }

    #[test]
    fn center_ray_looks_down_negative_z() {
        let cam = camera_90();
        let r = cam
            .ray_from_viewport_point(Point::new(50.0, 50.0), Size::new(100.0, 100.0))
            .unwrap();
        assert!((r.ray.direction - DVec3::NEG_Z).length() < 1e-12);
        assert_eq!(r.distance_adjustment, 0.0);
        assert!(r.ray.is_ray());
        // Origin sits on the near plane.
        assert!((r.ray.origin - DVec3::new(0.0, 0.0, -0.125)).length() < 1e-12);
    }

    #[test]
    fn corner_ray_spans_half_field_of_view() {
        let cam = camera_90();
        let r = cam
            .ray_from_viewport_point(Point::new(100.0, 0.0), Size::new(100.0, 100.0))
            .unwrap();
        let expected = DVec3::new(1.0, 1.0, -1.0).normalize();
        assert!((r.ray.direction - expected).length() < 1e-12, "{:?}", r.ray);
    }

    #[test]
    fn hit_test_projection_maps_ray_points_back_to_pixel() {
        let cam = PerspectiveCamera {
            position: DVec3::new(3.0, 1.0, 8.0),
            look_direction: DVec3::new(-0.3, -0.1, -1.0),
            field_of_view: 60.0,
            ..PerspectiveCamera::default()
        };
        let viewport = Size::new(320.0, 200.0);
        let pixel = Point::new(40.0, 150.0);
        let r = cam.ray_from_viewport_point(pixel, viewport).unwrap();
        let projected = r.project_to_viewport(r.ray.at(17.0)).unwrap();
        assert!((projected.x - pixel.x).abs() < 1e-6, "{projected:?}");
        assert!((projected.y - pixel.y).abs() < 1e-6, "{projected:?}");
    }

    #[test]
    fn camera_transform_moves_the_ray() {
        let cam = PerspectiveCamera {
            field_of_view: 90.0,
            transform: DMat4::from_translation(DVec3::new(10.0, 0.0, 0.0))
                * DMat4::from_rotation_y(FRAC_PI_2),
            ..PerspectiveCamera::default()
        };
        let r = cam
            .ray_from_viewport_point(Point::new(50.0, 50.0), Size::new(100.0, 100.0))
            .unwrap();
        // Rotating -Z by +90° about Y gives -X.
        assert!((r.ray.direction - DVec3::NEG_X).length() < 1e-12);
        assert!((r.ray.origin - DVec3::new(10.0 - 0.125, 0.0, 0.0)).length() < 1e-12);
        let projected = r.project_to_viewport(r.ray.at(5.0)).unwrap();
        assert!((projected - Point::new(50.0, 50.0)).hypot() < 1e-6);
    }

    #[test]
    fn invalid_inputs_yield_no_ray() {
        let cam = camera_90();
        assert!(
            cam.ray_from_viewport_point(Point::ZERO, Size::new(0.0, 10.0))
                .is_none()
        );
        let flat = PerspectiveCamera {
            transform: DMat4::from_scale(DVec3::new(1.0, 0.0, 1.0)),
            ..camera_90()
        };
        assert!(
            flat.ray_from_viewport_point(Point::ZERO, Size::new(10.0, 10.0))
                .is_none()
        );
        let wide = PerspectiveCamera {
            field_of_view: 180.0,
            ..camera_90()
        };
        assert!(
            wide.ray_from_viewport_point(Point::ZERO, Size::new(10.0, 10.0))
                .is_none()
        );
    }
}
