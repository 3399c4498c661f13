// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat4, DVec3};
use kurbo::{Point, Size};
use understory_geom3d::{Aabb3, Ray3, transform_point};

use crate::{OrthographicCamera, PerspectiveCamera};

/// A picking ray produced by a camera for one viewport point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraRay {
    /// World-space ray, normalized, starting on the (possibly adjusted) near
    /// plane.
    pub ray: Ray3,
    /// World-to-viewport matrix (`viewport * projection * view`) that was in
    /// effect when the ray was built.
    pub hit_test_projection: DMat4,
    /// Amount to add to every hit distance measured from [`Self::ray`] so that
    /// distances are reported relative to the configured near plane.
    pub distance_adjustment: f64,
}

impl CameraRay {
    /// Projects a world-space point to viewport coordinates.
    ///
    /// Returns `None` if the point projects to infinity.
    #[must_use]
    pub fn project_to_viewport(&self, world: DVec3) -> Option<Point> {
        let p = transform_point(&self.hit_test_projection, world)?;
        Some(Point::new(p.x, p.y))
    }
}

/// Either kind of projection camera.
#[derive(Clone, Debug, PartialEq)]
pub enum Camera {
    /// Perspective projection.
    Perspective(PerspectiveCamera),
    /// Parallel projection.
    Orthographic(OrthographicCamera),
}

impl Default for Camera {
    fn default() -> Self {
        Self::Perspective(PerspectiveCamera::default())
    }
}

impl From<PerspectiveCamera> for Camera {
    fn from(camera: PerspectiveCamera) -> Self {
        Self::Perspective(camera)
    }
}

impl From<OrthographicCamera> for Camera {
    fn from(camera: OrthographicCamera) -> Self {
        Self::Orthographic(camera)
    }
}

impl Camera {
    /// World-to-camera matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Option<DMat4> {
        match self {
            Self::Perspective(c) => c.view_matrix(),
            Self::Orthographic(c) => c.view_matrix(),
        }
    }

    /// Camera-to-clip matrix for the given aspect ratio.
    #[must_use]
    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        match self {
            Self::Perspective(c) => c.projection_matrix(aspect_ratio),
            Self::Orthographic(c) => c.projection_matrix(aspect_ratio),
        }
    }

    /// Builds the world-space picking ray through viewport point `p`.
    ///
    /// `scene_bounds` is only consulted by orthographic cameras; see
    /// [`OrthographicCamera::ray_from_viewport_point`].
    #[must_use]
    pub fn ray_from_viewport_point(
        &self,
        p: Point,
        viewport: Size,
        scene_bounds: &Aabb3,
    ) -> Option<CameraRay> {
        match self {
            Self::Perspective(c) => c.ray_from_viewport_point(p, viewport),
            Self::Orthographic(c) => c.ray_from_viewport_point(p, viewport, scene_bounds),
        }
    }
}
