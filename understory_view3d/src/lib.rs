// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_view3d --heading-base-level=0

//! Understory View 3D: cameras that turn viewport points into picking rays.
//!
//! This crate converts a point on a 2D viewport into a world-space [`Ray3`]
//! suitable for hit testing a 3D scene, together with the matrix that maps
//! world-space hit points back onto the viewport. It does **not** own a scene;
//! pair it with `understory_scene3d` (or any other structure that can answer
//! ray queries).
//!
//! - [`PerspectiveCamera`]: horizontal field of view in degrees; rays fan out
//!   from the near plane.
//! - [`OrthographicCamera`]: parallel rays; the near plane may be pulled toward
//!   the scene for precision, reported through
//!   [`CameraRay::distance_adjustment`].
//! - [`Camera`]: either of the above.
//!
//! ## Conventions
//!
//! - Viewport coordinates are in pixels with the origin at the top-left and
//!   `+y` pointing down.
//! - Cameras look down their local `-Z` axis with `+Y` up (right-handed).
//! - Hit distances measured along [`CameraRay::ray`] must have
//!   [`CameraRay::distance_adjustment`] added to them.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use kurbo::{Point, Size};
//! use understory_view3d::PerspectiveCamera;
//!
//! let camera = PerspectiveCamera {
//!     position: DVec3::new(0.0, 0.0, 10.0),
//!     field_of_view: 60.0,
//!     ..PerspectiveCamera::default()
//! };
//! let viewport = Size::new(800.0, 600.0);
//! let pick = camera
//!     .ray_from_viewport_point(Point::new(400.0, 300.0), viewport)
//!     .unwrap();
//! assert!((pick.ray.direction - DVec3::NEG_Z).length() < 1e-12);
//!
//! // World points along the ray land back on the picked pixel.
//! let back = pick.project_to_viewport(pick.ray.at(5.0)).unwrap();
//! assert!((back.x - 400.0).abs() < 1e-9 && (back.y - 300.0).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod camera;
mod orthographic;
mod perspective;
pub mod viewport;

pub use camera::{Camera, CameraRay};
pub use orthographic::OrthographicCamera;
pub use perspective::PerspectiveCamera;

pub use understory_geom3d::{Aabb3, Ray3};
