// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_geom3d --heading-base-level=0

//! Understory Geom 3D: double-precision building blocks for 3D scene queries.
//!
//! This crate holds the leaf geometry used by `understory_scene3d` and
//! `understory_view3d`. Everything here is a pure function or a small value
//! type; nothing owns a scene.
//!
//! - [`Aabb3`]: axis-aligned box with an empty sentinel, union, and
//!   [`Aabb3::transform`] producing the tight box of a transformed box.
//! - [`Ray3`]: origin + direction with a [`RayKind`]. A ray that went through
//!   a projective transform may only keep line semantics.
//! - [`intersect_triangle`]: ray/line versus triangle with barycentric weights.
//! - [`TransformStack`]: append-only stack of accumulated transforms used while
//!   walking a tree.
//!
//! ## Conventions
//!
//! All matrices are [`glam::DMat4`] acting on column vectors. Pushing `m` onto a
//! [`TransformStack`] whose top is `t` stores `t * m`: `m` applies first, then
//! whatever was accumulated above it.
//!
//! ```rust
//! use glam::{DMat4, DVec3};
//! use understory_geom3d::{Aabb3, Ray3};
//!
//! let unit = Aabb3::new(DVec3::ZERO, DVec3::ONE);
//! let moved = unit.transform(&DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)));
//! assert_eq!(moved.min, DVec3::new(5.0, 0.0, 0.0));
//!
//! let ray = Ray3::new(DVec3::new(5.5, 0.5, 10.0), DVec3::NEG_Z);
//! assert!(moved.intersects_ray(&ray));
//! assert!(!unit.intersects_ray(&ray));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aabb;
mod matrix;
mod ray;
mod transform_stack;
mod triangle;

pub use aabb::Aabb3;
pub use matrix::{is_affine, is_identity, transform_point, try_invert};
pub use ray::{Ray3, RayKind};
pub use transform_stack::TransformStack;
pub use triangle::{TriangleHit, intersect_triangle};
