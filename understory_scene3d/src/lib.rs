// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene3d --heading-base-level=0

//! Understory Scene 3D: a retained 3D scene tree with lazily cached bounds and ray hit testing.
//!
//! - Represents a forest of nodes, each with a local transform, ordered children, and
//!   optional model content (triangle meshes and groups of models with their own transforms).
//! - Caches per-node content and subgraph bounds, invalidated by edits and recomputed only
//!   on demand and only where dirty.
//! - Answers ray queries, from a world-space ray or through a camera at a viewport point,
//!   with every intersected triangle sorted by distance.
//!
//! The crate does not render. A renderer reads bounds and [`DirtyFlags`] and acknowledges
//! what it re-submitted with [`Scene3D::clear_render_dirty`].
//!
//! ## Coordinate spaces
//!
//! A node's *inner* space is its local space before its own transform; its *outer* space
//! is the parent's inner space. Cached bounds are in inner space; use
//! [`Scene3D::outer_subgraph_bounds`] for the transformed box. Ray queries are posed in
//! the outer space of the root they start from.
//!
//! ## Invalidation
//!
//! Edits ([`Scene3D::set_transform`], [`Scene3D::set_content`], [`Scene3D::add_child`],
//! model edits, ...) set dirty flags on the edited node and walk up the parent chain until
//! an ancestor is already dirty. A root hosted by a foreign tree forwards the walk through
//! [`HostBoundary::continue_propagation_across_boundary`]. The `on_*` hooks run the same
//! invalidation for callers that change state through their own binding layer.
//!
//! ## Example
//!
//! ```rust
//! use glam::{DMat4, DVec3};
//! use understory_geom3d::Ray3;
//! use understory_scene3d::{MeshGeometry3D, Scene3D};
//!
//! let mut scene = Scene3D::new();
//! let root = scene.create_node();
//! let child = scene.create_node();
//! scene.add_child(root, child).unwrap();
//!
//! // A triangle in the z = 0 plane, moved to z = -2 by the child's transform.
//! let mesh = MeshGeometry3D::new(
//!     vec![DVec3::ZERO, DVec3::X, DVec3::Y],
//!     None,
//! );
//! let model = scene.create_geometry_model(mesh);
//! scene.set_content(child, Some(model)).unwrap();
//! scene
//!     .set_transform(child, DMat4::from_translation(DVec3::new(0.0, 0.0, -2.0)))
//!     .unwrap();
//!
//! let bounds = scene.subgraph_bounds(root).unwrap();
//! assert_eq!(bounds.min.z, -2.0);
//!
//! let ray = Ray3::new(DVec3::new(0.25, 0.25, 5.0), DVec3::NEG_Z);
//! let hit = scene.hit_test_nearest(root, ray).unwrap().unwrap();
//! assert_eq!(hit.node, child);
//! assert!((hit.distance - 7.0).abs() < 1e-12);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod host;
mod mesh;
mod model;
mod scene;
mod slots;
mod types;

pub use error::SceneError;
pub use hit_test::{
    FilterBehavior, HitRecord, HitTestContext3D, HitTestParameters3D, RayHitTestParameters,
    ResultBehavior,
};
pub use host::HostBoundary;
pub use mesh::{MeshGeometry3D, MeshHit};
pub use scene::Scene3D;
pub use types::{BoundsStats, DirtyFlags, HitFaces, HostId, ModelId, ModelOwner, NodeId, Parent};
