// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triangle mesh geometry.

use alloc::vec::Vec;

use glam::DVec3;
use understory_geom3d::{Aabb3, Ray3, TriangleHit, intersect_triangle};

use crate::types::HitFaces;

/// Indexed or non-indexed triangle list.
///
/// With indices, every three consecutive indices form a triangle; without,
/// every three consecutive positions do. Trailing elements that do not form a
/// full triangle are ignored, and so are triangles that reference a position
/// out of range.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGeometry3D {
    positions: Vec<DVec3>,
    indices: Option<Vec<u32>>,
    bounds: Aabb3,
}

/// Geometry detail of a triangle-mesh hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshHit {
    /// Position indices of the hit triangle's vertices `(v1, v2, v3)`.
    pub vertex_indices: [u32; 3],
    /// Barycentric weights `(w1, w2, w3)` of the hit point.
    ///
    /// The weights sum to one and each lies in `[0, 1]`.
    pub barycentric: DVec3,
}

impl MeshGeometry3D {
    /// Creates a mesh from positions and optional triangle indices.
    pub fn new(positions: Vec<DVec3>, indices: Option<Vec<u32>>) -> Self {
        let bounds = Aabb3::from_points(positions.iter().copied());
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Triangle indices, if the mesh is indexed.
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Bounds of every position, whether referenced by a triangle or not.
    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Iterates well-formed triangles as position indices and vertices.
    pub fn triangles(&self) -> impl Iterator<Item = ([u32; 3], [DVec3; 3])> + '_ {
        let vertex = |i: u32| self.positions.get(i as usize).copied();
        let indexed = self.indices.as_deref().map(|indices| {
            indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
        });
        let sequential = self.indices.is_none().then(|| {
            (0..self.positions.len() / 3).filter_map(|t| {
                let first = u32::try_from(t * 3).ok()?;
                Some([first, first + 1, first + 2])
            })
        });
        indexed
            .into_iter()
            .flatten()
            .chain(sequential.into_iter().flatten())
            .filter_map(move |idx| {
                Some((idx, [vertex(idx[0])?, vertex(idx[1])?, vertex(idx[2])?]))
            })
    }

    /// Every intersection of `ray` (in mesh space) with a triangle whose
    /// facing is selected by `faces`.
    pub fn intersect_ray<'a>(
        &'a self,
        ray: &'a Ray3,
        faces: HitFaces,
    ) -> impl Iterator<Item = (MeshHit, TriangleHit)> + 'a {
        self.triangles().filter_map(move |(vertex_indices, [v1, v2, v3])| {
            let hit = intersect_triangle(ray, v1, v2, v3)?;
            let face = if hit.front_facing {
                HitFaces::FRONT
            } else {
                HitFaces::BACK
            };
            faces.contains(face).then_some((
                MeshHit {
                    vertex_indices,
                    barycentric: hit.barycentric,
                },
                hit,
            ))
        })
    }
}
