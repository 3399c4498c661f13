// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Models: triangle geometry leaves and groups, attached to scene nodes as content.

use alloc::vec::Vec;

use glam::DMat4;
use understory_geom3d::Aabb3;

use crate::error::SceneError;
use crate::mesh::MeshGeometry3D;
use crate::scene::{Scene3D, transform_bounds};
use crate::types::{HitFaces, ModelId, ModelOwner};

#[derive(Clone, Debug)]
pub(crate) enum ModelKind {
    Geometry {
        mesh: MeshGeometry3D,
        faces: HitFaces,
    },
    Group {
        children: Vec<ModelId>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Model {
    pub(crate) transform: DMat4,
    pub(crate) kind: ModelKind,
    pub(crate) owner: ModelOwner,
}

impl Model {
    fn new(kind: ModelKind) -> Self {
        Self {
            transform: DMat4::IDENTITY,
            kind,
            owner: ModelOwner::None,
        }
    }
}

impl Scene3D {
    /// Create a free-standing geometry model that hit-tests both faces.
    pub fn create_geometry_model(&mut self, mesh: MeshGeometry3D) -> ModelId {
        self.models.insert(Model::new(ModelKind::Geometry {
            mesh,
            faces: HitFaces::default(),
        }))
    }

    /// Create a free-standing, empty group model.
    pub fn create_group_model(&mut self) -> ModelId {
        self.models.insert(Model::new(ModelKind::Group {
            children: Vec::new(),
        }))
    }

    /// Returns true if `id` refers to a live model.
    pub fn is_model_alive(&self, id: ModelId) -> bool {
        self.models.contains(id)
    }

    pub(crate) fn model(&self, id: ModelId) -> Result<&Model, SceneError> {
        self.models.get(id).ok_or(SceneError::StaleModel(id))
    }

    fn model_mut(&mut self, id: ModelId) -> Result<&mut Model, SceneError> {
        self.models.get_mut(id).ok_or(SceneError::StaleModel(id))
    }

    /// What `id` is attached to.
    pub fn model_owner(&self, id: ModelId) -> Result<ModelOwner, SceneError> {
        Ok(self.model(id)?.owner)
    }

    /// Local transform of `id` (inner space to outer space).
    pub fn model_transform(&self, id: ModelId) -> Result<DMat4, SceneError> {
        Ok(self.model(id)?.transform)
    }

    /// Set the local transform of `id` and invalidate the owning node, if any.
    pub fn set_model_transform(&mut self, id: ModelId, transform: DMat4) -> Result<(), SceneError> {
        let model = self.model_mut(id)?;
        if model.transform == transform {
            return Ok(());
        }
        model.transform = transform;
        self.on_model_changed(id)
    }

    /// Geometry of the leaf model `id`.
    pub fn model_geometry(&self, id: ModelId) -> Result<&MeshGeometry3D, SceneError> {
        match &self.model(id)?.kind {
            ModelKind::Geometry { mesh, .. } => Ok(mesh),
            ModelKind::Group { .. } => Err(SceneError::NotAGeometry(id)),
        }
    }

    /// Replace the geometry of the leaf model `id`.
    pub fn set_model_geometry(
        &mut self,
        id: ModelId,
        geometry: MeshGeometry3D,
    ) -> Result<(), SceneError> {
        match &mut self.model_mut(id)?.kind {
            ModelKind::Geometry { mesh, .. } => *mesh = geometry,
            ModelKind::Group { .. } => return Err(SceneError::NotAGeometry(id)),
        }
        self.on_model_changed(id)
    }

    /// Faces of the leaf model `id` that report hits.
    pub fn model_hit_faces(&self, id: ModelId) -> Result<HitFaces, SceneError> {
        match &self.model(id)?.kind {
            ModelKind::Geometry { faces, .. } => Ok(*faces),
            ModelKind::Group { .. } => Err(SceneError::NotAGeometry(id)),
        }
    }

    /// Select which faces of the leaf model `id` report hits.
    ///
    /// Bounds are unaffected, so no invalidation happens.
    pub fn set_model_hit_faces(
        &mut self,
        id: ModelId,
        hit_faces: HitFaces,
    ) -> Result<(), SceneError> {
        match &mut self.model_mut(id)?.kind {
            ModelKind::Geometry { faces, .. } => *faces = hit_faces,
            ModelKind::Group { .. } => return Err(SceneError::NotAGeometry(id)),
        }
        Ok(())
    }

    /// Children of the group model `id`.
    pub fn model_children(&self, id: ModelId) -> Result<&[ModelId], SceneError> {
        match &self.model(id)?.kind {
            ModelKind::Group { children } => Ok(children),
            ModelKind::Geometry { .. } => Err(SceneError::NotAGroup(id)),
        }
    }

    /// Append the free-standing model `child` to the group `group`.
    pub fn add_model_child(&mut self, group: ModelId, child: ModelId) -> Result<(), SceneError> {
        self.model_children(group)?;
        let owner = self.model(child)?.owner;
        if owner != ModelOwner::None {
            log::debug!("rejecting {child:?} as child of {group:?}: owned by {owner:?}");
            return Err(SceneError::ModelAlreadyOwned(child));
        }
        if self.is_model_ancestor_or_self(child, group) {
            log::debug!("rejecting {child:?} as child of {group:?}: cycle");
            return Err(SceneError::WouldCreateCycle);
        }
        if let ModelKind::Group { children } = &mut self.model_mut(group)?.kind {
            children.push(child);
        }
        self.model_mut(child)?.owner = ModelOwner::Group(group);
        self.on_model_changed(group)
    }

    /// Detach `child` from the group `group`, leaving it free-standing.
    pub fn remove_model_child(&mut self, group: ModelId, child: ModelId) -> Result<(), SceneError> {
        self.model_children(group)?;
        if self.model(child)?.owner != ModelOwner::Group(group) {
            return Err(SceneError::NotAChild);
        }
        if let ModelKind::Group { children } = &mut self.model_mut(group)?.kind {
            children.retain(|c| *c != child);
        }
        self.model_mut(child)?.owner = ModelOwner::None;
        self.on_model_changed(group)
    }

    /// Destroy the free-standing model `id` and, for a group, all of its descendants.
    ///
    /// Fails with [`SceneError::ModelAlreadyOwned`] if `id` is still attached.
    pub fn remove_model(&mut self, id: ModelId) -> Result<(), SceneError> {
        if self.model(id)?.owner != ModelOwner::None {
            return Err(SceneError::ModelAlreadyOwned(id));
        }
        self.free_model(id);
        Ok(())
    }

    fn free_model(&mut self, id: ModelId) {
        let Some(model) = self.models.remove(id) else {
            return;
        };
        if let ModelKind::Group { children } = model.kind {
            for child in children {
                self.free_model(child);
            }
        }
    }

    /// Bounds of `id`'s geometry, or the union of its children's outer bounds,
    /// before `id`'s own transform.
    pub fn model_inner_space_bounds(&self, id: ModelId) -> Result<Aabb3, SceneError> {
        self.model(id)?;
        Ok(self.model_inner_bounds_of(id))
    }

    /// [`model_inner_space_bounds`](Self::model_inner_space_bounds) after `id`'s
    /// own transform.
    pub fn model_outer_space_bounds(&self, id: ModelId) -> Result<Aabb3, SceneError> {
        self.model(id)?;
        Ok(self.model_outer_bounds_of(id))
    }

    fn model_inner_bounds_of(&self, id: ModelId) -> Aabb3 {
        match self.models.get(id).map(|m| &m.kind) {
            Some(ModelKind::Geometry { mesh, .. }) => mesh.bounds(),
            Some(ModelKind::Group { children }) => children
                .iter()
                .fold(Aabb3::EMPTY, |acc, &c| acc.union(&self.model_outer_bounds_of(c))),
            None => Aabb3::EMPTY,
        }
    }

    pub(crate) fn model_outer_bounds_of(&self, id: ModelId) -> Aabb3 {
        let Some(model) = self.models.get(id) else {
            return Aabb3::EMPTY;
        };
        transform_bounds(&self.model_inner_bounds_of(id), &model.transform)
    }

    fn is_model_ancestor_or_self(&self, ancestor: ModelId, id: ModelId) -> bool {
        let mut current = id;
        loop {
            if current == ancestor {
                return true;
            }
            match self.models.get(current).map(|m| m.owner) {
                Some(ModelOwner::Group(g)) => current = g,
                _ => return false,
            }
        }
    }

    /// Walk model ownership up to the scene node that shows `id`, and invalidate
    /// its content.
    fn on_model_changed(&mut self, id: ModelId) -> Result<(), SceneError> {
        let mut current = id;
        loop {
            match self.model(current)?.owner {
                ModelOwner::None => return Ok(()),
                ModelOwner::Group(g) => current = g,
                ModelOwner::Node(node) => return self.on_content_changed(node),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirtyFlags;
    use alloc::vec;
    use glam::DVec3;

    fn triangle_at(z: f64) -> MeshGeometry3D {
        MeshGeometry3D::new(
            vec![DVec3::new(0.0, 0.0, z), DVec3::new(1.0, 0.0, z), DVec3::new(0.0, 1.0, z)],
            None,
        )
    }

    #[test]
    fn group_bounds_union_child_outer_bounds() {
        let mut scene = Scene3D::new();
        let group = scene.create_group_model();
        let a = scene.create_geometry_model(triangle_at(0.0));
        let b = scene.create_geometry_model(triangle_at(0.0));
        scene.add_model_child(group, a).unwrap();
        scene.add_model_child(group, b).unwrap();
        scene
            .set_model_transform(b, DMat4::from_translation(DVec3::new(2.0, 0.0, 3.0)))
            .unwrap();
        scene
            .set_model_transform(group, DMat4::from_scale(DVec3::splat(2.0)))
            .unwrap();

        assert_eq!(
            scene.model_inner_space_bounds(group).unwrap(),
            Aabb3::new(DVec3::ZERO, DVec3::new(3.0, 1.0, 3.0))
        );
        assert_eq!(
            scene.model_outer_space_bounds(group).unwrap(),
            Aabb3::new(DVec3::ZERO, DVec3::new(6.0, 2.0, 6.0))
        );
        let empty = scene.create_group_model();
        assert!(scene.model_inner_space_bounds(empty).unwrap().is_empty());
    }

    #[test]
    fn kind_and_ownership_checks() {
        let mut scene = Scene3D::new();
        let outer = scene.create_group_model();
        let inner = scene.create_group_model();
        let leaf = scene.create_geometry_model(triangle_at(0.0));

        assert_eq!(
            scene.add_model_child(leaf, inner),
            Err(SceneError::NotAGroup(leaf))
        );
        assert_eq!(
            scene.set_model_geometry(inner, triangle_at(1.0)),
            Err(SceneError::NotAGeometry(inner))
        );
        scene.add_model_child(outer, inner).unwrap();
        scene.add_model_child(inner, leaf).unwrap();
        assert_eq!(
            scene.add_model_child(outer, leaf),
            Err(SceneError::ModelAlreadyOwned(leaf))
        );
        assert_eq!(
            scene.add_model_child(inner, outer),
            Err(SceneError::WouldCreateCycle)
        );
        assert_eq!(
            scene.remove_model_child(outer, leaf),
            Err(SceneError::NotAChild)
        );
        assert_eq!(
            scene.remove_model(inner),
            Err(SceneError::ModelAlreadyOwned(inner))
        );

        scene.remove_model_child(outer, inner).unwrap();
        scene.remove_model(inner).unwrap();
        assert!(!scene.is_model_alive(inner));
        assert!(!scene.is_model_alive(leaf), "group removal destroys children");
        assert!(scene.model_children(outer).unwrap().is_empty());
    }

    #[test]
    fn nested_model_edit_invalidates_owning_node() {
        let mut scene = Scene3D::new();
        let root = scene.create_node();
        let node = scene.create_node();
        scene.add_child(root, node).unwrap();
        let group = scene.create_group_model();
        let leaf = scene.create_geometry_model(triangle_at(0.0));
        scene.add_model_child(group, leaf).unwrap();
        scene.set_content(node, Some(group)).unwrap();

        scene.subgraph_bounds(root).unwrap();
        scene.clear_render_dirty(root).unwrap();
        assert!(scene.dirty_flags(node).unwrap().is_empty());

        scene.set_model_geometry(leaf, triangle_at(4.0)).unwrap();
        assert_eq!(scene.dirty_flags(node).unwrap(), DirtyFlags::all());
        assert_eq!(scene.dirty_flags(root).unwrap(), DirtyFlags::ANCESTORS);
        assert_eq!(
            scene.subgraph_bounds(root).unwrap(),
            Aabb3::new(DVec3::new(0.0, 0.0, 4.0), DVec3::new(1.0, 1.0, 4.0))
        );

        // Face selection does not change bounds.
        scene.set_model_hit_faces(leaf, HitFaces::FRONT).unwrap();
        let flags = scene.dirty_flags(node).unwrap();
        assert!(!flags.contains(DirtyFlags::CONTENT_BOUNDS));
    }
}
