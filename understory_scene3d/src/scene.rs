// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene nodes: structure, dirty propagation, and cached bounds.

use alloc::boxed::Box;
use alloc::vec::Vec;

use glam::DMat4;
use understory_geom3d::{Aabb3, is_identity};

use crate::error::SceneError;
use crate::host::HostBoundary;
use crate::model::Model;
use crate::slots::Slots;
use crate::types::{BoundsStats, DirtyFlags, HostId, ModelId, ModelOwner, NodeId, Parent};

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: Parent,
    pub(crate) children: Vec<NodeId>,
    pub(crate) transform: DMat4,
    pub(crate) content: Option<ModelId>,
    // Both caches are in the node's inner space.
    content_bounds: Aabb3,
    pub(crate) subgraph_bounds: Aabb3,
    dirty: DirtyFlags,
}

impl Node {
    fn new() -> Self {
        Self {
            parent: Parent::None,
            children: Vec::new(),
            transform: DMat4::IDENTITY,
            content: None,
            content_bounds: Aabb3::EMPTY,
            subgraph_bounds: Aabb3::EMPTY,
            dirty: DirtyFlags::all(),
        }
    }
}

/// Retained 3D scene: a forest of transformed nodes with attached model content.
///
/// The scene owns three kinds of entities, each addressed by a generational handle:
/// - nodes ([`NodeId`]), forming trees through [`add_child`](Self::add_child);
/// - models ([`ModelId`]), either triangle geometry or groups of models, attached to
///   at most one node (as content) or one group (as child);
/// - hosts ([`HostId`]), foreign trees that embed a 3D root.
///
/// ## Bounds and invalidation
///
/// Every node caches its content bounds and its subgraph bounds, both in the node's
/// inner space (before its own transform). Edits never recompute bounds; they set
/// [`DirtyFlags`] on the edited node and walk up the parent chain, stopping at the
/// first ancestor that already carries every propagated flag. Bounds are recomputed
/// on the next [`content_bounds`](Self::content_bounds) or
/// [`subgraph_bounds`](Self::subgraph_bounds) query, and only where dirty.
pub struct Scene3D {
    pub(crate) nodes: Slots<NodeId, Node>,
    pub(crate) models: Slots<ModelId, Model>,
    hosts: Slots<HostId, Box<dyn HostBoundary>>,
    pub(crate) stats: BoundsStats,
}

impl Default for Scene3D {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Scene3D {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene3D")
            .field("nodes_total", &self.nodes.total())
            .field("nodes_alive", &self.nodes.alive())
            .field("models_alive", &self.models.alive())
            .field("hosts_alive", &self.hosts.alive())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Scene3D {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Slots::default(),
            models: Slots::default(),
            hosts: Slots::default(),
            stats: BoundsStats::default(),
        }
    }

    /// Create a parentless node with an identity transform and no content.
    ///
    /// New nodes start with every [`DirtyFlags`] bit set.
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.insert(Node::new())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id).ok_or(SceneError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))
    }

    /// What `id` is attached to.
    pub fn parent(&self, id: NodeId) -> Result<Parent, SceneError> {
        Ok(self.node(id)?.parent)
    }

    /// Children of `id`, in index order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(&self.node(id)?.children)
    }

    /// Local transform of `id` (inner space to parent space).
    pub fn transform(&self, id: NodeId) -> Result<DMat4, SceneError> {
        Ok(self.node(id)?.transform)
    }

    /// Model attached to `id`, if any.
    pub fn content(&self, id: NodeId) -> Result<Option<ModelId>, SceneError> {
        Ok(self.node(id)?.content)
    }

    /// Dirty flags currently set on `id`.
    pub fn dirty_flags(&self, id: NodeId) -> Result<DirtyFlags, SceneError> {
        Ok(self.node(id)?.dirty)
    }

    /// Bounds recomputation counters since creation or the last
    /// [`reset_bounds_stats`](Self::reset_bounds_stats).
    pub fn bounds_stats(&self) -> BoundsStats {
        self.stats
    }

    /// Zero the bounds recomputation counters.
    pub fn reset_bounds_stats(&mut self) {
        self.stats = BoundsStats::default();
    }

    // --- structure ---

    /// Append `child` to the children of `parent`.
    ///
    /// `child` must be parentless (neither a node's child nor hosted).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` among the children of `parent` at `index`.
    ///
    /// An `index` past the end appends.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), SceneError> {
        self.node(parent)?;
        if self.node(child)?.parent != Parent::None {
            log::debug!("rejecting insert of {child:?} under {parent:?}: already parented");
            return Err(SceneError::NodeAlreadyParented(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            log::debug!("rejecting insert of {child:?} under {parent:?}: cycle");
            return Err(SceneError::WouldCreateCycle);
        }
        let p = self.node_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        self.node_mut(child)?.parent = Parent::Node(parent);
        self.on_child_added(parent, child)
    }

    /// Detach `child` from `parent`. The child becomes a root and stays alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        if self.node(child)?.parent != Parent::Node(parent) {
            return Err(SceneError::NotAChild);
        }
        self.node_mut(parent)?.children.retain(|c| *c != child);
        self.node_mut(child)?.parent = Parent::None;
        self.on_child_removed(parent, child)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Content models of removed nodes are released (left alive and unowned), not
    /// destroyed; see [`remove_model`](Self::remove_model).
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        match self.node(id)?.parent {
            Parent::None => {}
            Parent::Node(parent) => self.remove_child(parent, id)?,
            Parent::Host(_) => {
                self.detach_from_host(id)?;
            }
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if let Some(model) = node.content.and_then(|m| self.models.get_mut(m)) {
            model.owner = ModelOwner::None;
        }
        for child in node.children {
            self.free_subtree(child);
        }
    }

    /// Returns true if `ancestor` is `id` or one of its node ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == ancestor {
                return true;
            }
            match self.nodes.get(current).map(|n| n.parent) {
                Some(Parent::Node(p)) => current = p,
                _ => return false,
            }
        }
    }

    // --- properties ---

    /// Set the local transform of `id`.
    ///
    /// Setting the current value again is a no-op.
    pub fn set_transform(&mut self, id: NodeId, transform: DMat4) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        if node.transform == transform {
            return Ok(());
        }
        node.transform = transform;
        self.on_transform_changed(id)
    }

    /// Attach `content` to `id`, or clear it with `None`.
    ///
    /// A model can be the content of at most one node and cannot also be a group
    /// child. The previous content, if any, is released.
    pub fn set_content(&mut self, id: NodeId, content: Option<ModelId>) -> Result<(), SceneError> {
        let previous = self.node(id)?.content;
        if previous == content {
            return Ok(());
        }
        if let Some(model) = content {
            let owner = self.model(model)?.owner;
            if owner != ModelOwner::None {
                log::debug!("rejecting content {model:?} for {id:?}: owned by {owner:?}");
                return Err(SceneError::ModelAlreadyOwned(model));
            }
        }
        if let Some(old) = previous.and_then(|m| self.models.get_mut(m)) {
            old.owner = ModelOwner::None;
        }
        if let Some(new) = content.and_then(|m| self.models.get_mut(m)) {
            new.owner = ModelOwner::Node(id);
        }
        self.node_mut(id)?.content = content;
        self.on_content_changed(id)
    }

    // --- hosts ---

    /// Register a host boundary. Roots attached to it forward dirty propagation to it.
    pub fn register_host(&mut self, host: Box<dyn HostBoundary>) -> HostId {
        self.hosts.insert(host)
    }

    /// Unregister `host`, turning every root it hosted into a plain root.
    pub fn unregister_host(&mut self, host: HostId) -> Result<Box<dyn HostBoundary>, SceneError> {
        let boundary = self.hosts.remove(host).ok_or(SceneError::StaleHost(host))?;
        let hosted: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Parent::Host(host))
            .map(|(id, _)| id)
            .collect();
        for id in hosted {
            self.node_mut(id)?.parent = Parent::None;
        }
        Ok(boundary)
    }

    /// Make the parentless node `id` the root of a subtree hosted by `host`.
    pub fn attach_to_host(&mut self, id: NodeId, host: HostId) -> Result<(), SceneError> {
        if !self.hosts.contains(host) {
            return Err(SceneError::StaleHost(host));
        }
        let node = self.node_mut(id)?;
        if node.parent != Parent::None {
            return Err(SceneError::NodeAlreadyParented(id));
        }
        node.parent = Parent::Host(host);
        node.dirty |= DirtyFlags::RENDER;
        self.propagate(Parent::Host(host), DirtyFlags::ANCESTORS);
        Ok(())
    }

    /// Detach `id` from its host. Returns the host it was attached to, or `None`
    /// if it was not hosted.
    pub fn detach_from_host(&mut self, id: NodeId) -> Result<Option<HostId>, SceneError> {
        let node = self.node_mut(id)?;
        let Parent::Host(host) = node.parent else {
            return Ok(None);
        };
        node.parent = Parent::None;
        self.propagate(Parent::Host(host), DirtyFlags::ANCESTORS);
        Ok(Some(host))
    }

    // --- change hooks ---

    /// Invalidate after the local transform of `id` changed.
    ///
    /// The node's own caches are in inner space and stay valid; ancestors become
    /// subgraph- and render-dirty.
    pub fn on_transform_changed(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.invalidate(id, DirtyFlags::RENDER)
    }

    /// Invalidate after the content of `id` (or anything inside it) changed.
    pub fn on_content_changed(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.invalidate(id, DirtyFlags::all())
    }

    /// Invalidate after `child` was added under `parent`.
    pub fn on_child_added(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node_mut(child)?.dirty |= DirtyFlags::RENDER;
        self.invalidate(parent, DirtyFlags::ANCESTORS)
    }

    /// Invalidate after `child` was removed from `parent`.
    pub fn on_child_removed(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(child)?;
        self.invalidate(parent, DirtyFlags::ANCESTORS)
    }

    /// Clear [`DirtyFlags::RENDER`] on `id` and every render-dirty descendant.
    pub fn clear_render_dirty(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        if !node.dirty.contains(DirtyFlags::RENDER) {
            return Ok(());
        }
        node.dirty.remove(DirtyFlags::RENDER);
        let count = node.children.len();
        for i in 0..count {
            let child = self.node(id)?.children[i];
            self.clear_render_dirty(child)?;
        }
        Ok(())
    }

    fn invalidate(&mut self, id: NodeId, own: DirtyFlags) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.dirty |= own;
        let parent = node.parent;
        self.propagate(parent, DirtyFlags::ANCESTORS);
        Ok(())
    }

    /// Walk up from `parent`, setting `flags` until an ancestor already carries all
    /// of them or the walk leaves the scene.
    fn propagate(&mut self, mut parent: Parent, flags: DirtyFlags) {
        loop {
            match parent {
                Parent::None => return,
                Parent::Host(host) => {
                    if let Some(boundary) = self.hosts.get_mut(host) {
                        boundary.continue_propagation_across_boundary(flags);
                    }
                    return;
                }
                Parent::Node(id) => {
                    let Some(node) = self.nodes.get_mut(id) else {
                        return;
                    };
                    if node.dirty.contains(flags) {
                        return;
                    }
                    node.dirty |= flags;
                    parent = node.parent;
                }
            }
        }
    }

    // --- bounds ---

    /// Bounds of the content of `id`, in its inner space.
    ///
    /// This is the attached model's outer-space bounds, or [`Aabb3::EMPTY`]
    /// without content. Recomputed only if [`DirtyFlags::CONTENT_BOUNDS`] is set.
    pub fn content_bounds(&mut self, id: NodeId) -> Result<Aabb3, SceneError> {
        self.node(id)?;
        Ok(self.content_bounds_of(id))
    }

    /// Bounds of `id`'s content and all descendants, in `id`'s inner space.
    ///
    /// Recomputed only where [`DirtyFlags::SUBGRAPH_BOUNDS`] is set; a clean
    /// result is returned from cache without touching descendants.
    pub fn subgraph_bounds(&mut self, id: NodeId) -> Result<Aabb3, SceneError> {
        self.node(id)?;
        Ok(self.subgraph_bounds_of(id))
    }

    /// [`subgraph_bounds`](Self::subgraph_bounds) transformed by `id`'s own
    /// transform, i.e. in its parent's space.
    pub fn outer_subgraph_bounds(&mut self, id: NodeId) -> Result<Aabb3, SceneError> {
        let inner = self.subgraph_bounds(id)?;
        Ok(transform_bounds(&inner, &self.node(id)?.transform))
    }

    fn content_bounds_of(&mut self, id: NodeId) -> Aabb3 {
        let Some(node) = self.nodes.get(id) else {
            return Aabb3::EMPTY;
        };
        if !node.dirty.contains(DirtyFlags::CONTENT_BOUNDS) {
            return node.content_bounds;
        }
        let bounds = node
            .content
            .map_or(Aabb3::EMPTY, |m| self.model_outer_bounds_of(m));
        self.stats.content_recomputations += 1;
        if let Some(node) = self.nodes.get_mut(id) {
            node.content_bounds = bounds;
            node.dirty.remove(DirtyFlags::CONTENT_BOUNDS);
        }
        bounds
    }

    fn subgraph_bounds_of(&mut self, id: NodeId) -> Aabb3 {
        let Some(node) = self.nodes.get(id) else {
            return Aabb3::EMPTY;
        };
        if !node.dirty.contains(DirtyFlags::SUBGRAPH_BOUNDS) {
            return node.subgraph_bounds;
        }
        let count = node.children.len();
        let mut bounds = self.content_bounds_of(id);
        for i in 0..count {
            let Some(child) = self.nodes.get(id).map(|n| n.children[i]) else {
                break;
            };
            let child_bounds = self.subgraph_bounds_of(child);
            if let Some(c) = self.nodes.get(child) {
                bounds = bounds.union(&transform_bounds(&child_bounds, &c.transform));
            }
        }
        self.stats.subgraph_recomputations += 1;
        if let Some(node) = self.nodes.get_mut(id) {
            node.subgraph_bounds = bounds;
            node.dirty.remove(DirtyFlags::SUBGRAPH_BOUNDS);
        }
        bounds
    }
}

pub(crate) fn transform_bounds(bounds: &Aabb3, transform: &DMat4) -> Aabb3 {
    if is_identity(transform) {
        *bounds
    } else {
        bounds.transform(transform)
    }
}
