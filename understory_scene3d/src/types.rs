// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the 3D scene: handles, dirty flags, and parent links.

/// Identifier for a scene node.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene3D::is_alive`](crate::Scene3D::is_alive) to check whether a `NodeId` still
/// refers to a live node. Stale handles never alias a different live node because the
/// generation must match; operations given a stale handle return
/// [`SceneError::StaleNode`](crate::SceneError::StaleNode).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

/// Identifier for a model (geometry leaf or group) owned by a [`Scene3D`](crate::Scene3D).
///
/// Same generational semantics as [`NodeId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModelId(pub(crate) u32, pub(crate) u32);

/// Identifier for a registered [`HostBoundary`](crate::HostBoundary).
///
/// Same generational semantics as [`NodeId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HostId(pub(crate) u32, pub(crate) u32);

/// Slot handle shared by the three id kinds.
pub(crate) trait Handle: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn idx(self) -> usize;
    fn generation(self) -> u32;
}

macro_rules! impl_handle {
    ($($ty:ident),*) => {$(
        impl Handle for $ty {
            #[inline]
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self(idx, generation)
            }

            #[inline]
            fn idx(self) -> usize {
                self.0 as usize
            }

            #[inline]
            fn generation(self) -> u32 {
                self.1
            }
        }
    )*};
}

impl_handle!(NodeId, ModelId, HostId);

bitflags::bitflags! {
    /// Cached state that is stale on a node.
    ///
    /// Bits are set by mutations and cleared only when the matching value is
    /// recomputed (bounds) or acknowledged by the renderer
    /// ([`Scene3D::clear_render_dirty`](crate::Scene3D::clear_render_dirty)).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// The node's content bounds must be recomputed.
        const CONTENT_BOUNDS  = 0b0000_0001;
        /// The node's subgraph bounds must be recomputed.
        const SUBGRAPH_BOUNDS = 0b0000_0010;
        /// The node, or something below it, must be re-submitted for rendering.
        const RENDER          = 0b0000_0100;
    }
}

impl DirtyFlags {
    /// Flags written on every ancestor of a change.
    pub const ANCESTORS: Self = Self::SUBGRAPH_BOUNDS.union(Self::RENDER);
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::all()
    }
}

bitflags::bitflags! {
    /// Triangle faces a geometry model reports hits for.
    ///
    /// A face is the front face when its vertices appear counter-clockwise from the
    /// ray origin, measured in the model's own space.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HitFaces: u8 {
        /// Counter-clockwise triangles.
        const FRONT = 0b01;
        /// Clockwise triangles.
        const BACK  = 0b10;
    }
}

impl Default for HitFaces {
    fn default() -> Self {
        Self::all()
    }
}

/// What a scene node is attached to.
///
/// A node has at most one parent, which is either another scene node or a
/// host boundary (for example a 2D tree that embeds a 3D subtree).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Parent {
    /// The node is a root.
    #[default]
    None,
    /// The node is a child of another scene node.
    Node(NodeId),
    /// The node is the root of a subtree hosted by a foreign tree.
    Host(HostId),
}

/// What a model is attached to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ModelOwner {
    /// Free-standing model.
    #[default]
    None,
    /// Content of a scene node.
    Node(NodeId),
    /// Child of a group model.
    Group(ModelId),
}

/// Counters of bounds recomputations, for diagnostics and tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BoundsStats {
    /// Number of times any node recomputed its content bounds.
    pub content_recomputations: u64,
    /// Number of times any node recomputed its subgraph bounds.
    pub subgraph_recomputations: u64,
}
