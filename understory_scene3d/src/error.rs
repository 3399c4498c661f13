// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::types::{HostId, ModelId, NodeId};

/// Errors reported by [`Scene3D`](crate::Scene3D) edits and queries.
///
/// Every variant is a precondition violation by the caller; the scene is left
/// unchanged when one is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The node handle is stale or was never issued by this scene.
    StaleNode(NodeId),
    /// The model handle is stale or was never issued by this scene.
    StaleModel(ModelId),
    /// The host handle is stale or was never issued by this scene.
    StaleHost(HostId),
    /// The node already has a parent (a node or a host).
    NodeAlreadyParented(NodeId),
    /// The model is already the content of a node or the child of a group.
    ModelAlreadyOwned(ModelId),
    /// The model is a geometry leaf where a group was required.
    NotAGroup(ModelId),
    /// The model is a group where a geometry leaf was required.
    NotAGeometry(ModelId),
    /// The given child is not attached to the given parent or group.
    NotAChild,
    /// The edit would make a node or model its own ancestor.
    WouldCreateCycle,
    /// The hit-test parameter kind is not implemented by this engine.
    UnsupportedHitTestParameters,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(id) => write!(f, "node {id:?} is not alive"),
            Self::StaleModel(id) => write!(f, "model {id:?} is not alive"),
            Self::StaleHost(id) => write!(f, "host {id:?} is not registered"),
            Self::NodeAlreadyParented(id) => write!(f, "node {id:?} already has a parent"),
            Self::ModelAlreadyOwned(id) => write!(f, "model {id:?} already has an owner"),
            Self::NotAGroup(id) => write!(f, "model {id:?} is not a group"),
            Self::NotAGeometry(id) => write!(f, "model {id:?} is not a geometry model"),
            Self::NotAChild => f.write_str("not a child of the given parent"),
            Self::WouldCreateCycle => f.write_str("edit would create a cycle"),
            Self::UnsupportedHitTestParameters => {
                f.write_str("hit-test parameters are not supported for 3D nodes")
            }
        }
    }
}

impl core::error::Error for SceneError {}
