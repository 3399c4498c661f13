// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::DirtyFlags;

/// A foreign tree that hosts a 3D subtree.
///
/// When dirty state propagates up to a root whose parent is
/// [`Parent::Host`](crate::Parent::Host), the scene stops walking and hands
/// the flags to the host instead. The host continues the walk in its own tree
/// (for example marking a 2D viewport node for re-layout and repaint).
pub trait HostBoundary {
    /// Continues dirty propagation on the host side of the boundary.
    fn continue_propagation_across_boundary(&mut self, flags: DirtyFlags);
}
