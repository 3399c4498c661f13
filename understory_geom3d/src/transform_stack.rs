// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulating transform stack.

use alloc::vec::Vec;

use glam::DMat4;

/// Append-only stack of accumulated transforms.
///
/// Each entry holds the full product from the bottom of the stack to that
/// entry, so [`top`](Self::top) is always the complete accumulated transform
/// and popping is O(1).
///
/// ## Semantics
///
/// - Pushing `m` on an empty stack stores `m`.
/// - Pushing `m` on a stack whose top is `t` stores `t * m` (so `m` maps
///   innermost coordinates first).
/// - Callers are expected to skip pushing the identity; see
///   [`is_identity`](crate::is_identity).
///
/// ```rust
/// use glam::{DMat4, DVec3};
/// use understory_geom3d::TransformStack;
///
/// let mut stack = TransformStack::new();
/// stack.push(DMat4::from_translation(DVec3::X));
/// stack.push(DMat4::from_scale(DVec3::splat(2.0)));
/// // Scale first, then translate.
/// assert_eq!(stack.top_or_identity().transform_point3(DVec3::ONE), DVec3::new(3.0, 2.0, 2.0));
/// stack.pop();
/// assert_eq!(stack.count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    entries: Vec<DMat4>,
}

impl TransformStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Pushes `m`, composing it under the current top.
    pub fn push(&mut self, m: DMat4) {
        let entry = match self.entries.last() {
            Some(top) => *top * m,
            None => m,
        };
        self.entries.push(entry);
    }

    /// Removes and returns the top entry.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty. Pushes and pops must be paired by the
    /// caller.
    pub fn pop(&mut self) -> DMat4 {
        self.entries
            .pop()
            .expect("TransformStack::pop called on an empty stack")
    }

    /// The accumulated transform, if any entry has been pushed.
    #[must_use]
    pub fn top(&self) -> Option<&DMat4> {
        self.entries.last()
    }

    /// The accumulated transform, or the identity when empty.
    #[must_use]
    pub fn top_or_identity(&self) -> DMat4 {
        self.entries.last().copied().unwrap_or(DMat4::IDENTITY)
    }

    /// Returns `true` if nothing has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
