// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage behind the scene's node, model, and host handles.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::types::Handle;

pub(crate) struct Slots<H, T> {
    entries: Vec<Option<T>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    _handle: PhantomData<H>,
}

impl<H, T> Default for Slots<H, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            _handle: PhantomData,
        }
    }
}

impl<H: Handle, T> Slots<H, T> {
    pub(crate) fn insert(&mut self, value: T) -> H {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(value);
            (idx, generation)
        } else {
            self.entries.push(Some(value));
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Handles use 32-bit indices by design."
        )]
        H::from_parts(idx as u32, generation)
    }

    pub(crate) fn remove(&mut self, id: H) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.free_list.push(id.idx());
        self.entries[id.idx()].take()
    }

    pub(crate) fn contains(&self, id: H) -> bool {
        self.entries.get(id.idx()).is_some_and(Option::is_some)
            && self.generations[id.idx()] == id.generation()
    }

    pub(crate) fn get(&self, id: H) -> Option<&T> {
        if self.generations.get(id.idx()) != Some(&id.generation()) {
            return None;
        }
        self.entries[id.idx()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: H) -> Option<&mut T> {
        if self.generations.get(id.idx()) != Some(&id.generation()) {
            return None;
        }
        self.entries[id.idx()].as_mut()
    }

    /// Live entries with their handles.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, entry)| {
            let value = entry.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Handles use 32-bit indices by design."
            )]
            Some((H::from_parts(idx as u32, self.generations[idx]), value))
        })
    }

    pub(crate) fn total(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn alive(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }
}
