//! Slot arena holding tree nodes.
//!
//! Nodes link to each other through `u32` slot indices. Every occupied slot
//! carries a stamp that is unique for the lifetime of the arena, so an index
//! that was vacated and later reused can be told apart from the node that
//! lived there before.

use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
struct Slot<T> {
    stamp: u64,
    item: Option<T>,
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    next_stamp: u64,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_stamp: 0,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Stores `item` and returns its slot index and stamp.
    pub(crate) fn insert(&mut self, item: T) -> (u32, u64) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.stamp = stamp;
            slot.item = Some(item);
            return (idx, stamp);
        }
        let idx = u32::try_from(self.slots.len()).expect("arena exceeds u32 slots");
        self.slots.push(Slot {
            stamp,
            item: Some(item),
        });
        (idx, stamp)
    }

    /// Vacates slot `idx` and returns what it held.
    ///
    /// Panics if the slot is already vacant.
    pub(crate) fn remove(&mut self, idx: u32) -> T {
        let item = self.slots[idx as usize]
            .item
            .take()
            .expect("removing a vacant arena slot");
        self.free.push(idx);
        self.len -= 1;
        item
    }

    pub(crate) fn stamp(&self, idx: u32) -> u64 {
        self.slots[idx as usize].stamp
    }

    /// Resolves `idx` only if it is occupied by the item stamped `stamp`.
    pub(crate) fn resolve(&self, idx: u32, stamp: u64) -> Option<&T> {
        let slot = self.slots.get(idx as usize)?;
        if slot.stamp != stamp {
            return None;
        }
        slot.item.as_ref()
    }

    pub(crate) fn resolve_mut(&mut self, idx: u32, stamp: u64) -> Option<&mut T> {
        let slot = self.slots.get_mut(idx as usize)?;
        if slot.stamp != stamp {
            return None;
        }
        slot.item.as_mut()
    }

    /// Drops every item. Stamps keep increasing so stale indices stay stale.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<T> Index<u32> for Arena<T> {
    type Output = T;

    fn index(&self, idx: u32) -> &T {
        self.slots[idx as usize]
            .item
            .as_ref()
            .expect("vacant arena slot")
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    fn index_mut(&mut self, idx: u32) -> &mut T {
        self.slots[idx as usize]
            .item
            .as_mut()
            .expect("vacant arena slot")
    }
}
