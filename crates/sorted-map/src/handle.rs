use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one [`SortedMap`](crate::SortedMap) instance.
///
/// Every map, including every clone, draws a fresh id, so a handle can only
/// ever validate against the map that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapId(NonZeroU64);

impl MapId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).expect("map id counter wrapped"))
    }
}

/// Opaque reference to one entry of a [`SortedMap`](crate::SortedMap).
///
/// A handle is plain data: it never borrows the map. It resolves only while
/// its entry is still stored in the map that returned it. Once the entry is
/// deleted, or the map is cleared, the handle is stale for good, even if the
/// underlying slot is reused by a later insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    pub(crate) owner: MapId,
    pub(crate) index: u32,
    pub(crate) stamp: u64,
}

impl EntryHandle {
    /// The map this handle was issued by.
    pub fn owner(&self) -> MapId {
        self.owner
    }
}
