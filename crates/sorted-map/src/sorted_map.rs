use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeBounds;

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::avl::util::{self, Insertion};
use crate::avl::{AvlNode, Side};
use crate::bound::RangeBound;
use crate::error::{HandleError, InvariantViolation};
use crate::handle::{EntryHandle, MapId};
use crate::iter::{Cursor, Direction, Handles, IntoIter, Iter, Keys, Range, Values};
use crate::print::{print_tree, PrintChild};
use crate::types::default_comparator;

/// Applies the map's direction to a comparator.
fn directed<K, C>(comparator: &C, reversed: bool) -> impl Fn(&K, &K) -> Ordering + '_
where
    C: Fn(&K, &K) -> Ordering,
{
    move |a: &K, b: &K| {
        let ord = comparator(a, b);
        if reversed {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Ordered map on an arena-backed AVL tree.
///
/// Keys are ordered by the comparator `C`, flipped while the map is
/// [reversed](SortedMap::reverse). Lookups, inserts and deletes are
/// O(log n); range scans cost O(log n + k) for k yielded entries.
///
/// Inserts and lookups hand out [`EntryHandle`]s that can later update that
/// exact entry in place through [`re_key`](SortedMap::re_key) and
/// [`re_value`](SortedMap::re_value), without a second search.
pub struct SortedMap<K, V, C = fn(&K, &K) -> Ordering>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) arena: Arena<AvlNode<K, V>>,
    pub(crate) root: Option<u32>,
    comparator: C,
    reversed: bool,
    id: MapId,
}

impl<K, V> SortedMap<K, V, fn(&K, &K) -> Ordering>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K, V> Default for SortedMap<K, V, fn(&K, &K) -> Ordering>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> SortedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            comparator,
            reversed: false,
            id: MapId::next(),
        }
    }

    /// Compares two keys in the map's current direction.
    #[inline]
    pub(crate) fn compare(&self, a: &K, b: &K) -> Ordering {
        directed(&self.comparator, self.reversed)(a, b)
    }

    pub(crate) fn handle_at(&self, i: u32) -> EntryHandle {
        EntryHandle {
            owner: self.id,
            index: i,
            stamp: self.arena.stamp(i),
        }
    }

    /// Identity checked by every handle operation.
    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.root.map_or(0, |r| self.arena[r].count)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |r| self.arena[r].height as usize)
    }

    /// Whether [`reverse`](SortedMap::reverse) has been applied an odd number
    /// of times.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn find(&self, key: &K) -> Option<u32> {
        let cmp = directed(&self.comparator, self.reversed);
        util::find(&self.arena, self.root, key, &cmp)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.arena[i].v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        Some(&mut self.arena[i].v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get_entry(&self, key: &K) -> Option<EntryHandle> {
        self.find(key).map(|i| self.handle_at(i))
    }

    fn upsert(&mut self, key: K, value: V, replace: bool) -> EntryHandle {
        let cmp = directed(&self.comparator, self.reversed);
        let index = match util::insert_or_compute(
            &mut self.arena,
            &mut self.root,
            key,
            move || value,
            &cmp,
        ) {
            Insertion::Created(index) => index,
            Insertion::Found {
                index,
                key,
                compute,
            } => {
                if replace {
                    let node = &mut self.arena[index];
                    node.k = key;
                    node.v = compute();
                }
                index
            }
        };
        self.handle_at(index)
    }

    /// Stores `value` under `key`. An existing entry keeps its position and
    /// handle; its key and value are overwritten in place.
    pub fn set(&mut self, key: K, value: V) -> EntryHandle {
        self.upsert(key, value, true)
    }

    /// Stores `value` under `key` only if the key is absent. Returns the handle
    /// of the new or the untouched existing entry.
    pub fn set_if_absent(&mut self, key: K, value: V) -> EntryHandle {
        self.upsert(key, value, false)
    }

    /// Value under `key`, computing and storing it first if the key is absent.
    ///
    /// `compute` is called at most once, and only on a miss.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let cmp = directed(&self.comparator, self.reversed);
        let index = match util::insert_or_compute(
            &mut self.arena,
            &mut self.root,
            key,
            compute,
            &cmp,
        ) {
            Insertion::Created(index) | Insertion::Found { index, .. } => index,
        };
        &mut self.arena[index].v
    }

    pub fn delete(&mut self, key: &K) -> Option<(K, V)> {
        self.delete_if(key, |_, _| true)
    }

    /// Removes the entry under `key` if `condition` accepts it.
    ///
    /// `condition` runs once, on the matching entry only. A rejected or
    /// missing entry leaves the map unchanged and yields `None`.
    pub fn delete_if<F>(&mut self, key: &K, condition: F) -> Option<(K, V)>
    where
        F: FnOnce(&K, &V) -> bool,
    {
        let cmp = directed(&self.comparator, self.reversed);
        let mut path = Vec::new();
        let n = util::find_path(&self.arena, self.root, key, &cmp, &mut path)?;
        let node = &self.arena[n];
        if !condition(&node.k, &node.v) {
            return None;
        }
        let removed = util::remove_at(&mut self.arena, &mut self.root, &path, n);
        Some(removed.into_entry())
    }

    fn delete_extreme_if<F>(&mut self, side: Side, condition: F) -> Option<(K, V)>
    where
        F: FnOnce(&K, &V) -> bool,
    {
        let root = self.root?;
        let n = util::extreme(&self.arena, root, side);
        let node = &self.arena[n];
        if !condition(&node.k, &node.v) {
            return None;
        }
        let (rest, detached) = util::detach_extreme(&mut self.arena, root, side);
        debug_assert_eq!(detached, n);
        self.root = rest;
        Some(self.arena.remove(detached).into_entry())
    }

    pub fn delete_smallest(&mut self) -> Option<(K, V)> {
        self.delete_extreme_if(Side::Left, |_, _| true)
    }

    pub fn delete_smallest_if<F>(&mut self, condition: F) -> Option<(K, V)>
    where
        F: FnOnce(&K, &V) -> bool,
    {
        self.delete_extreme_if(Side::Left, condition)
    }

    pub fn delete_largest(&mut self) -> Option<(K, V)> {
        self.delete_extreme_if(Side::Right, |_, _| true)
    }

    pub fn delete_largest_if<F>(&mut self, condition: F) -> Option<(K, V)>
    where
        F: FnOnce(&K, &V) -> bool,
    {
        self.delete_extreme_if(Side::Right, condition)
    }

    pub fn smallest_entry(&self) -> Option<EntryHandle> {
        self.root
            .map(|r| self.handle_at(util::extreme(&self.arena, r, Side::Left)))
    }

    pub fn largest_entry(&self) -> Option<EntryHandle> {
        self.root
            .map(|r| self.handle_at(util::extreme(&self.arena, r, Side::Right)))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.smallest_entry().and_then(|h| self.entry(h))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.largest_entry().and_then(|h| self.entry(h))
    }

    fn resolve(&self, handle: EntryHandle) -> Result<u32, HandleError> {
        if handle.owner != self.id {
            return Err(HandleError::ForeignMap);
        }
        match self.arena.resolve(handle.index, handle.stamp) {
            Some(_) => Ok(handle.index),
            None => Err(HandleError::Stale),
        }
    }

    /// Whether `handle` still refers to a live entry of this map.
    pub fn contains_handle(&self, handle: EntryHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    pub fn key(&self, handle: EntryHandle) -> Option<&K> {
        self.entry(handle).map(|(k, _)| k)
    }

    pub fn value(&self, handle: EntryHandle) -> Option<&V> {
        self.entry(handle).map(|(_, v)| v)
    }

    pub fn value_mut(&mut self, handle: EntryHandle) -> Option<&mut V> {
        if handle.owner != self.id {
            return None;
        }
        self.arena
            .resolve_mut(handle.index, handle.stamp)
            .map(|node| &mut node.v)
    }

    pub fn entry(&self, handle: EntryHandle) -> Option<(&K, &V)> {
        let i = self.resolve(handle).ok()?;
        let node = &self.arena[i];
        Some((&node.k, &node.v))
    }

    /// Replaces the key of the entry behind `handle` and returns the old key.
    ///
    /// The new key must compare equal to the current one, so the entry keeps
    /// its position and no restructuring happens.
    pub fn try_re_key(&mut self, handle: EntryHandle, key: K) -> Result<K, HandleError> {
        let i = self.resolve(handle)?;
        if self.compare(&key, &self.arena[i].k) != Ordering::Equal {
            return Err(HandleError::KeyOrderMismatch);
        }
        Ok(std::mem::replace(&mut self.arena[i].k, key))
    }

    /// Replaces the value of the entry behind `handle` and returns the old value.
    pub fn try_re_value(&mut self, handle: EntryHandle, value: V) -> Result<V, HandleError> {
        let i = self.resolve(handle)?;
        Ok(std::mem::replace(&mut self.arena[i].v, value))
    }

    /// [`try_re_key`](SortedMap::try_re_key) reporting only success.
    pub fn re_key(&mut self, handle: EntryHandle, key: K) -> bool {
        match self.try_re_key(handle, key) {
            Ok(_) => true,
            Err(reason) => {
                debug!(map = ?self.id, %reason, "re_key rejected");
                false
            }
        }
    }

    /// [`try_re_value`](SortedMap::try_re_value) reporting only success.
    pub fn re_value(&mut self, handle: EntryHandle, value: V) -> bool {
        match self.try_re_value(handle, value) {
            Ok(_) => true,
            Err(reason) => {
                debug!(map = ?self.id, %reason, "re_value rejected");
                false
            }
        }
    }

    /// Entries within `[min, max]` as described by the two bounds, in
    /// ascending order. Subtrees wholly outside the bounds are never visited.
    pub fn get_range<'a>(
        &'a self,
        min: RangeBound<'a, K>,
        max: RangeBound<'a, K>,
    ) -> Range<'a, K, V, C> {
        Range::new(Cursor::new(self, min, max, Direction::Ascending))
    }

    /// Same entries as [`get_range`](SortedMap::get_range), in descending order.
    pub fn get_range_reversed<'a>(
        &'a self,
        min: RangeBound<'a, K>,
        max: RangeBound<'a, K>,
    ) -> Range<'a, K, V, C> {
        Range::new(Cursor::new(self, min, max, Direction::Descending))
    }

    /// [`get_range`](SortedMap::get_range) driven by standard range syntax.
    pub fn range<R>(&self, range: R) -> Range<'_, K, V, C>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.get_range(
            range.start_bound().cloned().into(),
            range.end_bound().cloned().into(),
        )
    }

    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(self, Direction::Ascending)
    }

    pub fn entries(&self) -> Iter<'_, K, V, C> {
        self.iter()
    }

    /// Every entry in descending order.
    pub fn reversed(&self) -> Iter<'_, K, V, C> {
        Iter::new(self, Direction::Descending)
    }

    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }

    pub fn handles(&self) -> Handles<'_, K, V, C> {
        Handles::new(Cursor::unbounded(self, Direction::Ascending))
    }

    /// Inverts the map's order in O(n).
    ///
    /// Every node's children are swapped and the comparator is flipped, so
    /// the tree stays balanced and handles stay valid.
    pub fn reverse(&mut self) {
        util::mirror(&mut self.arena, self.root);
        self.reversed = !self.reversed;
        trace!(map = ?self.id, len = self.len(), reversed = self.reversed, "reversed");
    }

    /// Removes every entry. Outstanding handles become stale.
    pub fn clear(&mut self) {
        trace!(map = ?self.id, len = self.len(), "clear");
        self.arena.clear();
        self.root = None;
    }

    /// Checks every structural invariant of the tree.
    pub fn assert_valid(&self) -> Result<(), InvariantViolation> {
        let cmp = directed(&self.comparator, self.reversed);
        util::assert_avl_tree(&self.arena, self.root, &cmp)?;
        if self.arena.len() != self.len() {
            return Err(InvariantViolation::Unreachable {
                live: self.arena.len(),
                reachable: self.len(),
            });
        }
        Ok(())
    }

    /// Multi-line dump of the tree shape, for debugging.
    pub fn to_tree_string(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let root = |tab: &str| util::print(&self.arena, self.root, tab);
        let children: [Option<&PrintChild>; 1] = [Some(&root)];
        format!("SortedMap{}", print_tree("", &children))
    }
}

impl<K, V, C> Clone for SortedMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Fn(&K, &K) -> Ordering + Clone,
{
    /// The clone is a separate map: handles issued by `self` do not resolve
    /// against it.
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            reversed: self.reversed,
            id: MapId::next(),
        }
    }
}

impl<K, V, C> fmt::Debug for SortedMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SortedMap<K, V, fn(&K, &K) -> Ordering>
where
    K: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> Extend<(K, V)> for SortedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for SortedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order: Vec<u32> = Cursor::unbounded(&self, Direction::Ascending).collect();
        let entries: Vec<(K, V)> = order
            .into_iter()
            .map(|i| self.arena.remove(i).into_entry())
            .collect();
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}
