//! Lazy traversals over a [`SortedMap`].
//!
//! Every iterator is driven by a cursor that keeps the not-yet-visited
//! ancestors of the current position on an explicit stack, so traversal
//! depth never touches the call stack. A cursor reads the tree as it is when
//! the iterator is created; the borrow on the map rules out mutation while it
//! is alive.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::bound::RangeBound;
use crate::handle::EntryHandle;
use crate::sorted_map::SortedMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Ascending,
    Descending,
}

pub(crate) struct Cursor<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    map: &'a SortedMap<K, V, C>,
    stack: Vec<u32>,
    min: RangeBound<'a, K>,
    max: RangeBound<'a, K>,
    direction: Direction,
}

impl<'a, K, V, C> Cursor<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) fn new(
        map: &'a SortedMap<K, V, C>,
        min: RangeBound<'a, K>,
        max: RangeBound<'a, K>,
        direction: Direction,
    ) -> Self {
        let mut cursor = Self {
            map,
            stack: Vec::with_capacity(map.height()),
            min,
            max,
            direction,
        };
        cursor.descend(map.root);
        cursor
    }

    pub(crate) fn unbounded(map: &'a SortedMap<K, V, C>, direction: Direction) -> Self {
        Self::new(map, RangeBound::Unbounded, RangeBound::Unbounded, direction)
    }

    /// The key precedes the first bound in iteration order.
    fn before_start(&self, key: &K) -> bool {
        let map = self.map;
        let cmp = |a: &K, b: &K| map.compare(a, b);
        match self.direction {
            Direction::Ascending => self.min.below_min(key, cmp),
            Direction::Descending => self.max.above_max(key, cmp),
        }
    }

    /// The key is beyond the last bound in iteration order.
    fn past_end(&self, key: &K) -> bool {
        let map = self.map;
        let cmp = |a: &K, b: &K| map.compare(a, b);
        match self.direction {
            Direction::Ascending => self.max.above_max(key, cmp),
            Direction::Descending => self.min.below_min(key, cmp),
        }
    }

    /// Child visited before the node itself.
    fn near(&self, i: u32) -> Option<u32> {
        let node = &self.map.arena[i];
        match self.direction {
            Direction::Ascending => node.l,
            Direction::Descending => node.r,
        }
    }

    /// Child visited after the node itself.
    fn far(&self, i: u32) -> Option<u32> {
        let node = &self.map.arena[i];
        match self.direction {
            Direction::Ascending => node.r,
            Direction::Descending => node.l,
        }
    }

    /// Pushes the near spine of `curr`, hopping over nodes that sit before the
    /// start bound together with their near subtrees.
    fn descend(&mut self, mut curr: Option<u32>) {
        let map = self.map;
        while let Some(i) = curr {
            if self.before_start(&map.arena[i].k) {
                curr = self.far(i);
            } else {
                self.stack.push(i);
                curr = self.near(i);
            }
        }
    }
}

impl<K, V, C> Iterator for Cursor<'_, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let i = self.stack.pop()?;
        if self.past_end(&self.map.arena[i].k) {
            self.stack.clear();
            return None;
        }
        self.descend(self.far(i));
        Some(i)
    }
}

/// Entries between two [`RangeBound`]s, returned by
/// [`SortedMap::get_range`] and friends.
pub struct Range<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    cursor: Cursor<'a, K, V, C>,
}

impl<'a, K, V, C> Range<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) fn new(cursor: Cursor<'a, K, V, C>) -> Self {
        Self { cursor }
    }
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cursor.next()?;
        let map = self.cursor.map;
        let node = &map.arena[i];
        Some((&node.k, &node.v))
    }
}

impl<K, V, C> FusedIterator for Range<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

/// Every entry in ascending or descending order.
pub struct Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    cursor: Cursor<'a, K, V, C>,
    remaining: usize,
}

impl<'a, K, V, C> Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) fn new(map: &'a SortedMap<K, V, C>, direction: Direction) -> Self {
        Self {
            cursor: Cursor::unbounded(map, direction),
            remaining: map.len(),
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cursor.next()?;
        self.remaining -= 1;
        let map = self.cursor.map;
        let node = &map.arena[i];
        Some((&node.k, &node.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

/// Keys in ascending order.
pub struct Keys<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

/// Values in ascending key order.
pub struct Values<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

/// Entry handles in ascending key order.
pub struct Handles<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    cursor: Cursor<'a, K, V, C>,
}

impl<'a, K, V, C> Handles<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) fn new(cursor: Cursor<'a, K, V, C>) -> Self {
        Self { cursor }
    }
}

impl<K, V, C> Iterator for Handles<'_, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = EntryHandle;

    fn next(&mut self) -> Option<EntryHandle> {
        let i = self.cursor.next()?;
        Some(self.cursor.map.handle_at(i))
    }
}

/// Owning iterator in ascending key order.
pub struct IntoIter<K, V> {
    pub(crate) inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
