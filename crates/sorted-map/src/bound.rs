//! Range bounds for [`SortedMap::get_range`](crate::SortedMap::get_range).

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use crate::error::ParseBoundKindError;

/// Whether a keyed bound admits the key itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Inclusive,
    Exclusive,
}

impl BoundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundKind::Inclusive => "inclusive",
            BoundKind::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundKind {
    type Err = ParseBoundKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inclusive" => Ok(BoundKind::Inclusive),
            "exclusive" => Ok(BoundKind::Exclusive),
            other => Err(ParseBoundKindError(other.to_string())),
        }
    }
}

/// One end of a range query.
///
/// A predicate bound answers "is this key still inside?" from its own side:
/// as a lower bound it returns `true` for keys that are not too small, as an
/// upper bound for keys that are not too big. Predicates must be monotone in
/// the map's order, since the scan skips whole subtrees on their verdict.
pub enum RangeBound<'a, K> {
    Unbounded,
    Inclusive(K),
    Exclusive(K),
    Predicate(Box<dyn Fn(&K) -> bool + 'a>),
}

impl<'a, K> RangeBound<'a, K> {
    /// Keyed bound from a `(key, kind)` pair.
    pub fn new(key: K, kind: BoundKind) -> Self {
        match kind {
            BoundKind::Inclusive => RangeBound::Inclusive(key),
            BoundKind::Exclusive => RangeBound::Exclusive(key),
        }
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&K) -> bool + 'a,
    {
        RangeBound::Predicate(Box::new(f))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, RangeBound::Unbounded)
    }

    /// `true` if `key` lies before this bound used as a minimum.
    pub(crate) fn below_min<C>(&self, key: &K, cmp: C) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        match self {
            RangeBound::Unbounded => false,
            RangeBound::Inclusive(b) => cmp(key, b) == Ordering::Less,
            RangeBound::Exclusive(b) => cmp(key, b) != Ordering::Greater,
            RangeBound::Predicate(p) => !p(key),
        }
    }

    /// `true` if `key` lies past this bound used as a maximum.
    pub(crate) fn above_max<C>(&self, key: &K, cmp: C) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        match self {
            RangeBound::Unbounded => false,
            RangeBound::Inclusive(b) => cmp(key, b) == Ordering::Greater,
            RangeBound::Exclusive(b) => cmp(key, b) != Ordering::Less,
            RangeBound::Predicate(p) => !p(key),
        }
    }
}

impl<K> Default for RangeBound<'_, K> {
    fn default() -> Self {
        RangeBound::Unbounded
    }
}

impl<K> From<Bound<K>> for RangeBound<'_, K> {
    fn from(bound: Bound<K>) -> Self {
        match bound {
            Bound::Included(k) => RangeBound::Inclusive(k),
            Bound::Excluded(k) => RangeBound::Exclusive(k),
            Bound::Unbounded => RangeBound::Unbounded,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RangeBound<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Unbounded => f.write_str("Unbounded"),
            RangeBound::Inclusive(k) => f.debug_tuple("Inclusive").field(k).finish(),
            RangeBound::Exclusive(k) => f.debug_tuple("Exclusive").field(k).finish(),
            RangeBound::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    fn cmp(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn parses_bound_kinds() {
        assert_eq!("inclusive".parse::<BoundKind>(), Ok(BoundKind::Inclusive));
        assert_eq!("exclusive".parse::<BoundKind>(), Ok(BoundKind::Exclusive));
        let err = "open".parse::<BoundKind>().unwrap_err();
        assert_eq!(err, ParseBoundKindError("open".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown bound kind \"open\", expected \"inclusive\" or \"exclusive\""
        );
        assert_eq!(BoundKind::Exclusive.to_string(), "exclusive");
    }

    #[test]
    fn keyed_bounds_respect_inclusivity() {
        let min = RangeBound::new(3, BoundKind::Inclusive);
        assert!(min.below_min(&2, cmp));
        assert!(!min.below_min(&3, cmp));

        let min = RangeBound::new(3, BoundKind::Exclusive);
        assert!(min.below_min(&3, cmp));
        assert!(!min.below_min(&4, cmp));

        let max = RangeBound::Inclusive(7);
        assert!(!max.above_max(&7, cmp));
        assert!(max.above_max(&8, cmp));

        let max = RangeBound::Exclusive(7);
        assert!(max.above_max(&7, cmp));
        assert!(!max.above_max(&6, cmp));
    }

    #[test]
    fn predicate_bounds_read_as_inside_tests() {
        let min = RangeBound::predicate(|k: &i32| *k >= 10);
        assert!(min.below_min(&9, cmp));
        assert!(!min.below_min(&10, cmp));

        let max: RangeBound<i32> = RangeBound::Unbounded;
        assert!(!max.above_max(&i32::MAX, cmp));
        assert!(max.is_unbounded());
    }

    #[test]
    fn converts_std_bounds() {
        assert!(matches!(
            RangeBound::from(Bound::Included(1)),
            RangeBound::Inclusive(1)
        ));
        assert!(matches!(
            RangeBound::from(Bound::Excluded(1)),
            RangeBound::Exclusive(1)
        ));
        assert!(RangeBound::<i32>::from(Bound::Unbounded).is_unbounded());
        assert_eq!(format!("{:?}", RangeBound::<i32>::predicate(|_| true)), "Predicate(..)");
    }
}
