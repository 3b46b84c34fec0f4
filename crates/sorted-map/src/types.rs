//! Comparator definitions shared by the map and its range bounds.

use std::cmp::Ordering;

/// Total order over keys.
///
/// Any `Fn(&K, &K) -> Ordering` works as a map comparator; this alias names
/// the trait-object form for callers that want to box one.
pub type Comparator<K> = dyn Fn(&K, &K) -> Ordering;

/// Natural ordering of a `PartialOrd` key.
///
/// Incomparable pairs (e.g. `NaN`) order as greater.
pub fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    if a == b {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
