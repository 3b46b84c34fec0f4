//! Ordered key-value map backed by an arena-allocated AVL tree.
//!
//! [`SortedMap`] keeps its entries ordered by a caller-supplied comparator and
//! supports:
//!
//! - O(log n) lookup, insert-or-compute and deletion by key, smallest or
//!   largest entry, each optionally gated by a condition on the entry;
//! - lazy ascending/descending traversal and range scans whose bounds can be
//!   inclusive, exclusive or arbitrary monotone predicates ([`RangeBound`]);
//! - in-place order reversal in O(n) without rebuilding the tree;
//! - [`EntryHandle`]s, stable references to single entries that let callers
//!   re-key or re-value a located entry without a second search.
//!
//! Nodes live in a map-owned arena and link to each other by `u32` slot
//! indices. A handle is `(map id, slot, stamp)`; it is checked against the
//! map it is used with and against the slot's current stamp, so handles from
//! another map, or to an entry that has since been removed, are refused
//! instead of touching the wrong node.
//!
//! ```
//! use sorted_map::{RangeBound, SortedMap};
//!
//! let mut map = SortedMap::new();
//! for k in [5, 3, 8, 1, 4, 7, 9] {
//!     map.set(k, k * 10);
//! }
//! let keys: Vec<_> = map
//!     .get_range(RangeBound::Exclusive(3), RangeBound::Exclusive(7))
//!     .map(|(k, _)| *k)
//!     .collect();
//! assert_eq!(keys, vec![4, 5]);
//!
//! let h = map.get_entry(&4).unwrap();
//! assert!(map.re_value(h, 44));
//! assert_eq!(map.get(&4), Some(&44));
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | comparator alias and the default natural ordering |
//! | [`bound`] | [`RangeBound`], [`BoundKind`] |
//! | [`iter`] | traversal and range iterators |
//! | [`error`] | [`HandleError`], [`InvariantViolation`], [`ParseBoundKindError`] |
//! | `avl` | node layout, rotations, rebalancing, insert/remove walks |
//! | `arena` | stamped slot storage for nodes |

mod arena;
mod avl;
pub mod bound;
pub mod error;
mod handle;
pub mod iter;
mod print;
#[cfg(feature = "serde")]
mod serde_impl;
mod sorted_map;
pub mod types;

pub use bound::{BoundKind, RangeBound};
pub use error::{HandleError, InvariantViolation, ParseBoundKindError};
pub use handle::{EntryHandle, MapId};
pub use sorted_map::SortedMap;
pub use types::{default_comparator, Comparator};
