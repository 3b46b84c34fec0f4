//! Arena-indexed AVL tree: node layout, rotations, rebalancing and the
//! path-recording insert/remove walks used by [`crate::SortedMap`].

pub(crate) mod types;
pub(crate) mod util;

pub(crate) use types::AvlNode;
pub(crate) use util::Side;
