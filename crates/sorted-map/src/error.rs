use thiserror::Error;

/// Why an [`EntryHandle`](crate::EntryHandle) operation was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    #[error("entry handle belongs to a different map")]
    ForeignMap,
    #[error("entry handle refers to a removed entry")]
    Stale,
    #[error("replacement key does not compare equal to the current key")]
    KeyOrderMismatch,
}

/// A broken structural invariant found by
/// [`SortedMap::assert_valid`](crate::SortedMap::assert_valid).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("node order violated at slot {index}")]
    Order { index: u32 },
    #[error("AVL balance violated at slot {index}: bf={bf}")]
    Unbalanced { index: u32, bf: i32 },
    #[error("balance factor mismatch at slot {index}: expected {expected}, got {actual}")]
    BalanceFactor { index: u32, expected: i32, actual: i32 },
    #[error("height mismatch at slot {index}: expected {expected}, got {actual}")]
    Height { index: u32, expected: u32, actual: u32 },
    #[error("subtree size mismatch at slot {index}: expected {expected}, got {actual}")]
    Count {
        index: u32,
        expected: usize,
        actual: usize,
    },
    #[error("map holds {live} nodes but only {reachable} are reachable from the root")]
    Unreachable { live: usize, reachable: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown bound kind {0:?}, expected \"inclusive\" or \"exclusive\"")]
pub struct ParseBoundKindError(pub String);
