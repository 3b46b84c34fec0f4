use std::cmp::Ordering;
use std::fmt::Debug;

use crate::arena::Arena;
use crate::error::InvariantViolation;
use crate::print::{print_tree, PrintChild};

use super::types::AvlNode;

pub(crate) type NodeArena<K, V> = Arena<AvlNode<K, V>>;

/// Which child link a walk followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Outcome of [`insert_or_compute`].
pub(crate) enum Insertion<K, F> {
    /// A node was created from the computed value.
    Created(u32),
    /// The key was already present; the unused key and value thunk are handed back.
    Found { index: u32, key: K, compute: F },
}

#[inline]
pub(crate) fn child<K, V>(arena: &NodeArena<K, V>, i: u32, side: Side) -> Option<u32> {
    match side {
        Side::Left => arena[i].l,
        Side::Right => arena[i].r,
    }
}

#[inline]
fn set_child<K, V>(arena: &mut NodeArena<K, V>, i: u32, side: Side, c: Option<u32>) {
    match side {
        Side::Left => arena[i].l = c,
        Side::Right => arena[i].r = c,
    }
}

#[inline]
fn subtree_height<K, V>(arena: &NodeArena<K, V>, node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena[i].height)
}

#[inline]
fn subtree_count<K, V>(arena: &NodeArena<K, V>, node: Option<u32>) -> usize {
    node.map_or(0, |i| arena[i].count)
}

/// Recomputes the cached height, count and balance factor of `i` from its
/// children, which must already be up to date.
pub(crate) fn update<K, V>(arena: &mut NodeArena<K, V>, i: u32) {
    let (l, r) = (arena[i].l, arena[i].r);
    let (lh, rh) = (subtree_height(arena, l), subtree_height(arena, r));
    let count = 1 + subtree_count(arena, l) + subtree_count(arena, r);
    let node = &mut arena[i];
    node.height = 1 + lh.max(rh);
    node.count = count;
    node.bf = rh as i32 - lh as i32;
}

/// Promotes the right child of `n` and returns it as the new subtree root.
///
/// Panics if `n` has no right child.
pub(crate) fn rotate_left<K, V>(arena: &mut NodeArena<K, V>, n: u32) -> u32 {
    let nr = arena[n].r.expect("rotate_left requires a right child");
    arena[n].r = arena[nr].l;
    arena[nr].l = Some(n);
    update(arena, n);
    update(arena, nr);
    nr
}

/// Promotes the left child of `n` and returns it as the new subtree root.
///
/// Panics if `n` has no left child.
pub(crate) fn rotate_right<K, V>(arena: &mut NodeArena<K, V>, n: u32) -> u32 {
    let nl = arena[n].l.expect("rotate_right requires a left child");
    arena[n].l = arena[nl].r;
    arena[nl].r = Some(n);
    update(arena, n);
    update(arena, nl);
    nl
}

/// Restores `|bf| <= 1` at `n`, assuming both subtrees are valid AVL trees
/// whose heights differ by at most two. Returns the new subtree root.
///
/// Inside-heavy children (left-right and right-left shapes) get the extra
/// child rotation first.
pub(crate) fn balance<K, V>(arena: &mut NodeArena<K, V>, n: u32) -> u32 {
    let bf = arena[n].bf;
    if bf < -1 {
        let nl = arena[n].l.expect("left-heavy node has a left child");
        if arena[nl].bf > 0 {
            arena[n].l = Some(rotate_left(arena, nl));
        }
        rotate_right(arena, n)
    } else if bf > 1 {
        let nr = arena[n].r.expect("right-heavy node has a right child");
        if arena[nr].bf < 0 {
            arena[n].r = Some(rotate_right(arena, nr));
        }
        rotate_left(arena, n)
    } else {
        n
    }
}

/// Hangs `subtree` below the last step of `path`, then walks the path back to
/// the top refreshing and balancing every node. Returns the new top root.
///
/// With an empty path `subtree` itself is the result.
pub(crate) fn rebalance_path<K, V>(
    arena: &mut NodeArena<K, V>,
    path: &[(u32, Side)],
    mut subtree: Option<u32>,
) -> Option<u32> {
    for &(node, side) in path.iter().rev() {
        set_child(arena, node, side, subtree);
        update(arena, node);
        subtree = Some(balance(arena, node));
    }
    subtree
}

pub(crate) fn find<K, V, C>(
    arena: &NodeArena<K, V>,
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> Ordering,
{
    let mut curr = root;
    while let Some(i) = curr {
        curr = match comparator(key, &arena[i].k) {
            Ordering::Equal => return Some(i),
            Ordering::Less => arena[i].l,
            Ordering::Greater => arena[i].r,
        };
    }
    None
}

/// Like [`find`], but records every step taken in `path`.
///
/// On a miss the path ends at the node under which `key` would be attached.
pub(crate) fn find_path<K, V, C>(
    arena: &NodeArena<K, V>,
    root: Option<u32>,
    key: &K,
    comparator: &C,
    path: &mut Vec<(u32, Side)>,
) -> Option<u32>
where
    C: Fn(&K, &K) -> Ordering,
{
    let mut curr = root;
    while let Some(i) = curr {
        let side = match comparator(key, &arena[i].k) {
            Ordering::Equal => return Some(i),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };
        path.push((i, side));
        curr = child(arena, i, side);
    }
    None
}

/// Leftmost (`Side::Left`) or rightmost (`Side::Right`) node under `root`.
pub(crate) fn extreme<K, V>(arena: &NodeArena<K, V>, root: u32, side: Side) -> u32 {
    let mut curr = root;
    while let Some(next) = child(arena, curr, side) {
        curr = next;
    }
    curr
}

/// Finds `key`, or stores a node built from `compute()` where it belongs.
///
/// `compute` runs only when a node is created.
pub(crate) fn insert_or_compute<K, V, C, F>(
    arena: &mut NodeArena<K, V>,
    root: &mut Option<u32>,
    key: K,
    compute: F,
    comparator: &C,
) -> Insertion<K, F>
where
    C: Fn(&K, &K) -> Ordering,
    F: FnOnce() -> V,
{
    let mut path = Vec::new();
    if let Some(index) = find_path(arena, *root, &key, comparator, &mut path) {
        return Insertion::Found {
            index,
            key,
            compute,
        };
    }
    let (index, _) = arena.insert(AvlNode::new(key, compute()));
    *root = rebalance_path(arena, &path, Some(index));
    Insertion::Created(index)
}

/// Unlinks the extreme node of the subtree `root` toward `side`.
///
/// Returns the rebalanced remainder of the subtree and the detached node,
/// which is still in the arena with stale links.
pub(crate) fn detach_extreme<K, V>(
    arena: &mut NodeArena<K, V>,
    root: u32,
    side: Side,
) -> (Option<u32>, u32) {
    let mut path = Vec::new();
    let mut curr = root;
    while let Some(next) = child(arena, curr, side) {
        path.push((curr, side));
        curr = next;
    }
    let rest = child(arena, curr, side.opposite());
    (rebalance_path(arena, &path, rest), curr)
}

/// Removes node `n`, reached from the map root through `path`, and vacates
/// its arena slot.
pub(crate) fn remove_at<K, V>(
    arena: &mut NodeArena<K, V>,
    root: &mut Option<u32>,
    path: &[(u32, Side)],
    n: u32,
) -> AvlNode<K, V> {
    let replacement = match (arena[n].l, arena[n].r) {
        (Some(l), Some(r)) => {
            let (rest, successor) = detach_extreme(arena, r, Side::Left);
            let node = &mut arena[successor];
            node.l = Some(l);
            node.r = rest;
            update(arena, successor);
            Some(balance(arena, successor))
        }
        (only, None) | (None, only) => only,
    };
    *root = rebalance_path(arena, path, replacement);
    arena.remove(n)
}

/// Swaps the children of every node under `root`, mirroring in-order
/// sequence. Heights and counts are unchanged; balance factors flip sign.
pub(crate) fn mirror<K, V>(arena: &mut NodeArena<K, V>, root: Option<u32>) {
    let mut stack: Vec<u32> = root.into_iter().collect();
    while let Some(i) = stack.pop() {
        let node = &mut arena[i];
        std::mem::swap(&mut node.l, &mut node.r);
        node.bf = -node.bf;
        stack.extend(node.l);
        stack.extend(node.r);
    }
}

/// Verifies cached metrics, the AVL balance bound and strict key order.
pub(crate) fn assert_avl_tree<K, V, C>(
    arena: &NodeArena<K, V>,
    root: Option<u32>,
    comparator: &C,
) -> Result<(), InvariantViolation>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn check<K, V>(arena: &NodeArena<K, V>, i: u32) -> Result<(u32, usize), InvariantViolation> {
        let node = &arena[i];
        let (lh, lc) = match node.l {
            Some(l) => check(arena, l)?,
            None => (0, 0),
        };
        let (rh, rc) = match node.r {
            Some(r) => check(arena, r)?,
            None => (0, 0),
        };

        let height = 1 + lh.max(rh);
        let count = 1 + lc + rc;
        let bf = rh as i32 - lh as i32;
        if node.height != height {
            return Err(InvariantViolation::Height {
                index: i,
                expected: height,
                actual: node.height,
            });
        }
        if node.count != count {
            return Err(InvariantViolation::Count {
                index: i,
                expected: count,
                actual: node.count,
            });
        }
        if node.bf != bf {
            return Err(InvariantViolation::BalanceFactor {
                index: i,
                expected: bf,
                actual: node.bf,
            });
        }
        if !(-1..=1).contains(&bf) {
            return Err(InvariantViolation::Unbalanced { index: i, bf });
        }
        Ok((height, count))
    }

    let Some(root) = root else {
        return Ok(());
    };
    check(arena, root)?;

    let mut stack = Vec::new();
    let mut curr = Some(root);
    let mut prev: Option<u32> = None;
    loop {
        while let Some(i) = curr {
            stack.push(i);
            curr = arena[i].l;
        }
        let Some(i) = stack.pop() else {
            break;
        };
        if let Some(p) = prev {
            if comparator(&arena[p].k, &arena[i].k) != Ordering::Less {
                return Err(InvariantViolation::Order { index: i });
            }
        }
        prev = Some(i);
        curr = arena[i].r;
    }

    Ok(())
}

/// Debug printer for AVL trees.
pub(crate) fn print<K, V>(arena: &NodeArena<K, V>, node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
{
    let Some(i) = node else {
        return "∅".to_string();
    };
    let n = &arena[i];
    let left = |tab: &str| print(arena, n.l, tab);
    let right = |tab: &str| print(arena, n.r, tab);
    let children: [Option<&PrintChild>; 2] = [Some(&left), Some(&right)];
    format!(
        "{:?} = {:?} [h={} bf={}]{}",
        n.k,
        n.v,
        n.height,
        n.bf,
        print_tree(tab, &children)
    )
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    fn cmp(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn build(keys: &[i32]) -> (NodeArena<i32, ()>, Option<u32>) {
        let mut arena = NodeArena::new();
        let mut root = None;
        for &k in keys {
            insert_or_compute(&mut arena, &mut root, k, || (), &cmp);
        }
        (arena, root)
    }

    fn in_order(arena: &NodeArena<i32, ()>, node: Option<u32>, out: &mut Vec<i32>) {
        if let Some(i) = node {
            in_order(arena, arena[i].l, out);
            out.push(arena[i].k);
            in_order(arena, arena[i].r, out);
        }
    }

    #[test]
    #[should_panic(expected = "rotate_left requires a right child")]
    fn rotate_left_without_right_child_panics() {
        let (mut arena, root) = build(&[1]);
        rotate_left(&mut arena, root.unwrap());
    }

    #[test]
    #[should_panic(expected = "rotate_right requires a left child")]
    fn rotate_right_without_left_child_panics() {
        let (mut arena, root) = build(&[1]);
        rotate_right(&mut arena, root.unwrap());
    }

    #[test]
    fn rotations_preserve_in_order_sequence() {
        let (mut arena, root) = build(&[4, 2, 6, 1, 3, 5, 7]);
        let root = root.unwrap();
        let mut before = Vec::new();
        in_order(&arena, Some(root), &mut before);

        let new_root = rotate_left(&mut arena, root);
        let mut after = Vec::new();
        in_order(&arena, Some(new_root), &mut after);
        assert_eq!(before, after);
        assert_eq!(arena[new_root].k, 6);
        assert_eq!(arena[new_root].count, 7);

        let back = rotate_right(&mut arena, new_root);
        assert_eq!(arena[back].k, 4);
        assert!(assert_avl_tree(&arena, Some(back), &cmp).is_ok());
    }

    #[test]
    fn left_right_shape_gets_double_rotation() {
        // 3 <- 1 -> 2 : left-heavy root whose left child is right-heavy.
        let (arena, root) = build(&[3, 1, 2]);
        let root = root.unwrap();
        assert_eq!(arena[root].k, 2);
        assert_eq!(arena[root].height, 2);
        assert!(assert_avl_tree(&arena, Some(root), &cmp).is_ok());
    }

    #[test]
    fn right_left_shape_gets_double_rotation() {
        let (arena, root) = build(&[1, 3, 2]);
        let root = root.unwrap();
        assert_eq!(arena[root].k, 2);
        assert!(assert_avl_tree(&arena, Some(root), &cmp).is_ok());
    }

    #[test]
    fn detach_extreme_returns_leftmost_and_rebalances() {
        let (mut arena, root) = build(&[4, 2, 6, 1, 3, 5, 7]);
        let (rest, detached) = detach_extreme(&mut arena, root.unwrap(), Side::Left);
        assert_eq!(arena[detached].k, 1);
        arena.remove(detached);
        let mut keys = Vec::new();
        in_order(&arena, rest, &mut keys);
        assert_eq!(keys, vec![2, 3, 4, 5, 6, 7]);
        assert!(assert_avl_tree(&arena, rest, &cmp).is_ok());
    }

    #[test]
    fn mirror_flips_order_and_balance_factors() {
        let (mut arena, root) = build(&[2, 1, 3, 4]);
        let bf = arena[root.unwrap()].bf;
        mirror(&mut arena, root);
        assert_eq!(arena[root.unwrap()].bf, -bf);
        let mut keys = Vec::new();
        in_order(&arena, root, &mut keys);
        assert_eq!(keys, vec![4, 3, 2, 1]);
        assert!(assert_avl_tree(&arena, root, &|a: &i32, b: &i32| b.cmp(a)).is_ok());
    }

    #[test]
    fn assert_avl_tree_reports_stale_cache() {
        let (mut arena, root) = build(&[2, 1, 3]);
        arena[root.unwrap()].count = 5;
        assert!(matches!(
            assert_avl_tree(&arena, root, &cmp),
            Err(InvariantViolation::Count { expected: 3, actual: 5, .. })
        ));
    }
}
