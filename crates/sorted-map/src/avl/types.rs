/// AVL tree node stored in the map's arena.
///
/// Links are arena slot indices. `height`, `count` and `bf` are caches of the
/// subtree rooted here and are refreshed by [`super::util::update`].
#[derive(Clone, Debug)]
pub(crate) struct AvlNode<K, V> {
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub v: V,
    /// Height of the subtree; a leaf has height 1.
    pub height: u32,
    /// Number of nodes in the subtree, including this one.
    pub count: usize,
    /// Balance factor, `height(right) - height(left)`.
    pub bf: i32,
}

impl<K, V> AvlNode<K, V> {
    pub fn new(k: K, v: V) -> Self {
        Self {
            l: None,
            r: None,
            k,
            v,
            height: 1,
            count: 1,
            bf: 0,
        }
    }

    pub fn into_entry(self) -> (K, V) {
        (self.k, self.v)
    }
}
