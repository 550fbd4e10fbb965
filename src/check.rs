use crate::compare::Compare;
use crate::gb::BTreeMap;
use crate::node::{min_fanout, Node};
use std::cmp::Ordering;

impl<K, V, const B: usize, C: Compare<K>> BTreeMap<K, V, B, C> {
    /// Verify the structural invariants of the tree, panicking with a description of the first violation.
    ///
    /// Checks that all leaves are at the same depth, node sizes are within bounds, keys are strictly
    /// increasing, every key lies between the separators of its ancestors and the entry count matches
    /// [`BTreeMap::len`]. This walks the whole tree and is meant for tests.
    pub fn check_invariants(&self) {
        match &self.root {
            None => {
                assert_eq!(self.len, 0, "empty root but len is {}", self.len);
                assert_eq!(self.depth, 0, "empty root but depth is {}", self.depth);
            }
            Some(root) => {
                let n = root.check(self.depth, true, None, None, &self.cmp);
                assert_eq!(n, self.len, "tree holds {n} entries but len is {}", self.len);
            }
        }
    }
}

impl<K, V, const B: usize> Node<K, V, B> {
    /// Returns the number of entries below this node.
    fn check<C: Compare<K>>(
        &self,
        height: usize,
        is_root: bool,
        lo: Option<&K>,
        hi: Option<&K>,
        cmp: &C,
    ) -> usize {
        let min = if is_root { 1 } else { min_fanout(B) };
        match self {
            Node::Leaf(leaf) => {
                assert_eq!(height, 0, "leaf found {height} levels above the leaf level");
                assert_eq!(leaf.keys.len(), leaf.vals.len(), "leaf keys and values differ in number");
                assert!(leaf.keys.len() >= min, "leaf has {} entries, minimum is {min}", leaf.keys.len());
                check_keys(&leaf.keys, lo, hi, cmp);
                leaf.keys.len()
            }
            Node::Internal(nl) => {
                assert!(height > 0, "internal node at the leaf level");
                let n = nl.children.len();
                assert_eq!(nl.keys.len() + 1, n, "internal node has {} separators for {n} children", nl.keys.len());
                let min = if is_root { 2 } else { min };
                assert!(n >= min, "internal node has {n} children, minimum is {min}");
                check_keys(&nl.keys, lo, hi, cmp);
                let mut total = 0;
                for (j, child) in nl.children.iter().enumerate() {
                    let clo = if j == 0 { lo } else { Some(&nl.keys[j - 1]) };
                    let chi = if j + 1 == n { hi } else { Some(&nl.keys[j]) };
                    total += child.check(height - 1, false, clo, chi, cmp);
                }
                total
            }
        }
    }
}

/// Keys strictly increasing, all >= lo and < hi.
fn check_keys<K, C: Compare<K>>(keys: &[K], lo: Option<&K>, hi: Option<&K>, cmp: &C) {
    for w in keys.windows(2) {
        assert!(cmp.compare(&w[0], &w[1]) == Ordering::Less, "keys out of order");
    }
    if let (Some(lo), Some(first)) = (lo, keys.first()) {
        assert!(cmp.compare(first, lo) != Ordering::Less, "key below its subtree's lower separator");
    }
    if let (Some(hi), Some(last)) = (hi, keys.last()) {
        assert!(cmp.compare(last, hi) == Ordering::Less, "key not below its subtree's upper separator");
    }
}
