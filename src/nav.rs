//! Neighbour queries: nearest entry strictly below, at or below, at or above, strictly above a key.

use crate::compare::Compare;
use crate::gb::BTreeMap;
use crate::node::Node;
use crate::search::{find_in_internal, find_in_leaf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    Lower,
    Floor,
    Ceiling,
    Higher,
}
impl Probe {
    fn backward(self) -> bool {
        matches!(self, Probe::Lower | Probe::Floor)
    }
}

impl<K, V, const B: usize, C: Compare<K>> BTreeMap<K, V, B, C> {
    /// Entry with the largest key strictly less than `key`.
    ///
    /// ```
    ///     use nav_btree::BTreeMap;
    ///     let map = BTreeMap::from([(1, "One"), (3, "Three")]);
    ///     assert_eq!(map.lower_key_value(&2), Some((&1, &"One")));
    ///     assert_eq!(map.lower_key_value(&1), None);
    /// ```
    #[must_use]
    pub fn lower_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, Probe::Lower)
    }

    /// Entry with the largest key less than or equal to `key`.
    #[must_use]
    pub fn floor_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, Probe::Floor)
    }

    /// Entry with the smallest key greater than or equal to `key`.
    #[must_use]
    pub fn ceiling_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, Probe::Ceiling)
    }

    /// Entry with the smallest key strictly greater than `key`.
    #[must_use]
    pub fn higher_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, Probe::Higher)
    }

    /// Largest key strictly less than `key`.
    #[must_use]
    pub fn lower_key(&self, key: &K) -> Option<&K> {
        self.lower_key_value(key).map(|(k, _)| k)
    }

    /// Largest key less than or equal to `key`.
    #[must_use]
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.floor_key_value(key).map(|(k, _)| k)
    }

    /// Smallest key greater than or equal to `key`.
    #[must_use]
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.ceiling_key_value(key).map(|(k, _)| k)
    }

    /// Smallest key strictly greater than `key`.
    #[must_use]
    pub fn higher_key(&self, key: &K) -> Option<&K> {
        self.higher_key_value(key).map(|(k, _)| k)
    }

    /// One descent towards `key`, remembering the deepest sibling subtree on the probe's side.
    /// If the leaf reached has no qualifying entry, the answer is the nearest extreme of that subtree.
    fn neighbour(&self, key: &K, probe: Probe) -> Option<(&K, &V)> {
        let mut node = self.root.as_ref()?;
        let mut fallback: Option<&Node<K, V, B>> = None;
        let leaf = loop {
            match node {
                Node::Leaf(leaf) => break leaf,
                Node::Internal(nl) => {
                    let i = find_in_internal(&nl.keys, key, &self.cmp);
                    if probe.backward() {
                        if i > 0 {
                            fallback = Some(&nl.children[i - 1]);
                        }
                    } else if i + 1 < nl.children.len() {
                        fallback = Some(&nl.children[i + 1]);
                    }
                    node = &nl.children[i];
                }
            }
        };
        let index = match (probe, find_in_leaf(&leaf.keys, key, &self.cmp)) {
            (Probe::Floor, Ok(i)) | (Probe::Ceiling, Ok(i) | Err(i)) | (Probe::Higher, Err(i)) => {
                Some(i)
            }
            (Probe::Higher, Ok(i)) => Some(i + 1),
            (Probe::Lower, Ok(i) | Err(i)) | (Probe::Floor, Err(i)) => i.checked_sub(1),
        };
        match index.filter(|&i| i < leaf.keys.len()) {
            Some(i) => leaf.kv(i),
            None if probe.backward() => fallback?.last_kv(),
            None => fallback?.first_kv(),
        }
    }
}
