//! Key position lookup within a single node.
//!
//! Linear scanning is the default. For node capacities around 31 a predictable forward scan
//! beats the data-dependent jumps of binary search; the `binary-search` feature switches
//! every node search over without touching callers.

use crate::compare::Compare;
use std::cmp::Ordering;

const BINARY_SEARCH: bool = cfg!(feature = "binary-search");

/// Locate `key` among the sorted keys of a leaf.
///
/// `Ok(i)` if `keys[i]` equals key, otherwise `Err(i)` where i is the insertion point.
#[inline]
pub(crate) fn find_in_leaf<K, C: Compare<K>>(keys: &[K], key: &K, cmp: &C) -> Result<usize, usize> {
    if BINARY_SEARCH {
        binary_leaf(keys, key, cmp)
    } else {
        linear_leaf(keys, key, cmp)
    }
}

/// Index of the unique child whose subtree may contain `key`, given the separators of an
/// internal node. The result is always in `0..=seps.len()`.
#[inline]
pub(crate) fn find_in_internal<K, C: Compare<K>>(seps: &[K], key: &K, cmp: &C) -> usize {
    if BINARY_SEARCH {
        binary_internal(seps, key, cmp)
    } else {
        linear_internal(seps, key, cmp)
    }
}

fn linear_leaf<K, C: Compare<K>>(keys: &[K], key: &K, cmp: &C) -> Result<usize, usize> {
    for (i, k) in keys.iter().enumerate() {
        match cmp.compare(k, key) {
            Ordering::Less => {}
            Ordering::Equal => return Ok(i),
            Ordering::Greater => return Err(i),
        }
    }
    Err(keys.len())
}

fn linear_internal<K, C: Compare<K>>(seps: &[K], key: &K, cmp: &C) -> usize {
    for (i, k) in seps.iter().enumerate() {
        if cmp.compare(k, key) == Ordering::Greater {
            return i;
        }
    }
    seps.len()
}

/// Same as `binary_search_by` but hand-rolled so the comparator is applied as `compare(probe, key)`.
fn binary_leaf<K, C: Compare<K>>(keys: &[K], key: &K, cmp: &C) -> Result<usize, usize> {
    let (mut i, mut j) = (0, keys.len());
    while i < j {
        let m = (i + j) / 2;
        match cmp.compare(&keys[m], key) {
            Ordering::Equal => return Ok(m),
            Ordering::Less => i = m + 1,
            Ordering::Greater => j = m,
        }
    }
    Err(i)
}

fn binary_internal<K, C: Compare<K>>(seps: &[K], key: &K, cmp: &C) -> usize {
    // A separator equal to key sends us right: keys >= separator live in the next child.
    match binary_leaf(seps, key, cmp) {
        Ok(i) => i + 1,
        Err(i) => i,
    }
}
