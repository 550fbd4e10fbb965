//! Iterators over a [`BTreeMap`](crate::gb::BTreeMap).
//!
//! The borrowing iterators keep the path from the root to the current leaf: for every internal
//! level the node and the index of the child descended into, plus the current leaf and entry index.
//! They also cache the deepest level that can still advance, so moving to the next entry costs O(1)
//! inside a leaf and O(depth) only when crossing into another subtree.

use crate::compare::Compare;
use crate::node::{Internal, Leaf, Node};
use crate::search::{find_in_internal, find_in_leaf};
use std::{cmp::Ordering, iter::FusedIterator, ops::Bound};

// Tree depth is logarithmic in the entry count with a base of at least 2.
type StkVec<T> = arrayvec::ArrayVec<T, 32>;

#[derive(Debug)]
struct Path<'a, K, V, const B: usize> {
    stack: StkVec<(&'a Internal<K, V, B>, usize)>,
    leaf: Option<&'a Leaf<K, V, B>>,
    index: usize,
}
impl<'a, K, V, const B: usize> Clone for Path<'a, K, V, B> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            leaf: self.leaf,
            index: self.index,
        }
    }
}
impl<'a, K, V, const B: usize> Path<'a, K, V, B> {
    fn new() -> Self {
        Self {
            stack: StkVec::new(),
            leaf: None,
            index: 0,
        }
    }

    /// Level of the leaf, internal levels are numbered from 0 at the root.
    #[inline]
    fn leaf_level(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn leaf_len(&self) -> usize {
        self.leaf.map_or(0, |leaf| leaf.keys.len())
    }

    #[inline]
    fn current(&self) -> Option<(&'a K, &'a V)> {
        let leaf = self.leaf?;
        Some((leaf.keys.get(self.index)?, leaf.vals.get(self.index)?))
    }

    fn descend_first(&mut self, mut node: &'a Node<K, V, B>) {
        loop {
            match node {
                Node::Leaf(leaf) => {
                    self.leaf = Some(&**leaf);
                    self.index = 0;
                    return;
                }
                Node::Internal(nl) => {
                    self.stack.push((&**nl, 0));
                    node = &nl.children[0];
                }
            }
        }
    }

    fn descend_last(&mut self, mut node: &'a Node<K, V, B>) {
        loop {
            match node {
                Node::Leaf(leaf) => {
                    self.leaf = Some(&**leaf);
                    self.index = leaf.keys.len().saturating_sub(1);
                    return;
                }
                Node::Internal(nl) => {
                    let last = nl.children.len() - 1;
                    self.stack.push((&**nl, last));
                    node = &nl.children[last];
                }
            }
        }
    }

    /// Descend towards `key`, returning the deepest internal level where `can_turn` holds for
    /// (child index, child count). That level is where iteration must turn if the leaf reached
    /// has no suitable entry.
    fn seek<C: Compare<K>>(
        &mut self,
        mut node: &'a Node<K, V, B>,
        key: &K,
        cmp: &C,
        can_turn: fn(usize, usize) -> bool,
    ) -> (Result<usize, usize>, Option<usize>) {
        let mut turn = None;
        loop {
            match node {
                Node::Leaf(leaf) => {
                    self.leaf = Some(&**leaf);
                    return (find_in_leaf(&leaf.keys, key, cmp), turn);
                }
                Node::Internal(nl) => {
                    let i = find_in_internal(&nl.keys, key, cmp);
                    if can_turn(i, nl.children.len()) {
                        turn = Some(self.stack.len());
                    }
                    self.stack.push((&**nl, i));
                    node = &nl.children[i];
                }
            }
        }
    }

    /// Move one step right at `level`, then down to the first entry below.
    fn step_forward(&mut self, level: usize) {
        if level == self.leaf_level() {
            self.index += 1;
        } else {
            let (nl, i) = self.stack[level];
            self.stack.truncate(level);
            self.stack.push((nl, i + 1));
            self.descend_first(&nl.children[i + 1]);
        }
    }

    /// Move one step left at `level`, then down to the last entry below.
    fn step_back(&mut self, level: usize) {
        if level == self.leaf_level() {
            self.index -= 1;
        } else {
            let (nl, i) = self.stack[level];
            self.stack.truncate(level);
            self.stack.push((nl, i - 1));
            self.descend_last(&nl.children[i - 1]);
        }
    }

    /// Deepest level that has a position to the right of the path.
    fn forward_level(&self) -> Option<usize> {
        if self.index + 1 < self.leaf_len() {
            return Some(self.leaf_level());
        }
        (0..self.stack.len())
            .rev()
            .find(|&l| self.stack[l].1 + 1 < self.stack[l].0.children.len())
    }

    /// Deepest level that has a position to the left of the path.
    fn backward_level(&self) -> Option<usize> {
        if self.index > 0 {
            return Some(self.leaf_level());
        }
        (0..self.stack.len()).rev().find(|&l| self.stack[l].1 > 0)
    }
}

/// Ascending iterator returned by [`BTreeMap::iter`](crate::gb::BTreeMap::iter),
/// [`ceiling_iter`](crate::gb::BTreeMap::ceiling_iter) and [`higher_iter`](crate::gb::BTreeMap::higher_iter).
#[derive(Debug)]
pub struct Iter<'a, K, V, const B: usize> {
    path: Path<'a, K, V, B>,
    next_level: Option<usize>,
    has_next: bool,
}
impl<'a, K, V, const B: usize> Clone for Iter<'a, K, V, B> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            next_level: self.next_level,
            has_next: self.has_next,
        }
    }
}
impl<'a, K, V, const B: usize> Iter<'a, K, V, B> {
    pub(crate) fn new(root: Option<&'a Node<K, V, B>>) -> Self {
        let mut it = Self::empty();
        if let Some(root) = root {
            it.path.descend_first(root);
            it.has_next = it.path.leaf_len() > 0;
            it.next_level = it.path.forward_level();
        }
        it
    }

    /// Position at the first key >= `key` (`inclusive`) or > `key`.
    pub(crate) fn seek<C: Compare<K>>(
        root: Option<&'a Node<K, V, B>>,
        key: &K,
        cmp: &C,
        inclusive: bool,
    ) -> Self {
        let mut it = Self::empty();
        let Some(root) = root else {
            return it;
        };
        let (found, turn) = it.path.seek(root, key, cmp, |i, n| i + 1 < n);
        let index = match found {
            Ok(i) if !inclusive => i + 1,
            Ok(i) | Err(i) => i,
        };
        if index < it.path.leaf_len() {
            it.path.index = index;
        } else if let Some(level) = turn {
            it.path.step_forward(level);
        } else {
            return it;
        }
        it.has_next = true;
        it.next_level = it.path.forward_level();
        it
    }

    fn empty() -> Self {
        Self {
            path: Path::new(),
            next_level: None,
            has_next: false,
        }
    }

    fn finish(&mut self) {
        self.has_next = false;
    }
}
impl<'a, K, V, const B: usize> Iterator for Iter<'a, K, V, B> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next {
            return None;
        }
        let result = self.path.current();
        match self.next_level {
            Some(level) => {
                self.path.step_forward(level);
                self.next_level = self.path.forward_level();
            }
            None => self.has_next = false,
        }
        result
    }
}
impl<'a, K, V, const B: usize> FusedIterator for Iter<'a, K, V, B> {}

/// Descending iterator returned by [`BTreeMap::iter_rev`](crate::gb::BTreeMap::iter_rev),
/// [`floor_iter`](crate::gb::BTreeMap::floor_iter) and [`lower_iter`](crate::gb::BTreeMap::lower_iter).
#[derive(Debug)]
pub struct RevIter<'a, K, V, const B: usize> {
    path: Path<'a, K, V, B>,
    next_level: Option<usize>,
    has_next: bool,
}
impl<'a, K, V, const B: usize> Clone for RevIter<'a, K, V, B> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            next_level: self.next_level,
            has_next: self.has_next,
        }
    }
}
impl<'a, K, V, const B: usize> RevIter<'a, K, V, B> {
    pub(crate) fn new(root: Option<&'a Node<K, V, B>>) -> Self {
        let mut it = Self::empty();
        if let Some(root) = root {
            it.path.descend_last(root);
            it.has_next = it.path.leaf_len() > 0;
            it.next_level = it.path.backward_level();
        }
        it
    }

    /// Position at the last key <= `key` (`inclusive`) or < `key`.
    pub(crate) fn seek<C: Compare<K>>(
        root: Option<&'a Node<K, V, B>>,
        key: &K,
        cmp: &C,
        inclusive: bool,
    ) -> Self {
        let mut it = Self::empty();
        let Some(root) = root else {
            return it;
        };
        let (found, turn) = it.path.seek(root, key, cmp, |i, _| i > 0);
        let index = match found {
            Ok(i) if inclusive => Some(i),
            Ok(i) | Err(i) => i.checked_sub(1),
        };
        if let Some(index) = index {
            it.path.index = index;
        } else if let Some(level) = turn {
            it.path.step_back(level);
        } else {
            return it;
        }
        it.has_next = true;
        it.next_level = it.path.backward_level();
        it
    }

    fn empty() -> Self {
        Self {
            path: Path::new(),
            next_level: None,
            has_next: false,
        }
    }

    fn finish(&mut self) {
        self.has_next = false;
    }
}
impl<'a, K, V, const B: usize> Iterator for RevIter<'a, K, V, B> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next {
            return None;
        }
        let result = self.path.current();
        match self.next_level {
            Some(level) => {
                self.path.step_back(level);
                self.next_level = self.path.backward_level();
            }
            None => self.has_next = false,
        }
        result
    }
}
impl<'a, K, V, const B: usize> FusedIterator for RevIter<'a, K, V, B> {}

/// Iterator returned by [`BTreeMap::range`](crate::gb::BTreeMap::range).
pub struct Range<'a, K, V, const B: usize, C> {
    inner: Iter<'a, K, V, B>,
    end: Bound<K>,
    cmp: &'a C,
}
impl<'a, K, V, const B: usize, C> Range<'a, K, V, B, C> {
    pub(crate) fn new(inner: Iter<'a, K, V, B>, end: Bound<K>, cmp: &'a C) -> Self {
        Self { inner, end, cmp }
    }
}
impl<'a, K, V, const B: usize, C: Compare<K>> Iterator for Range<'a, K, V, B, C> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let (k, v) = self.inner.next()?;
        let within = match &self.end {
            Bound::Included(e) => self.cmp.compare(k, e) != Ordering::Greater,
            Bound::Excluded(e) => self.cmp.compare(k, e) == Ordering::Less,
            Bound::Unbounded => true,
        };
        if within {
            Some((k, v))
        } else {
            self.inner.finish();
            None
        }
    }
}
impl<'a, K, V, const B: usize, C: Compare<K>> FusedIterator for Range<'a, K, V, B, C> {}

/// Iterator returned by [`BTreeMap::range_rev`](crate::gb::BTreeMap::range_rev).
pub struct RangeRev<'a, K, V, const B: usize, C> {
    inner: RevIter<'a, K, V, B>,
    start: Bound<K>,
    cmp: &'a C,
}
impl<'a, K, V, const B: usize, C> RangeRev<'a, K, V, B, C> {
    pub(crate) fn new(inner: RevIter<'a, K, V, B>, start: Bound<K>, cmp: &'a C) -> Self {
        Self { inner, start, cmp }
    }
}
impl<'a, K, V, const B: usize, C: Compare<K>> Iterator for RangeRev<'a, K, V, B, C> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let (k, v) = self.inner.next()?;
        let within = match &self.start {
            Bound::Included(s) => self.cmp.compare(k, s) != Ordering::Less,
            Bound::Excluded(s) => self.cmp.compare(k, s) == Ordering::Greater,
            Bound::Unbounded => true,
        };
        if within {
            Some((k, v))
        } else {
            self.inner.finish();
            None
        }
    }
}
impl<'a, K, V, const B: usize, C: Compare<K>> FusedIterator for RangeRev<'a, K, V, B, C> {}

/// Iterator returned by [`BTreeMap::keys`](crate::gb::BTreeMap::keys).
#[derive(Debug, Clone)]
pub struct Keys<'a, K, V, const B: usize>(pub(crate) Iter<'a, K, V, B>);
impl<'a, K, V, const B: usize> Iterator for Keys<'a, K, V, B> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
}
impl<'a, K, V, const B: usize> FusedIterator for Keys<'a, K, V, B> {}

/// Iterator returned by [`BTreeMap::values`](crate::gb::BTreeMap::values).
#[derive(Debug, Clone)]
pub struct Values<'a, K, V, const B: usize>(pub(crate) Iter<'a, K, V, B>);
impl<'a, K, V, const B: usize> Iterator for Values<'a, K, V, B> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
}
impl<'a, K, V, const B: usize> FusedIterator for Values<'a, K, V, B> {}

/// Consuming iterator returned by [`BTreeMap::into_iter`](crate::gb::BTreeMap::into_iter), ascending order.
pub struct IntoIter<K, V, const B: usize> {
    len: usize,
    stack: StkVec<arrayvec::IntoIter<Node<K, V, B>, B>>,
    keys: arrayvec::IntoIter<K, B>,
    vals: arrayvec::IntoIter<V, B>,
}
impl<K, V, const B: usize> IntoIter<K, V, B> {
    pub(crate) fn new(root: Option<Node<K, V, B>>, len: usize) -> Self {
        let mut stack = StkVec::new();
        stack.push(root.into_iter().collect::<arrayvec::ArrayVec<_, B>>().into_iter());
        Self {
            len,
            stack,
            keys: arrayvec::ArrayVec::new().into_iter(),
            vals: arrayvec::ArrayVec::new().into_iter(),
        }
    }
}
impl<K, V, const B: usize> Iterator for IntoIter<K, V, B> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let (Some(k), Some(v)) = (self.keys.next(), self.vals.next()) {
                self.len -= 1;
                return Some((k, v));
            }
            let node = loop {
                let top = self.stack.last_mut()?;
                if let Some(node) = top.next() {
                    break node;
                }
                self.stack.pop();
            };
            match node {
                Node::Leaf(leaf) => {
                    let Leaf { keys, vals } = *leaf;
                    self.keys = keys.into_iter();
                    self.vals = vals.into_iter();
                }
                Node::Internal(nl) => {
                    let Internal { children, .. } = *nl;
                    self.stack.push(children.into_iter());
                }
            }
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<K, V, const B: usize> ExactSizeIterator for IntoIter<K, V, B> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<K, V, const B: usize> FusedIterator for IntoIter<K, V, B> {}
