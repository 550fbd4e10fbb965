use crate::compare::Compare;
use crate::search::{find_in_internal, find_in_leaf};
use arrayvec::ArrayVec;
use std::mem;

/// Minimum number of entries (leaf) or children (internal) of a non-root node with capacity `b`.
pub(crate) const fn min_fanout(b: usize) -> usize {
    (b + 1) / 2
}

/// A node split bubbled up to the parent: the separator and the new right sibling.
/// The left half stays where it was, in the slot that was descended into.
pub(crate) type Split<K, V, const B: usize> = (K, Node<K, V, B>);

pub(crate) struct InsertCtx<K, V, const B: usize> {
    /// Value displaced by the insert, if the key was already present.
    pub value: Option<V>,
    pub split: Option<Split<K, V, B>>,
}

/* Children are stored inline in their parent, so both variants are boxed. */
#[derive(Clone, Debug)]
pub(crate) enum Node<K, V, const B: usize> {
    Leaf(Box<Leaf<K, V, B>>),
    Internal(Box<Internal<K, V, B>>),
}

/// Sorted entries, keys and values in parallel arrays so a search only touches keys.
#[derive(Clone, Debug)]
pub(crate) struct Leaf<K, V, const B: usize> {
    pub keys: ArrayVec<K, B>,
    pub vals: ArrayVec<V, B>,
}

/// Children plus `children.len() - 1` separators.
/// Every key under `children[i]` is < `keys[i]`, every key under `children[i + 1]` is >= `keys[i]`.
#[derive(Clone, Debug)]
pub(crate) struct Internal<K, V, const B: usize> {
    pub keys: ArrayVec<K, B>,
    pub children: ArrayVec<Node<K, V, B>, B>,
}

impl<K, V, const B: usize> Default for Node<K, V, B> {
    fn default() -> Self {
        Node::Leaf(Box::new(Leaf::new()))
    }
}

impl<K, V, const B: usize> Node<K, V, B> {
    const MIN: usize = min_fanout(B);

    /// Entry count of a leaf, child count of an internal node.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.keys.len(),
            Node::Internal(nl) => nl.children.len(),
        }
    }

    pub fn singleton(key: K, value: V) -> Self {
        let mut leaf = Leaf::new();
        leaf.keys.push(key);
        leaf.vals.push(value);
        Node::Leaf(Box::new(leaf))
    }

    /// Replace this (old root) node with a new root holding the old root and the bubbled split.
    pub fn new_root(&mut self, (sep, right): Split<K, V, B>) {
        let left = mem::take(self);
        let mut nl = Internal {
            keys: ArrayVec::new(),
            children: ArrayVec::new(),
        };
        nl.keys.push(sep);
        nl.children.push(left);
        nl.children.push(right);
        *self = Node::Internal(Box::new(nl));
    }

    /// If this is an internal node with a single child, return the child.
    pub fn into_only_child(self) -> Result<Self, Self> {
        match self {
            Node::Internal(mut nl) if nl.children.len() == 1 => match nl.children.pop() {
                Some(child) => Ok(child),
                None => Err(Node::Internal(nl)),
            },
            other => Err(other),
        }
    }

    /// Leaf that would hold `key`.
    pub fn leaf_for<C: Compare<K>>(&self, key: &K, cmp: &C) -> &Leaf<K, V, B> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(leaf) => return leaf,
                Node::Internal(nl) => node = &nl.children[find_in_internal(&nl.keys, key, cmp)],
            }
        }
    }

    pub fn get_mut<C: Compare<K>>(&mut self, key: &K, cmp: &C) -> Option<&mut V> {
        match self {
            Node::Leaf(leaf) => {
                let i = find_in_leaf(&leaf.keys, key, cmp).ok()?;
                Some(&mut leaf.vals[i])
            }
            Node::Internal(nl) => {
                let i = find_in_internal(&nl.keys, key, cmp);
                nl.children[i].get_mut(key, cmp)
            }
        }
    }

    pub fn first_kv(&self) -> Option<(&K, &V)> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(leaf) => return leaf.kv(0),
                Node::Internal(nl) => node = nl.children.first()?,
            }
        }
    }

    pub fn last_kv(&self) -> Option<(&K, &V)> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(leaf) => return leaf.kv(leaf.keys.len().checked_sub(1)?),
                Node::Internal(nl) => node = nl.children.last()?,
            }
        }
    }

    pub fn insert<C: Compare<K>>(&mut self, key: K, value: V, cmp: &C, x: &mut InsertCtx<K, V, B>)
    where
        K: Clone,
    {
        match self {
            Node::Leaf(leaf) => leaf.insert(key, value, cmp, x),
            Node::Internal(nl) => nl.insert(key, value, cmp, x),
        }
    }

    /// Remove the entry for `key`, repairing any underflow on the way back up.
    /// The node itself may be left below the minimum; its parent (or the map, for the root) fixes that.
    pub fn remove<C: Compare<K>>(&mut self, key: &K, cmp: &C) -> Option<(K, V)>
    where
        K: Clone,
    {
        match self {
            Node::Leaf(leaf) => {
                let i = find_in_leaf(&leaf.keys, key, cmp).ok()?;
                Some(leaf.remove_at(i))
            }
            Node::Internal(nl) => {
                let i = find_in_internal(&nl.keys, key, cmp);
                let kv = nl.children[i].remove(key, cmp)?;
                if nl.children[i].len() < Self::MIN {
                    nl.fix_underflow(i);
                }
                Some(kv)
            }
        }
    }

    /// Append `other` (the right sibling) to this node. For internal nodes the parent
    /// separator comes down between them, for leaves it is no longer needed.
    fn absorb(&mut self, sep: K, other: Self) {
        match (self, other) {
            (Node::Leaf(a), Node::Leaf(b)) => {
                let Leaf { keys, vals } = *b;
                a.keys.extend(keys);
                a.vals.extend(vals);
            }
            (Node::Internal(a), Node::Internal(b)) => {
                let Internal { keys, children } = *b;
                a.keys.push(sep);
                a.keys.extend(keys);
                a.children.extend(children);
            }
            _ => unreachable!("sibling nodes at different depths"),
        }
    }
}

impl<K, V, const B: usize> Leaf<K, V, B> {
    const MIN: usize = min_fanout(B);

    pub fn new() -> Self {
        Self {
            keys: ArrayVec::new(),
            vals: ArrayVec::new(),
        }
    }

    #[inline]
    fn full(&self) -> bool {
        self.keys.len() == B
    }

    #[inline]
    pub fn kv(&self, i: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(i)?, self.vals.get(i)?))
    }

    fn insert_at(&mut self, i: usize, key: K, value: V) {
        self.keys.insert(i, key);
        self.vals.insert(i, value);
    }

    fn remove_at(&mut self, i: usize) -> (K, V) {
        (self.keys.remove(i), self.vals.remove(i))
    }

    fn pop(&mut self) -> Option<(K, V)> {
        Some((self.keys.pop()?, self.vals.pop()?))
    }

    fn push(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.vals.push(value);
    }

    fn insert<C: Compare<K>>(&mut self, key: K, value: V, cmp: &C, x: &mut InsertCtx<K, V, B>)
    where
        K: Clone,
    {
        match find_in_leaf(&self.keys, &key, cmp) {
            Ok(i) => x.value = Some(mem::replace(&mut self.vals[i], value)),
            Err(i) if !self.full() => self.insert_at(i, key, value),
            Err(i) => x.split = Some(self.split_insert(i, key, value)),
        }
    }

    /// Split a full leaf while inserting at `i`: B entries plus one become two leaves of MIN.
    fn split_insert(&mut self, i: usize, key: K, value: V) -> Split<K, V, B>
    where
        K: Clone,
    {
        let min = Self::MIN;
        let mut right = Self::new();
        if i < min {
            // New entry lands in the left half, which gives up its last entry to the right.
            right.keys.extend(self.keys.drain(min - 1..));
            right.vals.extend(self.vals.drain(min - 1..));
            self.insert_at(i, key, value);
        } else if i == min {
            // New entry starts the right half.
            right.push(key, value);
            right.keys.extend(self.keys.drain(min..));
            right.vals.extend(self.vals.drain(min..));
        } else {
            right.keys.extend(self.keys.drain(min..));
            right.vals.extend(self.vals.drain(min..));
            right.insert_at(i - min, key, value);
        }
        let sep = right.keys[0].clone();
        (sep, Node::Leaf(Box::new(right)))
    }
}

impl<K, V, const B: usize> Internal<K, V, B> {
    const MIN: usize = min_fanout(B);

    #[inline]
    fn full(&self) -> bool {
        self.children.len() == B
    }

    fn insert<C: Compare<K>>(&mut self, key: K, value: V, cmp: &C, x: &mut InsertCtx<K, V, B>)
    where
        K: Clone,
    {
        let i = find_in_internal(&self.keys, &key, cmp);
        self.children[i].insert(key, value, cmp, x);
        if let Some((sep, right)) = x.split.take() {
            if self.full() {
                x.split = Some(self.split_insert(i, sep, right));
            } else {
                self.keys.insert(i, sep);
                self.children.insert(i + 1, right);
            }
        }
    }

    /// Split a full node while inserting `right` after child `i`, with `sep` between them.
    /// B + 1 children become two nodes of MIN children, and one separator moves up.
    fn split_insert(&mut self, i: usize, sep: K, right: Node<K, V, B>) -> Split<K, V, B> {
        let min = Self::MIN;
        let mut other = Self {
            keys: ArrayVec::new(),
            children: ArrayVec::new(),
        };
        let up = if i == min - 1 {
            // The bubbled separator is the median.
            other.keys.extend(self.keys.drain(min - 1..));
            other.children.push(right);
            other.children.extend(self.children.drain(min..));
            sep
        } else if i < min - 1 {
            other.keys.extend(self.keys.drain(min - 1..));
            other.children.extend(self.children.drain(min - 1..));
            let up = self.keys.pop();
            self.keys.insert(i, sep);
            self.children.insert(i + 1, right);
            match up {
                Some(up) => up,
                None => unreachable!("full node has separators"),
            }
        } else {
            other.keys.extend(self.keys.drain(min..));
            other.children.extend(self.children.drain(min..));
            let up = self.keys.pop();
            other.keys.insert(i - min, sep);
            other.children.insert(i - min + 1, right);
            match up {
                Some(up) => up,
                None => unreachable!("full node has separators"),
            }
        };
        (up, Node::Internal(Box::new(other)))
    }

    /// Child `i` has dropped to MIN - 1: borrow from a sibling with spare entries, else merge.
    /// The left sibling is preferred.
    fn fix_underflow(&mut self, i: usize)
    where
        K: Clone,
    {
        if i > 0 {
            let (l, r) = self.children.split_at_mut(i);
            let (pred, child) = (&mut l[i - 1], &mut r[0]);
            if pred.len() > Self::MIN {
                let sep = &mut self.keys[i - 1];
                match (pred, child) {
                    (Node::Leaf(p), Node::Leaf(c)) => {
                        if let Some((k, v)) = p.pop() {
                            *sep = k.clone();
                            c.insert_at(0, k, v);
                        }
                    }
                    (Node::Internal(p), Node::Internal(c)) => {
                        if let (Some(k), Some(node)) = (p.keys.pop(), p.children.pop()) {
                            c.keys.insert(0, mem::replace(sep, k));
                            c.children.insert(0, node);
                        }
                    }
                    _ => unreachable!("sibling nodes at different depths"),
                }
            } else {
                let sep = self.keys.remove(i - 1);
                let child = self.children.remove(i);
                self.children[i - 1].absorb(sep, child);
            }
        } else {
            let (l, r) = self.children.split_at_mut(1);
            let (child, succ) = (&mut l[0], &mut r[0]);
            if succ.len() > Self::MIN {
                let sep = &mut self.keys[0];
                match (child, succ) {
                    (Node::Leaf(c), Node::Leaf(s)) => {
                        let (k, v) = s.remove_at(0);
                        c.push(k, v);
                        *sep = s.keys[0].clone();
                    }
                    (Node::Internal(c), Node::Internal(s)) => {
                        let k = s.keys.remove(0);
                        let node = s.children.remove(0);
                        c.keys.push(mem::replace(sep, k));
                        c.children.push(node);
                    }
                    _ => unreachable!("sibling nodes at different depths"),
                }
            } else {
                let sep = self.keys.remove(0);
                let succ = self.children.remove(1);
                self.children[0].absorb(sep, succ);
            }
        }
    }
}
