/// Ordered map backed by a B+ tree where the node capacity (B) is a generic constant.
/// B must be odd and at least 3, a good value is 31.
///
/// General guide to implementation:
///
/// [`BTreeMap`] has a length, a depth and an optional root `Node`, where `Node` is an enum that
/// can be `Leaf` or `Internal`. Entries live only in leaves, and every leaf is at the same depth.
/// Internal nodes hold copies of leaf keys as separators, which is why mutating methods need `K: Clone`.
///
/// Insertion splits full nodes on the way back up, removal borrows from or merges with a sibling.
/// The root is `None` while the map is empty.
///
/// Keys are ordered by a comparator `C`, [`Natural`] ([`Ord`]) by default. Any closure
/// `Fn(&K, &K) -> Ordering` can be used, see [`BTreeMap::with_comparator`].
///
/// Besides exact lookup the map answers neighbour queries ([`BTreeMap::lower_key_value`] and friends)
/// and can start ascending or descending iteration from any key. Iterators track their
/// root-to-leaf path so stepping between leaves never searches from the root.
pub struct BTreeMap<K, V, const B: usize, C = Natural> {
    pub(crate) len: usize,
    /// Number of internal levels above the leaves.
    pub(crate) depth: usize,
    pub(crate) root: Option<Node<K, V, B>>,
    pub(crate) cmp: C,
}
impl<K, V, const B: usize, C: Default> Default for BTreeMap<K, V, B, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
impl<K, V, const B: usize> BTreeMap<K, V, B> {
    /// Returns a new, empty map using the natural order of the keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}
impl<K, V, const B: usize, C> BTreeMap<K, V, B, C> {
    /// This should produce a compile-time error if B is not usable.
    const CHECK_B: usize = {
        assert!(B >= 3, "node capacity must be at least 3");
        assert!(B % 2 == 1, "node capacity must be odd");
        0
    };

    /// Returns a new, empty map ordered by `cmp`.
    ///
    /// ```
    ///     use nav_btree::BTreeMap;
    ///     let mut map = BTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    ///     map.insert(1, "one");
    ///     map.insert(2, "two");
    ///     assert_eq!(map.first_key_value(), Some((&2, &"two")));
    /// ```
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            len: Self::CHECK_B,
            depth: 0,
            root: None,
            cmp,
        }
    }

    /// The comparator that orders the keys.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Clear the map.
    pub fn clear(&mut self) {
        trace_event!(len = self.len, depth = self.depth, "clear");
        self.len = 0;
        self.depth = 0;
        self.root = None;
    }

    /// Get number of key-value pairs in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the map empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of internal levels above the leaves (0 while the root is a leaf or the map is empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns first (smallest) key-value pair in map.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.as_ref()?.first_kv()
    }

    /// Returns last (largest) key-value pair in map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.as_ref()?.last_kv()
    }

    /// Returns smallest key in map.
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.first_key_value().map(|(k, _)| k)
    }

    /// Returns largest key in map.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.last_key_value().map(|(k, _)| k)
    }

    /// Get iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, B> {
        Iter::new(self.root.as_ref())
    }

    /// Get iterator over all entries in descending key order.
    pub fn iter_rev(&self) -> RevIter<'_, K, V, B> {
        RevIter::new(self.root.as_ref())
    }

    /// Get iterator over all keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, B> {
        Keys(self.iter())
    }

    /// Get iterator over all values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V, B> {
        Values(self.iter())
    }
}

impl<K, V, const B: usize, C: Compare<K>> BTreeMap<K, V, B, C> {
    /// Insert key-value pair into map, or if key is already in map, replaces value and returns old value.
    /// The key itself is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        let Some(root) = &mut self.root else {
            self.root = Some(Node::singleton(key, value));
            self.len = 1;
            return None;
        };
        let mut x = InsertCtx {
            value: None,
            split: None,
        };
        root.insert(key, value, &self.cmp, &mut x);
        if let Some(split) = x.split {
            root.new_root(split);
            self.depth += 1;
            trace_event!(depth = self.depth, len = self.len + 1, "root split");
        }
        if x.value.is_none() {
            self.len += 1;
        }
        x.value
    }

    /// Remove key-value pair from map, returning just the value.
    /// Removing an absent key leaves the map untouched.
    pub fn remove(&mut self, key: &K) -> Option<V>
    where
        K: Clone,
    {
        self.remove_entry(key).map(|(_k, v)| v)
    }

    /// Remove key-value pair from map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)>
    where
        K: Clone,
    {
        let root = self.root.as_mut()?;
        let kv = root.remove(key, &self.cmp)?;
        self.len -= 1;
        if self.len == 0 {
            self.root = None;
            self.depth = 0;
        } else if self.depth > 0 && root.len() == 1 {
            if let Some(old) = self.root.take() {
                self.root = Some(match old.into_only_child() {
                    Ok(child) => {
                        self.depth -= 1;
                        trace_event!(depth = self.depth, len = self.len, "root collapse");
                        child
                    }
                    Err(old) => old,
                });
            }
        }
        Some(kv)
    }

    /// Remove first key-value pair from map.
    pub fn pop_first(&mut self) -> Option<(K, V)>
    where
        K: Clone,
    {
        let key = self.first_key()?.clone();
        self.remove_entry(&key)
    }

    /// Remove last key-value pair from map.
    pub fn pop_last(&mut self) -> Option<(K, V)>
    where
        K: Clone,
    {
        let key = self.last_key()?.clone();
        self.remove_entry(&key)
    }

    /// Does the map have an entry for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Returns reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_k, v)| v)
    }

    /// Returns reference to the value corresponding to the key, or `default` if the key is absent.
    ///
    /// ```
    ///     use nav_btree::BTreeMap;
    ///     let map = BTreeMap::from([(1, 10)]);
    ///     assert_eq!(*map.get_or(&1, &0), 10);
    ///     assert_eq!(*map.get_or(&2, &0), 0);
    /// ```
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns a reference to the stored key and the value corresponding to the key.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let leaf = self.root.as_ref()?.leaf_for(key, &self.cmp);
        let i = find_in_leaf(&leaf.keys, key, &self.cmp).ok()?;
        leaf.kv(i)
    }

    /// Returns mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.root.as_mut()?.get_mut(key, &self.cmp)
    }

    /// Ascending iterator starting at the smallest key >= `key`.
    pub fn ceiling_iter(&self, key: &K) -> Iter<'_, K, V, B> {
        Iter::seek(self.root.as_ref(), key, &self.cmp, true)
    }

    /// Ascending iterator starting at the smallest key > `key`.
    pub fn higher_iter(&self, key: &K) -> Iter<'_, K, V, B> {
        Iter::seek(self.root.as_ref(), key, &self.cmp, false)
    }

    /// Descending iterator starting at the largest key <= `key`.
    pub fn floor_iter(&self, key: &K) -> RevIter<'_, K, V, B> {
        RevIter::seek(self.root.as_ref(), key, &self.cmp, true)
    }

    /// Descending iterator starting at the largest key < `key`.
    pub fn lower_iter(&self, key: &K) -> RevIter<'_, K, V, B> {
        RevIter::seek(self.root.as_ref(), key, &self.cmp, false)
    }

    /// Get ascending iterator over a range of keys.
    ///
    /// Panics if range start > end, or start == end and both bounds are Excluded.
    pub fn range<R>(&self, range: R) -> Range<'_, K, V, B, C>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.check_range(&range);
        let start = match range.start_bound() {
            Bound::Included(k) => self.ceiling_iter(k),
            Bound::Excluded(k) => self.higher_iter(k),
            Bound::Unbounded => self.iter(),
        };
        Range::new(start, range.end_bound().cloned(), &self.cmp)
    }

    /// Get descending iterator over a range of keys.
    ///
    /// Panics if range start > end, or start == end and both bounds are Excluded.
    pub fn range_rev<R>(&self, range: R) -> RangeRev<'_, K, V, B, C>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.check_range(&range);
        let start = match range.end_bound() {
            Bound::Included(k) => self.floor_iter(k),
            Bound::Excluded(k) => self.lower_iter(k),
            Bound::Unbounded => self.iter_rev(),
        };
        RangeRev::new(start, range.start_bound().cloned(), &self.cmp)
    }

    /// Read-only view of the entries with keys in `range`.
    ///
    /// Panics if range start > end, or start == end and both bounds are Excluded.
    pub fn sub_map<R>(&self, range: R) -> RangeView<'_, K, V, B, C>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.check_range(&range);
        RangeView::new(self, KeyRange::new(&range))
    }

    /// View of the entries with keys in `range` that also accepts inserts of keys in `range`.
    ///
    /// ```
    ///     use nav_btree::BTreeMap;
    ///     let mut map = BTreeMap::new();
    ///     let mut view = map.sub_map_mut(10..20);
    ///     assert!(view.insert(15, "in").is_ok());
    ///     assert!(view.insert(25, "out").is_err());
    ///     assert_eq!(map.len(), 1);
    /// ```
    ///
    /// Panics if range start > end, or start == end and both bounds are Excluded.
    pub fn sub_map_mut<R>(&mut self, range: R) -> RangeViewMut<'_, K, V, B, C>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.check_range(&range);
        RangeViewMut::new(self, KeyRange::new(&range))
    }

    fn check_range<R>(&self, range: &R)
    where
        R: RangeBounds<K>,
    {
        use Bound::{Excluded, Included};
        match (range.start_bound(), range.end_bound()) {
            (Included(s) | Excluded(s), Included(e)) | (Included(s), Excluded(e)) => {
                assert!(
                    self.cmp.compare(e, s) != Ordering::Less,
                    "range start is greater than range end in BTreeMap"
                );
            }
            (Excluded(s), Excluded(e)) => {
                let ord = self.cmp.compare(e, s);
                assert!(
                    ord != Ordering::Equal,
                    "range start and end are equal and excluded in BTreeMap"
                );
                assert!(
                    ord != Ordering::Less,
                    "range start is greater than range end in BTreeMap"
                );
            }
            _ => {}
        }
    }
} // End impl BTreeMap

use std::hash::{Hash, Hasher};
impl<K: Hash, V: Hash, const B: usize, C> Hash for BTreeMap<K, V, B, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}
impl<K: PartialEq, V: PartialEq, const B: usize, C> PartialEq for BTreeMap<K, V, B, C> {
    fn eq(&self, other: &BTreeMap<K, V, B, C>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
impl<K: Eq, V: Eq, const B: usize, C> Eq for BTreeMap<K, V, B, C> {}

impl<K, V, const B: usize, C> IntoIterator for BTreeMap<K, V, B, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, B>;

    /// Convert `BTreeMap` to [`IntoIter`].
    fn into_iter(self) -> IntoIter<K, V, B> {
        IntoIter::new(self.root, self.len)
    }
}
impl<'a, K, V, const B: usize, C> IntoIterator for &'a BTreeMap<K, V, B, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B>;
    fn into_iter(self) -> Iter<'a, K, V, B> {
        self.iter()
    }
}
impl<K, V, const B: usize, C> Clone for BTreeMap<K, V, B, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> BTreeMap<K, V, B, C> {
        Self {
            len: self.len,
            depth: self.depth,
            root: self.root.clone(),
            cmp: self.cmp.clone(),
        }
    }
}
impl<K, V, const B: usize, C> FromIterator<(K, V)> for BTreeMap<K, V, B, C>
where
    K: Clone,
    C: Compare<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> BTreeMap<K, V, B, C> {
        let mut map = BTreeMap::default();
        map.extend(iter);
        map
    }
}
impl<K, V, const B: usize, const N: usize> From<[(K, V); N]> for BTreeMap<K, V, B>
where
    K: Ord + Clone,
{
    fn from(arr: [(K, V); N]) -> BTreeMap<K, V, B> {
        arr.into_iter().collect()
    }
}
impl<K, V, const B: usize> From<std::collections::BTreeMap<K, V>> for BTreeMap<K, V, B>
where
    K: Ord + Clone,
{
    fn from(map: std::collections::BTreeMap<K, V>) -> BTreeMap<K, V, B> {
        map.into_iter().collect()
    }
}
impl<K, V, S, const B: usize> From<std::collections::HashMap<K, V, S>> for BTreeMap<K, V, B>
where
    K: Ord + Clone,
{
    fn from(map: std::collections::HashMap<K, V, S>) -> BTreeMap<K, V, B> {
        map.into_iter().collect()
    }
}
impl<K, V, const B: usize, C> Extend<(K, V)> for BTreeMap<K, V, B, C>
where
    K: Clone,
    C: Compare<K>,
{
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
impl<'a, K, V, const B: usize, C> Extend<(&'a K, &'a V)> for BTreeMap<K, V, B, C>
where
    K: Copy,
    V: Copy,
    C: Compare<K>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}
impl<K, V, const B: usize, C: Compare<K>> std::ops::Index<&K> for BTreeMap<K, V, B, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// Panics if the key is not present in the `BTreeMap`.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("no entry found for key"),
        }
    }
}
impl<K: Debug, V: Debug, const B: usize, C> Debug for BTreeMap<K, V, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize,
};

#[cfg(feature = "serde")]
impl<K, V, const B: usize, C> Serialize for BTreeMap<K, V, B, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct BTreeMapVisitor<K, V, const B: usize, C> {
    marker: PhantomData<fn() -> BTreeMap<K, V, B, C>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, const B: usize, C> Visitor<'de> for BTreeMapVisitor<K, V, B, C>
where
    K: Deserialize<'de> + Clone,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = BTreeMap<K, V, B, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("BTreeMap")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = BTreeMap::default();
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, const B: usize, C> Deserialize<'de> for BTreeMap<K, V, B, C>
where
    K: Deserialize<'de> + Clone,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BTreeMapVisitor {
            marker: PhantomData,
        })
    }
}

use crate::node::{InsertCtx, Node};
use crate::search::find_in_leaf;
use crate::view::KeyRange;
use std::{
    cmp::Ordering,
    fmt,
    fmt::Debug,
    ops::{Bound, RangeBounds},
};

#[cfg(feature = "serde")]
use std::marker::PhantomData;

pub use crate::compare::{Compare, Natural};
pub use crate::iter::{IntoIter, Iter, Keys, Range, RangeRev, RevIter, Values};
pub use crate::view::{KeyOutOfRangeError, RangeView, RangeViewMut};
