//! Views restricting a map to a key range.
//!
//! Queries on a view are answered by the underlying map, clamped to the range: a probe key outside
//! the range is replaced by the nearest bound, and a result outside the range is discarded.

use crate::compare::Compare;
use crate::gb::BTreeMap;
use crate::iter::{Range, RangeRev};
use std::{
    cmp::Ordering,
    error::Error,
    fmt,
    ops::{Bound, RangeBounds},
};

/// Error returned by [`RangeViewMut::insert`] when the key is outside the view.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyOutOfRangeError {}

impl Error for KeyOutOfRangeError {}

impl fmt::Display for KeyOutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key is outside the range of the view")
    }
}

#[derive(Clone, Debug)]
pub(crate) struct KeyRange<K> {
    lo: Bound<K>,
    hi: Bound<K>,
}
impl<K: Clone> KeyRange<K> {
    pub(crate) fn new<R: RangeBounds<K>>(range: &R) -> Self {
        Self {
            lo: range.start_bound().cloned(),
            hi: range.end_bound().cloned(),
        }
    }

    fn bounds(&self) -> (Bound<K>, Bound<K>) {
        (self.lo.clone(), self.hi.clone())
    }
}
impl<K> KeyRange<K> {
    fn above_lo<C: Compare<K>>(&self, key: &K, cmp: &C) -> bool {
        match &self.lo {
            Bound::Included(lo) => cmp.compare(key, lo) != Ordering::Less,
            Bound::Excluded(lo) => cmp.compare(key, lo) == Ordering::Greater,
            Bound::Unbounded => true,
        }
    }

    fn below_hi<C: Compare<K>>(&self, key: &K, cmp: &C) -> bool {
        match &self.hi {
            Bound::Included(hi) => cmp.compare(key, hi) != Ordering::Greater,
            Bound::Excluded(hi) => cmp.compare(key, hi) == Ordering::Less,
            Bound::Unbounded => true,
        }
    }

    fn contains<C: Compare<K>>(&self, key: &K, cmp: &C) -> bool {
        self.above_lo(key, cmp) && self.below_hi(key, cmp)
    }

    fn get<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
        key: &K,
    ) -> Option<(&'m K, &'m V)> {
        if self.contains(key, &map.cmp) {
            map.get_key_value(key)
        } else {
            None
        }
    }

    fn first<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.lo {
            Bound::Included(lo) => map.ceiling_key_value(lo),
            Bound::Excluded(lo) => map.higher_key_value(lo),
            Bound::Unbounded => map.first_key_value(),
        };
        e.filter(|(k, _)| self.below_hi(k, &map.cmp))
    }

    fn last<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.hi {
            Bound::Included(hi) => map.floor_key_value(hi),
            Bound::Excluded(hi) => map.lower_key_value(hi),
            Bound::Unbounded => map.last_key_value(),
        };
        e.filter(|(k, _)| self.above_lo(k, &map.cmp))
    }

    fn lower<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
        key: &K,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.hi {
            Bound::Included(hi) if map.cmp.compare(key, hi) == Ordering::Greater => {
                map.floor_key_value(hi)
            }
            Bound::Excluded(hi) if map.cmp.compare(key, hi) == Ordering::Greater => {
                map.lower_key_value(hi)
            }
            _ => map.lower_key_value(key),
        };
        e.filter(|(k, _)| self.above_lo(k, &map.cmp))
    }

    fn floor<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
        key: &K,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.hi {
            Bound::Included(hi) if map.cmp.compare(key, hi) == Ordering::Greater => {
                map.floor_key_value(hi)
            }
            Bound::Excluded(hi) if map.cmp.compare(key, hi) != Ordering::Less => {
                map.lower_key_value(hi)
            }
            _ => map.floor_key_value(key),
        };
        e.filter(|(k, _)| self.above_lo(k, &map.cmp))
    }

    fn ceiling<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
        key: &K,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.lo {
            Bound::Included(lo) if map.cmp.compare(key, lo) == Ordering::Less => {
                map.ceiling_key_value(lo)
            }
            Bound::Excluded(lo) if map.cmp.compare(key, lo) != Ordering::Greater => {
                map.higher_key_value(lo)
            }
            _ => map.ceiling_key_value(key),
        };
        e.filter(|(k, _)| self.below_hi(k, &map.cmp))
    }

    fn higher<'m, V, const B: usize, C: Compare<K>>(
        &self,
        map: &'m BTreeMap<K, V, B, C>,
        key: &K,
    ) -> Option<(&'m K, &'m V)> {
        let e = match &self.lo {
            Bound::Included(lo) if map.cmp.compare(key, lo) == Ordering::Less => {
                map.ceiling_key_value(lo)
            }
            Bound::Excluded(lo) if map.cmp.compare(key, lo) == Ordering::Less => {
                map.higher_key_value(lo)
            }
            _ => map.higher_key_value(key),
        };
        e.filter(|(k, _)| self.below_hi(k, &map.cmp))
    }
}

/// Read-only view returned by [`BTreeMap::sub_map`].
pub struct RangeView<'a, K, V, const B: usize, C> {
    map: &'a BTreeMap<K, V, B, C>,
    range: KeyRange<K>,
}

/// View returned by [`BTreeMap::sub_map_mut`], which can also insert keys within its range.
pub struct RangeViewMut<'a, K, V, const B: usize, C> {
    map: &'a mut BTreeMap<K, V, B, C>,
    range: KeyRange<K>,
}

impl<'a, K, V, const B: usize, C> RangeView<'a, K, V, B, C> {
    pub(crate) fn new(map: &'a BTreeMap<K, V, B, C>, range: KeyRange<K>) -> Self {
        Self { map, range }
    }
}

impl<'a, K, V, const B: usize, C> RangeViewMut<'a, K, V, B, C> {
    pub(crate) fn new(map: &'a mut BTreeMap<K, V, B, C>, range: KeyRange<K>) -> Self {
        Self { map, range }
    }
}

impl<'a, K, V, const B: usize, C: Compare<K>> RangeViewMut<'a, K, V, B, C> {
    /// Insert into the underlying map, provided `key` is within the view.
    /// On success returns the value previously stored for `key`.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, KeyOutOfRangeError>
    where
        K: Clone,
    {
        if self.range.contains(&key, &self.map.cmp) {
            Ok(self.map.insert(key, value))
        } else {
            Err(KeyOutOfRangeError {})
        }
    }

    /// Remove `key` from the underlying map if it is within the view.
    /// An out-of-range key is never removed.
    pub fn remove(&mut self, key: &K) -> Option<V>
    where
        K: Clone,
    {
        if self.range.contains(key, &self.map.cmp) {
            self.map.remove(key)
        } else {
            None
        }
    }

    /// Read-only view of the same range.
    pub fn as_view(&self) -> RangeView<'_, K, V, B, C>
    where
        K: Clone,
    {
        RangeView::new(&*self.map, self.range.clone())
    }
}

macro_rules! view_queries {
    ($view:ident) => {
        impl<'a, K, V, const B: usize, C: Compare<K>> $view<'a, K, V, B, C> {
            /// Does the key lie within the view's range?
            pub fn in_range(&self, key: &K) -> bool {
                self.range.contains(key, &self.map.cmp)
            }

            /// Value for `key`, if `key` is in range and present.
            pub fn get(&self, key: &K) -> Option<&V> {
                self.range.get(&*self.map, key).map(|(_, v)| v)
            }

            /// Entry for `key`, if `key` is in range and present.
            pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.range.get(&*self.map, key)
            }

            /// Does the view contain `key`?
            pub fn contains_key(&self, key: &K) -> bool {
                self.get_key_value(key).is_some()
            }

            /// Smallest entry in range.
            pub fn first_key_value(&self) -> Option<(&K, &V)> {
                self.range.first(&*self.map)
            }

            /// Largest entry in range.
            pub fn last_key_value(&self) -> Option<(&K, &V)> {
                self.range.last(&*self.map)
            }

            /// Entry in range with the largest key strictly less than `key`.
            pub fn lower_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.range.lower(&*self.map, key)
            }

            /// Entry in range with the largest key less than or equal to `key`.
            pub fn floor_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.range.floor(&*self.map, key)
            }

            /// Entry in range with the smallest key greater than or equal to `key`.
            pub fn ceiling_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.range.ceiling(&*self.map, key)
            }

            /// Entry in range with the smallest key strictly greater than `key`.
            pub fn higher_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.range.higher(&*self.map, key)
            }

            /// Ascending iterator over the entries in range.
            pub fn iter(&self) -> Range<'_, K, V, B, C>
            where
                K: Clone,
            {
                self.map.range(self.range.bounds())
            }

            /// Descending iterator over the entries in range.
            pub fn iter_rev(&self) -> RangeRev<'_, K, V, B, C>
            where
                K: Clone,
            {
                self.map.range_rev(self.range.bounds())
            }

            /// Number of entries in range. This walks the range.
            pub fn len(&self) -> usize
            where
                K: Clone,
            {
                self.iter().count()
            }

            /// Is the range empty of entries?
            pub fn is_empty(&self) -> bool {
                self.first_key_value().is_none()
            }
        }
    };
}

view_queries!(RangeView);
view_queries!(RangeViewMut);

impl<'a, K: fmt::Debug + Clone, V: fmt::Debug, const B: usize, C: Compare<K>> fmt::Debug
    for RangeView<'a, K, V, B, C>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
