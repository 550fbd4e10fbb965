use std::cmp::Ordering;

/// Total order used to arrange the keys of a map.
///
/// Every closure `Fn(&K, &K) -> Ordering` is a comparator, and [`Natural`] uses [`Ord`].
///
/// The order must be total and consistent for the lifetime of the map; this is not checked,
/// and an inconsistent comparator leaves the map in an unspecified (but memory safe) state.
pub trait Compare<K> {
    /// Compare two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Comparator using the natural [`Ord`] order of the keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
