#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! This crate implements an in-memory ordered [BTreeMap] backed by a B+ tree.
//!
//! Besides the usual exact-key operations it answers neighbour queries (the nearest key strictly
//! below, at or below, at or above, or strictly above a probe key), can start ascending or
//! descending iteration at any such neighbour, and offers range views that clamp queries to a key range.
//!
//! Keys are ordered by a comparator: [`Natural`] ([`Ord`]) by default, or any closure
//! `Fn(&K, &K) -> Ordering`.
//!
//! Most of the implementation is in the [gb] module, see [gb::BTreeMap].
//!
//! # Example
//!
//! ```
//!     use nav_btree::BTreeMap;
//!     let mut map = BTreeMap::new();
//!     map.insert(10, "ten");
//!     map.insert(20, "twenty");
//!     map.insert(30, "thirty");
//!     assert_eq!(map.floor_key(&25), Some(&20));
//!     assert_eq!(map.higher_key(&30), None);
//!     let below: Vec<_> = map.lower_iter(&30).map(|(k, _)| *k).collect();
//!     assert_eq!(below, [20, 10]);
//! ```
//!
//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [BTreeMap] via serde crate.
//! - `tracing` : emits trace events when the tree grows or shrinks a level, via the tracing crate.
//! - `binary-search` : node searches use binary rather than linear search.
//! - `cap` : tests run under a counting allocator and report memory use.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

/// Module with version of BTreeMap that allows B to be specified as generic constant.
pub mod gb;

mod check;
mod compare;
mod iter;
mod nav;
mod node;
mod search;
mod view;

pub use compare::{Compare, Natural};
pub use gb::KeyOutOfRangeError;

/// Default B value (maximum fanout: entries per leaf, children per internal node).
pub const DB: usize = 31;

/// BTreeMap with default node capacity [DB], ordered by comparator `C`.
pub type BTreeMap<K, V, C = Natural> = gb::BTreeMap<K, V, DB, C>;

/// Consuming iterator returned by [BTreeMap::into_iter].
pub type IntoIter<K, V> = gb::IntoIter<K, V, DB>;

/// Ascending iterator returned by [BTreeMap::iter], [BTreeMap::ceiling_iter], [BTreeMap::higher_iter].
pub type Iter<'a, K, V> = gb::Iter<'a, K, V, DB>;

/// Descending iterator returned by [BTreeMap::iter_rev], [BTreeMap::floor_iter], [BTreeMap::lower_iter].
pub type RevIter<'a, K, V> = gb::RevIter<'a, K, V, DB>;

/// Iterator returned by [BTreeMap::keys].
pub type Keys<'a, K, V> = gb::Keys<'a, K, V, DB>;

/// Iterator returned by [BTreeMap::values].
pub type Values<'a, K, V> = gb::Values<'a, K, V, DB>;

/// Iterator returned by [BTreeMap::range].
pub type Range<'a, K, V, C = Natural> = gb::Range<'a, K, V, DB, C>;

/// Iterator returned by [BTreeMap::range_rev].
pub type RangeRev<'a, K, V, C = Natural> = gb::RangeRev<'a, K, V, DB, C>;

/// View returned by [BTreeMap::sub_map].
pub type RangeView<'a, K, V, C = Natural> = gb::RangeView<'a, K, V, DB, C>;

/// View returned by [BTreeMap::sub_map_mut].
pub type RangeViewMut<'a, K, V, C = Natural> = gb::RangeViewMut<'a, K, V, DB, C>;

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::MAX);

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod mytests;

#[cfg(test)]
mod proptests;
