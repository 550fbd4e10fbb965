use crate::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::BTreeMap as StdMap;
use std::ops::Bound::{self, Excluded, Included, Unbounded};

#[test]
fn lower_entry_between_keys() {
    let mut map = BTreeMap::new();
    map.insert(1, "One");
    map.insert(3, "Three");
    assert_eq!(map.lower_key_value(&0), None);
    assert_eq!(map.lower_key_value(&1), None);
    assert_eq!(map.lower_key_value(&2), Some((&1, &"One")));
    assert_eq!(map.lower_key_value(&4), Some((&3, &"Three")));
}

fn put_then_get<const B: usize>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut t = gb::BTreeMap::<i32, i32, B>::new();
    let mut m = StdMap::new();
    for _ in 0..100 {
        let k = rng.gen_range(0..100);
        let v = rng.gen::<i32>();
        assert_eq!(t.insert(k, v), m.insert(k, v));
        for (k, v) in &m {
            assert_eq!(t.get(k), Some(v));
        }
        t.check_invariants();
    }
    assert_eq!(t.len(), m.len());
    if m.len() > B {
        assert!(t.depth() >= 1, "expected at least one split");
    }
}

#[test]
fn put_then_get_small_key_range() {
    for seed in [1337, 7, 42] {
        put_then_get::<3>(seed);
        put_then_get::<5>(seed);
        put_then_get::<DB>(seed);
    }
}

fn remove_in_random_order<const B: usize>(n: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<usize> = (0..n).collect();
    keys.shuffle(&mut rng);
    let mut t = gb::BTreeMap::<usize, usize, B>::new();
    let mut m = StdMap::new();
    for &k in &keys {
        t.insert(k, k * 10);
        m.insert(k, k * 10);
    }
    t.check_invariants();
    assert!(t.depth() >= 2, "depth is only {}", t.depth());

    keys.shuffle(&mut rng);
    for &k in &keys {
        assert_eq!(t.remove(&k), m.remove(&k));
        assert_eq!(t.remove(&k), None);
        t.check_invariants();
        assert_eq!(t.len(), m.len());
        assert!(t.iter().eq(m.iter()));
    }
    assert!(t.is_empty());
    assert_eq!(t.depth(), 0);
    assert_eq!(t.iter().next(), None);
}

#[test]
fn remove_all_in_random_order() {
    remove_in_random_order::<3>(1024, 1);
    remove_in_random_order::<5>(1500, 2);
    remove_in_random_order::<DB>(1024, 3);
}

#[test]
fn descending_iteration() {
    let mut map = BTreeMap::new();
    map.insert("Hello", 123);
    map.insert("World", 321);
    let mut it = map.iter_rev();
    assert_eq!(it.next(), Some((&"World", &321)));
    assert_eq!(it.next(), Some((&"Hello", &123)));
    assert_eq!(it.next(), None);
}

#[test]
fn overwrite_keeps_original_key() {
    let mut map = BTreeMap::with_comparator(|a: &(i32, &str), b: &(i32, &str)| a.0.cmp(&b.0));
    assert_eq!(map.insert((1, "first"), 10), None);
    assert_eq!(map.insert((1, "second"), 20), Some(10));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_key_value(&(1, "")), Some((&(1, "first"), &20)));
}

#[test]
fn absent_removal_leaves_structure() {
    let mut t: gb::BTreeMap<i32, i32, 3> = (0..50).map(|i| (i * 2, i)).collect();
    let before = format!("{:?}", t.root);
    for k in [-1, 1, 51, 99, 1000] {
        assert_eq!(t.remove(&k), None);
        assert_eq!(t.remove_entry(&k), None);
    }
    assert_eq!(format!("{:?}", t.root), before);
    assert_eq!(t.len(), 50);

    let mut empty = BTreeMap::<i32, i32>::new();
    assert_eq!(empty.remove(&1), None);
    assert!(empty.root.is_none());
}

fn insert_pattern<const B: usize>(keys: &[i32]) {
    let mut t = gb::BTreeMap::<i32, usize, B>::new();
    for (i, &k) in keys.iter().enumerate() {
        t.insert(k, i);
        t.check_invariants();
    }
    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert!(t.keys().copied().eq(sorted.iter().copied()));
    assert!(t.iter_rev().map(|(k, _)| *k).eq(sorted.iter().rev().copied()));
}

#[test]
fn splits_at_every_position() {
    let ascending: Vec<i32> = (0..500).collect();
    let descending: Vec<i32> = (0..500).rev().collect();
    // Alternate between both ends so inserts land at the front, back and middle of nodes.
    let zigzag: Vec<i32> = (0..250).flat_map(|i| [i, 499 - i]).collect();
    let inward: Vec<i32> = (0..500).map(|i| (i * 7919) % 500).collect();
    for keys in [&ascending, &descending, &zigzag, &inward] {
        insert_pattern::<3>(keys);
        insert_pattern::<5>(keys);
        insert_pattern::<7>(keys);
        insert_pattern::<DB>(keys);
    }
}

#[test]
fn neighbour_boundaries() {
    let map: BTreeMap<i32, i32> = (10..=20).map(|i| (i, i)).collect();
    assert_eq!(map.lower_key(&10), None);
    assert_eq!(map.higher_key(&20), None);
    assert_eq!(map.floor_key(&10), Some(&10));
    assert_eq!(map.ceiling_key(&20), Some(&20));
    assert_eq!(map.floor_key(&9), None);
    assert_eq!(map.ceiling_key(&21), None);
    assert_eq!(map.floor_key(&100), Some(&20));
    assert_eq!(map.ceiling_key(&-100), Some(&10));
    assert_eq!(map.first_key(), Some(&10));
    assert_eq!(map.last_key(), Some(&20));
}

#[test]
fn positioned_iterators_match_ranges() {
    let t: gb::BTreeMap<i32, i32, 5> = (0..500).map(|i| (i * 2, i)).collect();
    let m: StdMap<i32, i32> = (0..500).map(|i| (i * 2, i)).collect();
    assert!(t.depth() >= 2);
    for probe in -2..1002 {
        assert!(t.ceiling_iter(&probe).eq(m.range(probe..)), "ceiling {probe}");
        assert!(t.higher_iter(&probe).eq(m.range((Excluded(probe), Unbounded))), "higher {probe}");
        assert!(t.floor_iter(&probe).eq(m.range(..=probe).rev()), "floor {probe}");
        assert!(t.lower_iter(&probe).eq(m.range(..probe).rev()), "lower {probe}");
    }
    assert!(t.iter().eq(m.iter()));
    assert!(t.iter_rev().eq(m.iter().rev()));
}

#[test]
fn iterators_on_tiny_maps() {
    let mut map = gb::BTreeMap::<i32, i32, 3>::new();
    assert_eq!(map.iter().next(), None);
    assert_eq!(map.iter_rev().next(), None);
    assert_eq!(map.ceiling_iter(&0).next(), None);
    assert_eq!(map.floor_iter(&0).next(), None);
    map.insert(1, 1);
    let mut it = map.iter();
    assert_eq!(it.next(), Some((&1, &1)));
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
    assert_eq!(map.higher_iter(&1).next(), None);
    assert_eq!(map.lower_iter(&1).next(), None);
    assert_eq!(map.floor_iter(&5).next(), Some((&1, &1)));
}

#[test]
fn basic_range_test() {
    let mut map = BTreeMap::<usize, usize>::new();
    for i in 0..100 {
        map.insert(i, i);
    }

    for j in 0..100 {
        assert_eq!(map.range(0..=j).count(), j + 1);
        assert_eq!(map.range_rev(..j).count(), j);
    }
}

#[test]
fn ranges_match_std() {
    let t: gb::BTreeMap<i32, i32, 3> = (0..300).filter(|i| i % 3 != 0).map(|i| (i, -i)).collect();
    let m: StdMap<i32, i32> = (0..300).filter(|i| i % 3 != 0).map(|i| (i, -i)).collect();
    let bounds = |k: i32| [Included(k), Excluded(k), Unbounded];
    for lo in [-5, 0, 3, 4, 150, 299, 310] {
        for hi in [-1, 3, 5, 151, 299, 400] {
            for (s, e) in bounds(lo).into_iter().flat_map(|s| bounds(hi).map(move |e| (s, e))) {
                if lo > hi || (lo == hi && matches!((s, e), (Excluded(_), Excluded(_)))) {
                    continue;
                }
                assert!(t.range((s, e)).eq(m.range((s, e))), "{s:?} {e:?}");
                assert!(t.range_rev((s, e)).eq(m.range((s, e)).rev()), "{s:?} {e:?}");
            }
        }
    }
}

#[test]
#[should_panic(expected = "range start is greater than range end")]
fn inverted_range_panics() {
    let map = BTreeMap::from([(1, 1), (2, 2)]);
    let _ = map.range(5..2);
}

#[test]
#[should_panic(expected = "range start and end are equal and excluded")]
fn empty_excluded_range_panics() {
    let map = BTreeMap::from([(1, 1), (2, 2)]);
    let _ = map.range_rev((Excluded(1), Excluded(1)));
}

type Bounds = (Bound<i32>, Bound<i32>);

fn check_view(t: &gb::BTreeMap<i32, i32, 5>, m: &StdMap<i32, i32>, r: Bounds) {
    let view = t.sub_map(r);
    let inside: Vec<(&i32, &i32)> = m.range(r).collect();
    assert_eq!(view.len(), inside.len());
    assert!(view.iter().eq(inside.iter().copied()));
    assert!(view.iter_rev().eq(inside.iter().rev().copied()));
    assert_eq!(view.is_empty(), inside.is_empty());
    assert_eq!(view.first_key_value(), inside.first().copied());
    assert_eq!(view.last_key_value(), inside.last().copied());
    for p in -3..63 {
        let lower = inside.iter().rev().find(|(k, _)| **k < p).copied();
        let floor = inside.iter().rev().find(|(k, _)| **k <= p).copied();
        let ceiling = inside.iter().find(|(k, _)| **k >= p).copied();
        let higher = inside.iter().find(|(k, _)| **k > p).copied();
        assert_eq!(view.lower_key_value(&p), lower, "lower {p} in {r:?}");
        assert_eq!(view.floor_key_value(&p), floor, "floor {p} in {r:?}");
        assert_eq!(view.ceiling_key_value(&p), ceiling, "ceiling {p} in {r:?}");
        assert_eq!(view.higher_key_value(&p), higher, "higher {p} in {r:?}");
        let got = view.get(&p);
        assert_eq!(got, inside.iter().find(|(k, _)| **k == p).map(|(_, v)| *v));
        assert_eq!(view.contains_key(&p), got.is_some());
    }
}

#[test]
fn views_clamp_queries() {
    let t: gb::BTreeMap<i32, i32, 5> = (0..30).map(|i| (i * 2, i)).collect();
    let m: StdMap<i32, i32> = (0..30).map(|i| (i * 2, i)).collect();
    let ranges: [Bounds; 9] = [
        (Included(10), Excluded(20)),
        (Excluded(10), Included(20)),
        (Included(11), Included(19)),
        (Excluded(11), Excluded(19)),
        (Unbounded, Excluded(7)),
        (Included(50), Unbounded),
        (Unbounded, Unbounded),
        (Included(100), Included(200)),
        (Included(13), Included(13)),
    ];
    for r in ranges {
        check_view(&t, &m, r);
    }
}

#[test]
fn view_insert_respects_range() {
    let mut map = BTreeMap::<i32, &str>::new();
    {
        let mut view = map.sub_map_mut(10..20);
        assert_eq!(view.insert(10, "ten"), Ok(None));
        assert_eq!(view.insert(19, "nineteen"), Ok(None));
        assert_eq!(view.insert(10, "TEN"), Ok(Some("ten")));
        assert_eq!(view.insert(20, "twenty"), Err(KeyOutOfRangeError {}));
        assert_eq!(view.insert(9, "nine"), Err(KeyOutOfRangeError {}));
        assert!(view.in_range(&15));
        assert!(!view.in_range(&20));
        assert_eq!(view.len(), 2);
        assert_eq!(view.as_view().first_key_value(), Some((&10, &"TEN")));
        assert_eq!(view.insert(12, "twelve"), Ok(None));
        assert_eq!(view.remove(&12), Some("twelve"));
        assert_eq!(view.remove(&12), None);
    }
    map.insert(30, "thirty");
    assert_eq!(map.sub_map_mut(10..20).remove(&30), None);
    assert_eq!(map.remove(&30), Some("thirty"));
    map.insert(25, "outside");
    assert_eq!(map.len(), 3);
    let view = map.sub_map(10..20);
    assert_eq!(view.last_key_value(), Some((&19, &"nineteen")));
    assert_eq!(view.higher_key_value(&19), None);
    assert_eq!(format!("{view:?}"), r#"{10: "TEN", 19: "nineteen"}"#);
    assert_eq!(
        KeyOutOfRangeError {}.to_string(),
        "key is outside the range of the view"
    );
}

#[test]
fn reverse_comparator() {
    let mut map = BTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for i in 1..=100 {
        map.insert(i, i * i);
    }
    map.check_invariants();
    assert_eq!(map.first_key(), Some(&100));
    assert_eq!(map.last_key(), Some(&1));
    assert_eq!(map.lower_key(&50), Some(&51));
    assert_eq!(map.higher_key(&50), Some(&49));
    assert_eq!(map.floor_key(&0), Some(&1));
    assert!(map.keys().copied().eq((1..=100).rev()));
    assert!(map.range(60..=40).map(|(k, _)| *k).eq((40..=60).rev()));
    assert_eq!(map.comparator()(&1, &2), std::cmp::Ordering::Greater);
}

#[test]
fn lookups_and_accessors() {
    let mut map: BTreeMap<i32, i32> = (0..1000).map(|i| (i, i * 2)).collect();
    assert_eq!(map.get_or(&5, &-1), &10);
    assert_eq!(map.get_or(&5000, &-1), &-1);
    assert!(map.contains_key(&999));
    assert!(!map.contains_key(&1000));
    assert_eq!(map[&7], 14);
    if let Some(v) = map.get_mut(&7) {
        *v = 0;
    }
    assert_eq!(map.get(&7), Some(&0));
    assert_eq!(map.get_mut(&-7), None);
    assert!(map.values().take(3).eq([0, 2, 4].iter()));
    assert_eq!(map.pop_first(), Some((0, 0)));
    assert_eq!(map.pop_last(), Some((999, 1998)));
    assert_eq!(map.len(), 998);
    map.check_invariants();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.pop_first(), None);
    assert_eq!(map.first_key_value(), None);
    map.check_invariants();
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = BTreeMap::from([(1, 1)]);
    let _ = map[&2];
}

#[test]
fn conversions_and_traits() {
    let std_map: StdMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let a = BTreeMap::from(std_map.clone());
    let b: BTreeMap<i32, i32> = BTreeMap::from(std_map.clone().into_iter().collect::<std::collections::HashMap<_, _>>());
    assert_eq!(a, b);
    let mut c = a.clone();
    c.check_invariants();
    assert_eq!(a, c);
    c.insert(1000, 1000);
    assert_ne!(a, c);
    c.remove(&1000);

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let hash = |m: &BTreeMap<i32, i32>| {
        let mut h = DefaultHasher::new();
        m.hash(&mut h);
        h.finish()
    };
    assert_eq!(hash(&a), hash(&c));

    let mut d: BTreeMap<i32, i32> = BTreeMap::new();
    d.extend(std_map.iter());
    assert_eq!(a, d);
    assert_eq!(format!("{:?}", BTreeMap::from([(2, 'b'), (1, 'a')])), "{1: 'a', 2: 'b'}");

    let mut count = 0;
    for (k, v) in &a {
        assert_eq!(k, v);
        count += 1;
    }
    assert_eq!(count, 100);
}

#[test]
fn test_exp_into_iter() {
    let mut m = gb::BTreeMap::<usize, String, 5>::default();
    let n = 10000;
    for i in (0..n).rev() {
        m.insert(i, i.to_string());
    }
    let mut it = m.into_iter();
    assert_eq!(it.len(), n);
    for i in 0..n / 2 {
        assert_eq!(it.next(), Some((i, i.to_string())));
    }
    assert_eq!(it.len(), n - n / 2);
    // Remaining entries are dropped with the iterator.
    drop(it);

    let empty = BTreeMap::<i32, i32>::new();
    assert_eq!(empty.into_iter().next(), None);
}

#[test]
fn test_exp_iter() {
    let mut m = BTreeMap::<usize, usize>::default();
    let n = 100000;
    for i in 0..n {
        m.insert(i, i);
    }
    let mut count = 0;
    for (k, v) in m.iter() {
        assert!(k == v);
        count += 1;
    }
    assert_eq!(count, n);
    m.check_invariants();
    crate::print_memory();
}

#[test]
fn depth_grows_and_shrinks() {
    let mut t = gb::BTreeMap::<u32, (), 3>::new();
    let mut max_depth = 0;
    for i in 0..2000 {
        t.insert(i, ());
        max_depth = max_depth.max(t.depth());
    }
    assert!(max_depth >= 6);
    for i in 0..1990 {
        t.remove(&i);
    }
    t.check_invariants();
    assert!(t.depth() <= 2);
    assert!(t.keys().copied().eq(1990..2000));
}
