use crate::gb;

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Neighbours(u16),
    PopFirst,
    PopLast,
}

fn ops_strategy(keys: u16) -> impl Strategy<Value = Vec<Op>> {
    let key = 0..keys;
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        10 => key.clone().prop_map(Op::Get),
        10 => key.clone().prop_map(Op::Neighbours),
        2 => Just(Op::PopFirst),
        2 => Just(Op::PopLast),
    ];
    prop::collection::vec(op, 0..=1500)
}

fn run_model<const B: usize>(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut t = gb::BTreeMap::<u16, u32, B>::new();
    let mut m: BTreeMap<u16, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => prop_assert_eq!(t.insert(k, v), m.insert(k, v)),
            Op::Remove(k) => prop_assert_eq!(t.remove(&k), m.remove(&k)),
            Op::Get(k) => prop_assert_eq!(t.get(&k), m.get(&k)),
            Op::Neighbours(k) => {
                prop_assert_eq!(t.lower_key_value(&k), m.range(..k).next_back());
                prop_assert_eq!(t.floor_key_value(&k), m.range(..=k).next_back());
                prop_assert_eq!(t.ceiling_key_value(&k), m.range(k..).next());
                prop_assert_eq!(t.higher_key_value(&k), m.range((Excluded(k), Unbounded)).next());
                let got: Vec<_> = t.floor_iter(&k).take(5).collect();
                let expected: Vec<_> = m.range(..=k).rev().take(5).collect();
                prop_assert_eq!(got, expected);
                let got: Vec<_> = t.higher_iter(&k).take(5).collect();
                let expected: Vec<_> = m.range((Excluded(k), Unbounded)).take(5).collect();
                prop_assert_eq!(got, expected);
            }
            Op::PopFirst => prop_assert_eq!(t.pop_first(), m.pop_first()),
            Op::PopLast => prop_assert_eq!(t.pop_last(), m.pop_last()),
        }
        prop_assert_eq!(t.len(), m.len());
        t.check_invariants();
    }

    let got: Vec<_> = t.iter().collect();
    let expected: Vec<_> = m.iter().collect();
    prop_assert_eq!(got, expected);
    let got: Vec<_> = t.iter_rev().collect();
    let expected: Vec<_> = m.iter().rev().collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_b3(ops in ops_strategy(300)) {
        run_model::<3>(ops)?;
    }

    #[test]
    fn prop_equivalence_b5(ops in ops_strategy(600)) {
        run_model::<5>(ops)?;
    }

    #[test]
    fn prop_equivalence_default(ops in ops_strategy(2000)) {
        run_model::<{ crate::DB }>(ops)?;
    }

    #[test]
    fn prop_range_matches(keys in prop::collection::vec(0u16..500, 0..400), a in 0u16..500, b in 0u16..500) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let t: gb::BTreeMap<u16, (), 5> = keys.iter().map(|&k| (k, ())).collect();
        let m: BTreeMap<u16, ()> = keys.iter().map(|&k| (k, ())).collect();

        let got: Vec<_> = t.range(lo..hi).map(|(k, _)| *k).collect();
        let expected: Vec<_> = m.range(lo..hi).map(|(k, _)| *k).collect();
        prop_assert_eq!(got, expected);

        let got: Vec<_> = t.range_rev(lo..=hi).map(|(k, _)| *k).collect();
        let expected: Vec<_> = m.range(lo..=hi).rev().map(|(k, _)| *k).collect();
        prop_assert_eq!(got, expected);

        let view = t.sub_map(lo..=hi);
        prop_assert_eq!(view.len(), m.range(lo..=hi).count());
        prop_assert_eq!(view.first_key_value(), m.range(lo..=hi).next());
        prop_assert_eq!(view.last_key_value(), m.range(lo..=hi).next_back());
    }
}
