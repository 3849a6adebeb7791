//! Property tests for the containers.

use std::collections::BTreeMap;

use plinth_mem::{DynArray, HashSet, InlineAllocation, PairSet, SlotTable};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum ArrayOp {
    Push(u16),
    Insert(usize, u16),
    RemoveAt(usize),
    Pop,
    Clear(usize),
}

fn arb_array_op() -> impl Strategy<Value = ArrayOp> {
    prop_oneof![
        4 => any::<u16>().prop_map(ArrayOp::Push),
        2 => (any::<usize>(), any::<u16>()).prop_map(|(i, v)| ArrayOp::Insert(i, v)),
        2 => any::<usize>().prop_map(ArrayOp::RemoveAt),
        1 => Just(ArrayOp::Pop),
        1 => (0usize..16).prop_map(ArrayOp::Clear),
    ]
}

#[derive(Debug, Clone)]
enum SetOp {
    Add(u8, u32),
    Remove(u8),
}

fn arb_set_op() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        3 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| SetOp::Add(k, v)),
        1 => any::<u8>().prop_map(SetOp::Remove),
    ]
}

fn apply_array_ops<A: plinth_mem::AllocationStrategy>(ops: &[ArrayOp]) -> Result<(), TestCaseError> {
    let mut arr: DynArray<u16, A> = DynArray::default();
    let mut model: Vec<u16> = Vec::new();

    for op in ops {
        match *op {
            ArrayOp::Push(v) => {
                arr.push(v);
                model.push(v);
            }
            ArrayOp::Insert(i, v) => {
                let i = i % (model.len() + 1);
                arr.insert(i, v);
                model.insert(i, v);
            }
            ArrayOp::RemoveAt(i) => {
                if !model.is_empty() {
                    let i = i % model.len();
                    prop_assert_eq!(arr.remove_at(i), model.remove(i));
                }
            }
            ArrayOp::Pop => prop_assert_eq!(arr.pop(), model.pop()),
            ArrayOp::Clear(slack) => {
                arr.clear(slack);
                model.clear();
                prop_assert_eq!(arr.capacity(), slack);
            }
        }
        prop_assert_eq!(arr.len(), model.len());
        prop_assert!(arr.capacity() >= arr.len());
        prop_assert_eq!(arr.as_slice(), model.as_slice());
    }
    Ok(())
}

proptest! {
    #[test]
    fn array_matches_vec_model(ops in prop::collection::vec(arb_array_op(), 0..200)) {
        apply_array_ops::<plinth_mem::HeapAllocation>(&ops)?;
    }

    #[test]
    fn inline_array_matches_vec_model(ops in prop::collection::vec(arb_array_op(), 0..200)) {
        apply_array_ops::<InlineAllocation<24>>(&ops)?;
    }

    #[test]
    fn remove_match_keeps_survivor_order(values in prop::collection::vec(0u8..8, 0..100), target in 0u8..8) {
        let mut arr: DynArray<u8> = DynArray::from(values.as_slice());
        let removed = arr.remove_match(|&v| v == target);

        let expected: Vec<u8> = values.iter().copied().filter(|&v| v != target).collect();
        prop_assert_eq!(removed, values.len() - expected.len());
        prop_assert_eq!(arr.as_slice(), expected.as_slice());
    }

    #[test]
    fn set_matches_map_model(ops in prop::collection::vec(arb_set_op(), 0..300)) {
        let mut set: PairSet<u8, u32> = PairSet::new();
        let mut model: BTreeMap<u8, u32> = BTreeMap::new();

        for op in &ops {
            match *op {
                SetOp::Add(k, v) => {
                    let before = set.len();
                    let previous = set.add((k, v)).map(|(_, old)| old);
                    prop_assert_eq!(previous, model.insert(k, v));
                    if previous.is_some() {
                        prop_assert_eq!(set.len(), before);
                    }
                }
                SetOp::Remove(k) => {
                    prop_assert_eq!(set.remove(&k), model.remove(&k).is_some());
                    prop_assert!(set.find(&k).is_none());
                }
            }
            prop_assert_eq!(set.len(), model.len());
            prop_assert!(set.bucket_count().is_power_of_two());
        }

        for (k, v) in &model {
            prop_assert_eq!(set.find(k), Some(&(*k, *v)));
        }
    }

    #[test]
    fn rehashes_preserve_membership(keys in prop::collection::hash_set(any::<u64>(), 0..2000)) {
        let mut set: HashSet<u64> = HashSet::new();
        for &key in &keys {
            prop_assert!(set.add(key).is_none());
        }
        prop_assert_eq!(set.len(), keys.len());
        for key in &keys {
            prop_assert!(set.contains(key));
        }
    }

    #[test]
    fn repeated_add_never_grows(key in any::<i32>(), repeats in 1usize..50) {
        let mut set: HashSet<i32> = HashSet::new();
        for _ in 0..repeats {
            set.add(key);
        }
        prop_assert_eq!(set.len(), 1);
    }

    #[test]
    fn slot_indices_stay_stable(values in prop::collection::vec(any::<u32>(), 1..100), mask in any::<u128>()) {
        let mut table = SlotTable::new();
        let ids: Vec<_> = values.iter().map(|&v| table.insert(v)).collect();

        for (n, id) in ids.iter().enumerate() {
            if mask & (1 << (n % 128)) != 0 {
                table.remove(*id);
            }
        }
        for (n, id) in ids.iter().enumerate() {
            if mask & (1 << (n % 128)) == 0 {
                prop_assert_eq!(table.get(*id), Some(&values[n]));
            } else {
                prop_assert!(table.get(*id).is_none());
            }
        }
    }
}
