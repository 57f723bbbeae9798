// Model-based property tests.
//
// Property 1: an unordered map behaves like std's HashMap.
//  - Operations: insert, put_if_absent, remove, cursor removal, shrink,
//    resize with a fresh multiplier.
//  - Keys come from a small range including zero so the side slot and long
//    probe runs are both exercised.
//
// Property 2: ordered maps keep the order index and the table in sync.
//  - Model: a Vec of (key, value) pairs mutated with list or bag semantics.
//  - Invariant: order() lists exactly the live keys, each once, in model order.
use std::collections::HashMap as StdHashMap;
use std::collections::HashSet as StdHashSet;

use probe_hash::OrderMode;
use probe_hash::PrimitiveMap;
use probe_hash::PrimitiveOrderedMap;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_map_matches_std(ops in proptest::collection::vec((0u8..=5u8, 0u16..48u16, any::<i32>()), 1..300)) {
        let mut map: PrimitiveMap<u16, i32> = PrimitiveMap::with_capacity(2);
        let mut model: StdHashMap<u16, i32> = StdHashMap::new();

        for (op, key, value) in ops {
            match op {
                0 => prop_assert_eq!(map.insert(key, value), model.insert(key, value)),
                1 => {
                    let absent = !model.contains_key(&key);
                    if absent {
                        model.insert(key, value);
                    }
                    prop_assert_eq!(map.put_if_absent(key, value), absent);
                }
                2 => prop_assert_eq!(map.remove(&key), model.remove(&key)),
                3 => {
                    // Remove every key sharing the parity of `key`.
                    let parity = key % 2;
                    let mut cursor = map.cursor_mut();
                    while let Some((&k, _)) = cursor.next() {
                        if k % 2 == parity {
                            cursor.remove();
                        }
                    }
                    model.retain(|k, _| k % 2 != parity);
                }
                4 => map.shrink_to_fit(),
                5 => {
                    let before = map.hash_multiplier();
                    map.resize(map.capacity());
                    prop_assert_ne!(map.hash_multiplier(), before);
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(map.len(), model.len());
            prop_assert!(map.len() <= map.threshold());
            prop_assert_eq!(map.get(&key), model.get(&key));
        }

        let mut seen = StdHashSet::new();
        for (k, v) in map.iter() {
            prop_assert!(seen.insert(*k), "key {} yielded twice", k);
            prop_assert_eq!(model.get(k), Some(v));
        }
        prop_assert_eq!(seen.len(), model.len());
    }
}

fn check_order(
    map: &PrimitiveOrderedMap<u8, u32>,
    model: &[(u8, u32)],
) -> Result<(), TestCaseError> {
    let expected: Vec<u8> = model.iter().map(|&(k, _)| k).collect();
    prop_assert_eq!(map.order(), expected.as_slice());
    prop_assert_eq!(map.len(), model.len());
    for &(k, v) in model {
        prop_assert_eq!(map.get(&k), Some(&v));
    }
    let distinct: StdHashSet<u8> = map.order().iter().copied().collect();
    prop_assert_eq!(distinct.len(), map.len());
    Ok(())
}

fn model_remove(model: &mut Vec<(u8, u32)>, mode: OrderMode, index: usize) -> (u8, u32) {
    match mode {
        OrderMode::List => model.remove(index),
        OrderMode::Bag => model.swap_remove(index),
    }
}

fn model_insert(model: &mut Vec<(u8, u32)>, mode: OrderMode, index: usize, entry: (u8, u32)) {
    match mode {
        OrderMode::List => model.insert(index, entry),
        OrderMode::Bag => {
            model.push(entry);
            let last = model.len() - 1;
            model.swap(index, last);
        }
    }
}

proptest! {
    #[test]
    fn prop_order_matches_table(
        bag in any::<bool>(),
        ops in proptest::collection::vec((0u8..=7u8, 0u8..32u8, any::<u32>(), any::<usize>()), 1..200)
    ) {
        let mode = if bag { OrderMode::Bag } else { OrderMode::List };
        let mut map: PrimitiveOrderedMap<u8, u32> = PrimitiveOrderedMap::with_mode(mode);
        let mut model: Vec<(u8, u32)> = Vec::new();

        for (op, key, value, raw_index) in ops {
            let position = model.iter().position(|&(k, _)| k == key);
            match op {
                0 => {
                    let previous = map.insert(key, value);
                    match position {
                        Some(i) => {
                            prop_assert_eq!(previous, Some(model[i].1));
                            model[i].1 = value;
                        }
                        None => {
                            prop_assert_eq!(previous, None);
                            model.push((key, value));
                        }
                    }
                }
                1 => {
                    let removed = map.remove(&key);
                    match position {
                        Some(i) => {
                            prop_assert_eq!(removed, Some(model[i].1));
                            model_remove(&mut model, mode, i);
                        }
                        None => prop_assert_eq!(removed, None),
                    }
                }
                2 if !model.is_empty() => {
                    let index = raw_index % model.len();
                    prop_assert_eq!(map.remove_at(index), model[index]);
                    model_remove(&mut model, mode, index);
                }
                3 if position.is_none() => {
                    let after = key;
                    let index = raw_index % (model.len() + 1);
                    if index < model.len() {
                        prop_assert!(map.alter_at(index, after));
                        model[index].0 = after;
                    } else {
                        prop_assert!(!map.alter_at(index, after));
                    }
                }
                4 => {
                    let mut cursor = map.cursor_mut();
                    while let Some((&k, _)) = cursor.next() {
                        if k % 3 == value as u8 % 3 {
                            cursor.remove();
                        }
                    }
                    // The cursor removes through the same positional path, so
                    // replay its walk against the model.
                    let mut i = 0;
                    while i < model.len() {
                        if model[i].0 % 3 == value as u8 % 3 {
                            model_remove(&mut model, mode, i);
                        } else {
                            i += 1;
                        }
                    }
                }
                5 => {
                    map.sort();
                    model.sort_by_key(|&(k, _)| k);
                }
                6 => match position {
                    Some(i) => {
                        let index = raw_index % model.len();
                        prop_assert_eq!(map.insert_at(index, key, value), Some(model[i].1));
                        model[i].1 = value;
                        if i != index {
                            let moved = model_remove(&mut model, mode, i);
                            model_insert(&mut model, mode, index, moved);
                        }
                    }
                    None => {
                        let index = raw_index % (model.len() + 1);
                        prop_assert_eq!(map.insert_at(index, key, value), None);
                        model_insert(&mut model, mode, index, (key, value));
                    }
                },
                7 => {
                    if model.is_empty() {
                        prop_assert!(!map.alter(&key, key ^ 1));
                    } else {
                        let index = raw_index % model.len();
                        let before = model[index].0;
                        let altered = map.alter(&before, key);
                        prop_assert_eq!(altered, position.is_none());
                        if altered {
                            model[index].0 = key;
                        }
                    }
                }
                _ => {}
            }
            check_order(&map, &model)?;
        }
    }
}
