use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use sorted_map::{EntryHandle, RangeBound, SortedMap};

const SEEDS: [u64; 6] = [1, 2, 3, 42, 0xdead_beef, 0x5eed_5eed_5eed];

fn check(map: &SortedMap<u32, u64>, model: &BTreeMap<u32, u64>, seed: u64, step: usize) {
    if let Err(err) = map.assert_valid() {
        panic!("seed {seed} step {step}: {err}\n{}", map.to_tree_string());
    }
    assert_eq!(map.len(), model.len(), "seed {seed} step {step}");
}

fn run_seed(seed: u64, steps: usize, key_space: u32) {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut map = SortedMap::<u32, u64>::new();
    let mut model = BTreeMap::<u32, u64>::new();
    let mut live: Vec<(u32, EntryHandle)> = Vec::new();
    let mut dead: Vec<EntryHandle> = Vec::new();

    for step in 0..steps {
        match rng.gen_range(0..=9) {
            0..=3 => {
                let k = rng.gen_range(0..key_space);
                let v = rng.gen::<u64>();
                let h = map.set(k, v);
                if model.insert(k, v).is_none() {
                    live.push((k, h));
                }
            }
            4 => {
                let k = rng.gen_range(0..key_space);
                let v = rng.gen::<u64>();
                let h = map.set_if_absent(k, v);
                if !model.contains_key(&k) {
                    model.insert(k, v);
                    live.push((k, h));
                }
            }
            5..=6 => {
                let k = rng.gen_range(0..key_space);
                let expected = model.remove_entry(&k);
                assert_eq!(map.delete(&k), expected, "seed {seed} step {step}");
                if expected.is_some() {
                    let at = live.iter().position(|(lk, _)| *lk == k).unwrap();
                    dead.push(live.swap_remove(at).1);
                }
            }
            7 => {
                let expected = model.pop_first();
                assert_eq!(map.delete_smallest(), expected, "seed {seed} step {step}");
                if let Some((k, _)) = expected {
                    let at = live.iter().position(|(lk, _)| *lk == k).unwrap();
                    dead.push(live.swap_remove(at).1);
                }
            }
            8 => {
                if let Some(&(k, h)) = live.get(rng.gen_range(0..live.len().max(1))) {
                    let v = rng.gen::<u64>();
                    assert!(map.re_value(h, v), "seed {seed} step {step}");
                    model.insert(k, v);
                }
            }
            _ => {
                let lo = rng.gen_range(0..key_space);
                let hi = rng.gen_range(lo..=key_space);
                let expected: Vec<u32> = model.range(lo..hi).map(|(k, _)| *k).collect();
                let actual: Vec<u32> = map
                    .get_range(RangeBound::Inclusive(lo), RangeBound::Exclusive(hi))
                    .map(|(k, _)| *k)
                    .collect();
                assert_eq!(actual, expected, "seed {seed} step {step}");
            }
        }
        check(&map, &model, seed, step);
    }

    for (k, h) in &live {
        assert_eq!(map.entry(*h), model.get_key_value(k), "seed {seed}");
    }
    for h in &dead {
        assert!(!map.contains_handle(*h), "seed {seed}");
    }
    let entries: Vec<(u32, u64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    let expected: Vec<(u32, u64)> = model.into_iter().collect();
    assert_eq!(entries, expected, "seed {seed}");
}

#[test]
fn fuzz_small_key_space_matrix() {
    for seed in SEEDS {
        run_seed(seed, 2_000, 64);
    }
}

#[test]
fn fuzz_wide_key_space_matrix() {
    for seed in SEEDS {
        run_seed(seed, 3_000, 100_000);
    }
}

#[test]
fn fuzz_drain_by_extremes_matrix() {
    for seed in SEEDS {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut map = SortedMap::<u32, u64>::new();
        let mut model = BTreeMap::<u32, u64>::new();
        for _ in 0..500 {
            let k = rng.gen::<u32>();
            map.set(k, u64::from(k));
            model.insert(k, u64::from(k));
        }
        while !model.is_empty() {
            let (actual, expected) = if rng.gen_bool(0.5) {
                (map.delete_smallest(), model.pop_first())
            } else {
                (map.delete_largest(), model.pop_last())
            };
            assert_eq!(actual, expected, "seed {seed}");
            map.assert_valid().unwrap();
        }
        assert!(map.is_empty());
    }
}
