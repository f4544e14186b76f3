#![cfg(test)]

// Property tests for the chaining engine and its typed layers, kept inside
// the crate so they can reach crate-private helpers.

use crate::config::TableConfig;
use crate::error::InsertError;
use crate::hash::Murmur64;
use crate::hash_map::HashMap;
use crate::hash_multimap::HashMultiMap;
use crate::hash_multiset::HashMultiSet;
use crate::prime::is_prime;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap as StdHashMap};
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    EraseFound(usize),
    Rehash(usize),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            idx.clone().prop_map(OpI::EraseFound),
            (0usize..64).prop_map(OpI::Rehash),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_shape<K, V, H>(m: &HashMap<K, V, H>, expected_len: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(m.len(), expected_len);
    prop_assert_eq!(m.is_empty(), expected_len == 0);
    let total: usize = (0..m.bucket_count()).map(|i| m.bucket_size(i)).sum();
    prop_assert_eq!(total, m.len(), "len must equal the sum of bucket sizes");
    prop_assert!(is_prime(m.bucket_count()), "bucket count {} not prime", m.bucket_count());
    Ok(())
}

// Property: state-machine equivalence of HashMap against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate keys are rejected and hand back the rejected pair.
// - `insert_or_replace` returns the previous value.
// - `get`/`contains_key` parity, including borrowed `&str` lookups.
// - `erase` at a found position removes exactly that entry.
// - `rehash` preserves contents; `len == Σ bucket_size` and the bucket
//   count stays prime after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_map_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: HashMap<Key, i32> = HashMap::with_buckets(3);
        let mut model: StdHashMap<Key, i32> = StdHashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = key_from(&pool, i);
                    let already = model.contains_key(&k);
                    match sut.insert(k.clone(), v) {
                        Ok(pos) => {
                            prop_assert!(!already, "insert must fail on duplicate");
                            prop_assert_eq!(pos.bucket, sut.bucket(&k));
                            let at = sut.get_at(pos.bucket, pos.offset).map(|(kk, vv)| (kk.clone(), *vv));
                            prop_assert_eq!(at, Some((k.clone(), v)));
                            model.insert(k, v);
                        }
                        Err(InsertError::DuplicateKey((kk, vv))) => {
                            prop_assert!(already, "duplicate error only when key exists");
                            prop_assert!(kk == k);
                            prop_assert_eq!(vv, v);
                        }
                    }
                }
                OpI::Replace(i, v) => {
                    let k = key_from(&pool, i);
                    let prev = sut.insert_or_replace(k.clone(), v);
                    prop_assert_eq!(prev, model.insert(k, v));
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    let got = sut.remove_entry(k.0.as_str());
                    let want = model.remove_entry(&k);
                    prop_assert_eq!(got, want);
                }
                OpI::Get(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                }
                OpI::Contains(s) => {
                    let has_model = model.keys().any(|k| k.0 == s);
                    prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
                }
                OpI::Mutate(i, d) => {
                    let k = key_from(&pool, i);
                    if let Some(v) = sut.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::EraseFound(i) => {
                    let k = key_from(&pool, i);
                    match sut.find_position(&k) {
                        Some(pos) => {
                            let (kk, vv) = sut.erase(pos.bucket, pos.offset).expect("position is live");
                            prop_assert!(kk == k);
                            prop_assert_eq!(Some(vv), model.remove(&k));
                        }
                        None => prop_assert!(!model.contains_key(&k)),
                    }
                }
                OpI::Rehash(n) => {
                    sut.rehash(n).expect("small rehash succeeds");
                    prop_assert!(sut.bucket_count() >= n);
                }
                OpI::Iterate => {
                    let seen: BTreeMap<Key, i32> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(seen.len(), sut.len(), "iter yields each entry once");
                    let want: BTreeMap<Key, i32> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(seen, want);
                }
            }
            check_shape(&sut, model.len())?;
        }

        let drained: BTreeSet<Key> = sut.drain().map(|(k, _)| k).collect();
        let want: BTreeSet<Key> = model.into_keys().collect();
        prop_assert_eq!(drained, want);
        prop_assert!(sut.is_empty());
    }
}

#[derive(Clone, Debug)]
enum MultiOp {
    Insert(u8, u16),
    Remove(u8),
    TakeOne(u8),
    Count(u8),
    Rehash(usize),
}

fn arb_multi_ops() -> impl Strategy<Value = Vec<MultiOp>> {
    let op = prop_oneof![
        4 => (0u8..6, any::<u16>()).prop_map(|(k, v)| MultiOp::Insert(k, v)),
        1 => (0u8..6).prop_map(MultiOp::Remove),
        1 => (0u8..6).prop_map(MultiOp::TakeOne),
        2 => (0u8..6).prop_map(MultiOp::Count),
        1 => (0usize..40).prop_map(MultiOp::Rehash),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: HashMultiMap keeps every value per key as a multiset, whether
// digests spread out (Murmur64) or all collide into one bucket.
// - `count` equals the model multiplicity; `get_all` yields the same values.
// - `remove` drops every entry for the key and reports how many.
// - `len == Σ bucket_size` after every op.
fn run_multimap<H: crate::hash::HashFn>(
    mut sut: HashMultiMap<u8, u16, H>,
    ops: Vec<MultiOp>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeMap<u8, Vec<u16>> = BTreeMap::new();
    for op in ops {
        match op {
            MultiOp::Insert(k, v) => {
                let pos = sut.insert(k, v);
                prop_assert_eq!(pos.bucket, sut.bucket(&k));
                model.entry(k).or_default().push(v);
            }
            MultiOp::Remove(k) => {
                let want = model.remove(&k).map_or(0, |vs| vs.len());
                prop_assert_eq!(sut.remove(&k), want);
            }
            MultiOp::TakeOne(k) => match sut.remove_entry(&k) {
                Some((kk, v)) => {
                    prop_assert_eq!(kk, k);
                    let vs = model.get_mut(&k).expect("model has key");
                    let at = vs.iter().position(|x| *x == v).expect("value in model");
                    vs.swap_remove(at);
                    if vs.is_empty() {
                        model.remove(&k);
                    }
                }
                None => prop_assert!(!model.contains_key(&k)),
            },
            MultiOp::Count(k) => {
                let want = model.get(&k).map_or(0, Vec::len);
                prop_assert_eq!(sut.count(&k), want);
                let mut got: Vec<u16> = sut.get_all(&k).copied().collect();
                got.sort_unstable();
                let mut expect = model.get(&k).cloned().unwrap_or_default();
                expect.sort_unstable();
                prop_assert_eq!(got, expect);
            }
            MultiOp::Rehash(n) => {
                sut.rehash(n).expect("small rehash succeeds");
            }
        }
        let total: usize = (0..sut.bucket_count()).map(|i| sut.bucket_size(i)).sum();
        prop_assert_eq!(total, sut.len());
        prop_assert_eq!(sut.len(), model.values().map(Vec::len).sum::<usize>());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_multimap_murmur(ops in arb_multi_ops()) {
        run_multimap(HashMultiMap::with_buckets(2), ops)?;
    }

    #[test]
    fn prop_multimap_all_collide(ops in arb_multi_ops()) {
        let collide = |_: &[u8], _: u64| 7u64;
        run_multimap(HashMultiMap::with_config(TableConfig::default(), collide), ops)?;
    }
}

// Property: a HashMultiSet's contents survive any sequence of rehashes and
// the traversal order is stable when nothing mutates.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_rehash_preserves_contents(
        items in proptest::collection::vec(0u32..50, 0..120),
        sizes in proptest::collection::vec(0usize..300, 1..6),
    ) {
        let mut bag: HashMultiSet<u32> =
            HashMultiSet::with_config(TableConfig::default().bucket_count(1).fixed_capacity(), Murmur64);
        bag.extend(items.iter().copied());
        let mut want = items.clone();
        want.sort_unstable();
        for n in sizes {
            bag.rehash(n).expect("rehash");
            prop_assert!(bag.bucket_count() >= n.max(1));
            let first: Vec<u32> = bag.iter().copied().collect();
            let second: Vec<u32> = bag.iter().copied().collect();
            prop_assert_eq!(&first, &second);
            let mut sorted = first;
            sorted.sort_unstable();
            prop_assert_eq!(&sorted, &want);
        }
    }
}
