// HashMap integration suite.
//
// Invariants exercised:
// - Unique keys: a duplicate insert hands back the rejected pair.
// - Values are dropped exactly once across replace, remove, clear and drop.
// - Borrowed lookups (`&str` for `String`) reach owned keys.
// - Traversal is bucket-ordered and repeatable without mutation.
use chained_hash::{HashMap, InsertError, Murmur64, TableConfig};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use test_log::test;

struct DropCount(Rc<Cell<usize>>);

impl Drop for DropCount {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

// Test: prime bucket count and basic lookup on a map.
// Verifies: 10 requested -> 11 buckets; "a" found, "z" missing.
#[test]
fn scenario_a_on_a_map() {
    let mut m: HashMap<String, usize> = HashMap::with_buckets(10);
    assert_eq!(m.bucket_count(), 11);
    for (i, k) in ["a", "b", "c"].iter().enumerate() {
        m.insert(k.to_string(), i).unwrap();
    }
    assert_eq!(m.len(), 3);
    assert_eq!(m.get("a"), Some(&0));
    assert_eq!(m.get("z"), None);
    assert_eq!(m.get_key_value("c").map(|(k, v)| (k.as_str(), *v)), Some(("c", 2)));
}

// Test: duplicate key rejection keeps the resident value.
#[test]
fn duplicate_key_returns_pair() {
    let mut m = HashMap::new();
    m.insert("x", 1).unwrap();
    match m.insert("x", 2) {
        Err(InsertError::DuplicateKey(pair)) => assert_eq!(pair, ("x", 2)),
        Ok(_) => panic!("expected duplicate insert to error"),
    }
    assert_eq!(m.get(&"x"), Some(&1));
}

// Test: value drop accounting.
// Verifies: replaced values are returned (not dropped); removed and cleared
// values drop once; nothing is dropped twice on map drop.
#[test]
fn values_dropped_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let mut m: HashMap<u32, DropCount> = HashMap::new();
    for k in 0..20 {
        m.insert(k, DropCount(drops.clone())).ok().unwrap();
    }
    let old = m.insert_or_replace(0, DropCount(drops.clone()));
    assert!(old.is_some());
    assert_eq!(drops.get(), 0);
    drop(old);
    assert_eq!(drops.get(), 1);

    assert_eq!(m.remove(&5u32), 1);
    assert_eq!(drops.get(), 2);

    m.clear();
    assert_eq!(drops.get(), 21);
    m.insert(1, DropCount(drops.clone())).ok().unwrap();
    drop(m);
    assert_eq!(drops.get(), 22);
}

// Test: scenario E on a map: clear keeps the bucket array.
#[test]
fn scenario_e_clear_keeps_buckets() {
    let mut m: HashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    let buckets = m.bucket_count();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.bucket_count(), buckets);
    assert_eq!((0..buckets).map(|b| m.bucket_size(b)).sum::<usize>(), 0);
}

// Test: iteration order is bucket-major and repeatable.
#[test]
fn iteration_is_bucket_ordered() {
    let m: HashMap<u32, ()> = (0..64).map(|i| (i, ())).collect();
    let buckets: Vec<usize> = m.keys().map(|k| m.bucket(k)).collect();
    let mut sorted = buckets.clone();
    sorted.sort_unstable();
    assert_eq!(buckets, sorted);
    let again: Vec<usize> = m.keys().map(|k| m.bucket(k)).collect();
    assert_eq!(buckets, again);
}

// Test: a fixed-capacity map never grows; its load factor tracks len.
#[test]
fn fixed_capacity_does_not_grow() {
    let mut m = HashMap::with_config(
        TableConfig::default().bucket_count(5).fixed_capacity(),
        Murmur64,
    );
    for i in 0..50u32 {
        m.insert(i, i * 2).unwrap();
    }
    assert_eq!(m.bucket_count(), 5);
    assert!((m.load_factor() - 10.0).abs() < f64::EPSILON);
    let by_key: BTreeMap<u32, u32> = m.into_iter().collect();
    assert_eq!(by_key.len(), 50);
    assert_eq!(by_key[&7], 14);
}

// Test: `reserve` presizes so later inserts do not rehash.
#[test]
fn reserve_then_fill() {
    let mut m: HashMap<u64, u64> = HashMap::new();
    m.reserve(500).unwrap();
    let buckets = m.bucket_count();
    assert!(buckets >= 500);
    for i in 0..500 {
        m.insert(i, i).unwrap();
    }
    assert_eq!(m.bucket_count(), buckets);
}
