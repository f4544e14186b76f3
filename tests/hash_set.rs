// HashSet integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Bucket counts are prime and at least the requested count.
// - Uniqueness: a duplicate insert is rejected and the set is unchanged.
// - Ownership: every element is dropped exactly once, whether by clear,
//   remove, erase or dropping the set.
// - Size: len equals the sum of bucket sizes.
use chained_hash::{HashSet, InsertError, TableConfig, DEFAULT_SEED};
use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use test_log::test;

// Element that counts its drops through a shared counter. Identity is `id`.
struct Tracked {
    id: u32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            id,
            drops: drops.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tracked {}

impl Hash for Tracked {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

// Test: construction rounds the bucket request up to a prime.
// Assumes: requested 10 buckets.
// Verifies: 11 buckets; unique inserts counted; hits and misses.
#[test]
fn scenario_a_prime_buckets_and_lookup() {
    let mut s: HashSet<String> = HashSet::with_buckets(10);
    assert_eq!(s.bucket_count(), 11);
    for k in ["a", "b", "c"] {
        s.insert(k.to_string()).unwrap();
    }
    assert_eq!(s.len(), 3);
    assert!(s.get("a").is_some());
    assert!(s.get("z").is_none());
}

// Test: unique policy.
// Verifies: second insert of "x" fails and hands "x" back; len stays 1.
#[test]
fn scenario_b_duplicate_rejected() {
    let mut s = HashSet::new();
    assert!(s.insert("x").is_ok());
    assert_eq!(s.insert("x"), Err(InsertError::DuplicateKey("x")));
    assert_eq!(s.len(), 1);
}

// Test: erase at a position in an empty bucket.
// Assumes: a fixed table of 11 buckets with no element in bucket 7.
// Verifies: erase fails and nothing changes.
#[test]
fn scenario_d_erase_in_empty_bucket() {
    let mut s: HashSet<u32> = HashSet::with_config(
        TableConfig::default().bucket_count(11).fixed_capacity(),
        chained_hash::Murmur64,
    );
    let mut n = 0u32;
    while s.len() < 5 {
        if s.bucket(&n) != 7 {
            s.insert(n).unwrap();
        }
        n += 1;
    }
    assert_eq!(s.bucket_size(7), 0);
    assert_eq!(s.erase(7, 0), None);
    assert_eq!(s.len(), 5);
}

// Test: clear drops each element exactly once and keeps the bucket array.
// Verifies: len 0, bucket count unchanged, N drops, elements spread over
// several buckets beforehand.
#[test]
fn scenario_e_clear_drops_each_once() {
    let drops = Rc::new(Cell::new(0));
    let mut s: HashSet<Tracked> = HashSet::with_buckets(7);
    for id in 0..40 {
        s.insert(Tracked::new(id, &drops)).ok().unwrap();
    }
    let occupied = (0..s.bucket_count()).filter(|&b| s.bucket_size(b) > 0).count();
    assert!(occupied > 1);
    let buckets = s.bucket_count();
    s.clear();
    assert_eq!(s.len(), 0);
    assert_eq!(s.bucket_count(), buckets);
    assert_eq!(drops.get(), 40);
}

// Test: a rejected duplicate is returned, not dropped by the set; removal
// and set drop account for the rest.
#[test]
fn every_element_dropped_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut s: HashSet<Tracked> = HashSet::new();
        for id in 0..10 {
            s.insert(Tracked::new(id, &drops)).ok().unwrap();
        }
        let rejected = s.insert(Tracked::new(3, &drops));
        assert_eq!(drops.get(), 0);
        drop(rejected);
        assert_eq!(drops.get(), 1);

        assert_eq!(s.remove(&Tracked::new(4, &drops)), 1);
        // The probe and the removed element.
        assert_eq!(drops.get(), 3);
    }
    assert_eq!(drops.get(), 3 + 9);
}

// Test: growth keeps every element reachable and bucket counts prime.
#[test]
fn growth_keeps_elements() {
    let mut s: HashSet<u64> = HashSet::with_buckets(2);
    for i in 0..1_000u64 {
        s.insert(i).unwrap();
    }
    assert!(s.load_factor() <= 1.0);
    assert!(chained_hash::prime::is_prime(s.bucket_count()));
    assert!((0..1_000u64).all(|i| s.contains(&i)));
    let total: usize = (0..s.bucket_count()).map(|b| s.bucket_size(b)).sum();
    assert_eq!(total, 1_000);
}

// Test: the seed changes bucket placement but not membership.
#[test]
fn seed_changes_placement_only() {
    let a: HashSet<u32, _> = {
        let mut s = HashSet::with_config(
            TableConfig::default().bucket_count(101).seed(1).fixed_capacity(),
            chained_hash::Murmur64,
        );
        s.extend(0..50u32);
        s
    };
    let b: HashSet<u32, _> = {
        let mut s = HashSet::with_config(
            TableConfig::default().bucket_count(101).seed(2).fixed_capacity(),
            chained_hash::Murmur64,
        );
        s.extend(0..50u32);
        s
    };
    assert_eq!(a.seed(), 1);
    assert_ne!(a.seed(), DEFAULT_SEED);
    assert!((0..50u32).any(|k| a.bucket(&k) != b.bucket(&k)));
    assert!((0..50u32).all(|k| a.contains(&k) && b.contains(&k)));
}
