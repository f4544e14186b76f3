// HashMultiSet integration suite.
//
// Invariants exercised:
// - Multiplicity: count reports every equal element; remove drops them all.
// - Equal elements share one bucket.
// - Collisions: distinct elements with equal digests stay distinct.
use chained_hash::{HashMultiSet, TableConfig};
use test_log::test;

// Test: duplicates are kept and removed together.
// Verifies: count == 3 after three inserts; remove returns 3; empty after.
#[test]
fn scenario_c_multiplicity() {
    let mut bag: HashMultiSet<String> = HashMultiSet::new();
    for _ in 0..3 {
        bag.insert("x".to_string());
    }
    assert_eq!(bag.count("x"), 3);
    assert_eq!(bag.remove("x"), 3);
    assert_eq!(bag.len(), 0);
}

// Test: every element hashes to the same digest.
// Assumes: a constant hash function.
// Verifies: one occupied bucket; counts and removals still separate values.
#[test]
fn constant_hash_keeps_values_apart() {
    let constant = |_: &[u8], _: u64| 42u64;
    let mut bag = HashMultiSet::with_config(TableConfig::default().bucket_count(5), constant);
    for k in ["a", "b", "a", "c", "a"] {
        bag.insert(k);
    }
    let occupied = (0..bag.bucket_count()).filter(|&b| bag.bucket_size(b) > 0).count();
    assert_eq!(occupied, 1);
    assert_eq!(bag.count(&"a"), 3);
    assert_eq!(bag.count(&"b"), 1);
    assert_eq!(bag.remove(&"a"), 3);
    assert_eq!(bag.len(), 2);
    assert!(bag.contains(&"c"));
}

// Test: for_which visits only matching elements and reports how many.
#[test]
fn for_which_counts_visits() {
    let bag: HashMultiSet<u32> = [1u32, 2, 2, 3, 3, 3].into_iter().collect();
    let mut total = 0;
    let visited = bag.for_which(|v| *v >= 2, |v| total += *v);
    assert_eq!(visited, 5);
    assert_eq!(total, 2 + 2 + 3 + 3 + 3);
}

// Test: explicit rehash keeps every duplicate and the bucket count prime.
#[test]
fn rehash_keeps_duplicates() {
    let mut bag: HashMultiSet<u16> = HashMultiSet::with_buckets(3);
    for i in 0..60u16 {
        bag.insert(i % 7);
    }
    bag.rehash(100).unwrap();
    assert_eq!(bag.bucket_count(), 101);
    for k in 0..7u16 {
        assert_eq!(bag.count(&k), if k < 4 { 9 } else { 8 });
    }
    assert_eq!(bag.len(), 60);
}
