//! HashTable: the separate-chaining engine behind every set and map flavor.
//!
//! The table is addressed by digest. Callers compute a digest with
//! [`HashTable::hash_key`] and pass it together with an equality closure;
//! the table picks `digest % bucket_count` and walks that bucket's chain.
//! Unique and multi variants share this engine and differ only in which
//! insert and remove entry points they use.
//!
//! Invariants
//! - `len() == Σ bucket_size(i)` at every method boundary.
//! - Each node stores the digest it was inserted under. Bucket indices are
//!   always derived from the stored digest, so growth never calls back into
//!   `Hash` or `Eq`.
//! - An element's bucket is fixed between rehashes; its offset within the
//!   bucket is not stable across unrelated inserts and erases.

use crate::chain::{Chain, Node, Nodes};
use crate::config::{TableConfig, DEFAULT_MAX_LOAD_FACTOR};
use crate::error::{InsertError, TryReserveError};
use crate::hash::{ByteSink, HashFn, Murmur64};
use crate::iter::{BucketIter, Drain, Iter};
use crate::prime::next_prime;
use crate::reentrancy::DebugReentrancy;
use core::fmt;
use core::hash::Hash;
use slotmap::DefaultKey;

/// Where an element currently sits: bucket index and offset within the
/// bucket's chain (0 = front).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub bucket: usize,
    pub offset: usize,
}

/// Digest-addressed chaining table.
///
/// Resident elements are only reachable by shared reference from outside
/// the crate, so a key cannot be rewritten in place:
///
/// ```compile_fail
/// use chained_hash::HashTable;
///
/// let mut t: HashTable<String> = HashTable::new();
/// let h = t.hash_key("a");
/// t.insert_unique(h, "a".to_string(), |x, y| x == y).unwrap();
/// if let Some(k) = t.find_mut(h, |v| v == "a") {
///     *k = "b".to_string();
/// }
/// ```
///
/// ```compile_fail
/// use chained_hash::HashTable;
///
/// let mut t: HashTable<String> = HashTable::new();
/// for k in t.iter_mut() {
///     k.push('!');
/// }
/// ```
#[derive(Clone)]
pub struct HashTable<T, H = Murmur64> {
    hasher: H,
    seed: u64,
    max_load_factor: Option<f64>,
    buckets: Vec<Chain>,
    nodes: Nodes<T>, // every chain's nodes, keyed by generational key
    reentrancy: DebugReentrancy,
}

impl<T> HashTable<T> {
    /// Table with the default configuration and [`Murmur64`].
    pub fn new() -> Self {
        Self::with_config(TableConfig::default(), Murmur64)
    }

    /// Table with at least `bucket_count` buckets (rounded up to a prime).
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self::with_config(TableConfig::default().bucket_count(bucket_count), Murmur64)
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: HashFn> HashTable<T, H> {
    /// Build a table, panicking on allocation failure the way `Vec` does.
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        infallible(Self::try_with_config(config, hasher))
    }

    /// Build a table, reporting bucket-array allocation failure.
    pub fn try_with_config(config: TableConfig, hasher: H) -> Result<Self, TryReserveError> {
        let requested = config.requested_buckets();
        let count = next_prime(requested.max(1)).ok_or(TryReserveError::CapacityOverflow)?;
        let buckets = alloc_buckets(count)?;
        log::debug!(
            "hash table created: requested {} buckets, using {} (seed {:#x})",
            requested,
            count,
            config.seed_value()
        );
        Ok(Self {
            hasher,
            seed: config.seed_value(),
            max_load_factor: config.max_load(),
            buckets,
            nodes: Nodes::with_key(),
            reentrancy: DebugReentrancy::new(),
        })
    }

    /// Digest of `key` under this table's hash function and seed.
    ///
    /// The key's `Hash` impl is replayed into a byte buffer, which is then
    /// digested as one span.
    pub fn hash_key<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        let _g = self.reentrancy.enter("hash_key");
        let sink = ByteSink::of(key);
        self.hasher.hash_bytes(sink.as_bytes(), self.seed)
    }
}

impl<T, H> HashTable<T, H> {
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Chain length of bucket `index`; `0` when `index` is out of range.
    pub fn bucket_size(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Chain::len)
    }

    /// Bucket index a digest maps to.
    #[inline]
    pub fn bucket(&self, hash: u64) -> usize {
        index_for(hash, self.buckets.len())
    }

    /// `len / bucket_count`, recomputed on every call.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Growth threshold, or `None` for a fixed-capacity table.
    pub fn max_load_factor(&self) -> Option<f64> {
        self.max_load_factor
    }

    /// Insert unless an element equal under `eq(new, resident)` is present.
    ///
    /// On a duplicate the value is handed back and nothing changes.
    pub fn insert_unique(
        &mut self,
        hash: u64,
        value: T,
        eq: impl Fn(&T, &T) -> bool,
    ) -> Result<Position, InsertError<T>> {
        let b = self.bucket(hash);
        {
            let _g = self.reentrancy.enter("insert_unique");
            let dup = self.buckets[b]
                .find(&self.nodes, |n| n.hash == hash && eq(&value, &n.value))
                .is_some();
            if dup {
                return Err(InsertError::DuplicateKey(value));
            }
        }
        let key = self.buckets[b].push_front(&mut self.nodes, value, hash);
        Ok(self.after_push(key, b, hash))
    }

    /// Insert without checking for equal elements.
    pub fn insert_multi(&mut self, hash: u64, value: T) -> Position {
        let b = self.bucket(hash);
        let key = self.buckets[b].push_front(&mut self.nodes, value, hash);
        self.after_push(key, b, hash)
    }

    /// First element in the digest's bucket for which `eq` holds.
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let _g = self.reentrancy.enter("find");
        self.probe(hash, &eq)
            .and_then(|(_, k)| self.nodes.get(k))
            .map(|n| &n.value)
    }

    /// Mutable access to the first match. The caller must not change
    /// anything that feeds the element's hash or equality.
    pub(crate) fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let key = {
            let _g = self.reentrancy.enter("find_mut");
            self.probe(hash, &eq).map(|(_, k)| k)
        }?;
        self.nodes.get_mut(key).map(|n| &mut n.value)
    }

    pub fn find_position(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<Position> {
        let _g = self.reentrancy.enter("find_position");
        self.probe(hash, &eq).map(|(offset, _)| Position {
            bucket: self.bucket(hash),
            offset,
        })
    }

    /// Number of resident elements matching `eq`.
    pub fn count(&self, hash: u64, eq: impl Fn(&T) -> bool) -> usize {
        let _g = self.reentrancy.enter("count");
        self.buckets[self.bucket(hash)]
            .iter(&self.nodes)
            .filter(|(_, n)| n.hash == hash && eq(&n.value))
            .count()
    }

    /// Every resident element matching `eq`, in chain order.
    ///
    /// Lazily evaluated, so it is not reentrancy-guarded.
    pub fn find_all<'a, F>(&'a self, hash: u64, eq: F) -> impl Iterator<Item = &'a T> + 'a
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.buckets[self.bucket(hash)]
            .iter(&self.nodes)
            .filter(move |(_, n)| n.hash == hash && eq(&n.value))
            .map(|(_, n)| &n.value)
    }

    /// Element at `offset` in bucket `bucket`.
    pub fn get_at(&self, bucket: usize, offset: usize) -> Option<&T> {
        self.buckets.get(bucket)?.get(&self.nodes, offset)
    }

    /// Remove the element at `offset` in bucket `bucket`.
    ///
    /// Out-of-range indices return `None` and leave the table untouched.
    pub fn erase(&mut self, bucket: usize, offset: usize) -> Option<T> {
        self.buckets
            .get_mut(bucket)?
            .erase_at(&mut self.nodes, offset)
    }

    /// Remove and return the first match.
    pub fn remove_one(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        let b = self.bucket(hash);
        let _g = self.reentrancy.enter("remove_one");
        self.buckets[b].remove_first(&mut self.nodes, |n| n.hash == hash && eq(&n.value))
    }

    /// Drop every match; returns how many were removed.
    pub fn remove_all(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> usize {
        let b = self.bucket(hash);
        let _g = self.reentrancy.enter("remove_all");
        self.buckets[b].remove_all(&mut self.nodes, |n| n.hash == hash && eq(&n.value), drop)
    }

    /// Remove every match and hand them back in chain order.
    pub fn take_all(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Vec<T> {
        let b = self.bucket(hash);
        let mut taken = Vec::new();
        let _g = self.reentrancy.enter("take_all");
        self.buckets[b].remove_all(
            &mut self.nodes,
            |n| n.hash == hash && eq(&n.value),
            |v| taken.push(v),
        );
        taken
    }

    /// Keep only the elements for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let _g = self.reentrancy.enter("retain");
        for chain in &mut self.buckets {
            chain.remove_all(&mut self.nodes, |n| !keep(&n.value), drop);
        }
    }

    /// Drop every element. The bucket count is unchanged.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear(&mut self.nodes);
        }
        debug_assert!(self.nodes.is_empty());
        self.nodes.clear();
    }

    /// Remove every element, yielding them in bucket order.
    pub fn drain(&mut self) -> Drain<T> {
        let mut out = Vec::with_capacity(self.len());
        for chain in &mut self.buckets {
            let mut cur = chain.detach();
            while let Some(k) = cur {
                cur = Chain::next_of(&self.nodes, k);
                if let Some(node) = self.nodes.remove(k) {
                    out.push(node.value);
                }
            }
        }
        Drain::new(out)
    }

    /// Bucket-ordered traversal; chain order within a bucket.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.buckets, &self.nodes)
    }

    /// The chain of bucket `index`, front to back. Empty when out of range.
    pub fn iter_bucket(&self, index: usize) -> BucketIter<'_, T> {
        BucketIter::new(self.buckets.get(index).map(|c| c.iter(&self.nodes)))
    }

    /// Mutable access to every element in storage order (not bucket order).
    /// The caller must not change anything that feeds hash or equality.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.nodes.values_mut().map(|n| &mut n.value)
    }

    /// Rebucket to the smallest prime `>= max(min_buckets, len / max_load_factor, 1)`.
    ///
    /// Elements are re-linked by stored digest; no element is moved, dropped
    /// or re-hashed. On error the table is unchanged.
    pub fn rehash(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        let needed = self
            .max_load_factor
            .map_or(1, |f| buckets_for(self.len(), f));
        self.rehash_to(min_buckets.max(needed))
    }

    /// Grow so that `len + additional` elements fit under the load-factor
    /// threshold (1.0 for fixed-capacity tables).
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let factor = self.max_load_factor.unwrap_or(DEFAULT_MAX_LOAD_FACTOR);
        let wanted = self
            .len()
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let needed = buckets_for(wanted, factor);
        if needed > self.bucket_count() {
            self.rehash_to(needed)
        } else {
            Ok(())
        }
    }

    fn rehash_to(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        let count = next_prime(min_buckets.max(1)).ok_or(TryReserveError::CapacityOverflow)?;
        if count == self.buckets.len() {
            return Ok(());
        }
        let mut buckets = alloc_buckets(count)?;
        for chain in &mut self.buckets {
            // Front-linking re-reverses, so equal elements keep their order.
            chain.reverse(&mut self.nodes);
            let mut cur = chain.detach();
            while let Some(k) = cur {
                cur = Chain::next_of(&self.nodes, k);
                if let Some(hash) = self.nodes.get(k).map(|n| n.hash) {
                    buckets[index_for(hash, count)].link_front(&mut self.nodes, k);
                }
            }
        }
        log::debug!(
            "hash table rehashed: {} -> {} buckets, {} elements",
            self.buckets.len(),
            count,
            self.len()
        );
        self.buckets = buckets;
        Ok(())
    }

    fn after_push(&mut self, key: DefaultKey, bucket: usize, hash: u64) -> Position {
        if !self.grow_if_needed() {
            return Position { bucket, offset: 0 };
        }
        let bucket = self.bucket(hash);
        let offset = self.buckets[bucket]
            .iter(&self.nodes)
            .position(|(k, _)| k == key)
            .unwrap_or(0);
        Position { bucket, offset }
    }

    /// Returns `true` if the table was rebucketed.
    fn grow_if_needed(&mut self) -> bool {
        let Some(factor) = self.max_load_factor else {
            return false;
        };
        if self.load_factor() <= factor {
            return false;
        }
        let doubled = self.bucket_count().saturating_mul(2).saturating_add(1);
        let target = doubled.max(buckets_for(self.len(), factor));
        match self.rehash_to(target) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "hash table growth to {} buckets skipped: {}; load factor now {:.2}",
                    target,
                    e,
                    self.load_factor()
                );
                false
            }
        }
    }

    fn probe(&self, hash: u64, eq: &impl Fn(&T) -> bool) -> Option<(usize, DefaultKey)> {
        self.buckets[self.bucket(hash)].find(&self.nodes, |n: &Node<T>| {
            n.hash == hash && eq(&n.value)
        })
    }
}

impl<T: fmt::Debug, H> fmt::Debug for HashTable<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, H> IntoIterator for &'a HashTable<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[inline]
fn index_for(hash: u64, bucket_count: usize) -> usize {
    (hash % bucket_count as u64) as usize
}

fn buckets_for(len: usize, max_load_factor: f64) -> usize {
    ((len as f64) / max_load_factor).ceil() as usize
}

fn alloc_buckets(count: usize) -> Result<Vec<Chain>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(count)
        .map_err(|e| TryReserveError::for_array::<Chain>(e, count))?;
    buckets.resize(count, Chain::new());
    Ok(buckets)
}

fn infallible<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(TryReserveError::CapacityOverflow) => panic!("Hash table capacity overflow"),
        Err(TryReserveError::AllocError { layout }) => std::alloc::handle_alloc_error(layout),
    }
}
