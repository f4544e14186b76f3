//! HashMultiSet: duplicate-permitting engine over [`HashTable`].
//!
//! Inserts never scan the chain. `remove` drops every equal element and
//! `count` reports the exact multiplicity.

use crate::config::TableConfig;
use crate::error::TryReserveError;
use crate::hash::{HashFn, Murmur64};
use crate::iter::{BucketIter, Drain, Iter};
use crate::table::{HashTable, Position};
use core::fmt;
use core::hash::Hash;
use hashbrown::Equivalent;

#[derive(Clone)]
pub struct HashMultiSet<T, H = Murmur64> {
    table: HashTable<T, H>,
}

impl<T> HashMultiSet<T>
where
    T: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            table: HashTable::with_buckets(bucket_count),
        }
    }
}

impl<T> Default for HashMultiSet<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> HashMultiSet<T, H>
where
    T: Hash + Eq,
    H: HashFn,
{
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        Self {
            table: HashTable::with_config(config, hasher),
        }
    }

    pub fn try_with_config(config: TableConfig, hasher: H) -> Result<Self, TryReserveError> {
        HashTable::try_with_config(config, hasher).map(|table| Self { table })
    }

    /// Insert `value` at the front of its bucket, even if equal elements
    /// are already present.
    pub fn insert(&mut self, value: T) -> Position {
        let hash = self.table.hash_key(&value);
        self.table.insert_multi(hash, value)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.get(q).is_some()
    }

    /// First equal element in chain order.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.find_by(q, |v| q.equivalent(v))
    }

    /// Every equal element in chain order.
    pub fn get_all<'a, Q>(&'a self, q: &'a Q) -> impl Iterator<Item = &'a T> + 'a
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.find_all_by(q, move |v| q.equivalent(v))
    }

    /// Exact multiplicity of `q`.
    ///
    /// ```
    /// use chained_hash::HashMultiSet;
    ///
    /// let mut bag = HashMultiSet::new();
    /// for _ in 0..3 {
    ///     bag.insert("x");
    /// }
    /// assert_eq!(bag.count(&"x"), 3);
    /// assert_eq!(bag.remove(&"x"), 3);
    /// assert!(bag.is_empty());
    /// ```
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.count_by(q, |v| q.equivalent(v))
    }

    /// Position of the first equal element.
    pub fn find_position<Q>(&self, q: &Q) -> Option<Position>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = self.table.hash_key(q);
        self.table.find_position(hash, |v| q.equivalent(v))
    }

    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.table.bucket(self.table.hash_key(q))
    }

    /// Drop every element equal to `q`; returns how many were removed.
    pub fn remove<Q>(&mut self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.remove_by(q, |v| q.equivalent(v))
    }

    /// Remove and return the first element equal to `q`.
    pub fn take_one<Q>(&mut self, q: &Q) -> Option<T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = self.table.hash_key(q);
        self.table.remove_one(hash, |v| q.equivalent(v))
    }

    /// Remove and return every element equal to `q`, in chain order.
    pub fn take_all<Q>(&mut self, q: &Q) -> Vec<T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.take_all_by(q, |v| q.equivalent(v))
    }

    pub fn rehash(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        self.table.rehash(min_buckets)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.reserve(additional)
    }

    // Lifted-equality entry points for the multimap layer.

    pub(crate) fn find_by<Q>(&self, q: &Q, eq: impl Fn(&T) -> bool) -> Option<&T>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.find(hash, eq)
    }

    pub(crate) fn find_mut_by<Q>(&mut self, q: &Q, eq: impl Fn(&T) -> bool) -> Option<&mut T>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.find_mut(hash, eq)
    }

    pub(crate) fn position_by<Q>(&self, q: &Q, eq: impl Fn(&T) -> bool) -> Option<Position>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.find_position(hash, eq)
    }

    pub(crate) fn take_one_by<Q>(&mut self, q: &Q, eq: impl Fn(&T) -> bool) -> Option<T>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.remove_one(hash, eq)
    }

    pub(crate) fn find_all_by<'a, Q, F>(&'a self, q: &Q, eq: F) -> impl Iterator<Item = &'a T> + 'a
    where
        Q: ?Sized + Hash,
        F: Fn(&T) -> bool + 'a,
    {
        let hash = self.table.hash_key(q);
        self.table.find_all(hash, eq)
    }

    pub(crate) fn count_by<Q>(&self, q: &Q, eq: impl Fn(&T) -> bool) -> usize
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.count(hash, eq)
    }

    pub(crate) fn remove_by<Q>(&mut self, q: &Q, eq: impl Fn(&T) -> bool) -> usize
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.remove_all(hash, eq)
    }

    pub(crate) fn take_all_by<Q>(&mut self, q: &Q, eq: impl Fn(&T) -> bool) -> Vec<T>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.take_all(hash, eq)
    }
}

impl<T, H> HashMultiSet<T, H> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn bucket_size(&self, index: usize) -> usize {
        self.table.bucket_size(index)
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn seed(&self) -> u64 {
        self.table.seed()
    }

    pub fn hasher(&self) -> &H {
        self.table.hasher()
    }

    pub fn get_at(&self, bucket: usize, offset: usize) -> Option<&T> {
        self.table.get_at(bucket, offset)
    }

    pub fn erase(&mut self, bucket: usize, offset: usize) -> Option<T> {
        self.table.erase(bucket, offset)
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn drain(&mut self) -> Drain<T> {
        self.table.drain()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.table.retain(keep)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }

    pub fn iter_bucket(&self, index: usize) -> BucketIter<'_, T> {
        self.table.iter_bucket(index)
    }

    pub fn for_each(&self, visitor: impl FnMut(&T)) {
        self.table.for_each(visitor)
    }

    pub fn for_which(&self, predicate: impl FnMut(&T) -> bool, visitor: impl FnMut(&T)) -> usize {
        self.table.for_which(predicate, visitor)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.table.iter_mut()
    }
}

impl<T: fmt::Debug, H> fmt::Debug for HashMultiSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, H> Extend<T> for HashMultiSet<T, H>
where
    T: Hash + Eq,
    H: HashFn,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for HashMultiSet<T>
where
    T: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<'a, T, H> IntoIterator for &'a HashMultiSet<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> IntoIterator for HashMultiSet<T, H> {
    type Item = T;
    type IntoIter = Drain<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.table.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: inserting a key n times then removing it once removes n.
    #[test]
    fn multiplicity_round_trip() {
        let mut m: HashMultiSet<String> = HashMultiSet::new();
        for n in 1..=4 {
            m.insert("k".to_string());
            assert_eq!(m.count("k"), n);
        }
        m.insert("other".to_string());
        assert_eq!(m.get_all("k").count(), 4);
        assert_eq!(m.remove("k"), 4);
        assert_eq!(m.count("k"), 0);
        assert_eq!(m.len(), 1);
    }

    /// Invariant: repeated inserts of one value all land in the same bucket,
    /// front-first.
    #[test]
    fn duplicates_share_a_bucket() {
        let mut m: HashMultiSet<u32> = HashMultiSet::with_buckets(13);
        let first = m.insert(5);
        let second = m.insert(5);
        assert_eq!(first.bucket, second.bucket);
        assert_eq!(second.offset, 0);
        assert_eq!(m.bucket_size(first.bucket), 2);
    }

    #[test]
    fn take_one_and_take_all() {
        let key: (u8, u8) = (1, 0);
        let mut m: HashMultiSet<(u8, u8)> = HashMultiSet::new();
        m.extend([key, key, (2, 0)]);
        assert_eq!(m.take_one(&key), Some(key));
        assert_eq!(m.count(&key), 1);
        m.insert(key);
        assert_eq!(m.take_all(&key), vec![key, key]);
        assert!(m.take_all(&key).is_empty());
        assert_eq!(m.len(), 1);
    }
}
