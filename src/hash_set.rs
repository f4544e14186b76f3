//! HashSet: unique-element engine over [`HashTable`].
//!
//! Inserting an element equal to a resident one is rejected and the new
//! element is handed back. Lookups accept any `Q: Hash + Equivalent<T>` whose
//! `Hash` output matches `T`'s for equivalent values (e.g. `&str` for
//! `String`).

use crate::config::TableConfig;
use crate::error::{InsertError, TryReserveError};
use crate::hash::{HashFn, Murmur64};
use crate::iter::{BucketIter, Drain, Iter};
use crate::table::{HashTable, Position};
use core::fmt;
use core::hash::Hash;
use hashbrown::Equivalent;

#[derive(Clone)]
pub struct HashSet<T, H = Murmur64> {
    table: HashTable<T, H>,
}

impl<T> HashSet<T>
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

impl<T> Default for HashSet<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> HashSet<T, H>
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

    /// Insert `value` unless an equal element is present.
    ///
    /// ```
    /// use chained_hash::{HashSet, InsertError};
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert("x").is_ok());
    /// assert_eq!(set.insert("x"), Err(InsertError::DuplicateKey("x")));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<Position, InsertError<T>> {
        let hash = self.table.hash_key(&value);
        self.table.insert_unique(hash, value, |new, old| new == old)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.get(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.find_by(q, |v| q.equivalent(v))
    }

    /// `0` or `1`.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        usize::from(self.contains(q))
    }

    pub fn find_position<Q>(&self, q: &Q) -> Option<Position>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.position_by(q, |v| q.equivalent(v))
    }

    /// Bucket index `q` hashes to.
    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.table.bucket(self.table.hash_key(q))
    }

    /// Drop the element equal to `q`, if any. Returns the number removed.
    pub fn remove<Q>(&mut self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        usize::from(self.take(q).is_some())
    }

    /// Remove and return the element equal to `q`.
    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.take_by(q, |v| q.equivalent(v))
    }

    pub fn rehash(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        self.table.rehash(min_buckets)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.reserve(additional)
    }

    // Lifted-equality entry points. `q` supplies the digest, `eq` decides
    // matches; the map layer uses these to compare only the key of a pair.

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

    pub(crate) fn take_by<Q>(&mut self, q: &Q, eq: impl Fn(&T) -> bool) -> Option<T>
    where
        Q: ?Sized + Hash,
    {
        let hash = self.table.hash_key(q);
        self.table.remove_one(hash, eq)
    }
}

impl<T, H> HashSet<T, H> {
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

    /// Remove the element at `offset` in bucket `bucket`; `None` (and no
    /// change) for an out-of-range index or offset.
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

impl<T: fmt::Debug, H> fmt::Debug for HashSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, H> Extend<T> for HashSet<T, H>
where
    T: Hash + Eq,
    H: HashFn,
{
    /// Elements equal to a resident one are dropped.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for HashSet<T>
where
    T: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T, H> IntoIterator for &'a HashSet<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> IntoIterator for HashSet<T, H> {
    type Item = T;
    type IntoIter = Drain<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.table.drain()
    }
}
