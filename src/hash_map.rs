//! HashMap: unique-key map composed over `HashSet<Pair<K, V>>`.
//!
//! All table mechanics live in the set engine. This layer only wraps keys
//! and values into [`Pair`]s, lifts key equivalence to pairs, and unwraps
//! results.

use crate::config::TableConfig;
use crate::error::{InsertError, TryReserveError};
use crate::hash::{HashFn, Murmur64};
use crate::hash_set::HashSet;
use crate::iter;
use crate::pair::Pair;
use crate::table::Position;
use core::fmt;
use core::hash::Hash;
use hashbrown::Equivalent;

#[derive(Clone)]
pub struct HashMap<K, V, H = Murmur64> {
    set: HashSet<Pair<K, V>, H>,
}

impl<K, V> HashMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            set: HashSet::new(),
        }
    }

    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            set: HashSet::with_buckets(bucket_count),
        }
    }
}

impl<K, V> Default for HashMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Hash + Eq,
    H: HashFn,
{
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        Self {
            set: HashSet::with_config(config, hasher),
        }
    }

    pub fn try_with_config(config: TableConfig, hasher: H) -> Result<Self, TryReserveError> {
        HashSet::try_with_config(config, hasher).map(|set| Self { set })
    }

    /// Insert `key -> value` unless `key` is already present, in which case
    /// both are handed back and the map is unchanged.
    ///
    /// ```
    /// use chained_hash::HashMap;
    ///
    /// let mut m = HashMap::new();
    /// m.insert("a", 1).unwrap();
    /// assert!(m.insert("a", 2).is_err());
    /// assert_eq!(m.get("a"), Some(&1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Position, InsertError<(K, V)>> {
        self.set
            .insert(Pair::new(key, value))
            .map_err(|e| InsertError::DuplicateKey(e.into_inner().into_tuple()))
    }

    /// Insert or overwrite; returns the previous value for `key`.
    pub fn insert_or_replace(&mut self, key: K, value: V) -> Option<V> {
        if let Some(resident) = self.set.find_mut_by(&key, |p| p.key() == &key) {
            return Some(core::mem::replace(resident.value_mut(), value));
        }
        let _ = self.set.insert(Pair::new(key, value));
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set.find_by(q, |p| q.equivalent(p.key())).map(Pair::value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .find_by(q, |p| q.equivalent(p.key()))
            .map(Pair::as_refs)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .find_mut_by(q, |p| q.equivalent(p.key()))
            .map(Pair::value_mut)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(q).is_some()
    }

    pub fn find_position<Q>(&self, q: &Q) -> Option<Position>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set.position_by(q, |p| q.equivalent(p.key()))
    }

    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.set.bucket(q)
    }

    /// Drop the entry for `q`, if any; returns the number removed (0 or 1).
    pub fn remove<Q>(&mut self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        usize::from(self.remove_entry(q).is_some())
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .take_by(q, |p| q.equivalent(p.key()))
            .map(Pair::into_tuple)
    }

    pub fn rehash(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        self.set.rehash(min_buckets)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.set.reserve(additional)
    }
}

impl<K, V, H> HashMap<K, V, H> {
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.set.bucket_count()
    }

    pub fn bucket_size(&self, index: usize) -> usize {
        self.set.bucket_size(index)
    }

    pub fn load_factor(&self) -> f64 {
        self.set.load_factor()
    }

    pub fn seed(&self) -> u64 {
        self.set.seed()
    }

    pub fn get_at(&self, bucket: usize, offset: usize) -> Option<(&K, &V)> {
        self.set.get_at(bucket, offset).map(Pair::as_refs)
    }

    pub fn erase(&mut self, bucket: usize, offset: usize) -> Option<(K, V)> {
        self.set.erase(bucket, offset).map(Pair::into_tuple)
    }

    pub fn clear(&mut self) {
        self.set.clear()
    }

    pub fn drain(&mut self) -> Drain<K, V> {
        Drain {
            inner: self.set.drain(),
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.set.retain(|p| keep(p.key(), p.value()))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.set.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Mutable values in storage order (not bucket order).
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.set.values_mut().map(Pair::value_mut)
    }

    pub fn for_each(&self, mut visitor: impl FnMut(&K, &V)) {
        self.set.for_each(|p| visitor(p.key(), p.value()))
    }

    pub fn for_which(
        &self,
        mut predicate: impl FnMut(&K, &V) -> bool,
        mut visitor: impl FnMut(&K, &V),
    ) -> usize {
        self.set.for_which(
            |p| predicate(p.key(), p.value()),
            |p| visitor(p.key(), p.value()),
        )
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Hash + Eq,
    H: HashFn,
{
    /// Later values replace earlier ones for the same key.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert_or_replace(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> IntoIterator for HashMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = Drain<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.drain()
    }
}

/// Entries in traversal order. Shared by [`HashMap`] and
/// [`HashMultiMap`](crate::HashMultiMap).
pub struct Iter<'a, K, V> {
    pub(crate) inner: iter::Iter<'a, Pair<K, V>>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::as_refs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning iterator over removed entries.
pub struct Drain<K, V> {
    pub(crate) inner: iter::Drain<Pair<K, V>>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::into_tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<K, V> {}
