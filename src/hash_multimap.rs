//! HashMultiMap: duplicate-key map composed over `HashMultiSet<Pair<K, V>>`.

use crate::config::TableConfig;
use crate::error::TryReserveError;
use crate::hash::{HashFn, Murmur64};
use crate::hash_map::{Drain, Iter, Keys, Values};
use crate::hash_multiset::HashMultiSet;
use crate::pair::Pair;
use crate::table::Position;
use core::fmt;
use core::hash::Hash;
use hashbrown::Equivalent;

#[derive(Clone)]
pub struct HashMultiMap<K, V, H = Murmur64> {
    set: HashMultiSet<Pair<K, V>, H>,
}

impl<K, V> HashMultiMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            set: HashMultiSet::new(),
        }
    }

    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            set: HashMultiSet::with_buckets(bucket_count),
        }
    }
}

impl<K, V> Default for HashMultiMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> HashMultiMap<K, V, H>
where
    K: Hash + Eq,
    H: HashFn,
{
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        Self {
            set: HashMultiSet::with_config(config, hasher),
        }
    }

    pub fn try_with_config(config: TableConfig, hasher: H) -> Result<Self, TryReserveError> {
        HashMultiSet::try_with_config(config, hasher).map(|set| Self { set })
    }

    /// Add `key -> value` alongside any existing entries for `key`.
    ///
    /// ```
    /// use chained_hash::HashMultiMap;
    ///
    /// let mut m = HashMultiMap::new();
    /// m.insert("tag", 1);
    /// m.insert("tag", 2);
    /// assert_eq!(m.count("tag"), 2);
    /// let mut vals: Vec<i32> = m.get_all("tag").copied().collect();
    /// vals.sort();
    /// assert_eq!(vals, [1, 2]);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Position {
        self.set.insert(Pair::new(key, value))
    }

    /// Value of the first entry for `q` in chain order, which is the most
    /// recently inserted one. Rehashing keeps equal keys in insertion order.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set.find_by(q, |p| q.equivalent(p.key())).map(Pair::value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .find_mut_by(q, |p| q.equivalent(p.key()))
            .map(Pair::value_mut)
    }

    pub fn get_all<'a, Q>(&'a self, q: &'a Q) -> impl Iterator<Item = &'a V> + 'a
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .find_all_by(q, move |p| q.equivalent(p.key()))
            .map(Pair::value)
    }

    pub fn count<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set.count_by(q, |p| q.equivalent(p.key()))
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

    /// Drop every entry for `q`; returns how many were removed.
    pub fn remove<Q>(&mut self, q: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set.remove_by(q, |p| q.equivalent(p.key()))
    }

    /// Remove and return the first entry for `q`.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .take_one_by(q, |p| q.equivalent(p.key()))
            .map(Pair::into_tuple)
    }

    /// Remove and return every entry for `q`, in chain order.
    pub fn take_all<Q>(&mut self, q: &Q) -> Vec<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.set
            .take_all_by(q, |p| q.equivalent(p.key()))
            .into_iter()
            .map(Pair::into_tuple)
            .collect()
    }

    pub fn rehash(&mut self, min_buckets: usize) -> Result<(), TryReserveError> {
        self.set.rehash(min_buckets)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.set.reserve(additional)
    }
}

impl<K, V, H> HashMultiMap<K, V, H> {
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

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashMultiMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V, H> Extend<(K, V)> for HashMultiMap<K, V, H>
where
    K: Hash + Eq,
    H: HashFn,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashMultiMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMultiMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> IntoIterator for HashMultiMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = Drain<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: every value inserted under a key is retrievable and
    /// `remove` drops them all at once.
    #[test]
    fn all_values_kept_and_removed_together() {
        let mut m: HashMultiMap<String, u32> = HashMultiMap::new();
        for v in 0..5 {
            m.insert("k".to_string(), v);
        }
        m.insert("j".to_string(), 99);
        let mut vals: Vec<u32> = m.get_all("k").copied().collect();
        vals.sort_unstable();
        assert_eq!(vals, vec![0, 1, 2, 3, 4]);
        assert_eq!(m.count("k"), 5);
        assert_eq!(m.remove("k"), 5);
        assert!(!m.contains_key("k"));
        assert_eq!(m.get("j"), Some(&99));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: `get` sees the newest entry for a key.
    #[test]
    fn get_returns_front_of_chain() {
        let mut m: HashMultiMap<u8, &str> =
            HashMultiMap::with_config(TableConfig::default().fixed_capacity(), Murmur64);
        m.insert(1, "old");
        m.insert(1, "new");
        assert_eq!(m.get(&1u8), Some(&"new"));
        *m.get_mut(&1u8).unwrap() = "newer";
        assert_eq!(m.get(&1u8), Some(&"newer"));
    }

    /// Invariant: automatic growth keeps entries for one key newest-first.
    #[test]
    fn growth_keeps_newest_first() {
        let mut m: HashMultiMap<u8, u32> = HashMultiMap::with_buckets(2);
        let start = m.bucket_count();
        for v in 0..40u32 {
            m.insert(1, v);
            m.insert(2, v);
            assert_eq!(m.get(&1u8), Some(&v));
        }
        assert!(m.bucket_count() > start);
        let all: Vec<u32> = m.get_all(&2u8).copied().collect();
        assert_eq!(all, (0..40u32).rev().collect::<Vec<_>>());
    }

    #[test]
    fn remove_entry_then_take_all() {
        let mut m: HashMultiMap<u8, u8> = [(1, 10), (1, 11), (1, 12), (2, 20)]
            .into_iter()
            .collect();
        let (k, _) = m.remove_entry(&1u8).unwrap();
        assert_eq!(k, 1);
        assert_eq!(m.count(&1u8), 2);
        let mut rest = m.take_all(&1u8);
        rest.sort_unstable();
        assert_eq!(rest.len(), 2);
        assert!(rest.iter().all(|(k, _)| *k == 1));
        assert!(m.take_all(&1u8).is_empty());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn erase_by_position() {
        let mut m: HashMultiMap<&str, i32> = HashMultiMap::new();
        m.insert("a", 1);
        m.insert("a", 2);
        let pos = m.find_position(&"a").unwrap();
        let (k, v) = m.get_at(pos.bucket, pos.offset).map(|(k, v)| (*k, *v)).unwrap();
        assert_eq!(m.erase(pos.bucket, pos.offset), Some((k, v)));
        assert_eq!(m.count(&"a"), 1);
        assert_eq!(m.erase(m.bucket_count(), 0), None);
    }
}
