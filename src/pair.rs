//! Pair: the element type the map layer stores in a set engine.

use core::hash::{Hash, Hasher};

/// A key/value association whose identity is its key.
///
/// `Hash`, `PartialEq` and `Eq` look only at the key, which lifts the key's
/// hashing and equality to the pair. The key is never handed out mutably
/// while the pair is resident in a table.
#[derive(Clone, Debug)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_tuple(self) -> (K, V) {
        (self.key, self.value)
    }

    pub(crate) fn as_refs(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<K: Hash, V> Hash for Pair<K, V> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.key.hash(state);
    }
}

impl<K: PartialEq, V> PartialEq for Pair<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Pair<K, V> {}
