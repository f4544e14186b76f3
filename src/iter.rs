//! Traversal: bucket order first, chain order within a bucket.
//!
//! With no intervening mutation, two traversals of the same table visit
//! elements in the same order. Visitors only ever see `&T`; changing an
//! element's key while it is resident would strand it in the wrong bucket.

use crate::chain::{Chain, ChainIter, Nodes};
use crate::table::HashTable;
use core::iter::FusedIterator;

/// Iterator over every element of a [`HashTable`].
pub struct Iter<'a, T> {
    buckets: core::slice::Iter<'a, Chain>,
    current: Option<ChainIter<'a, T>>,
    nodes: &'a Nodes<T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(buckets: &'a [Chain], nodes: &'a Nodes<T>) -> Self {
        Self {
            buckets: buckets.iter(),
            current: None,
            nodes,
            remaining: nodes.len(),
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            current: self.current.as_ref().map(ChainIter::clone),
            nodes: self.nodes,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, node)) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(&node.value);
            }
            let chain = self.buckets.next()?;
            if chain.is_empty() {
                continue;
            }
            self.current = Some(chain.iter(self.nodes));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Iterator over a single bucket's chain, front to back.
pub struct BucketIter<'a, T> {
    inner: Option<ChainIter<'a, T>>,
}

impl<'a, T> BucketIter<'a, T> {
    pub(crate) fn new(inner: Option<ChainIter<'a, T>>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for BucketIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(|(_, n)| &n.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

/// Owning iterator over elements removed from a table, in bucket order.
pub struct Drain<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Drain<T> {
    pub(crate) fn new(values: Vec<T>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<T> {}
impl<T> FusedIterator for Drain<T> {}

impl<T, H> HashTable<T, H> {
    /// Call `visitor` on every element in traversal order.
    pub fn for_each(&self, mut visitor: impl FnMut(&T)) {
        for value in self.iter() {
            visitor(value);
        }
    }

    /// Call `visitor` on every element for which `predicate` holds.
    /// Returns the number of elements visited.
    pub fn for_which(
        &self,
        mut predicate: impl FnMut(&T) -> bool,
        mut visitor: impl FnMut(&T),
    ) -> usize {
        let mut visited = 0;
        for value in self.iter().filter(|v| predicate(v)) {
            visitor(value);
            visited += 1;
        }
        visited
    }
}
