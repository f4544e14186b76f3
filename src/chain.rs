//! Chain: the singly-linked list primitive behind each bucket.
//!
//! Nodes for every chain of a table live in one `SlotMap` arena and link to
//! each other by generational key. A `Chain` is the non-data sentinel for its
//! list: it holds the head link and the length, so pushing onto, popping from
//! and emptiness checks on a chain never special-case the first node.
//!
//! Every operation takes the arena explicitly; a chain never owns nodes of
//! another chain's arena. Re-linking a node into a different chain (rehash)
//! moves only its key, never its value.

use slotmap::{DefaultKey, SlotMap};

pub(crate) type Nodes<T> = SlotMap<DefaultKey, Node<T>>;

/// One resident element with the digest it was inserted under.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) hash: u64,
    next: Option<DefaultKey>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Chain {
    head: Option<DefaultKey>,
    len: usize,
}

impl Chain {
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// O(1) insertion at the front; returns the new node's key.
    pub(crate) fn push_front<T>(&mut self, nodes: &mut Nodes<T>, value: T, hash: u64) -> DefaultKey {
        let key = nodes.insert(Node {
            value,
            hash,
            next: self.head,
        });
        self.head = Some(key);
        self.len += 1;
        key
    }

    /// Link an already-allocated node at the front of this chain.
    pub(crate) fn link_front<T>(&mut self, nodes: &mut Nodes<T>, key: DefaultKey) {
        if let Some(node) = nodes.get_mut(key) {
            node.next = self.head;
            self.head = Some(key);
            self.len += 1;
        }
    }

    /// Detach every node from this chain without freeing them and return the
    /// old head. The caller walks the detached list with [`Chain::next_of`].
    pub(crate) fn detach(&mut self) -> Option<DefaultKey> {
        self.len = 0;
        self.head.take()
    }

    /// Reverse the link order of this chain in place.
    pub(crate) fn reverse<T>(&mut self, nodes: &mut Nodes<T>) {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let Some(node) = nodes.get_mut(k) else { break };
            cur = node.next;
            node.next = prev;
            prev = Some(k);
        }
        self.head = prev;
    }

    pub(crate) fn next_of<T>(nodes: &Nodes<T>, key: DefaultKey) -> Option<DefaultKey> {
        nodes.get(key).and_then(|n| n.next)
    }

    /// Key of the node at `pos` (0 = front), walking `pos` links.
    pub(crate) fn key_at<T>(&self, nodes: &Nodes<T>, pos: usize) -> Option<DefaultKey> {
        if pos >= self.len {
            return None;
        }
        self.iter(nodes).nth(pos).map(|(k, _)| k)
    }

    pub(crate) fn get<'a, T>(&self, nodes: &'a Nodes<T>, pos: usize) -> Option<&'a T> {
        self.key_at(nodes, pos)
            .and_then(|k| nodes.get(k))
            .map(|n| &n.value)
    }

    /// First node satisfying `pred`, with its position.
    pub(crate) fn find<T>(
        &self,
        nodes: &Nodes<T>,
        mut pred: impl FnMut(&Node<T>) -> bool,
    ) -> Option<(usize, DefaultKey)> {
        self.iter(nodes)
            .enumerate()
            .find(|(_, (_, node))| pred(node))
            .map(|(pos, (k, _))| (pos, k))
    }

    /// Unlink and free the node at `pos`, returning its value.
    pub(crate) fn erase_at<T>(&mut self, nodes: &mut Nodes<T>, pos: usize) -> Option<T> {
        if pos >= self.len {
            return None;
        }
        let mut prev = None;
        let mut cur = self.head;
        for _ in 0..pos {
            prev = cur;
            cur = cur.and_then(|k| Self::next_of(nodes, k));
        }
        cur.and_then(|k| self.unlink(nodes, prev, k))
    }

    /// Unlink and free the first node satisfying `pred`.
    pub(crate) fn remove_first<T>(
        &mut self,
        nodes: &mut Nodes<T>,
        mut pred: impl FnMut(&Node<T>) -> bool,
    ) -> Option<T> {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = nodes.get(k)?;
            if pred(node) {
                return self.unlink(nodes, prev, k);
            }
            prev = Some(k);
            cur = node.next;
        }
        None
    }

    /// Unlink and free every node satisfying `pred`, handing each value to
    /// `sink` once the chain is consistent again. Returns the count removed.
    pub(crate) fn remove_all<T>(
        &mut self,
        nodes: &mut Nodes<T>,
        mut pred: impl FnMut(&Node<T>) -> bool,
        mut sink: impl FnMut(T),
    ) -> usize {
        let mut removed = 0;
        let mut prev = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let Some(node) = nodes.get(k) else { break };
            let next = node.next;
            if pred(node) {
                if let Some(value) = self.unlink(nodes, prev, k) {
                    removed += 1;
                    sink(value);
                }
            } else {
                prev = Some(k);
            }
            cur = next;
        }
        removed
    }

    /// Free every node of this chain.
    pub(crate) fn clear<T>(&mut self, nodes: &mut Nodes<T>) {
        let mut cur = self.detach();
        while let Some(k) = cur {
            match nodes.remove(k) {
                Some(node) => cur = node.next,
                None => break,
            }
        }
    }

    pub(crate) fn iter<'a, T>(&self, nodes: &'a Nodes<T>) -> ChainIter<'a, T> {
        ChainIter {
            nodes,
            cur: self.head,
            remaining: self.len,
        }
    }

    fn unlink<T>(
        &mut self,
        nodes: &mut Nodes<T>,
        prev: Option<DefaultKey>,
        key: DefaultKey,
    ) -> Option<T> {
        let node = nodes.remove(key)?;
        match prev {
            None => self.head = node.next,
            Some(p) => {
                if let Some(prev_node) = nodes.get_mut(p) {
                    prev_node.next = node.next;
                }
            }
        }
        self.len -= 1;
        Some(node.value)
    }
}

/// Front-to-back walk over one chain.
pub(crate) struct ChainIter<'a, T> {
    nodes: &'a Nodes<T>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<T> Clone for ChainIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = (DefaultKey, &'a Node<T>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = self.nodes.get(k)?;
        self.cur = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((k, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
