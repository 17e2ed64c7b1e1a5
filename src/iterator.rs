//! Provides Trie iterators.
//!
//! All iterators walk the trie breadth first from the root, so shorter keys
//! come out before longer ones. Within one level the order is the order of the
//! successor store: sorted for [`crate::successors::SortedSuccessors`],
//! arbitrary for [`crate::successors::HashSuccessors`].
//!
//! Borrowing iterators ([`Entries`], [`Keys`], [`Values`]) hold a shared
//! borrow of the trie, so the trie cannot change under them. A [`Cursor`]
//! holds no borrow at all; instead it remembers the modification count of the
//! trie it was created from and refuses to advance once that has moved on.
//!
//! ```
//! use seqtrie::error::TrieError;
//! use seqtrie::trie::PatriciaTrie;
//!
//! let mut trie: PatriciaTrie<char, usize> = PatriciaTrie::new();
//! trie.put("tea".chars(), 3).unwrap();
//! trie.put("ten".chars(), 12).unwrap();
//!
//! let mut cursor = trie.cursor();
//! assert!(cursor.advance(&trie).unwrap().is_some());
//! trie.put("to".chars(), 7).unwrap();
//! assert!(matches!(
//!     cursor.advance(&trie),
//!     Err(TrieError::ConcurrentModification { .. })
//! ));
//! ```

use std::collections::VecDeque;

use crate::error::{Result, TrieError};
use crate::node::{NodeId, Nodes};
use crate::sequence::{Sequence, TrieAtom};
use crate::structure::Structure;
use crate::successors::SuccessorStore;
use crate::trie::Trie;

/// Iterator Item
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue<A, V> {
    pub key: Sequence<A>,
    pub value: V,
}

/// Iterator Item
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueRef<'a, A, V> {
    pub key: Sequence<A>,
    pub value: &'a V,
}

// Breadth first walk: nodes waiting to be visited, with their keys.
#[derive(Debug, Clone)]
struct Traversal<A> {
    queue: VecDeque<(NodeId, Sequence<A>)>,
}

impl<A: TrieAtom> Traversal<A> {
    fn new(root: Option<NodeId>) -> Self {
        Self {
            queue: root.map(|root| (root, Sequence::new())).into_iter().collect(),
        }
    }

    fn advance<'a, V, S: SuccessorStore<A>>(
        &mut self,
        nodes: &'a Nodes<A, V, S>,
    ) -> Option<(Sequence<A>, &'a V)> {
        while let Some((node, key)) = self.queue.pop_front() {
            self.queue.extend(
                nodes
                    .successors(node)
                    .map(|(label, child)| (child, key.concat(label))),
            );
            if let Some(value) = nodes.value(node) {
                return Some((key, value));
            }
        }
        None
    }

    fn advance_owned<V, S: SuccessorStore<A>>(
        &mut self,
        nodes: &mut Nodes<A, V, S>,
    ) -> Option<(Sequence<A>, V)> {
        while let Some((node, key)) = self.queue.pop_front() {
            self.queue.extend(
                nodes
                    .successors(node)
                    .map(|(label, child)| (child, key.concat(label))),
            );
            if let Some(value) = nodes.set_value(node, None) {
                return Some((key, value));
            }
        }
        None
    }
}

/// Iterator over a Trie.
#[derive(Debug)]
pub struct Entries<'a, A, V, S> {
    nodes: &'a Nodes<A, V, S>,
    traversal: Traversal<A>,
}

impl<'a, A: TrieAtom, V, S: SuccessorStore<A>> Entries<'a, A, V, S> {
    pub(crate) fn new(nodes: &'a Nodes<A, V, S>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            traversal: Traversal::new(root),
        }
    }
}

impl<'a, A: TrieAtom, V, S: SuccessorStore<A>> Iterator for Entries<'a, A, V, S> {
    type Item = KeyValueRef<'a, A, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.traversal
            .advance(self.nodes)
            .map(|(key, value)| KeyValueRef { key, value })
    }
}

/// Iterator over the keys of a Trie.
#[derive(Debug)]
pub struct Keys<'a, A, V, S> {
    entries: Entries<'a, A, V, S>,
}

impl<'a, A, V, S> Keys<'a, A, V, S> {
    pub(crate) fn new(entries: Entries<'a, A, V, S>) -> Self {
        Self { entries }
    }
}

impl<'a, A: TrieAtom, V, S: SuccessorStore<A>> Iterator for Keys<'a, A, V, S> {
    type Item = Sequence<A>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|kv| kv.key)
    }
}

/// Iterator over the values of a Trie.
#[derive(Debug)]
pub struct Values<'a, A, V, S> {
    entries: Entries<'a, A, V, S>,
}

impl<'a, A, V, S> Values<'a, A, V, S> {
    pub(crate) fn new(entries: Entries<'a, A, V, S>) -> Self {
        Self { entries }
    }
}

impl<'a, A: TrieAtom, V, S: SuccessorStore<A>> Iterator for Values<'a, A, V, S> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|kv| kv.value)
    }
}

// Iterator
impl<'a, A: TrieAtom, V, S: SuccessorStore<A>, T: Structure> IntoIterator
    for &'a Trie<A, V, S, T>
{
    type Item = KeyValueRef<'a, A, V>;
    type IntoIter = Entries<'a, A, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consuming iterator over a Trie.
#[derive(Debug)]
pub struct TrieIntoIterator<A, V, S> {
    nodes: Nodes<A, V, S>,
    traversal: Traversal<A>,
}

impl<A: TrieAtom, V, S: SuccessorStore<A>, T: Structure> IntoIterator for Trie<A, V, S, T> {
    type Item = KeyValue<A, V>;
    type IntoIter = TrieIntoIterator<A, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        let traversal = Traversal::new(self.root());
        TrieIntoIterator {
            nodes: self.into_nodes(),
            traversal,
        }
    }
}

impl<A: TrieAtom, V, S: SuccessorStore<A>> Iterator for TrieIntoIterator<A, V, S> {
    type Item = KeyValue<A, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.traversal
            .advance_owned(&mut self.nodes)
            .map(|(key, value)| KeyValue { key, value })
    }
}

/// A detached, fail-fast position in a breadth first walk of a Trie.
///
/// The cursor does not borrow the trie; pass the trie to every call of
/// [`Cursor::advance`]. Once the trie has been modified, every further
/// advance fails with `ConcurrentModification`.
#[derive(Debug, Clone)]
pub struct Cursor<A> {
    traversal: Traversal<A>,
    expected: u64,
}

impl<A: TrieAtom> Cursor<A> {
    pub(crate) fn new(root: Option<NodeId>, modifications: u64) -> Self {
        Self {
            traversal: Traversal::new(root),
            expected: modifications,
        }
    }

    /// Move to the next entry of `trie`.
    pub fn advance<'a, V, S: SuccessorStore<A>, T: Structure>(
        &mut self,
        trie: &'a Trie<A, V, S, T>,
    ) -> Result<Option<KeyValueRef<'a, A, V>>> {
        let actual = trie.modifications();
        if actual != self.expected {
            return Err(TrieError::concurrent_modification(self.expected, actual));
        }
        Ok(self
            .traversal
            .advance(trie.nodes())
            .map(|(key, value)| KeyValueRef { key, value }))
    }
}
