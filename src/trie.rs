//! Provides a Trie implementation for storing keys composed of sequences
//! of atoms, each key mapping to a value.
//!
//! Atoms must support the TrieAtom trait. A trie is shaped by two
//! independent choices:
//!
//!  - its successor store: [`SortedSuccessors`] (ordered, binary searched) or
//!    [`HashSuccessors`] (unordered, hashed)
//!  - its structure: [`Patricia`] (edges hold shared runs of atoms) or
//!    [`Uncompressed`] (one atom per edge)
//!
//! The interface relies on iterators to insert, remove, check for existence
//! of keys. Because the trie is based on the concept of atoms, then it
//! is up to the user to decide what kind of atoms to use to make most sense
//! of the keys we are storing.
//!
//! This flexibility can be really useful when string processing. Here are
//! three examples which show that we can work with keys of:
//!  - chars
//!  - grapheme clusters
//!  - &str ('words')
//!
//! depending on what type of atom granularity we wish to use when
//! interacting with our strings.
//!
//! Example 1
//! ```
//! use seqtrie::trie::PatriciaTrie;
//!
//! let mut trie = PatriciaTrie::new();
//! let input = "abcdef".chars();
//! trie.put(input.clone(), "abcdef".len()).unwrap();
//!
//! // Anything which implements IntoIterator<Item=char> can now be used
//! // to interact with our Trie
//! assert!(trie.contains_key(input.clone()).unwrap()); // Clone the original iterator
//! assert!(trie.contains_key("abcdef".chars()).unwrap()); // Create a new iterator
//! assert!(trie.contains_key(['a', 'b', 'c', 'd', 'e', 'f']).unwrap()); // Build an array, etc...
//! assert_eq!(trie.get(['a', 'b', 'c', 'd', 'e', 'f']).unwrap(), Some(&"abcdef".len())); // Get our value back
//! assert_eq!(trie.remove(input.clone()).unwrap(), Some("abcdef".len()));
//! assert!(!trie.contains_key(input).unwrap());
//! ```
//!
//! Example 2
//! ```
//! use seqtrie::trie::UncompressedTrie;
//! use unicode_segmentation::UnicodeSegmentation;
//!
//! let mut trie: UncompressedTrie<&str, usize> = UncompressedTrie::new();
//! let s = "a̐éö̲\r\n";
//! let input = s.graphemes(true);
//! trie.put(input.clone(), 4).unwrap();
//! // Anything which implements IntoIterator<Item=&str> can now be used
//! // to interact with our Trie
//! assert!(trie.contains_key(input.clone()).unwrap());
//! assert_eq!(trie.remove(input.clone()).unwrap(), Some(4));
//! assert!(!trie.contains_key(input).unwrap());
//! ```
//!
//! Example 3
//! ```
//! use seqtrie::trie::PatriciaTrie;
//!
//! let mut trie = PatriciaTrie::new();
//! let input = "the quick brown fox".split_whitespace();
//! trie.put(input.clone(), 4).unwrap();
//!
//! // Anything which implements IntoIterator<Item=&str> can now be used
//! // to interact with our Trie
//! assert!(trie.contains_key(input.clone()).unwrap());
//! assert!(trie.contains_prefix("the quick brown".split_whitespace()).unwrap());
//! assert_eq!(trie.remove(input.clone()).unwrap(), Some(4));
//! assert!(!trie.contains_key(input).unwrap());
//! ```
//!
//! Here's an example of how we can iterate over our Trie. The key of every
//! entry is a [`Sequence`] of atoms, which can be collected back into
//! whatever the atoms came from.
//!
//! Example 4
//! ```
//! use seqtrie::trie::PatriciaTrie;
//!
//! let mut trie = PatriciaTrie::new();
//! let input = "the quick brown fox".split_whitespace();
//! trie.put(input, 4).unwrap();
//!
//! for kv_pair in trie.iter() {
//!     println!("kv_pair: {:?}", kv_pair);
//!     assert_eq!("thequickbrownfox", kv_pair.key.iter().copied().collect::<String>());
//!     assert_eq!(kv_pair.value, &4);
//! }
//! ```
//!
//! Typical usages for this data structure:
//!  - Interning
//!  - Storing large numbers of keys with significant amounts of
//!    sub-key duplication
//!  - Prefix matching keys
//!  - Extracting every key below a prefix as a trie of its own

use crate::error::{check_non_empty, Result, TrieError};
use crate::iterator::{Cursor, Entries, KeyValueRef, Keys, Values};
use crate::node::{NodeId, Nodes};
use crate::patricia::Patricia;
use crate::sequence::{Sequence, TrieAtom};
use crate::structure::{Operation, Structure, Uncompressed};
use crate::successors::{HashSuccessors, OrderedSuccessors, SortedSuccessors, SuccessorStore};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Patricia trie with ordered successors.
pub type PatriciaTrie<A, V> = Trie<A, V, SortedSuccessors<A>, Patricia>;

/// One atom per edge, ordered successors.
pub type UncompressedTrie<A, V> = Trie<A, V, SortedSuccessors<A>, Uncompressed>;

/// Patricia trie with hashed successors.
pub type HashPatriciaTrie<A, V> = Trie<A, V, HashSuccessors<A>, Patricia>;

/// One atom per edge, hashed successors.
pub type HashTrie<A, V> = Trie<A, V, HashSuccessors<A>, Uncompressed>;

/// Patricia trie keyed by the chars of a string.
pub type TrieString<V> = PatriciaTrie<char, V>;

/// Patricia trie keyed by a Vec of atoms.
pub type TrieVec<A, V> = PatriciaTrie<A, V>;

/// Stores keys of atoms along the edges of a tree of nodes.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Trie<A, V, S = SortedSuccessors<A>, T = Patricia> {
    nodes: Nodes<A, V, S>,
    root: Option<NodeId>,
    structure: T,
    modifications: u64,
}

impl<A: TrieAtom, V, S: SuccessorStore<A>, T: Structure> Default for Trie<A, V, S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: TrieAtom, V, S: SuccessorStore<A>, T: Structure> Trie<A, V, S, T> {
    /// Create a new Trie.
    pub fn new() -> Self {
        Self::with_structure(T::default())
    }

    /// Create a new Trie shaped by `structure`.
    pub fn with_structure(structure: T) -> Self {
        Self {
            nodes: Nodes::new(),
            root: None,
            structure,
            modifications: 0,
        }
    }

    /// Clear the Trie.
    pub fn clear(&mut self) {
        log::debug!("clearing trie of {} keys", self.len());
        self.nodes = Nodes::new();
        self.root = None;
        self.modifications += 1;
    }

    /// How many keys does the Trie contain?
    #[doc(alias = "size")]
    #[inline]
    pub fn len(&self) -> usize {
        self.root.map_or(0, |root| self.nodes.count(root))
    }

    /// Is the Trie empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes, root included, currently making up the Trie.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node arena, for inspection.
    pub fn nodes(&self) -> &Nodes<A, V, S> {
        &self.nodes
    }

    /// The root node, if any key has ever been inserted since the Trie was
    /// last emptied.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn into_nodes(self) -> Nodes<A, V, S> {
        self.nodes
    }

    /// The structure shaping this Trie.
    pub fn structure(&self) -> &T {
        &self.structure
    }

    /// Number of mutations applied to the Trie so far.
    pub fn modifications(&self) -> u64 {
        self.modifications
    }

    /// Insert the key and value into the Trie. If the key is already present
    /// the value is replaced. Returns the previously associated value.
    pub fn put<K: IntoIterator<Item = A>>(&mut self, key: K, value: V) -> Result<Option<V>> {
        let key: Vec<A> = key.into_iter().collect();
        check_non_empty(&key, "key")?;

        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.alloc();
                self.root = Some(root);
                root
            }
        };

        let mut node = root;
        let mut consumed = 0;
        while consumed < key.len() {
            match self
                .structure
                .on_put_successor(&mut self.nodes, node, &key[consumed..])?
            {
                Some(step) => {
                    node = step.child;
                    consumed += step.consumed;
                }
                None => break,
            }
        }
        while consumed < key.len() {
            let step = self
                .structure
                .on_add_successor(&mut self.nodes, node, &key[consumed..])?;
            node = step.child;
            consumed += step.consumed;
        }

        self.modifications += 1;
        Ok(self.nodes.set_value(node, Some(value)))
    }

    /// Get a reference to a key's associated value.
    pub fn get<K: IntoIterator<Item = A>>(&self, key: K) -> Result<Option<&V>> {
        let key: Vec<A> = key.into_iter().collect();
        check_non_empty(&key, "key")?;
        Ok(self.get_slice(&key))
    }

    /// Does the Trie contain the supplied key?
    pub fn contains_key<K: IntoIterator<Item = A>>(&self, key: K) -> Result<bool> {
        self.get(key).map(|value| value.is_some())
    }

    /// Does the Trie contain a key starting with the supplied prefix?
    pub fn contains_prefix<P: IntoIterator<Item = A>>(&self, prefix: P) -> Result<bool> {
        let prefix: Vec<A> = prefix.into_iter().collect();
        check_non_empty(&prefix, "prefix")?;
        Ok(self.locate(&prefix, Operation::SubTrie).is_some())
    }

    /// Remove the key from the Trie, returning its value. Returns None if
    /// the key is not present.
    pub fn remove<K: IntoIterator<Item = A>>(&mut self, key: K) -> Result<Option<V>> {
        let key: Vec<A> = key.into_iter().collect();
        check_non_empty(&key, "key")?;
        self.remove_slice(&key)
    }

    /// Copy every key starting with `prefix`, and its value, into a new
    /// independent Trie.
    ///
    /// The copy keeps the full keys. When `prefix` ends inside a Patricia
    /// edge, the copy is rooted at the node that edge leads to. An empty
    /// prefix copies the whole Trie. Fails with `NotFound` if no key starts
    /// with `prefix`.
    pub fn sub_trie<P: IntoIterator<Item = A>>(&self, prefix: P) -> Result<Self>
    where
        V: Clone,
    {
        let prefix: Vec<A> = prefix.into_iter().collect();
        if self.root.is_none() {
            return if prefix.is_empty() {
                Ok(Self::with_structure(self.structure.clone()))
            } else {
                Err(TrieError::not_found(&prefix))
            };
        }
        let Some((matched, _)) = self.locate(&prefix, Operation::SubTrie) else {
            return Err(TrieError::not_found(&prefix));
        };

        let path = self.nodes.path_to(matched);
        let (nodes, root) = self
            .structure
            .get_sub_trie(&self.nodes, &path, matched, true)?;
        log::debug!(
            "extracted sub-trie of {} keys below {:?}",
            nodes.count(root),
            prefix
        );
        Ok(Self {
            nodes,
            root: Some(root),
            structure: self.structure.clone(),
            modifications: 0,
        })
    }

    /// Get the longest common prefixes of the trie.
    ///
    /// This will be a Vec of prefixes, one for each distinct first atom of
    /// the keys held in the trie: each prefix runs from the root down to the
    /// first node which either holds a value or branches.
    pub fn longest_common_prefixes(&self) -> Vec<Sequence<A>> {
        let Some(root) = self.root else {
            return vec![];
        };
        let mut result = vec![];
        for (label, child) in self.nodes.successors(root) {
            let mut lcp: Vec<A> = label.to_vec();
            let mut current = child;
            while self.nodes.value(current).is_none() && self.nodes.successor_count(current) == 1 {
                let Some((label, next)) = self.nodes.successors(current).next() else {
                    break;
                };
                lcp.extend_from_slice(label);
                current = next;
            }
            result.push(lcp.into());
        }
        result
    }

    /// Create an iterator over the Trie, visiting keys breadth first.
    pub fn iter(&self) -> Entries<'_, A, V, S> {
        Entries::new(&self.nodes, self.root)
    }

    /// Alias of [`Trie::iter`].
    pub fn entries(&self) -> Entries<'_, A, V, S> {
        self.iter()
    }

    /// Iterate over the keys of the Trie.
    pub fn keys(&self) -> Keys<'_, A, V, S> {
        Keys::new(self.iter())
    }

    /// Iterate over the values of the Trie.
    pub fn values(&self) -> Values<'_, A, V, S> {
        Values::new(self.iter())
    }

    /// Create a sorted iterator over the Trie.
    pub fn iter_sorted(&self) -> impl Iterator<Item = KeyValueRef<'_, A, V>> {
        let mut v = self.iter().collect::<Vec<KeyValueRef<'_, A, V>>>();
        v.sort_by(|a, b| a.key.cmp(&b.key));
        v.into_iter()
    }

    /// Create a cursor over the Trie which does not borrow it.
    ///
    /// Advancing the cursor after the Trie has been modified fails with
    /// `ConcurrentModification`.
    pub fn cursor(&self) -> Cursor<A> {
        Cursor::new(self.root, self.modifications)
    }

    fn get_slice(&self, key: &[A]) -> Option<&V> {
        match self.locate(key, Operation::Get)? {
            (node, false) => self.nodes.value(node),
            (_, true) => None,
        }
    }

    /// Follow `key` down from the root. Returns the node reached and whether
    /// the key ended inside the edge leading to it.
    fn locate(&self, key: &[A], op: Operation) -> Option<(NodeId, bool)> {
        let mut node = self.root?;
        let mut consumed = 0;
        while consumed < key.len() {
            let step = self
                .structure
                .on_get_successor(&self.nodes, node, &key[consumed..], op)?;
            node = step.child;
            consumed += step.consumed;
            if step.is_partial() {
                return Some((node, true));
            }
        }
        Some((node, false))
    }

    pub(crate) fn remove_slice(&mut self, key: &[A]) -> Result<Option<V>> {
        let Some(root) = self.root else {
            return Ok(None);
        };

        // The deepest node on the path which must survive the removal, and
        // the successor through which the path leaves it.
        let mut retained = root;
        let mut leaving = None;
        let mut node = root;
        let mut consumed = 0;
        while consumed < key.len() {
            let remaining = &key[consumed..];
            let Some(step) =
                self.structure
                    .on_get_successor(&self.nodes, node, remaining, Operation::Remove)
            else {
                return Ok(None);
            };
            if node == root
                || self.nodes.value(node).is_some()
                || self.nodes.successor_count(node) > 1
            {
                retained = node;
                leaving = Some(step.child);
            }
            node = step.child;
            consumed += step.consumed;
        }

        if self.nodes.value(node).is_none() {
            return Ok(None);
        }
        let value = self.nodes.set_value(node, None);
        self.modifications += 1;

        if self.nodes.successor_count(node) > 0 {
            self.structure.on_deleted_value(&mut self.nodes, node)?;
        } else if let Some(leaving) = leaving {
            let Some(label) = self.nodes.parent(leaving).map(|(l, _)| l.clone()) else {
                return Ok(value);
            };
            self.structure
                .on_remove_successor(&mut self.nodes, retained, &label)?;
        }

        if self.nodes.count(root) == 0 {
            log::debug!("last key removed, resetting trie");
            self.nodes = Nodes::new();
            self.root = None;
        }
        Ok(value)
    }
}

impl<A, V, S, T> Trie<A, V, S, T>
where
    A: TrieAtom,
    S: OrderedSuccessors<A>,
    T: Structure,
{
    /// The entry with the smallest key, in comparator order.
    pub fn first_entry(&self) -> Option<KeyValueRef<'_, A, V>> {
        let root = self.root?;
        let mut node = root;
        loop {
            if node != root {
                if let Some(value) = self.nodes.value(node) {
                    return Some(KeyValueRef {
                        key: self.nodes.path_to(node),
                        value,
                    });
                }
            }
            node = self.nodes[node].successors().first_edge()?.1;
        }
    }

    /// The entry with the largest key, in comparator order.
    pub fn last_entry(&self) -> Option<KeyValueRef<'_, A, V>> {
        let mut node = self.root?;
        while let Some((_, child)) = self.nodes[node].successors().last_edge() {
            node = child;
        }
        self.nodes.value(node).map(|value| KeyValueRef {
            key: self.nodes.path_to(node),
            value,
        })
    }

    /// Remove and return the entry with the smallest key.
    pub fn poll_first_entry(&mut self) -> Result<Option<(Sequence<A>, V)>> {
        let Some(key) = self.first_entry().map(|entry| entry.key) else {
            return Ok(None);
        };
        let value = self.remove_slice(&key)?;
        Ok(value.map(|value| (key, value)))
    }
}
