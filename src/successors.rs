//! Successor stores.
//!
//! A successor store maps the edge labels leaving a node to the child nodes
//! they lead to. Two stores are provided:
//!
//!  - [`HashSuccessors`]: an unordered hash map, O(1) lookup by label or by
//!    the first atom of a label. Edges come back in no particular order and
//!    positional operations are not supported.
//!  - [`SortedSuccessors`]: a vector kept ordered by an [`AtomComparator`],
//!    O(log n) lookup by label or by the first atom of a label, positional
//!    access, and ordered iteration.
//!
//! Sibling labels never share a first atom, in either trie structure, which is
//! what lets the sorted store binary search on first atoms alone and the hash
//! store keep a single label per first atom.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use fnv::FnvBuildHasher;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, TrieError};
use crate::node::NodeId;
use crate::sequence::{AtomComparator, Natural, Sequence, TrieAtom};

/// Iterator over the `(label, child)` pairs of a store.
pub type Edges<'a, A> = Box<dyn Iterator<Item = (&'a Sequence<A>, NodeId)> + 'a>;

/// Storage for the labelled edges leaving a node.
pub trait SuccessorStore<A: TrieAtom>: Clone + Default + fmt::Debug {
    /// The child reached through exactly `label`.
    fn get(&self, label: &[A]) -> Option<NodeId>;

    /// The edge whose label starts with `atom`.
    fn get_by_first_atom(&self, atom: &A) -> Option<(&Sequence<A>, NodeId)>;

    /// Link `child` under `label`, returning the child previously linked
    /// under the same label.
    fn insert(&mut self, label: Sequence<A>, child: NodeId) -> Option<NodeId>;

    /// Unlink and return the child under `label`.
    fn remove(&mut self, label: &[A]) -> Option<NodeId>;

    /// Number of edges.
    fn len(&self) -> usize;

    /// Are there no edges?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the edges in store order.
    fn edges(&self) -> Edges<'_, A>;

    /// Position of the edge labelled `label`.
    fn index_of(&self, _label: &[A]) -> Result<Option<usize>> {
        Err(TrieError::unsupported("index_of"))
    }

    /// Position of the edge whose label starts with `atom`.
    fn index_of_first_atom(&self, _atom: &A) -> Result<Option<usize>> {
        Err(TrieError::unsupported("index_of_first_atom"))
    }

    /// The edge at position `index`.
    fn edge_at(&self, _index: usize) -> Result<Option<(&Sequence<A>, NodeId)>> {
        Err(TrieError::unsupported("edge_at"))
    }
}

/// Stores whose edges are kept in comparator order.
pub trait OrderedSuccessors<A: TrieAtom>: SuccessorStore<A> {
    /// The smallest edge.
    fn first_edge(&self) -> Option<(&Sequence<A>, NodeId)>;

    /// The largest edge.
    fn last_edge(&self) -> Option<(&Sequence<A>, NodeId)>;
}

/// Unordered successors held in a hash map.
///
/// A second map indexes every label by its first atom, so Patricia matching
/// is a hash lookup too.
pub struct HashSuccessors<A, H = FnvBuildHasher> {
    edges: HashMap<Sequence<A>, NodeId, H>,
    by_first_atom: HashMap<A, Sequence<A>, H>,
}

impl<A, H: Default> Default for HashSuccessors<A, H> {
    fn default() -> Self {
        Self {
            edges: HashMap::default(),
            by_first_atom: HashMap::default(),
        }
    }
}

impl<A: Clone, H: Clone> Clone for HashSuccessors<A, H> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
            by_first_atom: self.by_first_atom.clone(),
        }
    }
}

impl<A: fmt::Debug, H> fmt::Debug for HashSuccessors<A, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.edges.iter()).finish()
    }
}

// Only the edges are serialized, the first atom index is rebuilt on load.
#[cfg(feature = "serde")]
impl<A, H> Serialize for HashSuccessors<A, H>
where
    A: TrieAtom + Serialize,
    H: BuildHasher,
{
    fn serialize<Se>(&self, serializer: Se) -> std::result::Result<Se::Ok, Se::Error>
    where
        Se: serde_crate::Serializer,
    {
        self.edges.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, A, H> Deserialize<'de> for HashSuccessors<A, H>
where
    A: TrieAtom + Deserialize<'de>,
    H: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde_crate::Deserializer<'de>,
    {
        let edges = HashMap::<Sequence<A>, NodeId, H>::deserialize(deserializer)?;
        let by_first_atom = edges
            .keys()
            .filter_map(|label| label.first().map(|atom| (atom.clone(), label.clone())))
            .collect();
        Ok(Self {
            edges,
            by_first_atom,
        })
    }
}

impl<A, H> SuccessorStore<A> for HashSuccessors<A, H>
where
    A: TrieAtom,
    H: BuildHasher + Clone + Default,
{
    fn get(&self, label: &[A]) -> Option<NodeId> {
        self.edges.get(label).copied()
    }

    fn get_by_first_atom(&self, atom: &A) -> Option<(&Sequence<A>, NodeId)> {
        let label = self.by_first_atom.get(atom)?;
        self.edges
            .get_key_value(label.as_slice())
            .map(|(label, &child)| (label, child))
    }

    fn insert(&mut self, label: Sequence<A>, child: NodeId) -> Option<NodeId> {
        if let Some(atom) = label.first() {
            self.by_first_atom.insert(atom.clone(), label.clone());
        }
        self.edges.insert(label, child)
    }

    fn remove(&mut self, label: &[A]) -> Option<NodeId> {
        let child = self.edges.remove(label)?;
        if let Some(atom) = label.first() {
            if self
                .by_first_atom
                .get(atom)
                .is_some_and(|indexed| indexed.as_slice() == label)
            {
                self.by_first_atom.remove(atom);
            }
        }
        Some(child)
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    fn edges(&self) -> Edges<'_, A> {
        Box::new(self.edges.iter().map(|(label, &child)| (label, child)))
    }
}

/// Successors held in a vector ordered by a comparator.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct SortedSuccessors<A, C = Natural> {
    edges: Vec<(Sequence<A>, NodeId)>,
    comparator: C,
}

impl<A, C: Default> Default for SortedSuccessors<A, C> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            comparator: C::default(),
        }
    }
}

impl<A: TrieAtom, C: AtomComparator<A>> SortedSuccessors<A, C> {
    fn search(&self, label: &[A]) -> std::result::Result<usize, usize> {
        self.edges
            .binary_search_by(|(l, _)| self.comparator.compare_labels(l, label))
    }

    fn search_first_atom(&self, atom: &A) -> Option<usize> {
        self.edges
            .binary_search_by(|(l, _)| match l.first() {
                Some(first) => self.comparator.compare(first, atom),
                // Labels are never empty, this arm keeps the search total.
                None => std::cmp::Ordering::Less,
            })
            .ok()
    }

    fn edge(&self, index: usize) -> Option<(&Sequence<A>, NodeId)> {
        self.edges.get(index).map(|(label, child)| (label, *child))
    }
}

impl<A, C> SuccessorStore<A> for SortedSuccessors<A, C>
where
    A: TrieAtom,
    C: AtomComparator<A>,
{
    fn get(&self, label: &[A]) -> Option<NodeId> {
        self.search(label).ok().map(|i| self.edges[i].1)
    }

    fn get_by_first_atom(&self, atom: &A) -> Option<(&Sequence<A>, NodeId)> {
        self.search_first_atom(atom).and_then(|i| self.edge(i))
    }

    fn insert(&mut self, label: Sequence<A>, child: NodeId) -> Option<NodeId> {
        match self.search(&label) {
            Ok(i) => Some(std::mem::replace(&mut self.edges[i].1, child)),
            Err(i) => {
                self.edges.insert(i, (label, child));
                None
            }
        }
    }

    fn remove(&mut self, label: &[A]) -> Option<NodeId> {
        self.search(label).ok().map(|i| self.edges.remove(i).1)
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    fn edges(&self) -> Edges<'_, A> {
        Box::new(self.edges.iter().map(|(label, child)| (label, *child)))
    }

    fn index_of(&self, label: &[A]) -> Result<Option<usize>> {
        Ok(self.search(label).ok())
    }

    fn index_of_first_atom(&self, atom: &A) -> Result<Option<usize>> {
        Ok(self.search_first_atom(atom))
    }

    fn edge_at(&self, index: usize) -> Result<Option<(&Sequence<A>, NodeId)>> {
        Ok(self.edge(index))
    }
}

impl<A, C> OrderedSuccessors<A> for SortedSuccessors<A, C>
where
    A: TrieAtom,
    C: AtomComparator<A>,
{
    fn first_edge(&self) -> Option<(&Sequence<A>, NodeId)> {
        self.edge(0)
    }

    fn last_edge(&self) -> Option<(&Sequence<A>, NodeId)> {
        self.edges.len().checked_sub(1).and_then(|i| self.edge(i))
    }
}
