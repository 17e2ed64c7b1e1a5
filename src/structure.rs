//! Structural strategies.
//!
//! A [`Structure`] decides how a key is split across edges: how a key is
//! matched against the successors of a node, how new edges are created, and
//! what happens to a node after one of its successors or its value has been
//! removed. The trie engine drives every operation through these hooks, so the
//! same engine serves both the [`Uncompressed`] structure below and the
//! [`crate::patricia::Patricia`] structure.

use std::fmt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{NodeId, Nodes};
use crate::sequence::{Sequence, TrieAtom};
use crate::successors::SuccessorStore;

/// The operation a key is being matched for. Matching rules differ per
/// operation in compressed tries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Exact lookup of a key.
    Get,
    /// Insertion of a key.
    Put,
    /// Removal of a key.
    Remove,
    /// Location of the node which roots every key with a given prefix.
    SubTrie,
}

/// One descent from a node to one of its successors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// The successor descended to.
    pub child: NodeId,
    /// Number of key atoms matched by the edge.
    pub consumed: usize,
    /// Length of the edge label.
    pub edge_len: usize,
}

impl Step {
    /// A step which consumed its whole edge.
    pub fn full(child: NodeId, edge_len: usize) -> Self {
        Self {
            child,
            consumed: edge_len,
            edge_len,
        }
    }

    /// Did the key stop (or diverge) inside the edge?
    pub fn is_partial(&self) -> bool {
        self.consumed < self.edge_len
    }
}

/// Hooks which shape a trie.
pub trait Structure: Clone + Default + fmt::Debug {
    /// Match the start of `remaining` against the successors of `node`.
    ///
    /// `remaining` is never empty.
    fn on_get_successor<A, V, S>(
        &self,
        nodes: &Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
        op: Operation,
    ) -> Option<Step>
    where
        A: TrieAtom,
        S: SuccessorStore<A>;

    /// Follow an existing edge while inserting `remaining`, reshaping the
    /// trie if the edge only partially matches. The returned step is always
    /// full.
    fn on_put_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
    ) -> Result<Option<Step>>
    where
        A: TrieAtom,
        S: SuccessorStore<A>;

    /// Create a new edge from `node` for the start of `remaining`.
    fn on_add_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
    ) -> Result<Step>
    where
        A: TrieAtom,
        S: SuccessorStore<A>;

    /// Remove and release the successor of `node` under `label`. Returns
    /// false when there is no such successor.
    fn on_remove_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        label: &[A],
    ) -> Result<bool>
    where
        A: TrieAtom,
        S: SuccessorStore<A>;

    /// Called after the value of `node` was cleared while `node` still has
    /// successors.
    fn on_deleted_value<A, V, S>(&self, _nodes: &mut Nodes<A, V, S>, _node: NodeId) -> Result<()>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        Ok(())
    }

    /// Build a detached copy of the subtree at `matched`.
    ///
    /// `path` is the full key of `matched` in `source`. It is re-inserted in
    /// the new arena so the copy keeps the keys it had in `source`. Returns
    /// the new arena and its root.
    fn get_sub_trie<A, V, S>(
        &self,
        source: &Nodes<A, V, S>,
        path: &[A],
        matched: NodeId,
        include_own_value: bool,
    ) -> Result<(Nodes<A, V, S>, NodeId)>
    where
        A: TrieAtom,
        V: Clone,
        S: SuccessorStore<A>,
    {
        let mut nodes = Nodes::new();
        let root = nodes.alloc();
        let mut subtree = root;
        let mut consumed = 0;
        while consumed < path.len() {
            let step = self.on_add_successor(&mut nodes, subtree, &path[consumed..])?;
            subtree = step.child;
            consumed += step.consumed;
        }
        if include_own_value {
            nodes.set_value(subtree, source.value(matched).cloned());
        }
        source.clone_subtree_into(matched, &mut nodes, subtree)?;
        Ok((nodes, root))
    }
}

/// Every edge holds exactly one atom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Uncompressed;

impl Structure for Uncompressed {
    fn on_get_successor<A, V, S>(
        &self,
        nodes: &Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
        _op: Operation,
    ) -> Option<Step>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        nodes
            .get_successor(node, &remaining[..1])
            .map(|child| Step::full(child, 1))
    }

    fn on_put_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
    ) -> Result<Option<Step>>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        Ok(self.on_get_successor(nodes, node, remaining, Operation::Put))
    }

    fn on_add_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
    ) -> Result<Step>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        let child = nodes.add_successor(node, Sequence::from(&remaining[..1]), None)?;
        Ok(Step::full(child, 1))
    }

    fn on_remove_successor<A, V, S>(
        &self,
        nodes: &mut Nodes<A, V, S>,
        node: NodeId,
        label: &[A],
    ) -> Result<bool>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        Ok(match nodes.remove_successor(node, label) {
            Some(child) => {
                nodes.release(child);
                true
            }
            None => false,
        })
    }
}
