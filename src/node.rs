//! Trie nodes and the arena which owns them.
//!
//! Nodes live in a [`Nodes`] arena and refer to each other through
//! [`NodeId`] handles. The owning direction is strictly parent to children:
//! a child records its parent only as a handle plus the label of the edge
//! leading to it, which is enough to walk back up to the root.
//!
//! Every node carries an aggregate count: one for its own value, if present,
//! plus the aggregate counts of all of its successors. Any operation which
//! changes a value or links/unlinks a successor adjusts the count of the node
//! it touches and of every ancestor above it, so the count of the root is
//! always the number of values in the trie.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{check_non_empty, Result, TrieError};
use crate::sequence::{Sequence, TrieAtom};
use crate::successors::{Edges, SuccessorStore};

/// Stable handle to a node in a [`Nodes`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// The arena slot this handle refers to.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Back-reference from a node to its parent.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
struct Parent<A> {
    label: Sequence<A>,
    node: NodeId,
}

/// A trie node.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Node<A, V, S> {
    value: Option<V>,
    successors: S,
    parent: Option<Parent<A>>,
    count: usize,
}

impl<A, V, S: Default> Node<A, V, S> {
    fn new() -> Self {
        Self {
            value: None,
            successors: S::default(),
            parent: None,
            count: 0,
        }
    }
}

impl<A, V, S> Node<A, V, S> {
    /// The value stored at this node.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// The successor store of this node.
    pub fn successors(&self) -> &S {
        &self.successors
    }

    /// The parent of this node and the label of the edge from it.
    pub fn parent(&self) -> Option<(&Sequence<A>, NodeId)> {
        self.parent.as_ref().map(|p| (&p.label, p.node))
    }

    /// Number of values held by this node and all of its descendants.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Arena owning every node of a trie.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Nodes<A, V, S> {
    slots: Vec<Option<Node<A, V, S>>>,
    vacant: Vec<usize>,
}

impl<A, V, S> Default for Nodes<A, V, S> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }
}

impl<A: fmt::Debug, V: fmt::Debug, S: fmt::Debug> fmt::Debug for Nodes<A, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .enumerate()
                    .filter_map(|(i, slot)| slot.as_ref().map(|n| (i, n))),
            )
            .finish()
    }
}

impl<A, V, S> Index<NodeId> for Nodes<A, V, S> {
    type Output = Node<A, V, S>;

    fn index(&self, id: NodeId) -> &Node<A, V, S> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("stale node handle {:?}", id),
        }
    }
}

impl<A: TrieAtom, V, S: SuccessorStore<A>> Nodes<A, V, S> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Does the arena hold no live nodes?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Does `id` refer to a live node?
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<A, V, S> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("stale node handle {:?}", id),
        }
    }

    /// Allocate a detached node with no value and no successors.
    pub fn alloc(&mut self) -> NodeId {
        let node = Some(Node::new());
        match self.vacant.pop() {
            Some(index) => {
                self.slots[index] = node;
                NodeId(index)
            }
            None => {
                self.slots.push(node);
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// The value stored at `id`.
    pub fn value(&self, id: NodeId) -> Option<&V> {
        self[id].value()
    }

    /// Aggregate count of `id`.
    pub fn count(&self, id: NodeId) -> usize {
        self[id].count
    }

    /// The parent of `id` and the label of the edge from it.
    pub fn parent(&self, id: NodeId) -> Option<(&Sequence<A>, NodeId)> {
        self[id].parent()
    }

    /// Number of successors of `id`.
    pub fn successor_count(&self, id: NodeId) -> usize {
        self[id].successors.len()
    }

    /// Iterate over the `(label, child)` edges leaving `id`.
    pub fn successors(&self, id: NodeId) -> Edges<'_, A> {
        self[id].successors.edges()
    }

    /// The successor of `id` reached through exactly `label`.
    pub fn get_successor(&self, id: NodeId, label: &[A]) -> Option<NodeId> {
        self[id].successors.get(label)
    }

    /// The edge leaving `id` whose label starts with `atom`.
    pub fn successor_by_first_atom(&self, id: NodeId, atom: &A) -> Option<(&Sequence<A>, NodeId)> {
        self[id].successors.get_by_first_atom(atom)
    }

    /// Position of the edge labelled `label` among the successors of `id`.
    pub fn index_of(&self, id: NodeId, label: &[A]) -> Result<Option<usize>> {
        self[id].successors.index_of(label)
    }

    /// Position of the edge leaving `id` whose label starts with `atom`.
    pub fn index_of_first_atom(&self, id: NodeId, atom: &A) -> Result<Option<usize>> {
        self[id].successors.index_of_first_atom(atom)
    }

    /// The edge at position `index` among the successors of `id`.
    pub fn successor_at(&self, id: NodeId, index: usize) -> Result<Option<(&Sequence<A>, NodeId)>> {
        self[id].successors.edge_at(index)
    }

    /// Link `child` (or a freshly allocated node) under `id` through `label`.
    ///
    /// The child's aggregate count is added to `id` and all of its ancestors.
    /// A child previously linked under the same label is released.
    pub fn add_successor(
        &mut self,
        id: NodeId,
        label: Sequence<A>,
        child: Option<NodeId>,
    ) -> Result<NodeId> {
        check_non_empty(label.as_slice(), "edge label")?;
        let child = match child {
            Some(child) => {
                if self[child].parent.is_some() {
                    return Err(TrieError::invalid_argument(format!(
                        "node {} is already attached",
                        child.0
                    )));
                }
                if self.is_ancestor(child, id) {
                    return Err(TrieError::invalid_argument(format!(
                        "node {} is an ancestor of node {}",
                        child.0, id.0
                    )));
                }
                child
            }
            None => self.alloc(),
        };

        self.node_mut(child).parent = Some(Parent {
            label: label.clone(),
            node: id,
        });
        if let Some(replaced) = self.node_mut(id).successors.insert(label, child) {
            let lost = self[replaced].count;
            self.node_mut(replaced).parent = None;
            self.propagate(id, -(lost as isize));
            self.release(replaced);
        }
        let gained = self[child].count;
        self.propagate(id, gained as isize);
        Ok(child)
    }

    /// Is `ancestor` on the parent chain of `id`, `id` itself included?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node).map(|(_, parent)| parent);
        }
        false
    }

    /// Unlink the successor of `id` under `label` and return it.
    ///
    /// The child is detached but stays allocated: re-link it with
    /// [`Nodes::add_successor`] or free it with [`Nodes::release`].
    pub fn remove_successor(&mut self, id: NodeId, label: &[A]) -> Option<NodeId> {
        let child = self.node_mut(id).successors.remove(label)?;
        self.node_mut(child).parent = None;
        let lost = self[child].count;
        self.propagate(id, -(lost as isize));
        Some(child)
    }

    /// Store `value` at `id`, returning the previous value.
    ///
    /// Counts change only when presence changes.
    pub fn set_value(&mut self, id: NodeId, value: Option<V>) -> Option<V> {
        let gained = value.is_some() as isize;
        let previous = std::mem::replace(&mut self.node_mut(id).value, value);
        let delta = gained - previous.is_some() as isize;
        if delta != 0 {
            self.propagate(id, delta);
        }
        previous
    }

    // Walk parent handles up to the root, adjusting every count on the way.
    fn propagate(&mut self, from: NodeId, delta: isize) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.count = if delta >= 0 {
                node.count + delta as usize
            } else {
                node.count - delta.unsigned_abs()
            };
            current = node.parent.as_ref().map(|p| p.node);
        }
    }

    /// Free a detached node together with its whole subtree.
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(self[id].parent.is_none(), "releasing an attached node");
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) {
                pending.extend(node.successors.edges().map(|(_, child)| child));
                self.vacant.push(id.0);
            }
        }
        log::trace!("released subtree at node {}", id.0);
    }

    /// The key leading from the root to `id`.
    pub fn path_to(&self, id: NodeId) -> Sequence<A> {
        let mut labels = vec![];
        let mut current = id;
        while let Some((label, parent)) = self.parent(current) {
            labels.push(label);
            current = parent;
        }
        labels
            .into_iter()
            .rev()
            .flat_map(|label| label.iter().cloned())
            .collect()
    }
}

impl<A: TrieAtom, V: Clone, S: SuccessorStore<A>> Nodes<A, V, S> {
    /// Deep copy the successors of `from` underneath `to` in `target`.
    ///
    /// The value of `from` itself is not copied.
    pub fn clone_subtree_into(
        &self,
        from: NodeId,
        target: &mut Nodes<A, V, S>,
        to: NodeId,
    ) -> Result<()> {
        let mut pending = vec![(from, to)];
        while let Some((source, destination)) = pending.pop() {
            for (label, child) in self.successors(source) {
                let copy = target.alloc();
                target.set_value(copy, self.value(child).cloned());
                target.add_successor(destination, label.clone(), Some(copy))?;
                pending.push((child, copy));
            }
        }
        Ok(())
    }
}
