//! Patricia (radix) structure.
//!
//! Edges carry the longest run of atoms shared by every key below them, so no
//! node other than the root is ever left with exactly one successor and no
//! value. Insertion splits an edge where a new key diverges from it; removal
//! merges a node which no longer branches back into its parent's edge.
//!
//! ```
//! use seqtrie::trie::PatriciaTrie;
//!
//! let mut trie: PatriciaTrie<char, usize> = PatriciaTrie::new();
//! trie.put("romane".chars(), 1).unwrap();
//! trie.put("romanus".chars(), 2).unwrap();
//! trie.put("romulus".chars(), 3).unwrap();
//!
//! // root -> "rom" -> { "an" -> { "e", "us" }, "ulus" }
//! assert_eq!(6, trie.node_count());
//! assert_eq!(trie.get("romanus".chars()).unwrap(), Some(&2));
//! assert_eq!(trie.get("roman".chars()).unwrap(), None);
//! ```

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{NodeId, Nodes};
use crate::sequence::{common_prefix_len, Sequence, TrieAtom};
use crate::structure::{Operation, Step, Structure};
use crate::successors::SuccessorStore;

/// Path compressed structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Patricia;

impl Patricia {
    /// Fold `node` into its parent's edge if it holds no value and has a
    /// single successor. The root is never merged.
    fn merge<A, V, S>(&self, nodes: &mut Nodes<A, V, S>, node: NodeId) -> Result<()>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        if nodes.value(node).is_some() || nodes.successor_count(node) != 1 {
            return Ok(());
        }
        let Some((inbound, parent)) = nodes.parent(node).map(|(l, p)| (l.clone(), p)) else {
            return Ok(());
        };
        let Some((outbound, child)) = nodes.successors(node).next().map(|(l, c)| (l.clone(), c))
        else {
            return Ok(());
        };

        nodes.remove_successor(parent, &inbound);
        nodes.remove_successor(node, &outbound);
        let merged = inbound.concat(&outbound);
        log::trace!("merged edges {:?} and {:?}", inbound, outbound);
        nodes.add_successor(parent, merged, Some(child))?;
        nodes.release(node);
        Ok(())
    }
}

impl Structure for Patricia {
    fn on_get_successor<A, V, S>(
        &self,
        nodes: &Nodes<A, V, S>,
        node: NodeId,
        remaining: &[A],
        op: Operation,
    ) -> Option<Step>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        let (label, child) = nodes.successor_by_first_atom(node, remaining.first()?)?;
        let edge_len = label.len();
        let common = common_prefix_len(remaining, label);
        let partial = Step {
            child,
            consumed: common,
            edge_len,
        };
        match op {
            // Only an edge the key covers completely leads to a stored key.
            Operation::Get | Operation::Remove => {
                (common == edge_len).then(|| Step::full(child, edge_len))
            }
            // A key ending inside the edge still prefixes everything below it.
            Operation::SubTrie => {
                (common == edge_len || common == remaining.len()).then_some(partial)
            }
            Operation::Put => Some(partial),
        }
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
        let Some(step) = self.on_get_successor(nodes, node, remaining, Operation::Put) else {
            return Ok(None);
        };
        if !step.is_partial() {
            return Ok(Some(step));
        }

        // Split the edge: node -> prefix -> intermediate -> suffix -> child
        let Some(label) = nodes.parent(step.child).map(|(l, _)| l.clone()) else {
            return Ok(None);
        };
        let Some(child) = nodes.remove_successor(node, &label) else {
            return Ok(None);
        };
        let prefix = label.subsequence_range(0, step.consumed);
        let suffix = label.subsequence(step.consumed);
        log::trace!("split edge {:?} into {:?} and {:?}", label, prefix, suffix);
        let intermediate = nodes.add_successor(node, prefix, None)?;
        nodes.add_successor(intermediate, suffix, Some(child))?;
        Ok(Some(Step::full(intermediate, step.consumed)))
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
        let child = nodes.add_successor(node, Sequence::from(remaining), None)?;
        Ok(Step::full(child, remaining.len()))
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
        let Some(child) = nodes.remove_successor(node, label) else {
            return Ok(false);
        };
        nodes.release(child);
        self.merge(nodes, node)?;
        Ok(true)
    }

    fn on_deleted_value<A, V, S>(&self, nodes: &mut Nodes<A, V, S>, node: NodeId) -> Result<()>
    where
        A: TrieAtom,
        S: SuccessorStore<A>,
    {
        self.merge(nodes, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::successors::{HashSuccessors, SortedSuccessors};

    type TestNodes = Nodes<char, usize, SortedSuccessors<char>>;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn label_of(nodes: &TestNodes, id: NodeId) -> String {
        nodes
            .parent(id)
            .map(|(l, _)| l.to_string())
            .unwrap_or_default()
    }

    // root -> "te" -> { "a" (3), "n" (12) }
    fn te_nodes() -> (TestNodes, NodeId, NodeId) {
        let mut nodes = TestNodes::new();
        let root = nodes.alloc();
        let te = nodes.add_successor(root, Sequence::from("te"), None).unwrap();
        let a = nodes.add_successor(te, Sequence::from("a"), None).unwrap();
        nodes.set_value(a, Some(3));
        let n = nodes.add_successor(te, Sequence::from("n"), None).unwrap();
        nodes.set_value(n, Some(12));
        (nodes, root, te)
    }

    #[test]
    fn it_adds_the_whole_remainder_as_one_edge() {
        let mut nodes = TestNodes::new();
        let root = nodes.alloc();
        let step = Patricia
            .on_add_successor(&mut nodes, root, &chars("tea"))
            .unwrap();
        assert_eq!(3, step.consumed);
        assert_eq!("tea", label_of(&nodes, step.child));
    }

    #[test]
    fn it_only_follows_covered_edges_for_get_and_remove() {
        let (nodes, root, te) = te_nodes();
        for op in [Operation::Get, Operation::Remove] {
            assert_eq!(
                Some(Step::full(te, 2)),
                Patricia.on_get_successor(&nodes, root, &chars("tea"), op)
            );
            assert_eq!(
                Some(Step::full(te, 2)),
                Patricia.on_get_successor(&nodes, root, &chars("te"), op)
            );
            assert_eq!(None, Patricia.on_get_successor(&nodes, root, &chars("t"), op));
            assert_eq!(None, Patricia.on_get_successor(&nodes, root, &chars("to"), op));
            assert_eq!(None, Patricia.on_get_successor(&nodes, root, &chars("x"), op));
        }
    }

    #[test]
    fn it_stops_inside_edges_for_sub_tries() {
        let (nodes, root, te) = te_nodes();
        let step = Patricia
            .on_get_successor(&nodes, root, &chars("t"), Operation::SubTrie)
            .unwrap();
        assert_eq!(te, step.child);
        assert!(step.is_partial());
        assert_eq!(1, step.consumed);
        assert_eq!(2, step.edge_len);
        // Diverging inside the edge matches nothing.
        assert_eq!(
            None,
            Patricia.on_get_successor(&nodes, root, &chars("to"), Operation::SubTrie)
        );
    }

    #[test]
    fn it_splits_partially_matched_edges_on_put() {
        let (mut nodes, root, te) = te_nodes();
        let step = Patricia
            .on_put_successor(&mut nodes, root, &chars("to"))
            .unwrap()
            .unwrap();
        assert!(!step.is_partial());
        assert_eq!(1, step.consumed);
        let t = step.child;
        assert_eq!("t", label_of(&nodes, t));
        assert_eq!(Some(te), nodes.get_successor(t, &['e']));
        assert_eq!("e", label_of(&nodes, te));
        assert_eq!(2, nodes.count(t));
        assert_eq!(2, nodes.count(root));

        // Covered edges are followed untouched.
        let step = Patricia
            .on_put_successor(&mut nodes, t, &chars("ed"))
            .unwrap()
            .unwrap();
        assert_eq!(Step::full(te, 1), step);
    }

    #[test]
    fn it_merges_single_successor_nodes_after_removal() {
        let (mut nodes, root, te) = te_nodes();
        assert!(Patricia
            .on_remove_successor(&mut nodes, te, &['n'])
            .unwrap());
        // "te" now has a single successor and no value: it is folded away.
        assert!(!nodes.contains(te));
        let tea = nodes.get_successor(root, &chars("tea")).unwrap();
        assert_eq!(Some(&3), nodes.value(tea));
        assert_eq!(1, nodes.count(root));
        assert_eq!(2, nodes.len());
    }

    #[test]
    fn it_keeps_nodes_with_values_when_merging() {
        let (mut nodes, root, te) = te_nodes();
        nodes.set_value(te, Some(1));
        Patricia
            .on_remove_successor(&mut nodes, te, &['n'])
            .unwrap();
        assert!(nodes.contains(te));
        assert_eq!(Some(te), nodes.get_successor(root, &['t', 'e']));
        assert_eq!(2, nodes.count(root));
    }

    #[test]
    fn it_merges_after_deleting_a_value() {
        let mut nodes = TestNodes::new();
        let root = nodes.alloc();
        let i = nodes.add_successor(root, Sequence::from("i"), None).unwrap();
        nodes.set_value(i, Some(11));
        let inn = nodes.add_successor(i, Sequence::from("nn"), None).unwrap();
        nodes.set_value(inn, Some(9));

        nodes.set_value(i, None);
        Patricia.on_deleted_value(&mut nodes, i).unwrap();
        assert!(!nodes.contains(i));
        assert_eq!(Some(inn), nodes.get_successor(root, &chars("inn")));
        assert_eq!(1, nodes.count(root));
    }

    #[test]
    fn it_never_merges_the_root() {
        let mut nodes = TestNodes::new();
        let root = nodes.alloc();
        nodes.add_successor(root, Sequence::from("a"), None).unwrap();
        Patricia.on_deleted_value(&mut nodes, root).unwrap();
        assert!(nodes.contains(root));
        assert_eq!(1, nodes.successor_count(root));
    }

    #[test]
    fn it_works_with_hashed_successors() {
        let mut nodes: Nodes<char, usize, HashSuccessors<char>> = Nodes::new();
        let root = nodes.alloc();
        let tea = nodes.add_successor(root, Sequence::from("tea"), None).unwrap();
        nodes.set_value(tea, Some(3));
        let step = Patricia
            .on_put_successor(&mut nodes, root, &chars("ten"))
            .unwrap()
            .unwrap();
        assert_eq!(2, step.consumed);
        assert_eq!(Some(tea), nodes.get_successor(step.child, &['a']));
    }
}
