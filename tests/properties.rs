//! Property-based tests for every trie shape
//!
//! Each property drives a trie and a `BTreeMap` model through the same
//! operations and checks that they agree, and that the structural rules of the
//! trie hold after every mutation.

use proptest::prelude::*;
use std::collections::BTreeMap;

use seqtrie::error::TrieError;
use seqtrie::node::NodeId;
use seqtrie::patricia::Patricia;
use seqtrie::structure::{Structure, Uncompressed};
use seqtrie::successors::{HashSuccessors, SortedSuccessors, SuccessorStore};
use seqtrie::trie::Trie;

// =============================================================================
// GENERATORS
// =============================================================================

/// Keys over a small alphabet, so that shared prefixes are common
fn key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        10 => prop::collection::vec(b'a'..=b'c', 1..4),
        20 => prop::collection::vec(b'a'..=b'd', 1..10),
        5 => (b'a'..=b'b', 1..8usize).prop_map(|(atom, len)| vec![atom; len]),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Put(Vec<u8>, u32),
    Remove(Vec<u8>),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            2 => key().prop_map(Op::Remove),
        ],
        1..60,
    )
}

// =============================================================================
// HELPERS
// =============================================================================

/// Walk every node and check aggregate counts, the absence of dangling
/// branches and, when `compressed`, that no inner node is a pass-through.
fn check_structure<S: SuccessorStore<u8>, T: Structure>(
    trie: &Trie<u8, u32, S, T>,
    compressed: bool,
) -> Result<(), TestCaseError> {
    let Some(root) = trie.root() else {
        prop_assert_eq!(0, trie.node_count());
        return Ok(());
    };
    let nodes = trie.nodes();
    let mut pending: Vec<NodeId> = vec![root];
    let mut visited = 0;
    while let Some(node) = pending.pop() {
        visited += 1;
        let children: Vec<NodeId> = nodes.successors(node).map(|(_, c)| c).collect();
        let own = nodes.value(node).is_some() as usize;
        let below: usize = children.iter().map(|c| nodes.count(*c)).sum();
        prop_assert_eq!(own + below, nodes.count(node), "aggregate count of {:?}", node);

        if node != root {
            prop_assert!(
                own == 1 || !children.is_empty(),
                "dangling node {:?} survived",
                node
            );
            if compressed {
                prop_assert!(
                    own == 1 || children.len() > 1,
                    "pass-through node {:?} was not merged",
                    node
                );
            }
        }
        pending.extend(children);
    }
    prop_assert_eq!(visited, trie.node_count(), "unreachable nodes in the arena");
    Ok(())
}

fn check_model<S: SuccessorStore<u8>, T: Structure>(
    trie: &Trie<u8, u32, S, T>,
    model: &BTreeMap<Vec<u8>, u32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(model.len(), trie.len());
    prop_assert_eq!(model.len(), trie.iter().count());
    for (k, v) in model {
        prop_assert_eq!(Some(v), trie.get(k.iter().copied()).unwrap());
    }
    let sorted: Vec<(Vec<u8>, u32)> = trie
        .iter_sorted()
        .map(|kv| (kv.key.into_vec(), *kv.value))
        .collect();
    let expected: Vec<(Vec<u8>, u32)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(expected, sorted);
    Ok(())
}

fn run_ops<S: SuccessorStore<u8>, T: Structure>(
    ops: &[Op],
    compressed: bool,
) -> Result<(), TestCaseError> {
    let mut trie: Trie<u8, u32, S, T> = Trie::new();
    let mut model = BTreeMap::new();
    for op in ops {
        match op {
            Op::Put(k, v) => {
                prop_assert_eq!(
                    model.insert(k.clone(), *v),
                    trie.put(k.iter().copied(), *v).unwrap()
                );
            }
            Op::Remove(k) => {
                prop_assert_eq!(model.remove(k), trie.remove(k.iter().copied()).unwrap());
            }
        }
        check_structure(&trie, compressed)?;
    }
    check_model(&trie, &model)
}

fn populated<S: SuccessorStore<u8>, T: Structure>(
    keys: &[Vec<u8>],
) -> (Trie<u8, u32, S, T>, BTreeMap<Vec<u8>, u32>) {
    let mut trie = Trie::new();
    let mut model = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        trie.put(k.iter().copied(), i as u32).unwrap();
        model.insert(k.clone(), i as u32);
    }
    (trie, model)
}

fn check_sub_trie<S: SuccessorStore<u8>, T: Structure>(
    keys: &[Vec<u8>],
    prefix: &[u8],
) -> Result<(), TestCaseError> {
    let (trie, model) = populated::<S, T>(keys);
    let expected: BTreeMap<Vec<u8>, u32> = model
        .iter()
        .filter(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    match trie.sub_trie(prefix.iter().copied()) {
        Ok(mut sub) => {
            prop_assert!(!expected.is_empty());
            check_model(&sub, &expected)?;
            check_structure(&sub, false)?;
            // The copy is detached from its source.
            if let Some(k) = expected.keys().next() {
                sub.remove(k.iter().copied()).unwrap();
                prop_assert_eq!(model.get(k), trie.get(k.iter().copied()).unwrap());
            }
        }
        Err(e) => {
            prop_assert!(expected.is_empty());
            let not_found = matches!(e, TrieError::NotFound { .. });
            prop_assert!(not_found, "expected NotFound, got {:?}", e);
        }
    }
    Ok(())
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn property_patricia_matches_model(ops in ops()) {
        run_ops::<SortedSuccessors<u8>, Patricia>(&ops, true)?;
    }

    #[test]
    fn property_hashed_patricia_matches_model(ops in ops()) {
        run_ops::<HashSuccessors<u8>, Patricia>(&ops, true)?;
    }

    #[test]
    fn property_uncompressed_matches_model(ops in ops()) {
        run_ops::<SortedSuccessors<u8>, Uncompressed>(&ops, false)?;
    }

    #[test]
    fn property_hashed_uncompressed_matches_model(ops in ops()) {
        run_ops::<HashSuccessors<u8>, Uncompressed>(&ops, false)?;
    }

    #[test]
    fn property_removal_keeps_other_keys(
        keys in prop::collection::vec(key(), 1..30),
        victim in any::<prop::sample::Index>(),
    ) {
        let (mut trie, mut model) = populated::<SortedSuccessors<u8>, Patricia>(&keys);
        let victim = victim.get(&keys).clone();
        prop_assert_eq!(model.remove(&victim), trie.remove(victim.iter().copied()).unwrap());
        prop_assert!(!trie.contains_key(victim.iter().copied()).unwrap());
        check_model(&trie, &model)?;
        check_structure(&trie, true)?;
    }

    #[test]
    fn property_sub_trie_holds_prefixed_keys(
        keys in prop::collection::vec(key(), 1..30),
        prefix in prop::collection::vec(b'a'..=b'd', 1..4),
    ) {
        check_sub_trie::<SortedSuccessors<u8>, Patricia>(&keys, &prefix)?;
        check_sub_trie::<HashSuccessors<u8>, Uncompressed>(&keys, &prefix)?;
    }

    #[test]
    fn property_polling_drains_in_key_order(keys in prop::collection::vec(key(), 0..30)) {
        let (mut trie, model) = populated::<SortedSuccessors<u8>, Patricia>(&keys);
        prop_assert_eq!(
            model.iter().next().map(|(k, v)| (k.clone(), *v)),
            trie.first_entry().map(|kv| (kv.key.into_vec(), *kv.value))
        );
        prop_assert_eq!(
            model.iter().next_back().map(|(k, v)| (k.clone(), *v)),
            trie.last_entry().map(|kv| (kv.key.into_vec(), *kv.value))
        );
        let mut polled = vec![];
        while let Some((k, v)) = trie.poll_first_entry().unwrap() {
            polled.push((k.into_vec(), v));
            check_structure(&trie, true)?;
        }
        let expected: Vec<(Vec<u8>, u32)> = model.into_iter().collect();
        prop_assert_eq!(expected, polled);
        prop_assert!(trie.root().is_none());
    }

    #[test]
    fn property_cursor_fails_after_any_mutation(
        keys in prop::collection::vec(key(), 1..20),
        extra in key(),
    ) {
        let (mut trie, _) = populated::<HashSuccessors<u8>, Patricia>(&keys);
        let mut cursor = trie.cursor();
        prop_assert!(cursor.advance(&trie).unwrap().is_some());
        trie.put(extra.iter().copied(), 0).unwrap();
        let failed = matches!(
            cursor.advance(&trie),
            Err(TrieError::ConcurrentModification { .. })
        );
        prop_assert!(failed);
    }

    #[test]
    fn property_compression_never_adds_nodes(keys in prop::collection::vec(key(), 1..30)) {
        let (patricia, _) = populated::<SortedSuccessors<u8>, Patricia>(&keys);
        let (uncompressed, _) = populated::<SortedSuccessors<u8>, Uncompressed>(&keys);
        prop_assert!(patricia.node_count() <= uncompressed.node_count());
    }
}
