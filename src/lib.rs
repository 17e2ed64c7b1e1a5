//! Provides an in-memory Trie implementation for storing keys composed of
//! sequences of atoms. Every key is associated with a value.
//!
//! Atoms must support the [`crate::sequence::TrieAtom`] trait, which is
//! implemented for anything cloneable, hashable and totally ordered. Keys are
//! handed to the trie as any `IntoIterator` of atoms and handed back as
//! [`crate::sequence::Sequence`] values.
//!
//! The interface relies on iterators to insert, remove, check for existence
//! of keys. Because the trie is based on the concept of atoms, then it
//! is up to the user to decide what kind of atoms to use to make most sense
//! of the keys we are storing. This flexibility can be really useful when
//! string processing: (atoms can be `char` or `&str` graphemes or words) or
//! when working with numeric tries.
//!
//! A trie is shaped by two independent choices, made through its type:
//!  - the successor store of every node: sorted ([`crate::successors::SortedSuccessors`])
//!    or hashed ([`crate::successors::HashSuccessors`])
//!  - the structure: uncompressed ([`crate::structure::Uncompressed`]) or
//!    path compressed ([`crate::patricia::Patricia`])
//!
//! Since the most common use of a tries is to store the chars of a String,
//! a convenience type, [`crate::trie::TrieString`] is provided. The second
//! most common use is to hold a Vec of atoms, for which the
//! [`crate::trie::TrieVec`] type is provided.
//!
//! If these types don't suffice, then you must use the [`crate::trie::Trie`]
//! type directly.
//!
//! Examples:
//! * trie : [`crate::trie`]
//! * iterator : [`crate::iterator`]
//! * patricia : [`crate::patricia`]
//!
//! Typical usages for this data structure:
//!  - Interning
//!  - Storing large numbers of keys with significant amounts of
//!    sub-key duplication
//!  - Prefix matching keys
//!  - Ordered maps over sequence keys

#[cfg(feature = "serde")]
extern crate serde_crate;

pub mod error;
pub mod iterator;
pub mod node;
pub mod patricia;
pub mod sequence;
pub mod structure;
pub mod successors;
pub mod trie;

pub use error::{Result, TrieError};
pub use sequence::{Sequence, TrieAtom};
pub use trie::{PatriciaTrie, Trie, TrieString, TrieVec, UncompressedTrie};
