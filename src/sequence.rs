//! Sequences of atoms.
//!
//! A [`Sequence`] is both the key type returned by iteration and the label
//! carried by every edge of a trie. In an uncompressed trie each label holds
//! exactly one atom, in a Patricia trie a label holds the longest run of atoms
//! shared by every key below it.
//!
//! ```
//! use seqtrie::sequence::Sequence;
//!
//! let key = Sequence::from("tender");
//! assert_eq!(key.subsequence(3), Sequence::from("der"));
//! assert_eq!(key.subsequence_range(0, 3), Sequence::from("ten"));
//! assert_eq!(key.subsequence(3).concat(&Sequence::from("ly")).to_string(), "derly");
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Atoms which we wish to store in a Trie must implement
/// TrieAtom.
pub trait TrieAtom: Clone + Eq + Hash + Ord + fmt::Debug {}

// Blanket implementation which satisfies the compiler
impl<A> TrieAtom for A where A: Clone + Eq + Hash + Ord + fmt::Debug {}

/// An immutable, ordered run of atoms.
///
/// Equality, hashing and ordering are atom-wise, so a `Sequence<A>` may be
/// looked up in a map through a plain `&[A]`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct Sequence<A> {
    atoms: Vec<A>,
}

impl<A> Sequence<A> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self { atoms: Vec::new() }
    }

    /// Number of atoms in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Does the sequence hold no atoms?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// The atoms as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[A] {
        &self.atoms
    }

    /// Consume the sequence, returning its atoms.
    pub fn into_vec(self) -> Vec<A> {
        self.atoms
    }
}

impl<A: Clone> Sequence<A> {
    /// The atoms from `start` to the end.
    ///
    /// Panics if `start > len()`, like slice indexing.
    pub fn subsequence(&self, start: usize) -> Self {
        Self::from(&self.atoms[start..])
    }

    /// The atoms in `start..end`.
    ///
    /// Panics if the range is out of bounds, like slice indexing.
    pub fn subsequence_range(&self, start: usize, end: usize) -> Self {
        Self::from(&self.atoms[start..end])
    }

    /// A new sequence holding our atoms followed by those of `other`.
    pub fn concat(&self, other: &[A]) -> Self {
        let mut atoms = Vec::with_capacity(self.atoms.len() + other.len());
        atoms.extend_from_slice(&self.atoms);
        atoms.extend_from_slice(other);
        Self { atoms }
    }
}

/// Length of the longest common prefix of two runs of atoms.
pub fn common_prefix_len<A: PartialEq>(a: &[A], b: &[A]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<A> Deref for Sequence<A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        &self.atoms
    }
}

impl<A> AsRef<[A]> for Sequence<A> {
    fn as_ref(&self) -> &[A] {
        &self.atoms
    }
}

impl<A> Borrow<[A]> for Sequence<A> {
    fn borrow(&self) -> &[A] {
        &self.atoms
    }
}

impl<A> From<Vec<A>> for Sequence<A> {
    fn from(atoms: Vec<A>) -> Self {
        Self { atoms }
    }
}

impl<A: Clone> From<&[A]> for Sequence<A> {
    fn from(atoms: &[A]) -> Self {
        Self {
            atoms: atoms.to_vec(),
        }
    }
}

impl<A: Clone, const N: usize> From<[A; N]> for Sequence<A> {
    fn from(atoms: [A; N]) -> Self {
        Self {
            atoms: atoms.to_vec(),
        }
    }
}

impl From<&str> for Sequence<char> {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl<A> FromIterator<A> for Sequence<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

impl<A> IntoIterator for Sequence<A> {
    type Item = A;
    type IntoIter = std::vec::IntoIter<A>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a Sequence<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl<A: fmt::Debug> fmt::Debug for Sequence<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.atoms.iter()).finish()
    }
}

impl fmt::Display for Sequence<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.atoms.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

impl PartialEq<str> for Sequence<char> {
    fn eq(&self, other: &str) -> bool {
        self.atoms.iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Sequence<char> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Orders atoms, and through them edge labels, for the sorted successor
/// store.
pub trait AtomComparator<A>: Clone + Default + fmt::Debug {
    /// Compare two atoms.
    fn compare(&self, a: &A, b: &A) -> Ordering;

    /// Compare two labels atom by atom. A label sorts before every longer
    /// label it is a prefix of.
    fn compare_labels(&self, a: &[A], b: &[A]) -> Ordering {
        a.iter()
            .zip(b)
            .map(|(x, y)| self.compare(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    }
}

/// Orders atoms by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Natural;

impl<A: Ord> AtomComparator<A> for Natural {
    #[inline]
    fn compare(&self, a: &A, b: &A) -> Ordering {
        a.cmp(b)
    }
}

/// Orders atoms in the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Reversed;

impl<A: Ord> AtomComparator<A> for Reversed {
    #[inline]
    fn compare(&self, a: &A, b: &A) -> Ordering {
        b.cmp(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_extracts_subsequences() {
        let seq = Sequence::from("abcdef");
        assert_eq!(seq.subsequence(0), seq);
        assert_eq!(seq.subsequence(4), Sequence::from("ef"));
        assert!(seq.subsequence(6).is_empty());
        assert_eq!(seq.subsequence_range(1, 3), Sequence::from("bc"));
    }

    #[test]
    #[should_panic]
    fn it_panics_on_out_of_range_subsequence() {
        Sequence::from("abc").subsequence(4);
    }

    #[test]
    fn it_concatenates() {
        let seq = Sequence::from([1, 2]);
        assert_eq!(seq.concat(&[3, 4]), Sequence::from(vec![1, 2, 3, 4]));
        assert_eq!(seq.concat(&[]), seq);
        assert_eq!(Sequence::<u8>::new().concat(&[5]).len(), 1);
    }

    #[test]
    fn it_compares_with_strings() {
        let seq = Sequence::from("tea");
        assert_eq!(seq, "tea");
        assert!(seq != "ted");
        assert_eq!("tea", seq.to_string());
        assert_eq!("['t', 'e', 'a']", format!("{:?}", seq));
    }

    #[test]
    fn it_orders_prefixes_first() {
        let mut seqs = vec![
            Sequence::from("ten"),
            Sequence::from("te"),
            Sequence::from("i"),
            Sequence::from("tea"),
        ];
        seqs.sort();
        let sorted: Vec<String> = seqs.iter().map(|s| s.to_string()).collect();
        assert_eq!(vec!["i", "te", "tea", "ten"], sorted);
    }

    #[test]
    fn it_finds_common_prefixes() {
        assert_eq!(2, common_prefix_len(&['t', 'e', 'a'], &['t', 'e', 'n']));
        assert_eq!(0, common_prefix_len(&['a'], &['b']));
        assert_eq!(1, common_prefix_len(&['a'], &['a', 'b']));
        assert_eq!(0, common_prefix_len::<u8>(&[], &[1]));
    }

    #[test]
    fn it_compares_labels_with_comparators() {
        let natural = Natural;
        assert_eq!(Ordering::Less, natural.compare_labels(&[1, 2], &[1, 3]));
        assert_eq!(Ordering::Less, natural.compare_labels(&[1], &[1, 0]));
        assert_eq!(Ordering::Equal, natural.compare_labels(&[4, 4], &[4, 4]));

        let reversed = Reversed;
        assert_eq!(Ordering::Greater, reversed.compare_labels(&[1, 2], &[1, 3]));
        // Prefixes still come first.
        assert_eq!(Ordering::Less, reversed.compare_labels(&[1], &[1, 0]));
    }
}
