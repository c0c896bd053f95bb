//! A score-ordered skip list: an in-memory ordered associative index in which elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` expected time.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each element `[x]` has references to elements further down the list, allowing a search
//! to effectively skip ahead.
//!
//! Ordering is driven by a [`Comparable`] policy supplied at construction: every key maps to an
//! `f64` score (the primary sort key), and keys sharing a score are told apart by the policy's
//! total-order comparison.  Numeric keys score as their own value; string and byte-sequence keys
//! score as their first 8 bytes packed big-endian into a `u64`, with the full lexicographic
//! comparison breaking the frequent score ties between keys sharing that prefix.  A key that
//! compares equal to one already stored overwrites its value in place.
//!
//! The policy **must** be well-behaved: `compare` must be a total order, and `score` must be
//! monotonic with it (see [`Comparable`]).  Failure to satisfy these properties silently breaks
//! the sort order; there is no runtime validation.
//!
//! Beyond lookups, the list exposes its elements directly: [`Element`] handles navigate
//! forwards, backwards and per level, and [`SkipList::find_next`] resumes a search from a
//! previously found element, so repeated forward range scans do not pay for a fresh descent
//! from the head.
//!
//! The list performs no internal locking and is meant for single-threaded ownership; wrap it in
//! a lock if it has to be shared.
//!
//! # Examples
//!
//! ```
//! use scorelist::SkipList;
//!
//! let mut list = SkipList::new();
//! list.set(12.34, "first");
//! list.set(23.45, "second");
//! list.set(16.78, "middle");
//! list.set(9.01, "very beginning");
//!
//! assert_eq!(list.len(), 4);
//! assert_eq!(*list.front().unwrap().value(), "very beginning");
//! assert_eq!(*list.back().unwrap().value(), "second");
//! assert_eq!(*list.find(&15.0).unwrap().key(), 16.78);
//!
//! let removed = list.remove(&23.45).unwrap();
//! assert_eq!(removed.into_entry(), (23.45, "second"));
//! assert_eq!(*list.back().unwrap().key(), 16.78);
//! ```

mod comparable;
mod element;
mod error;
mod level_generator;
mod skiplist;

pub use crate::comparable::{Comparable, ComparableFn, NaturalComparable, ScoreKey};
pub use crate::element::Element;
pub use crate::error::Error;
pub use crate::level_generator::{GeometricalLevelGenerator, LevelGenerator};
pub use crate::skiplist::{Iter, SkipList, DEFAULT_MAX_LEVEL};
