use std::cmp::Ordering;

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Ordering policy
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// The ordering policy of a [`SkipList`](crate::SkipList): how a key maps to its ranking score,
/// and how two keys sharing a score are told apart.
///
/// The policy **must** be well-behaved:
///
/// - `score` must be deterministic and depend on the key alone;
/// - `compare` must be a total order (well defined, anti-symmetric, transitive);
/// - `score` must be monotonic with `compare`: `compare(a, b) == Greater` implies
///   `score(a) >= score(b)`, `compare(a, b) == Less` implies `score(a) <= score(b)`, and
///   `compare(a, b) == Equal` requires `score(a) == score(b)`.
///
/// The list orders elements by score first and only consults `compare` when two scores are equal,
/// so a non-monotonic policy silently breaks the sort order.  There is no runtime validation.
pub trait Comparable<K: ?Sized> {
    /// The ranking score of `key`, used as the primary sort key.
    fn score(&self, key: &K) -> f64;

    /// Total order over keys, used to break ties between keys with equal scores.
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Default scoring and comparison for a key type, picked up by [`NaturalComparable`].
///
/// Implementations exist for the primitive integers and floats (the numeric value is the score),
/// and for strings and byte sequences (the first 8 bytes, packed big-endian into a `u64` and cast
/// to `f64`, are the score).  Two strings sharing their first 8 bytes therefore always collide on
/// score, and the full lexicographic comparison breaks the tie; the truncation is deliberate and
/// kept so that the resulting order is exactly the lexicographic one.
pub trait ScoreKey {
    /// The ranking score of this key.
    fn score(&self) -> f64;

    /// Total order consistent with [`ScoreKey::score`].
    fn compare(&self, other: &Self) -> Ordering;
}

/// The default ordering policy: delegates to the key type's [`ScoreKey`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalComparable;

impl<K: ScoreKey> Comparable<K> for NaturalComparable {
    fn score(&self, key: &K) -> f64 {
        key.score()
    }

    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        ScoreKey::compare(lhs, rhs)
    }
}

/// An ordering policy built from a plain comparison function.
///
/// Every key scores `0.0`, so the supplied comparison alone drives the order.  Lookups degrade to
/// the tie-break path on every probe, which is still correct, just slower than a scored policy.
///
/// # Examples
///
/// ```
/// use scorelist::{ComparableFn, SkipList};
///
/// let mut list = SkipList::with_comparable(ComparableFn(|a: &i64, b: &i64| b.cmp(a)));
/// list.set(1, "one");
/// list.set(2, "two");
/// // Reversed order: 2 first.
/// assert_eq!(*list.front().unwrap().key(), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ComparableFn<F>(pub F);

impl<K, F> Comparable<K> for ComparableFn<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn score(&self, _key: &K) -> f64 {
        0.0
    }

    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        (self.0)(lhs, rhs)
    }
}

/// First 8 bytes of `bytes`, packed big-endian into a `u64` and cast to `f64`.
fn prefix_score(bytes: &[u8]) -> f64 {
    let mut hash: u64 = 0;
    for (i, &b) in bytes.iter().take(8).enumerate() {
        hash |= u64::from(b) << (56 - 8 * i);
    }
    hash as f64
}

macro_rules! int_score_key {
    ($($t:ty)*) => {$(
        impl ScoreKey for $t {
            fn score(&self) -> f64 {
                *self as f64
            }

            fn compare(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }
        }
    )*};
}

int_score_key! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize }

impl ScoreKey for f64 {
    fn score(&self) -> f64 {
        *self
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl ScoreKey for f32 {
    fn score(&self) -> f64 {
        f64::from(*self)
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl ScoreKey for String {
    fn score(&self) -> f64 {
        prefix_score(self.as_bytes())
    }

    fn compare(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
}

impl<'a> ScoreKey for &'a str {
    fn score(&self) -> f64 {
        prefix_score(self.as_bytes())
    }

    fn compare(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
}

impl ScoreKey for Vec<u8> {
    fn score(&self) -> f64 {
        prefix_score(self)
    }

    fn compare(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
}

impl<'a> ScoreKey for &'a [u8] {
    fn score(&self) -> f64 {
        prefix_score(self)
    }

    fn compare(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
}
