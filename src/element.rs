use std::fmt;
use std::ptr::NonNull;

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Element
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// A raw link to an element; `None` marks the end of a level chain.
pub(crate) type Link<K, V> = Option<NonNull<Element<K, V>>>;

/// A forward-pointer array: slot `i` is the next element at level `i`.
///
/// The list's head sentinel and every element hold one of these, so the descent can be written
/// once against [`Tower`] and start from either.  An element's array has exactly its level as
/// depth; the sentinel's array has the level ceiling as depth.
pub(crate) struct Levels<K, V> {
    pub(crate) links: Vec<Link<K, V>>,
}

impl<K, V> Levels<K, V> {
    pub(crate) fn new(depth: usize) -> Self {
        Levels {
            links: vec![None; depth],
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.links.len()
    }

    /// The link at `level`, or `None` when `level` is out of range.
    pub(crate) fn forward(&self, level: usize) -> Link<K, V> {
        self.links.get(level).copied().flatten()
    }
}

/// Read access to a forward-pointer array.  Implemented by both [`SkipList`](crate::SkipList)
/// (for its head sentinel) and [`Element`], which lets `find_next` resume a search from an
/// arbitrary element exactly as it would start from the head.
pub(crate) trait Tower<K, V> {
    fn levels(&self) -> &Levels<K, V>;
}

/// An entry of a [`SkipList`](crate::SkipList): a key, its value, the derived score, and the
/// level links tying it into the list.
///
/// References to elements are handed out by the owning list and stay valid for as long as the
/// list is borrowed.  An element returned *by value* from one of the `remove` operations is
/// detached: all of its links are cleared, navigation returns `None`, and only the key, value
/// and score remain meaningful.
pub struct Element<K, V> {
    pub(crate) levels: Levels<K, V>,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) score: f64,
    /// The immediately preceding element at level 0.
    pub(crate) prev: Link<K, V>,
    /// The nearest preceding element whose top level is at least this element's top level.
    /// Walking these backwards recovers per-level predecessors during removal without
    /// re-descending from the head.
    pub(crate) prev_top_level: Link<K, V>,
}

impl<K, V> Tower<K, V> for Element<K, V> {
    fn levels(&self) -> &Levels<K, V> {
        &self.levels
    }
}

impl<K, V> Element<K, V> {
    pub(crate) fn new(key: K, value: V, score: f64, level: usize) -> Self {
        Element {
            levels: Levels::new(level),
            key,
            value,
            score,
            prev: None,
            prev_top_level: None,
        }
    }

    /// Detach the element: drop the level array and clear the backward links.  Dropping the
    /// level array (rather than just emptying it) keeps long-lived lists from accumulating
    /// capacity across remove/insert cycles.
    pub(crate) fn reset(&mut self) {
        self.levels.links = Vec::new();
        self.prev = None;
        self.prev_top_level = None;
    }

    /// The element's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The element's value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the element's value.  The key is not mutable, as rewriting it would
    /// break the sort order.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// The score the list's policy derived from the key.  Elements are ordered by ascending
    /// score, with the policy's comparison breaking ties.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// How many levels this element participates in.
    pub fn level(&self) -> usize {
        self.levels.depth()
    }

    /// Consume a detached element, yielding its key and value.
    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    /// The next element in level-0 order.
    pub fn next(&self) -> Option<&Self> {
        self.levels.forward(0).map(|p| unsafe { &*p.as_ptr() })
    }

    /// The previous element in level-0 order.
    pub fn prev(&self) -> Option<&Self> {
        self.prev.map(|p| unsafe { &*p.as_ptr() })
    }

    /// The next element at `level`, or `None` when this element does not reach `level`.
    pub fn next_level(&self, level: usize) -> Option<&Self> {
        self.levels.forward(level).map(|p| unsafe { &*p.as_ptr() })
    }

    /// The previous element at `level`, or `None` when this element does not reach `level` or
    /// nothing precedes it there.
    ///
    /// Level 0 and the element's top level are answered in O(1); intermediate levels walk the
    /// `prev_top_level` chain, which is amortized O(1) and O(log(n)) in the worst case.
    pub fn prev_level(&self, level: usize) -> Option<&Self> {
        let top = self.level();
        if level >= top {
            return None;
        }
        if level == 0 {
            return self.prev();
        }
        if level == top - 1 {
            return self.prev_top_level.map(|p| unsafe { &*p.as_ptr() });
        }

        let mut prev = self.prev;
        while let Some(p) = prev {
            let elem = unsafe { &*p.as_ptr() };
            if level < elem.level() {
                return Some(elem);
            }
            prev = elem.prev_top_level;
        }
        None
    }
}

impl<K, V> fmt::Debug for Element<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Element")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("score", &self.score)
            .field("level", &self.level())
            .finish()
    }
}

impl<K, V> fmt::Display for Element<K, V>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
