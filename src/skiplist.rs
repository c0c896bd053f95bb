use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::comparable::{Comparable, NaturalComparable, ScoreKey};
use crate::element::{Element, Levels, Link, Tower};
use crate::error::Error;
use crate::level_generator::{GeometricalLevelGenerator, LevelGenerator};

/// The level ceiling used by [`SkipList::new`] and [`SkipList::with_comparable`].  The ceiling of
/// an individual list can be changed afterwards with [`SkipList::set_max_level`].
pub const DEFAULT_MAX_LEVEL: usize = 48;

/// The probability of a new element reaching each further level: a fair coin flip.
const LEVEL_P: f64 = 0.5;

// /////////////////////////////////////////////////////////////////////////////////////////////////
// SkipList
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// An ordered associative index keyed by a derived score.
///
/// Conceptually, a skiplist resembles something like:
///
/// ```text
/// <head> ----------> [2] --------------------------------------------------> [9] ---------->
/// <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
/// <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
/// <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
/// ```
///
/// where each element `[x]` has references to elements further down the list, allowing a search
/// to skip ahead.  Elements are kept in ascending order of the score derived by the list's
/// [`Comparable`] policy, with the policy's comparison breaking ties between equal scores, and
/// search, insertion and removal all run in `O(log(n))` expected time.
///
/// A key that compares equal to one already stored overwrites that element's value in place; the
/// list never holds two elements whose keys compare equal.
///
/// The list performs no internal synchronization and its elements are tied together with raw
/// links, so it is neither `Send` nor `Sync`; concurrent use requires an external
/// mutual-exclusion boundary around the whole list.
///
/// # Examples
///
/// ```
/// use scorelist::SkipList;
///
/// let mut list = SkipList::new();
/// list.set(12.34, "first");
/// list.set(23.45, "second");
/// list.set(16.78, "middle");
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get_value(&16.78), Some(&"middle"));
/// assert_eq!(*list.find(&15.0).unwrap().key(), 16.78);
/// ```
pub struct SkipList<K, V, C = NaturalComparable> {
    /// The head sentinel's forward pointers.  Always at least `max_level` deep; deeper only when
    /// a previous, higher ceiling still houses elements.
    head: Levels<K, V>,
    /// The last element in level-0 order.  Maintained incrementally, never recomputed.
    back: Link<K, V>,
    len: usize,
    max_level: usize,
    comparable: C,
    level_generator: Box<dyn LevelGenerator>,
}

impl<K, V, C> Tower<K, V> for SkipList<K, V, C> {
    fn levels(&self) -> &Levels<K, V> {
        &self.head
    }
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K: ScoreKey, V> SkipList<K, V> {
    /// Create a new skiplist ordered by the key type's [`ScoreKey`] implementation, with the
    /// default ceiling of [`DEFAULT_MAX_LEVEL`] levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list: SkipList<i64, String> = SkipList::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_comparable(NaturalComparable)
    }
}

impl<K, V, C: Comparable<K>> SkipList<K, V, C> {
    /// Create a new skiplist ordered by `comparable`, with the default ceiling of
    /// [`DEFAULT_MAX_LEVEL`] levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::{ComparableFn, SkipList};
    ///
    /// let mut list = SkipList::with_comparable(ComparableFn(|a: &u64, b: &u64| b.cmp(a)));
    /// list.set(3, ());
    /// list.set(8, ());
    /// assert_eq!(*list.front().unwrap().key(), 8);
    /// ```
    #[inline]
    pub fn with_comparable(comparable: C) -> Self {
        let lg = GeometricalLevelGenerator::new(DEFAULT_MAX_LEVEL, LEVEL_P);
        Self::build(comparable, DEFAULT_MAX_LEVEL, Box::new(lg))
    }

    /// Create a new skiplist with an explicit level ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxLevel`] when `max_level` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::{NaturalComparable, SkipList};
    ///
    /// let list: SkipList<i64, ()> = SkipList::with_max_level(NaturalComparable, 16).unwrap();
    /// assert_eq!(list.max_level(), 16);
    /// assert!(SkipList::<i64, ()>::with_max_level(NaturalComparable, 0).is_err());
    /// ```
    pub fn with_max_level(comparable: C, max_level: usize) -> Result<Self, Error> {
        if max_level == 0 {
            return Err(Error::InvalidMaxLevel(max_level));
        }
        let lg = GeometricalLevelGenerator::new(max_level, LEVEL_P);
        Ok(Self::build(comparable, max_level, Box::new(lg)))
    }

    /// Create a new skiplist drawing element levels from a caller-supplied generator.  The
    /// generator's `total()` becomes the list's level ceiling.  A seeded
    /// [`GeometricalLevelGenerator`](crate::GeometricalLevelGenerator) makes the list's shape
    /// reproducible, which is mostly useful in tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxLevel`] when the generator reports a zero ceiling.
    pub fn with_level_generator(
        comparable: C,
        level_generator: Box<dyn LevelGenerator>,
    ) -> Result<Self, Error> {
        let max_level = level_generator.total();
        if max_level == 0 {
            return Err(Error::InvalidMaxLevel(max_level));
        }
        Ok(Self::build(comparable, max_level, level_generator))
    }

    fn build(comparable: C, max_level: usize, level_generator: Box<dyn LevelGenerator>) -> Self {
        SkipList {
            head: Levels::new(max_level),
            back: None,
            len: 0,
            max_level,
            comparable,
            level_generator,
        }
    }

    /// Insert `value` under `key`, or overwrite in place when an element whose key compares
    /// equal already exists.  Returns the inserted or updated element.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.set(16.78, "middle");
    /// list.set(16.78, "middle overwrite");
    /// assert_eq!(list.len(), 1);
    /// assert_eq!(list.get_value(&16.78), Some(&"middle overwrite"));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> &mut Element<K, V> {
        let score = self.comparable.score(&key);

        if self.len == 0 {
            let level = self.rand_level();
            let node = NonNull::from(Box::leak(Box::new(Element::new(key, value, score, level))));
            for lvl in 0..level {
                self.head.links[lvl] = Some(node);
            }
            self.back = Some(node);
            self.len = 1;
            return unsafe { &mut *node.as_ptr() };
        }

        // Record the predecessor at every level on the way down.  `None` stands for the head
        // sentinel.
        let depth = self.head.depth();
        let mut preds: Vec<Link<K, V>> = vec![None; depth];
        let mut pred: Link<K, V> = None;

        let mut i = depth;
        while i > 0 {
            let lvl = i - 1;
            preds[lvl] = pred;

            let mut next = self.forward(pred, lvl);
            while let Some(n) = next {
                match self.compare_to(score, &key, unsafe { n.as_ref() }) {
                    Ordering::Greater => {
                        pred = Some(n);
                        preds[lvl] = pred;
                        next = self.forward(pred, lvl);
                    }
                    Ordering::Equal => {
                        let elem = unsafe { &mut *n.as_ptr() };
                        elem.value = value;
                        return elem;
                    }
                    Ordering::Less => break,
                }
            }

            // Levels whose forward pointer is unchanged share this predecessor.
            let top = self.forward(pred, lvl);
            i -= 1;
            while i > 0 && self.forward(pred, i - 1) == top {
                preds[i - 1] = pred;
                i -= 1;
            }
        }

        let level = self.rand_level();
        let mut node = Box::new(Element::new(key, value, score, level));
        node.prev = preds[0];
        node.prev_top_level = preds[level - 1];
        let ptr = NonNull::from(Box::leak(node));

        unsafe {
            for lvl in 0..level {
                let slot = self.forward_slot(preds[lvl], lvl);
                (&mut (*ptr.as_ptr()).levels.links)[lvl] = *slot;
                *slot = Some(ptr);
            }

            // The highest of the new element's levels with a successor.
            let mut largest = 0;
            for lvl in (0..level).rev() {
                if (&(*ptr.as_ptr()).levels.links)[lvl].is_some() {
                    largest = lvl + 1;
                    break;
                }
            }

            if let Some(mut next) = (&(*ptr.as_ptr()).levels.links)[0] {
                next.as_mut().prev = Some(ptr);
            }

            // Successors no taller than the new element now have it as their top-level
            // predecessor.  Each hop lands on the next strictly taller successor.
            let mut lvl = 0;
            while lvl < largest {
                let Some(mut next) = (&(*ptr.as_ptr()).levels.links)[lvl] else {
                    break;
                };
                let next_level = next.as_ref().level();
                if next_level <= level {
                    next.as_mut().prev_top_level = Some(ptr);
                }
                lvl = next_level;
            }

            if (&(*ptr.as_ptr()).levels.links)[0].is_none() {
                self.back = Some(ptr);
            }

            self.len += 1;
            &mut *ptr.as_ptr()
        }
    }

    /// The element whose key compares equal to `key`, or `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.set(9.01, "very beginning");
    /// assert!(list.get(&9.01).is_some());
    /// assert!(list.get(&9.02).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<&Element<K, V>> {
        let score = self.comparable.score(key);
        let found = self.find_at_least(None, score, key)?;
        unsafe {
            if self.compare_to(score, key, found.as_ref()) == Ordering::Equal {
                Some(&*found.as_ptr())
            } else {
                None
            }
        }
    }

    /// Like [`SkipList::get`], but the element's value is mutable.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut Element<K, V>> {
        let score = self.comparable.score(key);
        let found = self.find_at_least(None, score, key)?;
        unsafe {
            if self.compare_to(score, key, found.as_ref()) == Ordering::Equal {
                Some(&mut *found.as_ptr())
            } else {
                None
            }
        }
    }

    /// The value stored under `key`, or `None`.
    pub fn get_value(&self, key: &K) -> Option<&V> {
        self.get(key).map(|elem| elem.value())
    }

    /// The first element whose key is greater than or equal to `key`, or `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.set(16.78, "middle");
    /// list.set(23.45, "second");
    /// assert_eq!(*list.find(&15.0).unwrap().key(), 16.78);
    /// assert_eq!(*list.find(&20.0).unwrap().key(), 23.45);
    /// assert!(list.find(&30.0).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Element<K, V>> {
        self.find_next(None, key)
    }

    /// The first element at or after `start` whose key is greater than or equal to `key`; when
    /// `start` itself qualifies it is returned.  With `start == None` this is [`SkipList::find`].
    ///
    /// Resuming from a previously found element avoids re-descending from the head, which makes
    /// repeated forward range scans cheap.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// for key in [10i64, 20, 30, 40] {
    ///     list.set(key, ());
    /// }
    /// let first = list.find(&15).unwrap();
    /// assert_eq!(*first.key(), 20);
    /// let second = list.find_next(Some(first), &35).unwrap();
    /// assert_eq!(*second.key(), 40);
    /// ```
    pub fn find_next<'a>(
        &'a self,
        start: Option<&'a Element<K, V>>,
        key: &K,
    ) -> Option<&'a Element<K, V>> {
        let score = self.comparable.score(key);
        self.find_at_least(start, score, key)
            .map(|p| unsafe { &*p.as_ptr() })
    }

    /// Remove the element whose key compares equal to `key`, returning it detached, or `None`
    /// when no such element exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.set(23.45, "second");
    /// let removed = list.remove(&23.45).unwrap();
    /// assert_eq!(removed.into_entry(), (23.45, "second"));
    /// assert!(list.remove(&23.45).is_none());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<Element<K, V>> {
        let score = self.comparable.score(key);
        let found = self.find_at_least(None, score, key)?;
        unsafe {
            if self.compare_to(score, key, found.as_ref()) != Ordering::Equal {
                return None;
            }
            Some(self.remove_element(found))
        }
    }

    /// Descend towards the first element `>=` the query, starting either from the head sentinel
    /// or from `start`'s own forward pointers.
    fn find_at_least(
        &self,
        start: Option<&Element<K, V>>,
        score: f64,
        key: &K,
    ) -> Link<K, V> {
        if self.len == 0 {
            return None;
        }

        unsafe {
            match start {
                None => {
                    let front = self.head.forward(0)?;
                    if self.compare_to(score, key, front.as_ref()) != Ordering::Greater {
                        return Some(front);
                    }
                }
                Some(elem) => {
                    if self.compare_to(score, key, elem) != Ordering::Greater {
                        return Some(NonNull::from(elem));
                    }
                }
            }
            let back = self.back?;
            if self.compare_to(score, key, back.as_ref()) == Ordering::Greater {
                return None;
            }

            let mut tower: &Levels<K, V> = match start {
                Some(elem) => Tower::levels(elem),
                None => Tower::levels(self),
            };
            let mut found: Link<K, V> = None;

            let mut i = tower.depth();
            while i > 0 {
                let lvl = i - 1;

                let mut next = tower.forward(lvl);
                while let Some(n) = next {
                    match self.compare_to(score, key, n.as_ref()) {
                        Ordering::Greater => {
                            tower = Tower::levels(&*n.as_ptr());
                            next = tower.forward(lvl);
                        }
                        Ordering::Equal => return Some(n),
                        Ordering::Less => {
                            found = Some(n);
                            break;
                        }
                    }
                }

                let top = tower.forward(lvl);
                i -= 1;
                while i > 0 && tower.forward(i - 1) == top {
                    i -= 1;
                }
            }

            found
        }
    }

    /// Order the query `(score, key)` against an element: by score first, by the policy's
    /// comparison when the scores are equal.
    fn compare_to(&self, score: f64, key: &K, rhs: &Element<K, V>) -> Ordering {
        if score != rhs.score {
            if score > rhs.score {
                return Ordering::Greater;
            }
            if score < rhs.score {
                return Ordering::Less;
            }
            return Ordering::Equal;
        }
        self.comparable.compare(key, &rhs.key)
    }

    /// The forward link at `lvl` of `pred`, where `None` stands for the head sentinel.
    fn forward(&self, pred: Link<K, V>, lvl: usize) -> Link<K, V> {
        match pred {
            Some(p) => unsafe { p.as_ref() }.levels.forward(lvl),
            None => self.head.forward(lvl),
        }
    }

    /// The forward slot at `lvl` of `pred`, for splicing.
    unsafe fn forward_slot(&mut self, pred: Link<K, V>, lvl: usize) -> &mut Link<K, V> {
        match pred {
            Some(p) => &mut (&mut (*p.as_ptr()).levels.links)[lvl],
            None => &mut self.head.links[lvl],
        }
    }
}

impl<K, V, C> SkipList<K, V, C> {
    /// The number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current level ceiling.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// The first element in level-0 order, or `None` if the list is empty.
    #[inline]
    pub fn front(&self) -> Option<&Element<K, V>> {
        self.head.forward(0).map(|p| unsafe { &*p.as_ptr() })
    }

    /// Like [`SkipList::front`], but the element's value is mutable.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut Element<K, V>> {
        self.head.forward(0).map(|p| unsafe { &mut *p.as_ptr() })
    }

    /// The last element in level-0 order, or `None` if the list is empty.
    #[inline]
    pub fn back(&self) -> Option<&Element<K, V>> {
        self.back.map(|p| unsafe { &*p.as_ptr() })
    }

    /// Like [`SkipList::back`], but the element's value is mutable.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut Element<K, V>> {
        self.back.map(|p| unsafe { &mut *p.as_ptr() })
    }

    /// Remove and return the first element, or `None` if the list is empty.
    pub fn remove_front(&mut self) -> Option<Element<K, V>> {
        let front = self.head.forward(0)?;
        Some(unsafe { self.remove_element(front) })
    }

    /// Remove and return the last element, or `None` if the list is empty.
    pub fn remove_back(&mut self) -> Option<Element<K, V>> {
        let back = self.back?;
        Some(unsafe { self.remove_element(back) })
    }

    /// Unlink `elem` from the list and return it detached, with its level array released.
    ///
    /// Predecessors above level 0 are recovered by walking `prev_top_level` chains backwards
    /// from the element, an expected `O(log(n))` walk, rather than by re-descending from the
    /// head.
    ///
    /// # Safety
    ///
    /// `elem` must point to an element currently stored in this list.  Pointers to elements of
    /// another list, or to an element already removed, are not detected.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    /// use std::ptr::NonNull;
    ///
    /// let mut list = SkipList::new();
    /// for key in [1i64, 2, 3] {
    ///     list.set(key, ());
    /// }
    /// let handle = NonNull::from(list.get_mut(&2).unwrap());
    /// let removed = unsafe { list.remove_element(handle) };
    /// assert_eq!(*removed.key(), 2);
    /// assert_eq!(list.len(), 2);
    /// ```
    pub unsafe fn remove_element(&mut self, elem: NonNull<Element<K, V>>) -> Element<K, V> {
        let level = elem.as_ref().level();

        // Walk backwards through `prev_top_level` chains, collecting the predecessor at every
        // level the element occupies.  Levels past `max` have the head sentinel as predecessor.
        let mut preds: Vec<Link<K, V>> = vec![None; level];
        let mut max = 0;
        let mut prev = elem.as_ref().prev;
        while let Some(p) = prev {
            if max >= level {
                break;
            }
            let prev_level = p.as_ref().level();
            while max < prev_level && max < level {
                preds[max] = Some(p);
                max += 1;
            }
            prev = p.as_ref().prev_top_level;
            while let Some(q) = prev {
                if q.as_ref().level() != prev_level {
                    break;
                }
                prev = q.as_ref().prev_top_level;
            }
        }

        for lvl in 0..max {
            if let Some(mut p) = preds[lvl] {
                p.as_mut().levels.links[lvl] = elem.as_ref().levels.links[lvl];
            }
        }
        for lvl in max..level {
            self.head.links[lvl] = elem.as_ref().levels.links[lvl];
        }

        if let Some(mut next) = elem.as_ref().levels.links[0] {
            next.as_mut().prev = elem.as_ref().prev;
        }

        // Successors whose top-level predecessor was the removed element get re-aimed at the
        // recovered predecessor for their own top level.
        let mut lvl = 0;
        while lvl < level {
            let Some(mut next) = elem.as_ref().levels.links[lvl] else {
                break;
            };
            if next.as_ref().prev_top_level != Some(elem) {
                break;
            }
            lvl = next.as_ref().level();
            next.as_mut().prev_top_level = preds[lvl - 1];
        }

        if self.back == Some(elem) {
            self.back = elem.as_ref().prev;
        }

        self.len -= 1;
        let mut boxed = Box::from_raw(elem.as_ptr());
        boxed.reset();
        *boxed
    }

    /// Change the level ceiling, returning the previous one.
    ///
    /// Growing extends the head sentinel with empty slots.  Shrinking truncates the sentinel,
    /// but never below the highest level still housing an element, so no element is ever cut
    /// off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxLevel`] when `level` is zero; the list is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::{Error, SkipList};
    ///
    /// let mut list: SkipList<i64, ()> = SkipList::new();
    /// list.set(1, ());
    /// assert!(list.set_max_level(128).is_ok());
    /// assert_eq!(list.set_max_level(0), Err(Error::InvalidMaxLevel(0)));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn set_max_level(&mut self, level: usize) -> Result<usize, Error> {
        if level == 0 {
            return Err(Error::InvalidMaxLevel(level));
        }

        let old = self.head.depth();
        self.max_level = level;
        self.level_generator.set_total(level);

        if level < old {
            let mut keep = level;
            for lvl in (level..old).rev() {
                if self.head.links[lvl].is_some() {
                    keep = lvl + 1;
                    break;
                }
            }
            self.head.links.truncate(keep);
        } else {
            self.head.links.resize(level, None);
        }
        Ok(old)
    }

    /// Reset the list to empty, dropping every element and preserving the configured ceiling.
    pub fn init(&mut self) {
        self.clear_nodes();
        for slot in self.head.links.iter_mut() {
            *slot = None;
        }
        self.back = None;
        self.len = 0;
    }

    /// An iterator over the entries in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorelist::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.set(2i64, "b");
    /// list.set(1i64, "a");
    /// let keys: Vec<i64> = list.iter().map(|(&k, _)| k).collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            front: self.head.forward(0),
            back: self.back,
            remaining: self.len,
            marker: PhantomData,
        }
    }

    /// Draw the level for a new element, in `[1, max_level]`.
    fn rand_level(&mut self) -> usize {
        self.level_generator.random().clamp(1, self.max_level)
    }

    /// Free every element.  The head links are left dangling; callers reset or drop them.
    fn clear_nodes(&mut self) {
        let mut node = self.head.forward(0);
        while let Some(p) = node {
            unsafe {
                let boxed = Box::from_raw(p.as_ptr());
                node = boxed.levels.forward(0);
            }
        }
    }
}

// ///////////////////////////////////////////////
// Internal structure checks
// ///////////////////////////////////////////////

#[cfg(test)]
impl<K, V, C: Comparable<K>> SkipList<K, V, C> {
    /// Assert every structural invariant.  Quadratic; test-only.
    fn check(&self) {
        unsafe {
            let mut count = 0;
            let mut prev: Link<K, V> = None;
            let mut node = self.head.forward(0);
            while let Some(n) = node {
                let elem = n.as_ref();
                assert_eq!(elem.prev, prev, "level-0 prev must mirror the forward chain");
                assert!(elem.level() >= 1, "every element occupies level 0");
                assert!(
                    elem.level() <= self.head.depth(),
                    "element level exceeds the head sentinel"
                );

                if let Some(p) = prev {
                    let pe = p.as_ref();
                    assert_eq!(
                        self.compare_to(pe.score, &pe.key, elem),
                        Ordering::Less,
                        "level-0 chain must be strictly increasing"
                    );
                }

                // prev_top_level: the nearest preceding element at least as tall.
                let mut expected: Link<K, V> = None;
                let mut back = elem.prev;
                while let Some(b) = back {
                    if b.as_ref().level() >= elem.level() {
                        expected = Some(b);
                        break;
                    }
                    back = b.as_ref().prev;
                }
                assert_eq!(
                    elem.prev_top_level, expected,
                    "prev_top_level must point at the nearest tall-enough predecessor"
                );

                count += 1;
                prev = node;
                node = elem.levels.forward(0);
            }
            assert_eq!(count, self.len, "length must match the level-0 chain");
            assert_eq!(self.back, prev, "back must be the last level-0 element");

            let mut lower: Vec<NonNull<Element<K, V>>> = Vec::new();
            let mut node = self.head.forward(0);
            while let Some(n) = node {
                lower.push(n);
                node = n.as_ref().levels.forward(0);
            }

            for lvl in 1..self.head.depth() {
                let mut chain: Vec<NonNull<Element<K, V>>> = Vec::new();
                let mut prev: Link<K, V> = None;
                let mut node = self.head.forward(lvl);
                while let Some(n) = node {
                    let elem = n.as_ref();
                    assert!(elem.level() > lvl, "element linked above its own level");
                    if let Some(p) = prev {
                        let pe = p.as_ref();
                        assert_eq!(
                            self.compare_to(pe.score, &pe.key, elem),
                            Ordering::Less,
                            "every level chain must be strictly increasing"
                        );
                    }
                    assert!(
                        lower.contains(&n),
                        "element at level {} missing from the level below",
                        lvl
                    );
                    chain.push(n);
                    prev = node;
                    node = elem.levels.forward(lvl);
                }
                lower = chain;
            }
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V, C> Drop for SkipList<K, V, C> {
    fn drop(&mut self) {
        self.clear_nodes();
    }
}

impl<K: ScoreKey, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparable<K>> Extend<(K, V)> for SkipList<K, V, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: ScoreKey, V> FromIterator<(K, V)> for SkipList<K, V> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<'a, K, V, C> IntoIterator for &'a SkipList<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> fmt::Debug for SkipList<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> fmt::Display for SkipList<K, V, C>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "]")
    }
}

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Iterator
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// An iterator over the entries of a [`SkipList`] in ascending order.
pub struct Iter<'a, K, V> {
    front: Link<K, V>,
    back: Link<K, V>,
    remaining: usize,
    marker: PhantomData<&'a Element<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let p = self.front?;
        let elem: &'a Element<K, V> = unsafe { &*p.as_ptr() };
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.front = elem.levels.forward(0);
        }
        Some((&elem.key, &elem.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        let p = self.back?;
        let elem: &'a Element<K, V> = unsafe { &*p.as_ptr() };
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.back = elem.prev;
        }
        Some((&elem.key, &elem.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
// /////////////////////////////////////////////////////////////////////////////////////////////////
