extern crate quickcheck;
extern crate scorelist;

use std::collections::{BTreeMap, BTreeSet};

use quickcheck::quickcheck;
use scorelist::{Element, Error, SkipList};

#[test]
fn basic_crud() {
    let mut list = SkipList::new();
    assert_eq!(list.len(), 0);
    assert!(list.find(&0.0).is_none());

    list.set(12.34, "first");
    assert_eq!(list.len(), 1);
    assert_eq!(*list.front().unwrap().key(), 12.34);
    assert_eq!(*list.back().unwrap().key(), 12.34);
    assert_eq!(*list.find(&0.0).unwrap().key(), 12.34);
    assert_eq!(*list.find(&12.34).unwrap().key(), 12.34);
    assert!(list.find(&15.0).is_none());

    list.set(23.45, "second");
    list.set(16.78, "middle");
    list.set(9.01, "very beginning");
    assert_eq!(list.len(), 4);
    assert_eq!(*list.front().unwrap().value(), "very beginning");
    assert_eq!(*list.back().unwrap().value(), "second");
    assert_eq!(*list.find(&15.0).unwrap().key(), 16.78);
    assert_eq!(*list.find(&20.0).unwrap().key(), 23.45);

    // Overwriting must keep the length and update the same element in place.
    let updated: *const Element<f64, &str> = list.set(16.78, "middle overwrite");
    assert_eq!(list.len(), 4);
    let fetched: *const Element<f64, &str> = list.get(&16.78).unwrap();
    assert!(std::ptr::eq(updated, fetched));
    assert_eq!(list.get_value(&16.78), Some(&"middle overwrite"));
    assert_eq!(*list.find(&16.79).unwrap().key(), 23.45);

    // Resumable scans.
    let start = list.find(&15.0).unwrap();
    assert!(std::ptr::eq(list.find_next(Some(start), &15.0).unwrap(), start));
    assert!(std::ptr::eq(list.find_next(Some(start), &16.78).unwrap(), start));
    assert_eq!(*list.find_next(Some(start), &16.79).unwrap().key(), 23.45);
    assert!(list.find_next(Some(start), &30.0).is_none());

    // Removing absent keys is a no-op.
    assert!(list.remove(&9999.0).is_none());
    assert!(list.remove(&13.24).is_none());
    assert_eq!(list.len(), 4);

    // Reconfiguring the ceiling must not disturb the housed elements.
    for level in [1, 128, 32, 32] {
        assert!(list.set_max_level(level).is_ok());
        assert_eq!(list.len(), 4);
    }
    assert_eq!(list.set_max_level(0), Err(Error::InvalidMaxLevel(0)));

    let removed = list.remove(&23.45).unwrap();
    assert_eq!(removed.into_entry(), (23.45, "second"));
    assert_eq!(list.len(), 3);
    assert_eq!(*list.front().unwrap().key(), 9.01);
    assert_eq!(*list.back().unwrap().key(), 16.78);
    assert_eq!(*list.find(&-99.0).unwrap().key(), 9.01);
    assert_eq!(*list.find(&10.0).unwrap().key(), 12.34);
    assert_eq!(*list.find(&15.0).unwrap().key(), 16.78);
    assert!(list.find(&20.0).is_none());

    assert_eq!(*list.remove_front().unwrap().key(), 9.01);
    assert_eq!(list.len(), 2);
    assert_eq!(*list.front().unwrap().key(), 12.34);
    assert_eq!(*list.back().unwrap().key(), 16.78);

    assert_eq!(*list.remove_back().unwrap().key(), 16.78);
    assert_eq!(list.len(), 1);
    assert_eq!(*list.front().unwrap().key(), 12.34);
    assert_eq!(*list.back().unwrap().key(), 12.34);
    assert!(list.find(&15.0).is_none());
    assert_eq!(*list.find_next(None, &10.0).unwrap().key(), 12.34);

    list.init();
    assert_eq!(list.len(), 0);
    assert!(list.get(&12.34).is_none());
}

quickcheck! {
    fn prop_matches_btreemap(ops: Vec<(bool, u8, i16)>) -> bool {
        let mut list: SkipList<u8, i16> = SkipList::new();
        let mut oracle: BTreeMap<u8, i16> = BTreeMap::new();
        for &(insert, key, value) in &ops {
            if insert {
                list.set(key, value);
                oracle.insert(key, value);
            } else {
                let removed = list.remove(&key).map(|e| e.into_entry().1);
                if removed != oracle.remove(&key) {
                    return false;
                }
            }
            if list.len() != oracle.len() {
                return false;
            }
        }
        list.iter().map(|(&k, &v)| (k, v)).eq(oracle.into_iter())
    }

    fn prop_overwrite_preserves_len(pairs: Vec<(u8, i16)>) -> bool {
        let mut list: SkipList<u8, i16> = SkipList::new();
        for &(key, value) in &pairs {
            list.set(key, value);
        }
        let len_before = list.len();

        let mut want: BTreeMap<u8, i16> = BTreeMap::new();
        for &(key, value) in &pairs {
            list.set(key, value.wrapping_add(1));
            want.insert(key, value.wrapping_add(1));
        }
        list.len() == len_before && list.iter().map(|(&k, &v)| (k, v)).eq(want.into_iter())
    }

    fn prop_find_returns_least_key_at_least_probe(keys: Vec<i16>, probe: i16) -> bool {
        let mut list: SkipList<i16, ()> = SkipList::new();
        let mut set: BTreeSet<i16> = BTreeSet::new();
        for &key in &keys {
            list.set(key, ());
            set.insert(key);
        }
        list.find(&probe).map(|e| *e.key()) == set.range(probe..).next().copied()
    }

    fn prop_removed_keys_are_absent(keys: Vec<u8>) -> bool {
        let mut list: SkipList<u8, ()> = SkipList::new();
        for &key in &keys {
            list.set(key, ());
        }
        for &key in &keys {
            list.remove(&key);
            if list.get(&key).is_some() {
                return false;
            }
        }
        list.is_empty()
    }

    fn prop_string_order_is_lexicographic(keys: Vec<String>) -> bool {
        let mut list: SkipList<String, usize> = SkipList::new();
        for (i, key) in keys.iter().enumerate() {
            list.set(key.clone(), i);
        }
        let want: BTreeSet<&String> = keys.iter().collect();
        list.iter().map(|(k, _)| k).eq(want.into_iter())
    }
}
