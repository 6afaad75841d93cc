//! The schedule queue: the active set ordered by `req_time`, ascending, ties
//! broken by insertion order. Backed by an indexed `BTreeMap` so every
//! operation (insert, remove-by-identity, pop-min, peek-min, re-key) is
//! `O(log n)` instead of a linear scan.

use std::collections::{BTreeMap, HashMap};

use crate::time::{Time, TimeKey};

type Key = (TimeKey, u64);

#[derive(Default)]
pub struct ScheduleQueue {
    order: BTreeMap<Key, String>,
    index: HashMap<String, Key>,
    seq: u64,
}

impl ScheduleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts `name` at `time`. Ties with existing entries at the same time
    /// are broken in favor of whatever was already there (FIFO).
    pub fn insert(&mut self, name: impl Into<String>, time: Time) {
        let name = name.into();
        let key = (TimeKey(time), self.next_seq());
        self.order.insert(key, name.clone());
        self.index.insert(name, key);
    }

    /// Removes `name` from the queue, wherever it currently sits.
    pub fn remove(&mut self, name: &str) -> Option<Time> {
        let key = self.index.remove(name)?;
        self.order.remove(&key);
        Some((key.0).0)
    }

    /// Remove-then-reinsert at a new `req_time`; counts as a fresh insertion
    /// for tie-breaking purposes (it is, structurally, a new scheduling
    /// decision).
    pub fn rekey(&mut self, name: &str, new_time: Time) -> bool {
        if self.remove(name).is_some() {
            self.insert(name, new_time);
            true
        } else {
            false
        }
    }

    /// Removes and returns the (name, req_time) with the smallest req_time.
    pub fn pop_min(&mut self) -> Option<(String, Time)> {
        let key = *self.order.keys().next()?;
        let name = self.order.remove(&key).unwrap();
        self.index.remove(&name);
        Some((name, (key.0).0))
    }

    pub fn peek_min(&self) -> Option<(&str, Time)> {
        let (key, name) = self.order.iter().next()?;
        Some((name.as_str(), (key.0).0))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(|s| s.as_str())
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::INFINITE;

    #[test]
    fn pop_min_returns_ascending_order() {
        let mut q = ScheduleQueue::new();
        q.insert("a", 5.0);
        q.insert("b", 1.0);
        q.insert("c", 3.0);
        assert_eq!(q.pop_min(), Some(("b".to_string(), 1.0)));
        assert_eq!(q.pop_min(), Some(("c".to_string(), 3.0)));
        assert_eq!(q.pop_min(), Some(("a".to_string(), 5.0)));
        assert_eq!(q.pop_min(), None);
    }

    #[test]
    fn ties_break_fifo_by_insertion_order() {
        let mut q = ScheduleQueue::new();
        q.insert("first", 2.0);
        q.insert("second", 2.0);
        q.insert("third", 2.0);
        assert_eq!(q.pop_min().unwrap().0, "first");
        assert_eq!(q.pop_min().unwrap().0, "second");
        assert_eq!(q.pop_min().unwrap().0, "third");
    }

    #[test]
    fn rekey_moves_entry_and_updates_tie_order() {
        let mut q = ScheduleQueue::new();
        q.insert("a", 1.0);
        q.insert("b", 1.0);
        assert!(q.rekey("a", 10.0));
        assert_eq!(q.peek_min().unwrap().0, "b");
        assert_eq!(q.pop_min().unwrap().0, "b");
        assert_eq!(q.pop_min(), Some(("a".to_string(), 10.0)));
    }

    #[test]
    fn infinite_req_time_sorts_last() {
        let mut q = ScheduleQueue::new();
        q.insert("never", INFINITE);
        q.insert("soon", 0.5);
        assert_eq!(q.pop_min().unwrap().0, "soon");
        assert_eq!(q.peek_min().unwrap(), ("never", INFINITE));
    }

    #[test]
    fn remove_by_identity_drops_from_both_maps() {
        let mut q = ScheduleQueue::new();
        q.insert("a", 1.0);
        assert!(q.contains("a"));
        assert_eq!(q.remove("a"), Some(1.0));
        assert!(!q.contains("a"));
        assert_eq!(q.len(), 0);
    }
}
