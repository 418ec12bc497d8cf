// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::{collections::HashMap, hash::Hash};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Record<V> {
    time: f64,
    value: V,
}

/// Last known value per entity, keyed by identity.
///
/// Entries are only dropped through [`LastKnown::remove`] or
/// [`LastKnown::retain_newer_than`]; callers notify departures explicitly.
#[derive(Debug, Clone)]
pub struct LastKnown<K, V> {
    records: HashMap<K, Record<V>>,
}

impl<K: Eq + Hash, V> Default for LastKnown<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> LastKnown<K, V> {
    #[inline]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Stores `value` unless a record at the same or a later time already exists.
    pub fn observe(&mut self, key: K, time: f64, value: V) -> bool {
        match self.records.get_mut(&key) {
            Some(record) if record.time >= time => false,
            Some(record) => {
                *record = Record { time, value };
                true
            }
            None => {
                self.records.insert(key, Record { time, value });
                true
            }
        }
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.records.get(key).map(|r| &r.value)
    }

    #[inline]
    pub fn time_of(&self, key: &K) -> Option<f64> {
        self.records.get(key).map(|r| r.time)
    }

    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.records.remove(key).map(|r| r.value)
    }

    /// Drops every record observed at or before `time`. Returns how many were dropped.
    pub fn retain_newer_than(&mut self, time: f64) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| r.time > time);
        before - self.records.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64, &V)> {
        self.records.iter().map(|(k, r)| (k, r.time, &r.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TargetIdentifier;
    use crate::geometry::Position;

    #[inline]
    fn tid(n: usize) -> TargetIdentifier {
        TargetIdentifier::new(n)
    }

    #[test]
    fn test_observe_keeps_newest() {
        let mut memory = LastKnown::new();
        assert!(memory.observe(tid(1), 1.0, Position::new(0.0, 0.0)));
        assert!(memory.observe(tid(1), 2.0, Position::new(1.0, 0.0)));
        assert!(!memory.observe(tid(1), 1.5, Position::new(9.0, 9.0)));
        assert!(!memory.observe(tid(1), 2.0, Position::new(9.0, 9.0)));

        assert_eq!(memory.get(&tid(1)), Some(&Position::new(1.0, 0.0)));
        assert_eq!(memory.time_of(&tid(1)), Some(2.0));
    }

    #[test]
    fn test_remove_on_departure() {
        let mut memory = LastKnown::new();
        memory.observe(tid(1), 1.0, "a");
        memory.observe(tid(2), 1.0, "b");
        assert_eq!(memory.remove(&tid(1)), Some("a"));
        assert_eq!(memory.remove(&tid(1)), None);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_retain_newer_than_prunes_stale() {
        let mut memory = LastKnown::new();
        memory.observe(tid(1), 1.0, ());
        memory.observe(tid(2), 2.0, ());
        memory.observe(tid(3), 3.0, ());
        assert_eq!(memory.retain_newer_than(2.0), 2);
        assert_eq!(memory.len(), 1);
        assert!(memory.get(&tid(3)).is_some());
        assert!(memory.get(&tid(2)).is_none());
    }

    #[test]
    fn test_empty() {
        let memory: LastKnown<TargetIdentifier, ()> = LastKnown::default();
        assert!(memory.is_empty());
        assert_eq!(memory.iter().count(), 0);
    }
}
