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

use crate::entity::Entity;
use std::collections::HashMap;

/// A source to destination mapping where every source appears at most once.
///
/// Unassigned sources are simply absent. Entries keep their insertion order,
/// which makes iteration deterministic for a deterministic solver.
#[derive(Debug, Clone)]
pub struct Assignment<S: Entity, D: Entity> {
    entries: Vec<(S, D)>,
    index: HashMap<S::Id, usize>,
}

impl<S: Entity, D: Entity> Default for Assignment<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Entity, D: Entity> Assignment<S, D> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Assigns `source` to `destination`, returning the destination it replaced.
    pub fn insert(&mut self, source: S, destination: D) -> Option<D> {
        match self.index.get(&source.id()) {
            Some(&slot) => {
                let previous = std::mem::replace(&mut self.entries[slot], (source, destination));
                Some(previous.1)
            }
            None => {
                self.index.insert(source.id(), self.entries.len());
                self.entries.push((source, destination));
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, source: &S) -> Option<&D> {
        self.get_by_id(&source.id())
    }

    #[inline]
    pub fn get_by_id(&self, id: &S::Id) -> Option<&D> {
        self.index.get(id).map(|&slot| &self.entries[slot].1)
    }

    #[inline]
    pub fn contains_source(&self, source: &S) -> bool {
        self.index.contains_key(&source.id())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&S, &D)> {
        self.entries.iter().map(|(s, d)| (s, d))
    }

    #[inline]
    pub fn destinations(&self) -> impl Iterator<Item = &D> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Number of sources mapped onto the destination with the given id.
    pub fn load_of(&self, destination: &D::Id) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| &d.id() == destination)
            .count()
    }

    pub fn id_pairs(&self) -> Vec<(S::Id, D::Id)> {
        self.entries.iter().map(|(s, d)| (s.id(), d.id())).collect()
    }

    /// Rebuilds an assignment from identity pairs using the given live instances.
    ///
    /// The first live instance wins when an id occurs more than once. Returns
    /// `None` if any id has no live counterpart.
    pub fn from_id_pairs<'a, I>(pairs: I, sources: &[S], destinations: &[D]) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a S::Id, &'a D::Id)>,
        S::Id: 'a,
        D::Id: 'a,
    {
        let mut live_sources: HashMap<S::Id, &S> = HashMap::with_capacity(sources.len());
        for s in sources {
            live_sources.entry(s.id()).or_insert(s);
        }
        let mut live_destinations: HashMap<D::Id, &D> = HashMap::with_capacity(destinations.len());
        for d in destinations {
            live_destinations.entry(d.id()).or_insert(d);
        }

        let pairs = pairs.into_iter();
        let mut out = Self::with_capacity(pairs.size_hint().0);
        for (sid, did) in pairs {
            let source = live_sources.get(sid)?;
            let destination = live_destinations.get(did)?;
            out.insert((*source).clone(), (*destination).clone());
        }
        Some(out)
    }

    /// Re-binds every entry onto the matching live instances.
    pub fn rebind(&self, sources: &[S], destinations: &[D]) -> Option<Self> {
        let pairs = self.id_pairs();
        Self::from_id_pairs(pairs.iter().map(|(s, d)| (s, d)), sources, destinations)
    }
}

impl<S: Entity, D: Entity> PartialEq for Assignment<S, D> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(s, d)| other.get_by_id(&s.id()).is_some_and(|o| o.id() == d.id()))
    }
}

impl<S: Entity, D: Entity> Eq for Assignment<S, D> {}

impl<S: Entity, D: Entity> FromIterator<(S, D)> for Assignment<S, D> {
    fn from_iter<T: IntoIterator<Item = (S, D)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (s, d) in iter {
            out.insert(s, d);
        }
        out
    }
}

impl<S: Entity, D: Entity> IntoIterator for Assignment<S, D> {
    type Item = (S, D);
    type IntoIter = std::vec::IntoIter<(S, D)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
