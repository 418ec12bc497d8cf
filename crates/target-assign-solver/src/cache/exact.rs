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

use crate::{
    cache::stats::CacheStats,
    err::AssignmentError,
    problem::{AssignmentProblem, is_degenerate},
};
use std::collections::BTreeSet;
use target_assign_core::{
    assignment::Assignment,
    entity::{Entity, dedup_by_id},
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RepeatKey<SI: Ord, DI: Ord> {
    sources: BTreeSet<SI>,
    destinations: BTreeSet<DI>,
    max_sources_per_destination: i64,
    fairness: bool,
}

#[derive(Debug, Clone)]
struct RepeatEntry<SI: Ord, DI: Ord> {
    key: RepeatKey<SI, DI>,
    pairs: Vec<(SI, DI)>,
}

/// Remembers the most recent call and replays it while the participants stay the same.
///
/// Only identities, capacity and fairness are compared. The cost function is
/// ignored, so drifting positions do not trigger a new solve as long as the
/// same cameras and targets take part. Replayed results are bound to the
/// instances passed in the current call.
#[derive(Debug)]
pub struct ExactRepeatCache<S: Entity, D: Entity, P> {
    inner: P,
    last: Option<RepeatEntry<S::Id, D::Id>>,
    stats: CacheStats,
}

impl<S: Entity, D: Entity, P> ExactRepeatCache<S, D, P> {
    #[inline]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last: None,
            stats: CacheStats::default(),
        }
    }

    #[inline]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> P {
        self.inner
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    #[inline]
    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<S, D, P> AssignmentProblem<S, D> for ExactRepeatCache<S, D, P>
where
    S: Entity,
    D: Entity,
    P: AssignmentProblem<S, D>,
{
    fn solve<F>(
        &mut self,
        sources: &[S],
        destinations: &[D],
        max_sources_per_destination: i64,
        fairness: bool,
        cost: F,
    ) -> Result<Assignment<S, D>, AssignmentError>
    where
        F: Fn(&S, &D) -> f64,
    {
        if is_degenerate(sources, destinations, max_sources_per_destination) {
            return Ok(Assignment::new());
        }

        let ordered: Vec<D> = dedup_by_id(destinations).into_iter().cloned().collect();
        let key = RepeatKey {
            sources: sources.iter().map(Entity::id).collect(),
            destinations: ordered.iter().map(Entity::id).collect(),
            max_sources_per_destination,
            fairness,
        };

        if let Some(entry) = self.last.as_ref().filter(|e| e.key == key) {
            let replayed = Assignment::from_id_pairs(
                entry.pairs.iter().map(|(s, d)| (s, d)),
                sources,
                &ordered,
            );
            if let Some(assignment) = replayed {
                self.stats.record(true);
                tracing::trace!(assigned = assignment.len(), "exact repeat cache hit");
                return Ok(assignment);
            }
        }

        self.stats.record(false);
        self.last = None;
        let assignment = self.inner.solve(
            sources,
            destinations,
            max_sources_per_destination,
            fairness,
            cost,
        )?;
        self.last = Some(RepeatEntry {
            key,
            pairs: assignment.id_pairs(),
        });
        Ok(assignment)
    }
}
