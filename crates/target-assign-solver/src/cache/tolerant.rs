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
    cache::{
        fingerprint::CostFingerprint,
        stats::{CacheStats, HitWindow},
    },
    config::TolerantCacheConfig,
    err::{AssignmentError, ConfigError},
    problem::{AssignmentProblem, is_degenerate},
};
use lru::LruCache;
use std::{collections::HashMap, sync::Arc};
use target_assign_core::{
    assignment::Assignment,
    entity::{Entity, dedup_by_id},
};

/// Problem shape: who takes part and under which parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeKey<SI, DI> {
    sources: Vec<SI>,
    destinations: Vec<DI>,
    max_sources_per_destination: i64,
    fairness: bool,
}

/// One cached cost table: its shape plus the quantised costs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey<SI, DI> {
    shape: Arc<ShapeKey<SI, DI>>,
    buckets: Vec<i64>,
}

#[derive(Debug, Clone)]
struct CachedSolution<SI, DI> {
    fingerprint: CostFingerprint,
    pairs: Vec<(SI, DI)>,
}

enum Lookup<S: Entity, D: Entity> {
    Hit(Assignment<S, D>),
    Corrupt,
}

/// LRU cache that reuses a solution when every pairwise cost is within `epsilon`.
///
/// Every solved cost table gets its own slot, keyed by the problem shape
/// (sorted source and destination ids, capacity, fairness) and the
/// `epsilon`-quantised costs. A per-shape index lists the bucket vectors
/// currently cached, so a lookup only compares against tables of the same
/// shape whose buckets are at most one step away. Results are stored as id
/// pairs and rebound onto the live instances of each call.
pub struct TolerantCache<S: Entity, D: Entity, P> {
    inner: P,
    epsilon: f64,
    entries: LruCache<EntryKey<S::Id, D::Id>, CachedSolution<S::Id, D::Id>>,
    shapes: HashMap<Arc<ShapeKey<S::Id, D::Id>>, Vec<Vec<i64>>>,
    window: HitWindow,
}

impl<S: Entity, D: Entity, P> TolerantCache<S, D, P> {
    pub fn new(inner: P, config: TolerantCacheConfig) -> Result<Self, ConfigError> {
        let (capacity, epsilon) = config.validate()?;
        Ok(Self {
            inner,
            epsilon,
            entries: LruCache::new(capacity),
            shapes: HashMap::new(),
            window: HitWindow::new(config.report_every),
        })
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
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Maximum number of cached cost tables.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Number of cached cost tables across all shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.shapes.clear();
    }

    /// Lifetime hit/miss totals.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.window.total()
    }

    fn record(&mut self, hit: bool) {
        if let Some(report) = self.window.record(hit) {
            tracing::info!(
                hits = report.hits,
                calls = report.calls,
                hit_ratio = report.ratio(),
                "tolerant cache window"
            );
        }
    }

    /// Finds a cached table of this shape that matches `fingerprint` without touching LRU order.
    fn find(
        &self,
        shape: &Arc<ShapeKey<S::Id, D::Id>>,
        fingerprint: &CostFingerprint,
    ) -> Option<EntryKey<S::Id, D::Id>> {
        let candidates = self.shapes.get(shape)?;
        // Same buckets first, it is the common case for small drift.
        let ordered = candidates
            .iter()
            .filter(|buckets| buckets.as_slice() == fingerprint.buckets())
            .chain(
                candidates
                    .iter()
                    .filter(|buckets| buckets.as_slice() != fingerprint.buckets()),
            );
        for buckets in ordered {
            if !fingerprint.near_buckets(buckets) {
                continue;
            }
            let key = EntryKey {
                shape: Arc::clone(shape),
                buckets: buckets.clone(),
            };
            if let Some(cached) = self.entries.peek(&key)
                && cached.fingerprint.matches(fingerprint, self.epsilon)
            {
                return Some(key);
            }
        }
        None
    }

    fn forget(&mut self, key: &EntryKey<S::Id, D::Id>) {
        if let Some(candidates) = self.shapes.get_mut(&key.shape) {
            candidates.retain(|buckets| *buckets != key.buckets);
            if candidates.is_empty() {
                self.shapes.remove(&key.shape);
            }
        }
    }

    fn store(&mut self, key: EntryKey<S::Id, D::Id>, solution: CachedSolution<S::Id, D::Id>) {
        if let Some((evicted, _)) = self.entries.push(key.clone(), solution)
            && evicted != key
        {
            self.forget(&evicted);
        }
        let candidates = self.shapes.entry(Arc::clone(&key.shape)).or_default();
        if !candidates.contains(&key.buckets) {
            candidates.push(key.buckets);
        }
    }
}

impl<S, D, P> AssignmentProblem<S, D> for TolerantCache<S, D, P>
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

        let mut unique_sources = dedup_by_id(sources);
        let mut unique_destinations = dedup_by_id(destinations);
        unique_sources.sort_by_key(|s| s.id());
        unique_destinations.sort_by_key(|d| d.id());

        let width = unique_destinations.len();
        let mut costs = Vec::with_capacity(unique_sources.len() * width);
        for &source in &unique_sources {
            for &destination in &unique_destinations {
                costs.push(cost(source, destination));
            }
        }
        let fingerprint = CostFingerprint::new(costs, self.epsilon);

        let shape = Arc::new(ShapeKey {
            sources: unique_sources.iter().map(|s| s.id()).collect(),
            destinations: unique_destinations.iter().map(|d| d.id()).collect(),
            max_sources_per_destination,
            fairness,
        });

        if let Some(key) = self.find(&shape, &fingerprint) {
            let lookup = match self.entries.get(&key) {
                Some(cached) => match Assignment::from_id_pairs(
                    cached.pairs.iter().map(|(s, d)| (s, d)),
                    sources,
                    destinations,
                ) {
                    Some(assignment) => Lookup::Hit(assignment),
                    None => Lookup::Corrupt,
                },
                None => Lookup::Corrupt,
            };

            match lookup {
                Lookup::Hit(assignment) => {
                    self.record(true);
                    tracing::trace!(assigned = assignment.len(), "tolerant cache hit");
                    return Ok(assignment);
                }
                Lookup::Corrupt => {
                    tracing::warn!(
                        sources = shape.sources.len(),
                        destinations = shape.destinations.len(),
                        "cached assignment references unknown participants, solving again"
                    );
                    self.entries.pop(&key);
                    self.forget(&key);
                }
            }
        }
        self.record(false);

        // The inner solver reads the table built above instead of calling `cost` again.
        let source_slot: HashMap<S::Id, usize> = shape
            .sources
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let destination_slot: HashMap<D::Id, usize> = shape
            .destinations
            .iter()
            .enumerate()
            .map(|(j, id)| (id.clone(), j))
            .collect();
        let table = fingerprint.costs();
        let lookup_cost = |s: &S, d: &D| match (source_slot.get(&s.id()), destination_slot.get(&d.id())) {
            (Some(&i), Some(&j)) => table[i * width + j],
            _ => f64::NAN,
        };

        let assignment = self.inner.solve(
            sources,
            destinations,
            max_sources_per_destination,
            fairness,
            lookup_cost,
        )?;

        let key = EntryKey {
            shape,
            buckets: fingerprint.buckets().to_vec(),
        };
        let pairs = assignment.id_pairs();
        self.store(key, CachedSolution { fingerprint, pairs });
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::LinearAssignment;
    use target_assign_core::geometry::{Camera, Position, Target};
    use tracing_subscriber::EnvFilter;

    #[inline]
    fn pos(x: f64, y: f64) -> Position<f64> {
        Position::new(x, y)
    }

    fn enable_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    }

    fn distance(c: &Camera, t: &Target) -> f64 {
        c.distance_to(t)
    }

    #[derive(Default)]
    struct Counting {
        inner: LinearAssignment,
        calls: usize,
        cost_calls: std::cell::Cell<usize>,
    }

    impl<S: Entity, D: Entity> AssignmentProblem<S, D> for Counting {
        fn solve<F>(
            &mut self,
            sources: &[S],
            destinations: &[D],
            max: i64,
            fairness: bool,
            cost: F,
        ) -> Result<Assignment<S, D>, AssignmentError>
        where
            F: Fn(&S, &D) -> f64,
        {
            self.calls += 1;
            let counter = &self.cost_calls;
            self.inner
                .solve(sources, destinations, max, fairness, |s, d| {
                    counter.set(counter.get() + 1);
                    cost(s, d)
                })
        }
    }

    /// Inner solver returning an answer about participants that are not in the call.
    struct Stranger;

    impl AssignmentProblem<&'static str, &'static str> for Stranger {
        fn solve<F>(
            &mut self,
            _: &[&'static str],
            _: &[&'static str],
            _: i64,
            _: bool,
            _: F,
        ) -> Result<Assignment<&'static str, &'static str>, AssignmentError>
        where
            F: Fn(&&'static str, &&'static str) -> f64,
        {
            Ok([("ghost", "da")].into_iter().collect())
        }
    }

    fn config(epsilon: f64, capacity: usize) -> TolerantCacheConfig {
        TolerantCacheConfig {
            capacity,
            epsilon,
            report_every: 2,
        }
    }

    fn scene() -> (Vec<Camera>, Vec<Target>) {
        let cameras = vec![Camera::new(0, pos(0.0, 0.0)), Camera::new(1, pos(10.0, 0.0))];
        let targets = vec![Target::new(0, pos(1.0, 0.0)), Target::new(1, pos(9.0, 0.0))];
        (cameras, targets)
    }

    fn nudge(targets: &[Target], dy: f64) -> Vec<Target> {
        targets
            .iter()
            .map(|t| t.moved_to(t.position().translated(0.0, dy)))
            .collect()
    }

    #[test]
    fn test_small_cost_drift_is_a_hit() {
        enable_tracing();
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        let first = cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        let drifted = nudge(&targets, 0.1);
        let second = cache.solve(&cameras, &drifted, 1, false, distance).unwrap();

        assert_eq!(cache.inner().calls, 1);
        assert_eq!(first, second);
        for (_, target) in second.iter() {
            assert_eq!(target.position().y(), 0.1);
        }
        assert_eq!(cache.stats(), CacheStats { hits: 1, calls: 2 });
    }

    #[test]
    fn test_cost_drift_beyond_epsilon_is_a_miss() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        let far = nudge(&targets, 5.0);
        cache.solve(&cameras, &far, 1, false, distance).unwrap();

        assert_eq!(cache.inner().calls, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        let mut reversed_cameras = cameras.clone();
        reversed_cameras.reverse();
        let mut reversed_targets = targets.clone();
        reversed_targets.reverse();
        cache
            .solve(&reversed_cameras, &reversed_targets, 1, false, distance)
            .unwrap();

        assert_eq!(cache.inner().calls, 1);
    }

    #[test]
    fn test_parameters_are_part_of_the_key() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        cache.solve(&cameras, &targets, 2, false, distance).unwrap();
        cache.solve(&cameras, &targets, 2, true, distance).unwrap();
        assert_eq!(cache.inner().calls, 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_least_recently_used_table_is_evicted() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 2)).unwrap();

        cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        cache.solve(&cameras, &targets, 2, false, distance).unwrap();
        cache.solve(&cameras, &targets, 1, false, distance).unwrap();
        cache.solve(&cameras, &targets, 3, false, distance).unwrap();
        assert_eq!(cache.inner().calls, 3);
        assert_eq!(cache.len(), 2);

        // capacity 2 was the least recently used shape
        cache.solve(&cameras, &targets, 2, false, distance).unwrap();
        assert_eq!(cache.inner().calls, 4);
        cache.solve(&cameras, &targets, 3, false, distance).unwrap();
        assert_eq!(cache.inner().calls, 4);
    }

    #[test]
    fn test_cost_is_evaluated_once_per_pair() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();
        let outer_calls = std::cell::Cell::new(0usize);

        cache
            .solve(&cameras, &targets, 1, false, |c: &Camera, t: &Target| {
                outer_calls.set(outer_calls.get() + 1);
                c.distance_to(t)
            })
            .unwrap();

        assert_eq!(outer_calls.get(), 4);
        assert_eq!(cache.inner().cost_calls.get(), 4);
    }

    #[test]
    fn test_corrupt_entry_forces_recompute() {
        let mut cache = TolerantCache::new(Stranger, config(1.0, 8)).unwrap();
        let zero = |_: &&'static str, _: &&'static str| 0.0;

        let first = cache.solve(&["sa"], &["da"], 1, false, zero).unwrap();
        assert_eq!(first.len(), 1);

        // The cached pairs mention "ghost", which never takes part in a call.
        let second = cache.solve(&["sa"], &["da"], 1, false, zero).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 0, calls: 2 });
    }

    #[test]
    fn test_degenerate_input_is_not_counted() {
        let (cameras, targets) = scene();
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();
        assert!(cache.solve(&cameras, &targets, 0, false, distance).unwrap().is_empty());
        assert_eq!(cache.stats().calls, 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(TolerantCache::<Camera, Target, _>::new(Counting::default(), config(0.0, 8)).is_err());
        assert!(TolerantCache::<Camera, Target, _>::new(Counting::default(), config(1.0, 0)).is_err());
    }

    fn diagonal(s: &&'static str, d: &&'static str) -> f64 {
        if s.as_bytes()[1] == d.as_bytes()[1] { 1.0 } else { 10.0 }
    }

    fn crossed(s: &&'static str, d: &&'static str) -> f64 {
        11.0 - diagonal(s, d)
    }

    #[test]
    fn test_earlier_cost_tables_stay_cached() {
        let sources = ["sa", "sb"];
        let destinations = ["da", "db"];
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 64)).unwrap();

        let straight = cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
        let swapped = cache.solve(&sources, &destinations, 1, false, crossed).unwrap();
        assert_eq!(straight.get(&"sa"), Some(&"da"));
        assert_eq!(swapped.get(&"sa"), Some(&"db"));

        for _ in 0..2 {
            let again = cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
            assert_eq!(again, straight);
            let again = cache.solve(&sources, &destinations, 1, false, crossed).unwrap();
            assert_eq!(again, swapped);
        }

        assert_eq!(cache.inner().calls, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats(), CacheStats { hits: 4, calls: 6 });
    }

    #[test]
    fn test_interleaved_participant_sets_stay_cached() {
        let (cameras, targets) = scene();
        let other_cameras = vec![Camera::new(2, pos(0.0, 50.0)), Camera::new(3, pos(10.0, 50.0))];
        let other_targets = vec![Target::new(2, pos(1.0, 50.0)), Target::new(3, pos(9.0, 50.0))];
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        for round in 0..3 {
            let dy = 0.05 * round as f64;
            let first = cache
                .solve(&cameras, &nudge(&targets, dy), 1, false, distance)
                .unwrap();
            let second = cache
                .solve(&other_cameras, &nudge(&other_targets, dy), 1, false, distance)
                .unwrap();
            assert_eq!(first.len(), 2);
            assert_eq!(second.len(), 2);
        }

        assert_eq!(cache.inner().calls, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity_counts_cost_tables() {
        let sources = ["sa", "sb"];
        let destinations = ["da", "db"];
        let flat = |_: &&'static str, _: &&'static str| 5.0;
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 2)).unwrap();

        cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
        cache.solve(&sources, &destinations, 1, false, crossed).unwrap();
        cache.solve(&sources, &destinations, 1, false, flat).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.inner().calls, 3);

        // the diagonal table was the least recently used one
        cache.solve(&sources, &destinations, 1, false, crossed).unwrap();
        assert_eq!(cache.inner().calls, 3);
        cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
        assert_eq!(cache.inner().calls, 4);
    }

    #[test]
    fn test_clear_drops_every_table() {
        let sources = ["sa", "sb"];
        let destinations = ["da", "db"];
        let mut cache = TolerantCache::new(Counting::default(), config(0.5, 8)).unwrap();

        cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
        cache.solve(&sources, &destinations, 1, false, crossed).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        cache.solve(&sources, &destinations, 1, false, diagonal).unwrap();
        assert_eq!(cache.inner().calls, 3);
    }
}
