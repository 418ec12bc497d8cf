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

use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use target_assign_core::prelude::*;
use target_assign_solver::prelude::*;

/// --- helpers ---
#[inline]
fn pos(x: f64, y: f64) -> Position<f64> {
    Position::new(x, y)
}

fn distance(c: &Camera, t: &Target) -> f64 {
    c.distance_to(t)
}

/// Random cameras and targets on a 100 x 100 field.
fn build_scene(rng: &mut ChaCha8Rng, cameras: usize, targets: usize) -> (Vec<Camera>, Vec<Target>) {
    let cams = (0..cameras)
        .map(|i| Camera::new(i, pos(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0))))
        .collect();
    let tgts = (0..targets)
        .map(|j| Target::new(j, pos(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0))))
        .collect();
    (cams, tgts)
}

/// Moves every target by a small random step; `ticks` snapshots in total.
fn drift(rng: &mut ChaCha8Rng, targets: &[Target], ticks: usize, step: f64) -> Vec<Vec<Target>> {
    let mut out = Vec::with_capacity(ticks);
    let mut current = targets.to_vec();
    for _ in 0..ticks {
        current = current
            .iter()
            .map(|t| {
                let p = t.position().translated(
                    rng.random_range(-step..=step),
                    rng.random_range(-step..=step),
                );
                t.moved_to(p)
            })
            .collect();
        out.push(current.clone());
    }
    out
}

fn bench_linear_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_assignment");
    for &(cams, tgts) in &[(4usize, 4usize), (10, 6), (20, 8)] {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (cameras, targets) = build_scene(&mut rng, cams, tgts);
        group.bench_function(format!("{cams}x{tgts}"), |b| {
            let mut problem = LinearAssignment::<GoodLpBackend>::default();
            b.iter(|| {
                let r = problem
                    .solve(black_box(&cameras), black_box(&targets), 2, false, distance)
                    .unwrap();
                black_box(r.len())
            })
        });
    }
    group.finish();
}

fn bench_caches_over_ticks(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (cameras, targets) = build_scene(&mut rng, 12, 6);
    let ticks = drift(&mut rng, &targets, 64, 0.05);

    let mut group = c.benchmark_group("caches_over_ticks");
    group.bench_function("uncached", |b| {
        let mut problem = LinearAssignment::<GoodLpBackend>::default();
        b.iter(|| {
            for snapshot in &ticks {
                black_box(problem.solve(&cameras, snapshot, 2, false, distance).unwrap());
            }
        })
    });
    group.bench_function("exact_repeat", |b| {
        let mut problem = ExactRepeatCache::new(LinearAssignment::<GoodLpBackend>::default());
        b.iter(|| {
            for snapshot in &ticks {
                black_box(problem.solve(&cameras, snapshot, 2, false, distance).unwrap());
            }
        })
    });
    group.bench_function("tolerant", |b| {
        let config = TolerantCacheConfig {
            epsilon: 1.0,
            report_every: 0,
            ..Default::default()
        };
        let mut problem =
            TolerantCache::new(LinearAssignment::<GoodLpBackend>::default(), config).unwrap();
        b.iter(|| {
            for snapshot in &ticks {
                black_box(problem.solve(&cameras, snapshot, 2, false, distance).unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_linear_assignment, bench_caches_over_ticks);
criterion_main!(benches);
