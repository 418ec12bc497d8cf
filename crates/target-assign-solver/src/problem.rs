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

use crate::err::AssignmentError;
use target_assign_core::{assignment::Assignment, entity::Entity};

/// Decides which source covers which destination.
///
/// `cost(source, destination)` must be finite and non-negative. Each source is
/// mapped to at most one destination and each destination receives at most
/// `max_sources_per_destination` sources. When capacity runs out, surplus
/// sources are left unassigned.
pub trait AssignmentProblem<S: Entity, D: Entity> {
    fn solve<F>(
        &mut self,
        sources: &[S],
        destinations: &[D],
        max_sources_per_destination: i64,
        fairness: bool,
        cost: F,
    ) -> Result<Assignment<S, D>, AssignmentError>
    where
        F: Fn(&S, &D) -> f64;
}

impl<S, D, P> AssignmentProblem<S, D> for &mut P
where
    S: Entity,
    D: Entity,
    P: AssignmentProblem<S, D>,
{
    #[inline]
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
        (**self).solve(
            sources,
            destinations,
            max_sources_per_destination,
            fairness,
            cost,
        )
    }
}

/// Inputs that trivially produce the empty assignment.
#[inline]
pub fn is_degenerate<S, D>(sources: &[S], destinations: &[D], max_sources_per_destination: i64) -> bool {
    sources.is_empty() || destinations.is_empty() || max_sources_per_destination <= 0
}
