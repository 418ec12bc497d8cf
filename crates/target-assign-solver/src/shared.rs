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

use crate::{err::AssignmentError, problem::AssignmentProblem};
use parking_lot::Mutex;
use target_assign_core::{assignment::Assignment, entity::Entity};

/// Makes a cached solver usable from several threads.
///
/// The whole lookup, solve and insert sequence runs under one lock, so two
/// threads missing on the same input never solve it twice concurrently.
#[derive(Debug, Default)]
pub struct SharedAssignment<P> {
    inner: Mutex<P>,
}

impl<P> SharedAssignment<P> {
    #[inline]
    pub fn new(inner: P) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    #[inline]
    pub fn into_inner(self) -> P {
        self.inner.into_inner()
    }

    /// Runs `f` with exclusive access to the wrapped solver.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn solve<S, D, F>(
        &self,
        sources: &[S],
        destinations: &[D],
        max_sources_per_destination: i64,
        fairness: bool,
        cost: F,
    ) -> Result<Assignment<S, D>, AssignmentError>
    where
        S: Entity,
        D: Entity,
        P: AssignmentProblem<S, D>,
        F: Fn(&S, &D) -> f64,
    {
        self.inner.lock().solve(
            sources,
            destinations,
            max_sources_per_destination,
            fairness,
            cost,
        )
    }
}
