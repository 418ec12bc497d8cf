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
    err::{AssignmentError, InvalidCostError},
    lp::{
        LpBackend,
        good::GoodLpBackend,
        program::{Goal, LinearProgram},
    },
    problem::{AssignmentProblem, is_degenerate},
};
use target_assign_core::{
    assignment::Assignment,
    entity::{Entity, dedup_by_id},
};

/// Values at or below this are treated as zero when decoding solver output.
pub const SOLVER_ZERO_TOLERANCE: f64 = 1e-9;

/// The overflow destination costs this many times the largest real cost.
pub const OVERFLOW_COST_FACTOR: f64 = 2.0;

/// How the `sources x destinations` decision variables are flattened.
///
/// Row `i` holds one column per real destination, plus a trailing overflow
/// column when the real capacity cannot absorb every source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    sources: usize,
    destinations: usize,
    overflow: bool,
}

impl Layout {
    #[inline]
    pub fn new(sources: usize, destinations: usize, max_sources_per_destination: usize) -> Self {
        Self {
            sources,
            destinations,
            overflow: sources > max_sources_per_destination.saturating_mul(destinations),
        }
    }

    #[inline]
    pub fn sources(&self) -> usize {
        self.sources
    }

    #[inline]
    pub fn destinations(&self) -> usize {
        self.destinations
    }

    #[inline]
    pub fn has_overflow(&self) -> bool {
        self.overflow
    }

    #[inline]
    pub fn total_destinations(&self) -> usize {
        self.destinations + usize::from(self.overflow)
    }

    #[inline]
    pub fn variables(&self) -> usize {
        self.sources * self.total_destinations()
    }

    #[inline]
    pub fn index(&self, source: usize, column: usize) -> usize {
        debug_assert!(source < self.sources && column < self.total_destinations());
        source * self.total_destinations() + column
    }

    /// `(source, column)` of a flattened variable index.
    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        let width = self.total_destinations();
        (index / width, index % width)
    }

    #[inline]
    pub fn is_real_column(&self, column: usize) -> bool {
        column < self.destinations
    }
}

/// Per real destination bounds on how many sources it receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationBounds {
    pub lower: f64,
    pub upper: f64,
}

impl DestinationBounds {
    /// Without fairness the lower bound is `min(1, floor(S / D))`, so every
    /// destination is covered only when there are enough sources to do so.
    /// With fairness it is raised to `floor(min(max, S / D))`.
    pub fn derive(
        sources: usize,
        destinations: usize,
        max_sources_per_destination: usize,
        fairness: bool,
    ) -> Self {
        let upper = max_sources_per_destination as f64;
        let share = sources as f64 / destinations as f64;
        let lower = if fairness {
            share.min(upper).floor()
        } else {
            share.floor().min(1.0)
        };
        Self { lower, upper }
    }
}

/// Solves the assignment as a linear program on a pluggable backend.
///
/// The transportation structure of the constraints makes the LP relaxation
/// integral, so no branching is needed.
#[derive(Debug, Clone, Default)]
pub struct LinearAssignment<B = GoodLpBackend> {
    backend: B,
}

impl<B: LpBackend> LinearAssignment<B> {
    #[inline]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

/// Builds the linear program for already de-duplicated, non-degenerate input.
pub fn formulate<S, D, F>(
    sources: &[&S],
    destinations: &[&D],
    max_sources_per_destination: usize,
    fairness: bool,
    cost: &F,
) -> Result<(Layout, LinearProgram), InvalidCostError>
where
    F: Fn(&S, &D) -> f64,
{
    let layout = Layout::new(
        sources.len(),
        destinations.len(),
        max_sources_per_destination,
    );
    let n = layout.variables();

    let mut objective = vec![0.0; n];
    let mut max_cost = 0.0_f64;
    for (i, &source) in sources.iter().enumerate() {
        for (j, &destination) in destinations.iter().enumerate() {
            let c = cost(source, destination);
            if !c.is_finite() || c < 0.0 {
                return Err(InvalidCostError::new(i, j, c));
            }
            max_cost = max_cost.max(c);
            objective[layout.index(i, j)] = c;
        }
    }
    if layout.has_overflow() {
        let overflow_cost = max_cost * OVERFLOW_COST_FACTOR;
        for i in 0..layout.sources() {
            objective[layout.index(i, layout.destinations())] = overflow_cost;
        }
    }

    let mut program = LinearProgram::new();
    program.set_objective(objective, Goal::Minimize);

    // Every source goes somewhere, the overflow column included.
    for i in 0..layout.sources() {
        let mut row = vec![0.0; n];
        for column in 0..layout.total_destinations() {
            row[layout.index(i, column)] = 1.0;
        }
        program.add_equal(row, 1.0);
    }

    // The overflow column is unbounded.
    let bounds = DestinationBounds::derive(
        layout.sources(),
        layout.destinations(),
        max_sources_per_destination,
        fairness,
    );
    for j in 0..layout.destinations() {
        let mut row = vec![0.0; n];
        for i in 0..layout.sources() {
            row[layout.index(i, j)] = 1.0;
        }
        program.add_less_equal(row.clone(), bounds.upper);
        program.add_greater_equal(row, bounds.lower);
    }

    program.add_non_negativity();

    tracing::trace!(
        variables = n,
        constraints = program.constraints().len(),
        overflow = layout.has_overflow(),
        lower = bounds.lower,
        upper = bounds.upper,
        "formulated assignment program"
    );

    Ok((layout, program))
}

/// Reads a source to destination mapping back out of the solver's vector.
///
/// Each source takes the column carrying its largest share above
/// [`SOLVER_ZERO_TOLERANCE`]; other positive columns of that source are
/// ignored. This differs from recording every strictly positive real column
/// only on fractional vertices: when the overflow column holds the larger
/// share there, the source is left unassigned even if a real column is
/// positive. On integral solutions both rules agree.
pub fn decode<S: Entity, D: Entity>(
    layout: &Layout,
    values: &[f64],
    sources: &[&S],
    destinations: &[&D],
) -> Assignment<S, D> {
    let mut best: Vec<Option<(usize, f64)>> = vec![None; layout.sources()];
    for (index, &value) in values.iter().enumerate().take(layout.variables()) {
        if value <= SOLVER_ZERO_TOLERANCE {
            continue;
        }
        let (i, column) = layout.position(index);
        match best[i] {
            Some((_, v)) if v >= value => {}
            _ => best[i] = Some((column, value)),
        }
    }

    let mut assignment = Assignment::with_capacity(layout.sources());
    for (i, choice) in best.into_iter().enumerate() {
        if let Some((column, _)) = choice
            && layout.is_real_column(column)
        {
            assignment.insert(sources[i].clone(), destinations[column].clone());
        }
    }
    assignment
}

impl<S, D, B> AssignmentProblem<S, D> for LinearAssignment<B>
where
    S: Entity,
    D: Entity,
    B: LpBackend,
{
    #[tracing::instrument(
        level = "debug",
        name = "LinearAssignment::solve",
        skip_all,
        fields(sources = sources.len(), destinations = destinations.len(), max = max_sources_per_destination, fairness)
    )]
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

        let sources = dedup_by_id(sources);
        let destinations = dedup_by_id(destinations);
        let max = usize::try_from(max_sources_per_destination).unwrap_or(usize::MAX);

        let (layout, program) = formulate(&sources, &destinations, max, fairness, &cost)?;
        let values = self.backend.solve(&program)?;
        let assignment = decode(&layout, &values, &sources, &destinations);

        tracing::debug!(
            backend = self.backend.name(),
            assigned = assignment.len(),
            unassigned = layout.sources() - assignment.len(),
            objective = program.objective_value(&values),
            "solved assignment"
        );
        Ok(assignment)
    }
}
