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

use crate::lp::{
    LpBackend,
    err::LpError,
    program::{Goal, LinearProgram, Relation},
};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, variable,
};

/// Numeric solver used behind `good_lp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LpSolverKind {
    /// Pure Rust dense simplex.
    #[default]
    MicroLp,
    #[cfg(feature = "highs")]
    Highs,
}

impl std::fmt::Display for LpSolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpSolverKind::MicroLp => write!(f, "microlp"),
            #[cfg(feature = "highs")]
            LpSolverKind::Highs => write!(f, "highs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GoodLpBackend {
    kind: LpSolverKind,
}

impl GoodLpBackend {
    #[inline]
    pub fn new(kind: LpSolverKind) -> Self {
        Self { kind }
    }

    #[inline]
    pub fn kind(&self) -> LpSolverKind {
        self.kind
    }
}

#[inline]
fn linear_expression(xs: &[Variable], coefficients: &[f64]) -> Expression {
    xs.iter()
        .zip(coefficients)
        .filter(|(_, c)| **c != 0.0)
        .fold(Expression::from(0.0), |acc, (x, &c)| acc + c * *x)
}

fn solve_model<M>(mut model: M, program: &LinearProgram, xs: &[Variable]) -> Result<Vec<f64>, LpError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for constraint in program.constraints() {
        let lhs = linear_expression(xs, constraint.coefficients());
        let rhs = constraint.rhs();
        match constraint.relation() {
            Relation::LessOrEqual => model.add_constraint(lhs.leq(rhs)),
            Relation::GreaterOrEqual => model.add_constraint(lhs.geq(rhs)),
            Relation::Equal => model.add_constraint(lhs.eq(rhs)),
        };
    }

    let solution = model.solve()?;
    Ok(xs.iter().map(|x| solution.value(*x)).collect())
}

impl LpBackend for GoodLpBackend {
    fn name(&self) -> &str {
        match self.kind {
            LpSolverKind::MicroLp => "good_lp/microlp",
            #[cfg(feature = "highs")]
            LpSolverKind::Highs => "good_lp/highs",
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(backend = %self.kind, vars = program.dimension(), rows = program.constraints().len()))]
    fn solve(&mut self, program: &LinearProgram) -> Result<Vec<f64>, LpError> {
        program.validate()?;
        if program.dimension() == 0 {
            return Ok(Vec::new());
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = (0..program.dimension())
            .map(|i| {
                let definition = if program.is_non_negative() {
                    variable().min(0.0)
                } else {
                    variable()
                };
                vars.add(definition.name(format!("x_{i}")))
            })
            .collect();

        let objective = linear_expression(&xs, program.objective());
        let unsolved = match program.goal() {
            Goal::Minimize => vars.minimise(objective),
            Goal::Maximize => vars.maximise(objective),
        };

        match self.kind {
            LpSolverKind::MicroLp => {
                solve_model(unsolved.using(good_lp::solvers::microlp::microlp), program, &xs)
            }
            #[cfg(feature = "highs")]
            LpSolverKind::Highs => {
                solve_model(unsolved.using(good_lp::solvers::highs::highs), program, &xs)
            }
        }
    }
}
