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

use crate::lp::err::DimensionMismatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Goal {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::LessOrEqual => write!(f, "<="),
            Relation::GreaterOrEqual => write!(f, ">="),
            Relation::Equal => write!(f, "=="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    coefficients: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

impl LinearConstraint {
    #[inline]
    pub fn new(coefficients: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coefficients,
            relation,
            rhs,
        }
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[inline]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Whether `values` satisfy this constraint up to `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs: f64 = self
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum();
        match self.relation {
            Relation::LessOrEqual => lhs <= self.rhs + tolerance,
            Relation::GreaterOrEqual => lhs >= self.rhs - tolerance,
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Dense description of a linear program, independent of any solver library.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearProgram {
    objective: Vec<f64>,
    goal: Goal,
    constraints: Vec<LinearConstraint>,
    non_negative: bool,
}

impl LinearProgram {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, goal: Goal) -> &mut Self {
        self.objective = coefficients;
        self.goal = goal;
        self
    }

    pub fn add_constraint(
        &mut self,
        coefficients: Vec<f64>,
        relation: Relation,
        rhs: f64,
    ) -> &mut Self {
        self.constraints
            .push(LinearConstraint::new(coefficients, relation, rhs));
        self
    }

    #[inline]
    pub fn add_less_equal(&mut self, coefficients: Vec<f64>, rhs: f64) -> &mut Self {
        self.add_constraint(coefficients, Relation::LessOrEqual, rhs)
    }

    #[inline]
    pub fn add_greater_equal(&mut self, coefficients: Vec<f64>, rhs: f64) -> &mut Self {
        self.add_constraint(coefficients, Relation::GreaterOrEqual, rhs)
    }

    #[inline]
    pub fn add_equal(&mut self, coefficients: Vec<f64>, rhs: f64) -> &mut Self {
        self.add_constraint(coefficients, Relation::Equal, rhs)
    }

    /// Restricts every decision variable to `>= 0`.
    #[inline]
    pub fn add_non_negativity(&mut self) -> &mut Self {
        self.non_negative = true;
        self
    }

    #[inline]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[inline]
    pub fn goal(&self) -> Goal {
        self.goal
    }

    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    #[inline]
    pub fn is_non_negative(&self) -> bool {
        self.non_negative
    }

    /// Number of decision variables.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.objective.len()
    }

    pub fn validate(&self) -> Result<(), DimensionMismatchError> {
        let expected = self.dimension();
        match self
            .constraints
            .iter()
            .position(|c| c.coefficients.len() != expected)
        {
            Some(i) => Err(DimensionMismatchError::new(
                i,
                expected,
                self.constraints[i].coefficients.len(),
            )),
            None => Ok(()),
        }
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, v)| c * v).sum()
    }

    /// Whether `values` satisfy every constraint (and non-negativity, if set).
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.dimension()
            && (!self.non_negative || values.iter().all(|v| *v >= -tolerance))
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied_by(values, tolerance))
    }
}
