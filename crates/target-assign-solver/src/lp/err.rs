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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionMismatchError {
    constraint: usize,
    expected: usize,
    found: usize,
}

impl DimensionMismatchError {
    pub fn new(constraint: usize, expected: usize, found: usize) -> Self {
        Self {
            constraint,
            expected,
            found,
        }
    }

    pub fn constraint(&self) -> usize {
        self.constraint
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn found(&self) -> usize {
        self.found
    }
}

impl std::fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Constraint {} has {} coefficients, but the objective has {}",
            self.constraint, self.found, self.expected
        )
    }
}

impl std::error::Error for DimensionMismatchError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LP backend failure: {}", self.message)
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LpError {
    Infeasible,
    Unbounded,
    DimensionMismatch(DimensionMismatchError),
    Backend(BackendError),
}

impl std::fmt::Display for LpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpError::Infeasible => write!(f, "The linear program is infeasible"),
            LpError::Unbounded => write!(f, "The linear program is unbounded"),
            LpError::DimensionMismatch(e) => write!(f, "{}", e),
            LpError::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LpError {}

impl From<DimensionMismatchError> for LpError {
    fn from(err: DimensionMismatchError) -> Self {
        LpError::DimensionMismatch(err)
    }
}

impl From<BackendError> for LpError {
    fn from(err: BackendError) -> Self {
        LpError::Backend(err)
    }
}

impl From<good_lp::ResolutionError> for LpError {
    fn from(err: good_lp::ResolutionError) -> Self {
        match err {
            good_lp::ResolutionError::Infeasible => LpError::Infeasible,
            good_lp::ResolutionError::Unbounded => LpError::Unbounded,
            other => LpError::Backend(BackendError::new(other.to_string())),
        }
    }
}
