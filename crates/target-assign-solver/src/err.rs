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

use crate::lp::err::LpError;

/// The caller-supplied cost function returned a negative or non-finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCostError {
    source_index: usize,
    destination_index: usize,
    value: f64,
}

impl InvalidCostError {
    pub fn new(source_index: usize, destination_index: usize, value: f64) -> Self {
        Self {
            source_index,
            destination_index,
            value,
        }
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn destination_index(&self) -> usize {
        self.destination_index
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for InvalidCostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cost from source #{} to destination #{} is {}, expected a finite non-negative value",
            self.source_index, self.destination_index, self.value
        )
    }
}

impl std::error::Error for InvalidCostError {}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentError {
    InvalidCost(InvalidCostError),
    Solver(LpError),
}

impl std::fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentError::InvalidCost(e) => write!(f, "{}", e),
            AssignmentError::Solver(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AssignmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssignmentError::InvalidCost(e) => Some(e),
            AssignmentError::Solver(e) => Some(e),
        }
    }
}

impl From<InvalidCostError> for AssignmentError {
    fn from(err: InvalidCostError) -> Self {
        AssignmentError::InvalidCost(err)
    }
}

impl From<LpError> for AssignmentError {
    fn from(err: LpError) -> Self {
        AssignmentError::Solver(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidToleranceError {
    value: f64,
}

impl InvalidToleranceError {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for InvalidToleranceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid cost tolerance {}. Expected a finite value greater than zero.",
            self.value
        )
    }
}

impl std::error::Error for InvalidToleranceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidCapacityError;

impl std::fmt::Display for InvalidCapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cache capacity must be at least one entry.")
    }
}

impl std::error::Error for InvalidCapacityError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidTolerance(InvalidToleranceError),
    InvalidCapacity(InvalidCapacityError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTolerance(e) => write!(f, "{}", e),
            ConfigError::InvalidCapacity(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<InvalidToleranceError> for ConfigError {
    fn from(err: InvalidToleranceError) -> Self {
        ConfigError::InvalidTolerance(err)
    }
}

impl From<InvalidCapacityError> for ConfigError {
    fn from(err: InvalidCapacityError) -> Self {
        ConfigError::InvalidCapacity(err)
    }
}
