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

pub mod err;
pub mod good;
pub mod program;

use crate::lp::{err::LpError, program::LinearProgram};

/// A numeric solver able to optimise a dense [`LinearProgram`].
///
/// Implementations may keep internal state between calls, hence `&mut self`.
/// Independent problem instances that solve in parallel need independent
/// backends.
pub trait LpBackend {
    fn name(&self) -> &str;

    /// Returns the optimal variable vector, one value per objective coefficient.
    fn solve(&mut self, program: &LinearProgram) -> Result<Vec<f64>, LpError>;
}

impl<B: LpBackend + ?Sized> LpBackend for &mut B {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn solve(&mut self, program: &LinearProgram) -> Result<Vec<f64>, LpError> {
        (**self).solve(program)
    }
}

impl<B: LpBackend + ?Sized> LpBackend for Box<B> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn solve(&mut self, program: &LinearProgram) -> Result<Vec<f64>, LpError> {
        (**self).solve(program)
    }
}
