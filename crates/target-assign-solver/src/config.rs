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

use crate::err::{ConfigError, InvalidCapacityError, InvalidToleranceError};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq)]
pub struct TolerantCacheConfig {
    /// Maximum number of cached cost fingerprints, across all problem shapes, before LRU eviction.
    pub capacity: usize,
    /// Two costs closer than this are considered equal.
    pub epsilon: f64,
    /// Calls per hit-ratio report. Zero disables reporting.
    pub report_every: usize,
}

impl Default for TolerantCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 5 * 1024,
            epsilon: 9.0,
            report_every: 1000,
        }
    }
}

impl TolerantCacheConfig {
    pub fn validate(&self) -> Result<(NonZeroUsize, f64), ConfigError> {
        let capacity = NonZeroUsize::new(self.capacity).ok_or(InvalidCapacityError)?;
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(InvalidToleranceError::new(self.epsilon).into());
        }
        Ok((capacity, self.epsilon))
    }
}
