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

/// Pairwise cost table quantised into `epsilon`-wide buckets.
///
/// Costs are stored in a canonical order chosen by the caller (sorted ids), so
/// two fingerprints of the same problem shape line up index by index.
#[derive(Debug, Clone, PartialEq)]
pub struct CostFingerprint {
    costs: Vec<f64>,
    buckets: Vec<i64>,
}

impl CostFingerprint {
    pub fn new(costs: Vec<f64>, epsilon: f64) -> Self {
        let buckets = costs.iter().map(|c| (c / epsilon).floor() as i64).collect();
        Self { costs, buckets }
    }

    #[inline]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    #[inline]
    pub fn buckets(&self) -> &[i64] {
        &self.buckets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// True when `buckets` has this table's length and no bucket is more than one step away.
    pub fn near_buckets(&self, buckets: &[i64]) -> bool {
        self.buckets.len() == buckets.len()
            && self
                .buckets
                .iter()
                .zip(buckets)
                .all(|(a, b)| a.abs_diff(*b) <= 1)
    }

    /// True when every pair of corresponding costs differs by less than `epsilon`.
    ///
    /// Costs closer than `epsilon` can never be more than one bucket apart,
    /// which lets most misses bail out on integer comparisons.
    pub fn matches(&self, other: &Self, epsilon: f64) -> bool {
        self.near_buckets(&other.buckets)
            && self
                .costs
                .iter()
                .zip(&other.costs)
                .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_epsilon_wide() {
        let fp = CostFingerprint::new(vec![0.0, 0.4, 1.0, 2.5], 0.5);
        assert_eq!(fp.buckets(), &[0, 0, 2, 5]);
    }

    #[test]
    fn test_match_within_tolerance_across_bucket_edge() {
        let a = CostFingerprint::new(vec![1.99, 5.0], 1.0);
        let b = CostFingerprint::new(vec![2.01, 5.5], 1.0);
        assert_ne!(a.buckets(), b.buckets());
        assert!(a.matches(&b, 1.0));
        assert!(b.matches(&a, 1.0));
    }

    #[test]
    fn test_no_match_at_or_beyond_tolerance() {
        let a = CostFingerprint::new(vec![1.0, 5.0], 1.0);
        let exactly = CostFingerprint::new(vec![2.0, 5.0], 1.0);
        let far = CostFingerprint::new(vec![1.0, 50.0], 1.0);
        assert!(!a.matches(&exactly, 1.0));
        assert!(!a.matches(&far, 1.0));
    }

    #[test]
    fn test_no_match_on_length_difference() {
        let a = CostFingerprint::new(vec![1.0], 1.0);
        let b = CostFingerprint::new(vec![1.0, 1.0], 1.0);
        assert!(!a.matches(&b, 1.0));
    }

    #[test]
    fn test_nan_never_matches() {
        let a = CostFingerprint::new(vec![f64::NAN], 1.0);
        assert!(!a.matches(&a.clone(), 1.0));
    }

    #[test]
    fn test_near_buckets_allows_one_step() {
        let a = CostFingerprint::new(vec![1.5, 4.5], 1.0);
        assert!(a.near_buckets(&[2, 3]));
        assert!(!a.near_buckets(&[3, 4]));
        assert!(!a.near_buckets(&[1]));
    }
}
