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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub calls: u64,
}

impl CacheStats {
    #[inline]
    pub fn misses(&self) -> u64 {
        self.calls - self.hits
    }

    /// Hit ratio in `0.0..=1.0`, zero before the first call.
    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.hits as f64 / self.calls as f64
        }
    }

    #[inline]
    pub fn record(&mut self, hit: bool) {
        self.calls += 1;
        if hit {
            self.hits += 1;
        }
    }
}

/// Hit/miss counters over fixed-size windows of calls, plus lifetime totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitWindow {
    size: usize,
    window: CacheStats,
    total: CacheStats,
}

impl HitWindow {
    /// A `size` of zero never completes a window.
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: CacheStats::default(),
            total: CacheStats::default(),
        }
    }

    /// Records one call. Returns the window's stats once it fills up, then starts a new one.
    pub fn record(&mut self, hit: bool) -> Option<CacheStats> {
        self.window.record(hit);
        self.total.record(hit);
        if self.size > 0 && self.window.calls >= self.size as u64 {
            Some(std::mem::take(&mut self.window))
        } else {
            None
        }
    }

    #[inline]
    pub fn current(&self) -> CacheStats {
        self.window
    }

    #[inline]
    pub fn total(&self) -> CacheStats {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_reports_and_resets() {
        let mut window = HitWindow::new(3);
        assert_eq!(window.record(true), None);
        assert_eq!(window.record(false), None);
        let report = window.record(true).unwrap();
        assert_eq!(report, CacheStats { hits: 2, calls: 3 });
        assert_eq!(report.misses(), 1);
        assert_eq!(window.current(), CacheStats::default());

        window.record(false);
        assert_eq!(window.total(), CacheStats { hits: 2, calls: 4 });
    }

    #[test]
    fn test_zero_sized_window_never_reports() {
        let mut window = HitWindow::new(0);
        for _ in 0..10 {
            assert_eq!(window.record(true), None);
        }
        assert_eq!(window.total().calls, 10);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(CacheStats::default().ratio(), 0.0);
        assert_eq!(CacheStats { hits: 1, calls: 4 }.ratio(), 0.25);
    }
}
