//! L2 segment cost over prefix sums.

/// Prefix-stat cache giving O(1) within-segment squared-deviation costs.
///
/// For the half-open range `[start, end)` the cost is
/// `sum(x^2) - sum(x)^2 / len`, i.e. the sum of squared deviations from the
/// segment mean.
#[derive(Debug, Clone)]
pub struct L2Cost {
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
}

impl L2Cost {
    pub fn precompute(signal: &[f64]) -> Self {
        let mut prefix_sum = Vec::with_capacity(signal.len() + 1);
        let mut prefix_sum_sq = Vec::with_capacity(signal.len() + 1);
        prefix_sum.push(0.0);
        prefix_sum_sq.push(0.0);

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &x in signal {
            sum += x;
            sum_sq += x * x;
            prefix_sum.push(sum);
            prefix_sum_sq.push(sum_sq);
        }

        Self { prefix_sum, prefix_sum_sq }
    }

    /// Number of samples the cache was built over.
    pub fn len(&self) -> usize {
        self.prefix_sum.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cost of the half-open segment `[start, end)`.
    ///
    /// Clamped at zero: a constant segment can come out a hair negative
    /// under floating-point cancellation.
    pub fn segment_cost(&self, start: usize, end: usize) -> f64 {
        assert!(start < end, "empty segment [{}, {})", start, end);
        assert!(end <= self.len(), "segment end {} past signal length {}", end, self.len());

        let len = (end - start) as f64;
        let sum = self.prefix_sum[end] - self.prefix_sum[start];
        let sum_sq = self.prefix_sum_sq[end] - self.prefix_sum_sq[start];
        (sum_sq - sum * sum / len).max(0.0)
    }
}
