//! Exact penalized change-point detection.
//!
//! PELT (Pruned Exact Linear Time) over an L2 cost: finds the breakpoint
//! set minimizing total within-segment squared deviation plus a fixed
//! penalty per segment. Pruning only discards split candidates that can
//! never re-enter an optimal solution, so the result is the exact optimum,
//! not a greedy approximation.

use super::cost::L2Cost;
use super::smoothing;

/// Change-point detector with a fixed penalty, minimum segment length, and
/// pre-detection smoothing window.
///
/// Higher penalties buy fewer change points. The same detector type serves
/// both the primary (penalty ~3.0) and sensitive (penalty ~1.5) passes;
/// every invocation carries its own parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeltDetector {
    penalty: f64,
    min_segment: usize,
    smoothing_window: usize,
}

impl PeltDetector {
    pub fn new(penalty: f64, min_segment: usize, smoothing_window: usize) -> Self {
        Self {
            penalty,
            min_segment: min_segment.max(1),
            smoothing_window,
        }
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn min_segment(&self) -> usize {
        self.min_segment
    }

    /// Detects change points, returning segment end indices in strictly
    /// increasing order with the final entry equal to `signal.len()`.
    ///
    /// The signal is smoothed before detection; callers aggregate segment
    /// stats from the raw games, never from the smoothed values. Signals
    /// shorter than twice the minimum segment length skip detection and
    /// come back as one whole-length segment; an empty signal yields no
    /// segments at all.
    pub fn detect(&self, signal: &[f64]) -> Vec<usize> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }
        if n < self.min_segment * 2 {
            return vec![n];
        }

        let smoothed = smoothing::centered_moving_average(signal, self.smoothing_window);
        let cost = L2Cost::precompute(&smoothed);
        let ends = self.segment_ends(&cost);
        log::debug!(
            "pelt: {} games -> {} segments (penalty {})",
            n,
            ends.len(),
            self.penalty
        );
        ends
    }

    // Dynamic program over admissible segment ends. f[t] is the best
    // penalized cost of the prefix [0, t); candidates are the split points
    // still able to start the final segment of some optimum.
    fn segment_ends(&self, cost: &L2Cost) -> Vec<usize> {
        let n = cost.len();
        let mut f = vec![f64::INFINITY; n + 1];
        let mut last_split = vec![0usize; n + 1];
        f[0] = -self.penalty;

        let mut candidates: Vec<usize> = vec![0];

        for t in self.min_segment..=n {
            // None marks candidates skipped for feasibility at this t; they
            // must survive pruning since they become feasible later.
            let mut scored: Vec<Option<f64>> = vec![None; candidates.len()];

            let mut best = f64::INFINITY;
            let mut best_tau = 0usize;
            for (idx, &tau) in candidates.iter().enumerate() {
                if t - tau < self.min_segment {
                    continue;
                }
                let unpenalized = f[tau] + cost.segment_cost(tau, t);
                scored[idx] = Some(unpenalized);
                let total = unpenalized + self.penalty;
                // Strict comparison keeps the leftmost split on ties.
                if total < best {
                    best = total;
                    best_tau = tau;
                }
            }

            f[t] = best;
            last_split[t] = best_tau;

            // Prune candidates whose unpenalized score already reached the
            // winner; they can never again be optimal (Killick et al. 2012).
            let mut kept = Vec::with_capacity(candidates.len() + 1);
            for (idx, &tau) in candidates.iter().enumerate() {
                match scored[idx] {
                    Some(score) if score >= best => {}
                    _ => kept.push(tau),
                }
            }
            if t < n {
                kept.push(t);
            }
            candidates = kept;
        }

        let mut ends = vec![n];
        let mut cursor = n;
        while last_split[cursor] > 0 {
            cursor = last_split[cursor];
            ends.push(cursor);
        }
        ends.reverse();
        ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_signal(low: f64, low_len: usize, high: f64, high_len: usize) -> Vec<f64> {
        let mut signal = vec![low; low_len];
        signal.extend(vec![high; high_len]);
        signal
    }

    #[test]
    fn test_empty_signal_has_no_segments() {
        let detector = PeltDetector::new(3.0, 7, 5);
        assert!(detector.detect(&[]).is_empty());
    }

    #[test]
    fn test_short_signal_is_one_segment() {
        // 13 games < 2 * 7: detection is skipped entirely.
        let detector = PeltDetector::new(3.0, 7, 5);
        let signal = step_signal(0.2, 6, 1.8, 7);
        assert_eq!(detector.detect(&signal), vec![13]);
    }

    #[test]
    fn test_constant_signal_is_one_segment() {
        let detector = PeltDetector::new(3.0, 7, 5);
        assert_eq!(detector.detect(&[0.75; 64]), vec![64]);
    }

    #[test]
    fn test_clean_step_splits_at_the_step() {
        // No smoothing: the optimal split costs zero, every other choice
        // strictly more.
        let detector = PeltDetector::new(1.0, 7, 1);
        let signal = step_signal(0.0, 10, 10.0, 10);
        assert_eq!(detector.detect(&signal), vec![10, 20]);
    }

    #[test]
    fn test_smoothed_step_splits_at_the_step() {
        // Ten 0.500-OPS games then ten 1.750-OPS games through a width-5
        // window still split exactly at the step under the batch penalty.
        let detector = PeltDetector::new(3.0, 7, 5);
        let signal = step_signal(0.5, 10, 1.75, 10);
        assert_eq!(detector.detect(&signal), vec![10, 20]);
    }

    #[test]
    fn test_penalty_separates_subtle_shifts() {
        // A 0.75-OPS step is worth splitting at penalty 1.5 but not at 3.0:
        // the sensitive pass exists for exactly this gap.
        let signal = step_signal(0.5, 10, 1.25, 10);

        let sensitive = PeltDetector::new(1.5, 7, 5);
        assert_eq!(sensitive.detect(&signal), vec![10, 20]);

        let primary = PeltDetector::new(3.0, 7, 5);
        assert_eq!(primary.detect(&signal), vec![20]);
    }

    #[test]
    fn test_soft_step_sits_below_the_sensitive_penalty() {
        // A 0.400-OPS step survives even the sensitive penalty. It takes
        // 0.5 to split, one game early where the smoothing ramp begins.
        let signal = step_signal(0.7, 10, 1.1, 10);

        let sensitive = PeltDetector::new(1.5, 7, 5);
        assert_eq!(sensitive.detect(&signal), vec![20]);

        let eager = PeltDetector::new(0.5, 7, 5);
        assert_eq!(eager.detect(&signal), vec![9, 20]);
    }

    #[test]
    fn test_higher_penalty_never_finds_more_segments() {
        let mut signal = vec![0.0; 8];
        signal.extend(vec![5.0; 8]);
        signal.extend(vec![0.0; 8]);

        let eager = PeltDetector::new(1.0, 4, 1);
        assert_eq!(eager.detect(&signal), vec![8, 16, 24]);

        let reluctant = PeltDetector::new(1000.0, 4, 1);
        assert_eq!(reluctant.detect(&signal), vec![24]);
    }

    #[test]
    fn test_partition_invariant_on_wavy_signal() {
        let signal: Vec<f64> = (0..120)
            .map(|i| 0.8 + 0.4 * (i as f64 * 0.13).sin() + 0.2 * (i as f64 * 0.71).cos())
            .collect();
        let detector = PeltDetector::new(1.5, 7, 5);
        let ends = detector.detect(&signal);

        assert_eq!(*ends.last().unwrap(), 120);
        let mut start = 0;
        for &end in &ends {
            assert!(end > start, "ends must strictly increase");
            assert!(end - start >= 7, "segment [{}, {}) shorter than minimum", start, end);
            start = end;
        }
    }
}
