//! Signal smoothing ahead of change-point detection.

/// Centered moving average with zero padding at the edges, equivalent to
/// discrete convolution with a uniform kernel and a same-length output.
///
/// The divisor is always the window length, so values near the edges are
/// attenuated rather than renormalized. Detection depends on that shape:
/// renormalized edges would promote spurious first-week breakpoints.
///
/// A window of 0 or 1, or one at least as long as the signal, returns the
/// signal unchanged.
pub fn centered_moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    let n = signal.len();
    if window <= 1 || window >= n {
        return signal.to_vec();
    }

    // Forward reach of the kernel; one shorter behind for even windows.
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;
    let scale = 1.0 / window as f64;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead).min(n - 1);
            signal[lo..=hi].iter().sum::<f64>() * scale
        })
        .collect()
}
