//! Trailing-window statistics over unevenly populated series.

/// Below this share of the raw square sum the running difference is noise.
const CANCELLATION_FLOOR: f64 = 1e-9;

/// Trailing rolling sample standard deviation (n - 1 denominator).
///
/// Entry `i` covers samples `i + 1 - window ..= i`. It is `None` while the
/// window is not yet full and whenever the window contains a missing or
/// non-finite sample. A window of identical samples yields exactly `0.0`.
/// Windows shorter than two samples have no defined deviation.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window < 2 {
        return out;
    }

    let sample = |i: usize| values[i].filter(|v| v.is_finite());
    let window_sums = |shift: f64, end: usize| {
        (end + 1 - window..=end).fold((0.0, 0.0), |(sum, sum_sq), j| {
            let d = sample(j).unwrap_or(shift) - shift;
            (sum + d, sum_sq + d * d)
        })
    };

    // Sums are kept relative to a sample near the window so they stay small.
    let mut shift = (0..n).find_map(sample).unwrap_or(0.0);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut missing = 0usize;
    let mut equal_run = 0usize;
    let mut since_resync = 0usize;

    for i in 0..n {
        match sample(i) {
            Some(v) => {
                let d = v - shift;
                sum += d;
                sum_sq += d * d;
            }
            None => missing += 1,
        }

        equal_run = match (sample(i), i.checked_sub(1).and_then(sample)) {
            (Some(cur), Some(prev)) if cur == prev => equal_run + 1,
            (Some(_), _) => 1,
            (None, _) => 0,
        };

        if i >= window {
            match sample(i - window) {
                Some(v) => {
                    let d = v - shift;
                    sum -= d;
                    sum_sq -= d * d;
                }
                None => missing -= 1,
            }
        }

        if i + 1 < window || missing > 0 {
            continue;
        }
        if equal_run >= window {
            out[i] = Some(0.0);
            continue;
        }

        let w = window as f64;
        let mut m2 = sum_sq - sum * sum / w;

        // Resync on a schedule, and whenever the difference has cancelled
        // down to rounding noise because the series drifted off the shift.
        since_resync += 1;
        if since_resync >= window || m2 <= sum_sq * CANCELLATION_FLOOR {
            shift = sample(i + 1 - window).unwrap_or(shift);
            (sum, sum_sq) = window_sums(shift, i);
            m2 = sum_sq - sum * sum / w;
            since_resync = 0;
        }

        let variance = (m2 / (w - 1.0)).max(0.0);
        out[i] = Some(variance.sqrt());
    }

    out
}
