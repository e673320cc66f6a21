// =============================================================================
// Window & Recurrence Primitives
// =============================================================================
//
// Column-level building blocks shared by every indicator.  All of them follow
// the same undefined-value convention:
//
//   - `f64::NAN` marks "not computable" (warm-up, missing history, 0/0).
//   - A rolling window is undefined until it holds `period` values and stays
//     undefined while any value inside it is undefined (sums and deviations
//     also treat ±inf as undefined).
//   - Sums, means, deviations and extrema are updated as the window slides,
//     so their cost does not grow with the period.
//   - Division by zero yields NaN, never ±inf and never a panic.
//
// Outputs are always the same length as the input so columns line up with
// the candle rows they annotate.
// =============================================================================

use std::collections::VecDeque;

/// `a / b`, or NaN when `b` is zero.
#[inline]
pub fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        f64::NAN
    } else {
        a / b
    }
}

/// Apply `f` to every full trailing window of `period` values.
///
/// Positions before the first full window, and windows containing NaN, are NaN.
/// Costs `period` per row; only used where no running update exists.
fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for end in period..=values.len() {
        let window = &values[end - period..end];
        if window.iter().all(|v| !v.is_nan()) {
            out[end - 1] = f(window);
        }
    }
    out
}

/// Kahan-compensated accumulator for a sliding sum.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    carry: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let y = x - self.carry;
        let t = self.sum + y;
        self.carry = (t - self.sum) - y;
        self.sum = t;
    }
}

/// Sliding sum over runs of defined values. A non-finite value resets the
/// run, so the next `period - 1` windows after it stay undefined.
pub fn rolling_sum(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    let mut acc = CompensatedSum::default();
    let mut run = 0usize;
    for (i, &x) in values.iter().enumerate() {
        if !x.is_finite() {
            acc = CompensatedSum::default();
            run = 0;
            continue;
        }
        acc.add(x);
        run += 1;
        if run > period {
            acc.add(-values[i - period]);
        }
        if run >= period {
            out[i] = acc.sum;
        }
    }
    out
}

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = period as f64;
    rolling_sum(values, period).into_iter().map(|s| s / n).collect()
}

/// Sample standard deviation (n - 1 denominator); undefined for `period < 2`.
///
/// Sliding Welford update: the mean and the sum of squared deviations are
/// adjusted as each value replaces the one leaving the window.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period < 2 {
        return out;
    }
    let n = period as f64;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    let mut run = 0usize;
    for (i, &x) in values.iter().enumerate() {
        if !x.is_finite() {
            mean = 0.0;
            m2 = 0.0;
            run = 0;
            continue;
        }
        run += 1;
        if run <= period {
            let delta = x - mean;
            mean += delta / run as f64;
            m2 += delta * (x - mean);
        } else {
            let old = values[i - period];
            let prev_mean = mean;
            mean += (x - old) / n;
            m2 += (x - old) * (x - mean + old - prev_mean);
        }
        if run >= period {
            out[i] = (m2.max(0.0) / (n - 1.0)).sqrt();
        }
    }
    out
}

/// Sliding extremum with a monotonic deque of indices. `better(a, b)` is true
/// when `a` should evict `b` from the back of the deque.
fn rolling_extreme(values: &[f64], period: usize, better: impl Fn(f64, f64) -> bool) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut run = 0usize;
    for (i, &x) in values.iter().enumerate() {
        if x.is_nan() {
            deque.clear();
            run = 0;
            continue;
        }
        run += 1;
        while deque.back().is_some_and(|&j| better(x, values[j])) {
            deque.pop_back();
        }
        deque.push_back(i);
        while deque.front().is_some_and(|&j| j + period <= i) {
            deque.pop_front();
        }
        if run >= period {
            if let Some(&j) = deque.front() {
                out[i] = values[j];
            }
        }
    }
    out
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, |a, b| a >= b)
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, |a, b| a <= b)
}

/// Mean absolute deviation of each window around its own mean.
pub fn rolling_mean_abs_dev(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        w.iter().map(|x| (x - mean).abs()).sum::<f64>() / w.len() as f64
    })
}

/// First difference; index 0 is undefined.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        out.push(if i == 0 { f64::NAN } else { values[i] - values[i - 1] });
    }
    out
}

/// Move values `lag` positions later (positive) or earlier (negative),
/// filling the vacated positions with NaN.
pub fn shift(values: &[f64], lag: isize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    let offset = lag.unsigned_abs();
    if offset >= n {
        return out;
    }
    if lag >= 0 {
        out[offset..].copy_from_slice(&values[..n - offset]);
    } else {
        out[..n - offset].copy_from_slice(&values[offset..]);
    }
    out
}

/// Running total that skips undefined entries: an undefined input stays
/// undefined in the output but does not poison later totals.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else {
                acc += v;
                acc
            }
        })
        .collect()
}

/// Smoothing factor for a span: `α = 2 / (span + 1)`.
#[inline]
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Bias-corrected exponentially weighted mean.
///
/// `y_t = Σ (1-α)^i · x_{t-i} / Σ (1-α)^i` over all samples seen so far, so the
/// output is defined from the first row and early values are not dragged
/// towards zero.
pub fn ewm_adjusted(values: &[f64], span: usize) -> Vec<f64> {
    let decay = 1.0 - span_alpha(span);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    values
        .iter()
        .map(|&x| {
            numerator = x + decay * numerator;
            denominator = 1.0 + decay * denominator;
            numerator / denominator
        })
        .collect()
}

/// Plain recursive exponentially weighted mean: `y_0 = x_0`,
/// `y_t = (1-α)·y_{t-1} + α·x_t`.
pub fn ewm_recursive(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = span_alpha(span);
    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|&x| {
            let y = match prev {
                None => x,
                Some(p) => (1.0 - alpha) * p + alpha * x,
            };
            prev = Some(y);
            y
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::candle::fixtures::assert_close;

    #[test]
    fn safe_div_zero_is_nan() {
        assert!(safe_div(1.0, 0.0).is_nan());
        assert!(safe_div(0.0, 0.0).is_nan());
        assert_eq!(safe_div(6.0, 3.0), 2.0);
    }

    #[test]
    fn rolling_mean_warm_up_and_values() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
    }

    #[test]
    fn rolling_window_with_nan_is_undefined() {
        let out = rolling_sum(&[f64::NAN, 1.0, 2.0, 3.0], 2);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_close(out[2], 3.0);
        assert_close(out[3], 5.0);
    }

    #[test]
    fn rolling_longer_than_input_is_all_nan() {
        assert!(rolling_max(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
        assert!(rolling_min(&[], 2).is_empty());
    }

    #[test]
    fn rolling_std_is_sample_std() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // Sum of squared deviations = 32, n - 1 = 7.
        assert_close(out[7], (32.0_f64 / 7.0).sqrt());
        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(|v| v.is_nan()));
    }

    /// Deterministic price-like walk with occasional NaN gaps.
    fn walk(len: usize, seed: u64, nan_every: usize) -> Vec<f64> {
        let mut state = seed;
        let mut price = 30_000.0;
        (0..len)
            .map(|i| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                price += (state % 2001) as f64 / 100.0 - 10.0;
                if nan_every > 0 && i % nan_every == nan_every - 1 {
                    f64::NAN
                } else {
                    price
                }
            })
            .collect()
    }

    fn assert_same_column(got: &[f64], want: &[f64], tol: f64) {
        assert_eq!(got.len(), want.len());
        for (i, (g, w)) in got.iter().zip(want).enumerate() {
            if w.is_nan() {
                assert!(g.is_nan(), "row {i}: expected NaN, got {g}");
            } else {
                assert!((g - w).abs() <= tol * w.abs().max(1.0), "row {i}: {g} vs {w}");
            }
        }
    }

    // ---- sliding updates match direct window evaluation ----
    #[test]
    fn sliding_matches_direct_windows() {
        for (seed, nan_every) in [(0x9E37_79B9_7F4A_7C15, 0), (0x2545_F491_4F6C_DD1D, 37)] {
            let v = walk(2_000, seed, nan_every);
            for period in [1, 2, 5, 20, 150] {
                let sum = |w: &[f64]| w.iter().sum::<f64>();
                let std = |w: &[f64]| {
                    if w.len() < 2 {
                        return f64::NAN;
                    }
                    let mean = w.iter().sum::<f64>() / w.len() as f64;
                    let ss = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
                    (ss / (w.len() - 1) as f64).sqrt()
                };
                let max = |w: &[f64]| w.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = |w: &[f64]| w.iter().copied().fold(f64::INFINITY, f64::min);

                assert_same_column(&rolling_sum(&v, period), &rolling(&v, period, sum), 1e-12);
                assert_same_column(
                    &rolling_mean(&v, period),
                    &rolling(&v, period, |w| sum(w) / w.len() as f64),
                    1e-12,
                );
                assert_same_column(&rolling_std(&v, period), &rolling(&v, period, std), 1e-6);
                assert_same_column(&rolling_max(&v, period), &rolling(&v, period, max), 0.0);
                assert_same_column(&rolling_min(&v, period), &rolling(&v, period, min), 0.0);
            }
        }
    }

    #[test]
    fn nan_inside_window_resets_every_sliding_kind() {
        let v = [1.0, 5.0, 3.0, f64::NAN, 2.0, 8.0, 4.0, 6.0];
        for out in [
            rolling_sum(&v, 3),
            rolling_mean(&v, 3),
            rolling_std(&v, 3),
            rolling_max(&v, 3),
            rolling_min(&v, 3),
        ] {
            assert!(out[..2].iter().all(|x| x.is_nan()));
            assert!(!out[2].is_nan());
            // Windows ending at 3, 4 and 5 all contain the NaN.
            assert!(out[3..6].iter().all(|x| x.is_nan()));
            assert!(!out[6].is_nan() && !out[7].is_nan());
        }
        assert_close(rolling_sum(&v, 3)[6], 14.0);
        assert_close(rolling_max(&v, 3)[7], 8.0);
        assert_close(rolling_min(&v, 3)[7], 4.0);
        assert_close(rolling_std(&v, 3)[7], 2.0);
    }

    #[test]
    fn rolling_std_of_constant_window_is_zero() {
        let out = rolling_std(&[30_000.1; 50], 10);
        assert!(out[9..].iter().all(|x| *x >= 0.0 && *x < 1e-6));
    }

    #[test]
    fn mean_abs_dev() {
        let out = rolling_mean_abs_dev(&[1.0, 2.0, 3.0, 4.0], 4);
        assert_close(out[3], 1.0);
    }

    #[test]
    fn shift_both_directions() {
        let v = [1.0, 2.0, 3.0];
        let fwd = shift(&v, 1);
        assert!(fwd[0].is_nan());
        assert_eq!(&fwd[1..], &[1.0, 2.0]);
        let back = shift(&v, -2);
        assert_eq!(back[0], 3.0);
        assert!(back[1].is_nan() && back[2].is_nan());
        assert!(shift(&v, 5).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn cumsum_skips_nan() {
        let out = cumsum(&[1.0, f64::NAN, 2.0]);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 3.0);
    }

    #[test]
    fn ewm_adjusted_golden_values() {
        // span 3 => alpha 0.5, decay 0.5.
        let out = ewm_adjusted(&[1.0, 2.0, 3.0], 3);
        assert_close(out[0], 1.0);
        assert_close(out[1], (2.0 + 0.5 * 1.0) / 1.5);
        assert_close(out[2], (3.0 + 0.5 * 2.0 + 0.25 * 1.0) / 1.75);
    }

    #[test]
    fn ewm_recursive_golden_values() {
        let out = ewm_recursive(&[1.0, 2.0, 3.0], 3);
        assert_close(out[0], 1.0);
        assert_close(out[1], 1.5);
        assert_close(out[2], 2.25);
    }

    #[test]
    fn diff_first_is_nan() {
        let d = diff(&[5.0, 7.0, 4.0]);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[2.0, -3.0]);
    }
}
