// ---------------------------------------------------------------------------
// Moving-average filter
// ---------------------------------------------------------------------------

/// Centered moving average with a uniform kernel of `window` taps.
///
/// Equivalent to a linear convolution of `signal` with `[1/w; w]`, keeping the
/// centre `signal.len()` samples of the full result:
///
/// ```text
///   out[i] = (1/w) * Σ_{k=0}^{w-1} x[i + (w-1)/2 - k]
/// ```
///
/// Samples outside `0..len` count as zero, so the first and last `(w-1)/2`
/// outputs are pulled towards zero. Output length always equals input length.
/// NaN samples propagate to every output whose window covers them.
///
/// # Panics
///
/// Panics if `window` is zero.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    assert!(window > 0, "moving average window must be at least 1");

    let len = signal.len();
    let offset = (window - 1) / 2;
    let divisor = window as f64;

    (0..len)
        .map(|i| {
            // Window covers x[i + offset - (w-1)] ..= x[i + offset].
            let end = i.saturating_add(offset);
            let hi = end.min(len - 1);
            let lo = end.saturating_sub(window - 1);
            signal[lo..=hi].iter().sum::<f64>() / divisor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-12, "index {i}: {a} != {e}");
        }
    }

    #[test]
    fn ramp_with_window_five() {
        let signal: Vec<f64> = (1..=10).map(f64::from).collect();
        let out = moving_average(&signal, 5);

        assert_close(
            &out,
            &[1.2, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 6.8, 5.4],
        );
        for i in 2..=7 {
            let mean = signal[i - 2..=i + 2].iter().sum::<f64>() / 5.0;
            assert!((out[i] - mean).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_signal_is_preserved_in_the_interior() {
        let out = moving_average(&[4.0; 8], 5);
        assert_close(&out, &[2.4, 3.2, 4.0, 4.0, 4.0, 4.0, 3.2, 2.4]);
    }

    #[test]
    fn even_window_leans_left() {
        // Full convolution of [1,2,3,4,5] with [1,1,1,1] is
        // [1,3,6,10,14,12,9,5]; the centred slice starts at index 1.
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 4);
        assert_close(&out, &[0.75, 1.5, 2.5, 3.5, 3.0]);
    }

    #[test]
    fn signal_shorter_than_window_keeps_its_length() {
        let out = moving_average(&[5.0, 5.0], 5);
        assert_close(&out, &[2.0, 2.0]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let signal = [0.5, -1.0, 3.25];
        assert_close(&moving_average(&signal, 1), &signal);
    }

    #[test]
    fn huge_window_averages_to_near_zero() {
        let out = moving_average(&[1.0, 2.0, 3.0], usize::MAX);
        assert_eq!(out.len(), 3);
        for v in out {
            assert!(v.abs() < 1e-15, "{v}");
        }
    }

    #[test]
    fn empty_signal_gives_empty_output() {
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn nan_spreads_across_its_window() {
        let out = moving_average(&[1.0, 1.0, f64::NAN, 1.0, 1.0, 1.0, 1.0], 3);
        assert!(!out[0].is_nan());
        assert!(out[1].is_nan() && out[2].is_nan() && out[3].is_nan());
        assert!(!out[4].is_nan());
    }
}
