//! # Gain Helpers
//!
//! Every amplitude change in the delay goes through one of three helpers:
//!
//! - [`apply_gain`]: multiply a run of samples by a constant.
//! - [`apply_gain_ramp`]: multiply a run of samples by a linearly changing
//!   gain.
//! - [`add_with_ramp`]: add `source * gain` onto `dest`, with the gain
//!   ramping linearly.
//!
//! ## Ramp Shape
//!
//! A ramp over `n` samples steps the gain by `(end - start) / n` per
//! sample, starting at exactly `start`:
//!
//! ```text
//! g(i) = start + i * (end - start) / n      for i in 0..n
//! ```
//!
//! The last sample is one step short of `end`; the next run picks up at
//! `end`. When `start == end` the gain is constant and bit-exact.
//!
//! Ramping (rather than jumping) a gain that changes between blocks avoids
//! the step discontinuity that is heard as a click.

/// Scale every sample in `samples` by `gain`.
pub fn apply_gain(samples: &mut [f32], gain: f32) {
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
}

/// Scale `samples` by a gain that ramps linearly from `start` toward `end`.
pub fn apply_gain_ramp(samples: &mut [f32], start: f32, end: f32) {
    if start == end {
        apply_gain(samples, start);
        return;
    }

    let step = (end - start) / samples.len() as f32;
    let mut gain = start;
    for sample in samples.iter_mut() {
        *sample *= gain;
        gain += step;
    }
}

/// Add `source[i] * g(i)` onto `dest[i]`, with `g` ramping linearly from
/// `start` toward `end` over the run.
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub fn add_with_ramp(dest: &mut [f32], source: &[f32], start: f32, end: f32) {
    assert_eq!(
        dest.len(),
        source.len(),
        "add_with_ramp needs equally long runs"
    );

    let step = if start == end {
        0.0
    } else {
        (end - start) / source.len() as f32
    };

    let mut gain = start;
    for (out, &input) in dest.iter_mut().zip(source) {
        *out += input * gain;
        gain += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_gain() {
        let mut samples = [1.0, -2.0, 0.5];
        apply_gain(&mut samples, 0.5);
        assert_eq!(samples, [0.5, -1.0, 0.25]);
    }

    /// A ramp from 0 to 1 over four samples visits 0, 0.25, 0.5, 0.75.
    #[test]
    fn test_gain_ramp_shape() {
        let mut samples = [1.0; 4];
        apply_gain_ramp(&mut samples, 0.0, 1.0);
        for (i, (&got, want)) in samples.iter().zip([0.0, 0.25, 0.5, 0.75]).enumerate() {
            assert!((got - want).abs() < 1e-6, "sample {i}: expected {want}, got {got}");
        }
    }

    #[test]
    fn test_gain_ramp_on_empty_run() {
        let mut samples: [f32; 0] = [];
        apply_gain_ramp(&mut samples, 0.0, 1.0);
    }

    #[test]
    fn test_add_with_constant_gain_accumulates() {
        let mut dest = [1.0, 1.0, 1.0];
        add_with_ramp(&mut dest, &[2.0, 4.0, 6.0], 0.5, 0.5);
        assert_eq!(dest, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_add_with_ramp_shape() {
        let mut dest = [0.0; 2];
        add_with_ramp(&mut dest, &[1.0, 1.0], 1.0, 0.0);
        assert!((dest[0] - 1.0).abs() < 1e-6);
        assert!((dest[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    #[should_panic]
    fn test_add_with_ramp_length_mismatch() {
        let mut dest = [0.0; 2];
        add_with_ramp(&mut dest, &[1.0], 1.0, 1.0);
    }
}
