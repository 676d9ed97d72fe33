//! Property-based tests for the ring buffer and the delay processor.
//!
//! Covers wrap-around integrity, the cursor range invariant, dry
//! pass-through and pure-wet delay timing using proptest for randomized
//! configurations.

use std::num::NonZeroUsize;

use circular_delay::{DelayProcessor, DelaySettings, DryStaging, RingDelayBuffer};
use proptest::prelude::*;

/// A ring capacity, a cursor offset, and a run of samples no longer than the
/// ring.
fn ring_and_run() -> impl Strategy<Value = (usize, usize, Vec<f32>)> {
    (1usize..64).prop_flat_map(|capacity| {
        (
            Just(capacity),
            0usize..256,
            prop::collection::vec(-1.0f32..=1.0f32, 1..=capacity),
        )
    })
}

fn render(dp: &mut DelayProcessor, settings: &DelaySettings, input: &[f32], block: usize) -> Vec<f32> {
    let mut out = input.to_vec();
    for chunk in out.chunks_mut(block) {
        dp.process(&mut [chunk], settings);
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Writing a run at the cursor and reading it back from the same
    /// position returns exactly what was written, wrapped or not.
    #[test]
    fn wrapped_write_reads_back(
        (capacity, advance, run) in ring_and_run(),
    ) {
        let mut ring = RingDelayBuffer::new();
        ring.prepare(1, NonZeroUsize::new(capacity).unwrap());
        ring.advance_cursor(advance);
        let start = ring.write_cursor();

        ring.write_replace(0, &run);

        let mut back = vec![0.0; run.len()];
        ring.read_add_ramped(0, &mut back, start, 1.0, 1.0);
        prop_assert_eq!(back, run);
    }

    /// The cursor stays inside the ring after any sequence of advances.
    #[test]
    fn cursor_stays_in_range(
        capacity in 1usize..10_000,
        advances in prop::collection::vec(0usize..50_000, 0..50),
    ) {
        let mut ring = RingDelayBuffer::new();
        ring.prepare(2, NonZeroUsize::new(capacity).unwrap());

        let mut total = 0usize;
        for amount in advances {
            ring.advance_cursor(amount);
            total += amount;
            prop_assert!(ring.write_cursor() < capacity);
            prop_assert_eq!(ring.write_cursor(), total % capacity);
        }
    }

    /// At 0 % wet the output is the input, whatever the delay and feedback
    /// settings and whichever dry staging is used.
    #[test]
    fn fully_dry_passes_input_through(
        delay_left in 0.0f32..2000.0,
        delay_right in 0.0f32..2000.0,
        feedback_left in 0.0f32..=1.0,
        feedback_right in 0.0f32..=1.0,
        delay_link in any::<bool>(),
        feedback_link in any::<bool>(),
        single in any::<bool>(),
        block in 1usize..300,
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..1500),
    ) {
        let staging = if single { DryStaging::Single } else { DryStaging::Doubled };
        let mut dp = DelayProcessor::with_dry_staging(staging);
        dp.prepare(1000.0, 1).unwrap();
        let settings = DelaySettings {
            delay_time_ms_left: delay_left,
            delay_time_ms_right: delay_right,
            delay_link,
            feedback_left,
            feedback_right,
            feedback_link,
            dry_wet_percent: 0.0,
        };

        let out = render(&mut dp, &settings, &input, block);
        for (i, (o, x)) in out.iter().zip(&input).enumerate() {
            prop_assert!((o - x).abs() < 1e-6, "sample {}: {} vs {}", i, o, x);
        }
    }

    /// At 100 % wet with no feedback the output is the input shifted by the
    /// delay, for any host block size.
    #[test]
    fn fully_wet_is_pure_delay(
        delay_ms in 0.0f32..1900.0,
        block in 1usize..256,
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..3000),
    ) {
        let mut dp = DelayProcessor::with_dry_staging(DryStaging::Single);
        dp.prepare(1000.0, 1).unwrap();
        let settings = DelaySettings {
            delay_time_ms_left: delay_ms,
            dry_wet_percent: 100.0,
            ..DelaySettings::default()
        };
        let delay = dp.delay_samples(delay_ms) as usize;

        let out = render(&mut dp, &settings, &input, block);
        for (i, &o) in out.iter().enumerate() {
            let want = if i >= delay { input[i - delay] } else { 0.0 };
            prop_assert!((o - want).abs() < 1e-6, "sample {}: {} vs {}", i, o, want);
        }
    }
}
