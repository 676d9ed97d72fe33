//! # Delay Processor
//!
//! Runs the block-based delay over a [`RingDelayBuffer`]. The parameters
//! are read once at the start of each block (each chunk, see below), then
//! channel by channel:
//!
//! ```text
//!            ┌─────────── × dry ─────────────────────────┐
//!            │                                            ▼
//! input ──(× dry)──► write_replace ──► ring ──► read @ cursor - delay ──× wet──►(+)──► output
//!   [Doubled only]                      ▲                                      │
//!                                       └──────── write_add × feedback ◄───────┘
//! ```
//!
//! 1. Pick this channel's values from the snapshot (link rules applied).
//! 2. [`DryStaging::Doubled`] only: scale the block by the dry gain in place.
//! 3. Copy the block into the ring at the write cursor.
//! 4. Scale the block by the dry gain, then add the ring contents from
//!    `delay` samples ago at the wet gain.
//! 5. Add the resulting output, scaled by feedback, onto the ring region
//!    written in step 3. This is what makes echoes repeat: each pass of
//!    the output through the ring is attenuated by `feedback` once more.
//!
//! After every channel is done, the shared cursor moves forward by the
//! block length.
//!
//! ## Oversized Blocks
//!
//! Step 3 writes the whole block before step 4 reads. If `block + delay`
//! exceeds the ring, the write lands on history the read still needs (a
//! block longer than the ring even overwrites itself). Such blocks are cut
//! into chunks of at most `capacity - delay` samples, using the longest
//! delay of any channel, and each chunk runs the full sequence above
//! (cursor advance included) before the next one starts. Ordinary host
//! blocks with delays well inside the ring are processed in one piece.

use std::num::NonZeroUsize;

use super::gain::{apply_gain, apply_gain_ramp};
use super::parameters::{ChannelSettings, ParameterSource};
use super::ring_buffer::RingDelayBuffer;
use crate::error::PrepareError;

/// Length of ring history kept per channel. Matches the longest delay-time
/// parameter value (2000 ms).
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Echoes are considered gone once they have decayed by 60 dB.
const TAIL_DECAY_FLOOR: f32 = 0.001;

/// Where the dry gain is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DryStaging {
    /// Dry gain applied before the ring write and again on the output. The
    /// ring stores the dry-scaled input, and the dry path in the output is
    /// scaled by `dry²`. At 100 % wet nothing but silence enters the ring.
    #[default]
    Doubled,

    /// Dry gain applied once, on the output. The ring stores the input as
    /// it arrived, giving the textbook `dry * input + wet * delayed` mix.
    Single,
}

/// Stereo (or N-channel) block delay with per-channel delay time and
/// feedback.
#[derive(Debug, Clone)]
pub struct DelayProcessor {
    ring: RingDelayBuffer,
    sample_rate: f32,
    dry_staging: DryStaging,
}

impl Default for DelayProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayProcessor {
    /// An unprepared processor with [`DryStaging::Doubled`]. Call
    /// [`prepare()`](Self::prepare) before processing audio.
    pub fn new() -> Self {
        Self::with_dry_staging(DryStaging::default())
    }

    pub fn with_dry_staging(dry_staging: DryStaging) -> Self {
        Self {
            ring: RingDelayBuffer::new(),
            // Placeholder until prepare() learns the real rate.
            sample_rate: 44100.0,
            dry_staging,
        }
    }

    /// Allocate two seconds of silent history per channel at `sample_rate`
    /// and rewind the cursor.
    ///
    /// Must run whenever the sample rate or channel count changes, and never
    /// concurrently with [`process()`](Self::process). Always reallocates.
    pub fn prepare(&mut self, sample_rate: f32, num_channels: usize) -> Result<(), PrepareError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        if num_channels == 0 {
            return Err(PrepareError::NoChannels);
        }

        let capacity = (sample_rate * MAX_DELAY_SECONDS).round() as usize;
        let capacity =
            NonZeroUsize::new(capacity).ok_or(PrepareError::ZeroCapacity(sample_rate))?;

        self.sample_rate = sample_rate;
        self.ring.prepare(num_channels, capacity);

        tracing::debug!(
            sample_rate,
            num_channels,
            capacity = capacity.get(),
            "delay ring prepared"
        );
        Ok(())
    }

    /// Silence the delay history without reallocating.
    pub fn reset(&mut self) {
        self.ring.clear();
        tracing::trace!("delay ring cleared");
    }

    pub fn is_prepared(&self) -> bool {
        self.ring.capacity() > 0
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn dry_staging(&self) -> DryStaging {
        self.dry_staging
    }

    pub fn set_dry_staging(&mut self, dry_staging: DryStaging) {
        self.dry_staging = dry_staging;
    }

    pub fn ring(&self) -> &RingDelayBuffer {
        &self.ring
    }

    /// Convert a delay time to whole samples at the prepared sample rate:
    /// `round(sample_rate * ms / 1000)`.
    pub fn delay_samples(&self, delay_time_ms: f32) -> i64 {
        (self.sample_rate * delay_time_ms / 1000.0).round() as i64
    }

    /// How far behind the write cursor a delay of `delay_samples` reads,
    /// reduced into `0..capacity`.
    fn ring_distance(&self, delay_samples: i64) -> usize {
        delay_samples.rem_euclid(self.ring.capacity() as i64) as usize
    }

    /// Ring index `delay_samples` behind the write cursor.
    ///
    /// Delays beyond the ring (or negative ones, down to the `i64::MIN` an
    /// infinite delay time saturates to) still land inside `0..capacity`;
    /// what they sound like is the caller's problem.
    fn read_position(&self, delay_samples: i64) -> usize {
        let capacity = self.ring.capacity();
        let distance = self.ring_distance(delay_samples);
        (self.ring.write_cursor() + capacity - distance) % capacity
    }

    /// Process one block in place.
    ///
    /// `block` holds one slice per channel, all the same length. Channels
    /// beyond the prepared channel count are left as they are, and so is the
    /// whole block if the processor was never prepared.
    pub fn process<P: ParameterSource + ?Sized>(&mut self, block: &mut [&mut [f32]], params: &P) {
        let capacity = self.ring.capacity();
        let block_len = block.first().map_or(0, |channel| channel.len());
        if capacity == 0 || block_len == 0 {
            return;
        }

        let mut offset = 0;
        while offset < block_len {
            // One snapshot per chunk: the chunk is sized for exactly the
            // delays it is processed with. Every channel past 0 uses the
            // right-channel values.
            let snapshot = [
                ChannelSettings::resolve(params, 0),
                ChannelSettings::resolve(params, 1),
            ];
            let chunk_len = (block_len - offset).min(self.max_chunk_len(&snapshot));
            let chunk = offset..offset + chunk_len;

            for (channel_idx, samples) in block.iter_mut().enumerate() {
                if channel_idx >= self.ring.num_channels() {
                    break;
                }
                let Some(samples) = samples.get_mut(chunk.clone()) else {
                    continue;
                };

                let settings = &snapshot[channel_idx.min(1)];
                self.process_channel(channel_idx, samples, settings);
            }

            self.ring.advance_cursor(chunk_len);
            offset += chunk_len;
        }
    }

    /// Longest run that can be written before reading without clobbering
    /// the history any channel is about to read. Always at least 1.
    fn max_chunk_len(&self, snapshot: &[ChannelSettings; 2]) -> usize {
        let capacity = self.ring.capacity();
        let channels = self.ring.num_channels().min(2);
        snapshot[..channels]
            .iter()
            .map(|settings| capacity - self.ring_distance(self.delay_samples(settings.delay_time_ms)))
            .min()
            .unwrap_or(capacity)
    }

    fn process_channel(&mut self, channel: usize, samples: &mut [f32], settings: &ChannelSettings) {
        let wet = settings.wet_gain();
        let dry = settings.dry_gain();

        if self.dry_staging == DryStaging::Doubled {
            apply_gain(samples, dry);
        }

        self.ring.write_replace(channel, samples);

        let read_position = self.read_position(self.delay_samples(settings.delay_time_ms));
        apply_gain_ramp(samples, dry, dry);
        self.ring
            .read_add_ramped(channel, samples, read_position, wet, wet);

        self.ring
            .write_add_ramped(channel, samples, settings.feedback, settings.feedback);
    }

    /// How many samples of echo remain audible after the input goes silent,
    /// for the longer of the left and right channels.
    ///
    /// Each repeat is `feedback` times the previous one, so it takes
    /// `log(0.001) / log(feedback)` repeats to fall by 60 dB. With no
    /// feedback there is a single echo one delay period later. Feedback at
    /// or above 1 never decays and saturates to `u32::MAX`.
    pub fn tail_samples<P: ParameterSource + ?Sized>(&self, params: &P) -> u32 {
        let channels = self.ring.num_channels().clamp(1, 2);
        (0..channels)
            .map(|channel| {
                let settings = ChannelSettings::resolve(params, channel);
                let delay = self.delay_samples(settings.delay_time_ms).max(0) as f32;
                let feedback = settings.feedback.abs();

                if feedback >= 1.0 {
                    u32::MAX
                } else if feedback > TAIL_DECAY_FLOOR {
                    let repeats = TAIL_DECAY_FLOOR.log10() / feedback.log10();
                    (repeats * delay) as u32
                } else {
                    delay as u32
                }
            })
            .max()
            .unwrap_or(0)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
