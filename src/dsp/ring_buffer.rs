//! # Ring Delay Buffer
//!
//! A multi-channel circular buffer holding the most recent `capacity`
//! samples of every channel, with one write cursor shared by all channels.
//!
//! Unlike a sample-at-a-time delay line, this buffer moves whole blocks:
//! the host hands us 64-1024 samples at once and we copy them into the
//! ring in one or two contiguous runs.
//!
//! ## Wrap Splitting
//!
//! A block of `count` samples starting at ring index `position` fits in
//! one run when `count <= capacity - position`. Otherwise it is split:
//!
//! ```text
//! capacity = 10, position = 8, count = 5
//!
//! ring:   [ 0 ][ 1 ][ 2 ][ 3 ][ 4 ][ 5 ][ 6 ][ 7 ][ 8 ][ 9 ]
//!           c    d    e                                a    b
//!
//! run 1: ring[8..10] <-> block[0..2]
//! run 2: ring[0..3]  <-> block[2..5]
//! ```
//!
//! All three data-moving operations (replace, additive write, additive
//! read) walk the same [`WrapRuns`] so the split arithmetic lives in one
//! place.
//!
//! ## Ramps Across the Wrap
//!
//! The ramped operations restart their gain ramp in each run: a ramp from
//! `a` to `b` over a wrapped write goes `a → b` over run 1 and again
//! `a → b` over run 2. With the constant gains the processor uses this is
//! invisible; with a real ramp it is not one continuous slope.

use std::num::NonZeroUsize;
use std::ops::Range;

use super::gain::add_with_ramp;

/// One contiguous piece of a wrapped transfer: `ring` indexes the ring
/// storage, `block` indexes the caller's slice. Both have equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WrapRun {
    pub ring: Range<usize>,
    pub block: Range<usize>,
}

/// Iterator over the contiguous runs of a `count`-sample transfer starting
/// at ring index `position`.
///
/// Yields one run when the transfer fits before the end of the ring, two
/// when it wraps once, and more when `count > capacity` (in which case ring
/// regions are visited more than once).
#[derive(Debug, Clone)]
pub(crate) struct WrapRuns {
    capacity: usize,
    position: usize,
    offset: usize,
    count: usize,
}

impl WrapRuns {
    pub fn new(capacity: usize, position: usize, count: usize) -> Self {
        debug_assert!(
            capacity == 0 || position < capacity,
            "ring position {position} outside capacity {capacity}"
        );
        Self {
            capacity,
            position,
            offset: 0,
            count,
        }
    }
}

impl Iterator for WrapRuns {
    type Item = WrapRun;

    fn next(&mut self) -> Option<WrapRun> {
        if self.capacity == 0 || self.offset >= self.count {
            return None;
        }

        let space_to_end = self.capacity - self.position;
        let len = (self.count - self.offset).min(space_to_end);
        let run = WrapRun {
            ring: self.position..self.position + len,
            block: self.offset..self.offset + len,
        };

        self.offset += len;
        self.position = (self.position + len) % self.capacity;
        Some(run)
    }
}

/// Fixed-capacity audio history for every channel plus the shared write
/// cursor.
///
/// Storage is allocated in [`prepare()`](Self::prepare) and never resized
/// while audio is running, so every other method is allocation-free.
#[derive(Debug, Clone, Default)]
pub struct RingDelayBuffer {
    /// One `capacity`-long run of samples per channel.
    channels: Vec<Vec<f32>>,

    /// Samples per channel. Zero until the buffer is prepared.
    capacity: usize,

    /// Where the current block will be written. Always `< capacity` once
    /// prepared.
    write_cursor: usize,
}

impl RingDelayBuffer {
    /// An unprepared buffer with no channels and no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocate `num_channels` channels of `capacity` silent samples and
    /// move the cursor back to 0.
    ///
    /// Always reallocates, even when called again with the same
    /// configuration; previous contents are discarded.
    pub fn prepare(&mut self, num_channels: usize, capacity: NonZeroUsize) {
        let capacity = capacity.get();
        self.channels = (0..num_channels).map(|_| vec![0.0; capacity]).collect();
        self.capacity = capacity;
        self.write_cursor = 0;
    }

    /// Silence all channels and rewind the cursor, keeping the allocation.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
        self.write_cursor = 0;
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Read-only view of one channel's ring storage, indexed by ring
    /// position (not by age).
    ///
    /// # Panics
    ///
    /// Panics if `channel >= num_channels()`.
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    /// Overwrite `source.len()` samples starting at the write cursor.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= num_channels()`.
    pub fn write_replace(&mut self, channel: usize, source: &[f32]) {
        let storage = &mut self.channels[channel];
        for run in WrapRuns::new(self.capacity, self.write_cursor, source.len()) {
            storage[run.ring].copy_from_slice(&source[run.block]);
        }
    }

    /// Add `source * gain` onto the ring starting at the write cursor, the
    /// gain ramping from `gain_start` toward `gain_end` within each wrap run.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= num_channels()`.
    pub fn write_add_ramped(
        &mut self,
        channel: usize,
        source: &[f32],
        gain_start: f32,
        gain_end: f32,
    ) {
        let storage = &mut self.channels[channel];
        for run in WrapRuns::new(self.capacity, self.write_cursor, source.len()) {
            add_with_ramp(
                &mut storage[run.ring],
                &source[run.block],
                gain_start,
                gain_end,
            );
        }
    }

    /// Add `dest.len()` ring samples starting at `read_position` onto
    /// `dest`, scaled by a gain ramping from `gain_start` toward `gain_end`
    /// within each wrap run.
    ///
    /// `read_position` must already be wrapped into `0..capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= num_channels()` or `read_position` is out of
    /// range.
    pub fn read_add_ramped(
        &self,
        channel: usize,
        dest: &mut [f32],
        read_position: usize,
        gain_start: f32,
        gain_end: f32,
    ) {
        let storage = &self.channels[channel];
        for run in WrapRuns::new(self.capacity, read_position, dest.len()) {
            add_with_ramp(
                &mut dest[run.block],
                &storage[run.ring],
                gain_start,
                gain_end,
            );
        }
    }

    /// Move the write cursor forward by `amount`, wrapping at `capacity`.
    ///
    /// Does nothing on an unprepared buffer.
    pub fn advance_cursor(&mut self, amount: usize) {
        if self.capacity == 0 {
            return;
        }
        self.write_cursor = (self.write_cursor + amount % self.capacity) % self.capacity;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
