//! # Parameter Source
//!
//! The processor reads seven named values once at the start of every block
//! (every chunk, when a block is split) and uses that snapshot for all
//! channels. Where they live is not its business: in the plugin they are
//! nih-plug's atomically updated host parameters, in tests and offline
//! rendering they are a plain [`DelaySettings`](crate::settings::DelaySettings).
//!
//! ## Linking
//!
//! With a link flag on, the right channel mirrors the left channel's value
//! for that block, whatever the right-channel parameter currently holds.
//! Delay time and feedback link independently.

/// Lower bound of both delay-time parameters, in milliseconds.
pub const DELAY_TIME_MS_MIN: f32 = 0.0;
/// Upper bound of both delay-time parameters, in milliseconds.
pub const DELAY_TIME_MS_MAX: f32 = 2000.0;
/// Lower bound of both feedback parameters.
pub const FEEDBACK_MIN: f32 = 0.0;
/// Upper bound of both feedback parameters.
pub const FEEDBACK_MAX: f32 = 1.0;
/// Lower bound of the dry/wet parameter, in percent.
pub const DRY_WET_PERCENT_MIN: f32 = 0.0;
/// Upper bound of the dry/wet parameter, in percent.
pub const DRY_WET_PERCENT_MAX: f32 = 100.0;

/// Read access to the current parameter values.
///
/// Implementations must not block: the processor calls these from the
/// audio thread. Values are taken as-is; the processor does not clamp.
pub trait ParameterSource {
    /// Left-channel delay time in milliseconds (0-2000).
    fn delay_time_ms_left(&self) -> f32;
    /// Right-channel delay time in milliseconds (0-2000).
    fn delay_time_ms_right(&self) -> f32;
    /// When true the right channel uses the left delay time.
    fn delay_link(&self) -> bool;
    /// Left-channel feedback amount (0-1).
    fn feedback_left(&self) -> f32;
    /// Right-channel feedback amount (0-1).
    fn feedback_right(&self) -> f32;
    /// When true the right channel uses the left feedback amount.
    fn feedback_link(&self) -> bool;
    /// Wet proportion of the output in percent (0-100).
    fn dry_wet_percent(&self) -> f32;
}

/// The values one channel uses for one block, after linking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSettings {
    pub delay_time_ms: f32,
    pub feedback: f32,
    pub dry_wet_percent: f32,
}

impl ChannelSettings {
    /// Snapshot `source` for `channel`.
    ///
    /// Channel 0 is left. Every other channel takes the right-channel
    /// values (or the left ones where linked).
    pub fn resolve<P: ParameterSource + ?Sized>(source: &P, channel: usize) -> Self {
        let delay_time_ms = if channel == 0 || source.delay_link() {
            source.delay_time_ms_left()
        } else {
            source.delay_time_ms_right()
        };

        let feedback = if channel == 0 || source.feedback_link() {
            source.feedback_left()
        } else {
            source.feedback_right()
        };

        Self {
            delay_time_ms,
            feedback,
            dry_wet_percent: source.dry_wet_percent(),
        }
    }

    /// Dry/wet percentage mapped onto 0-1.
    pub fn wet_gain(&self) -> f32 {
        self.dry_wet_percent / DRY_WET_PERCENT_MAX
    }

    /// Complement of [`wet_gain()`](Self::wet_gain).
    pub fn dry_gain(&self) -> f32 {
        1.0 - self.wet_gain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DelaySettings;

    fn unlinked() -> DelaySettings {
        DelaySettings {
            delay_time_ms_left: 250.0,
            delay_time_ms_right: 750.0,
            feedback_left: 0.2,
            feedback_right: 0.6,
            dry_wet_percent: 40.0,
            ..DelaySettings::default()
        }
    }

    #[test]
    fn test_unlinked_channels_read_their_own_values() {
        let settings = unlinked();
        let left = ChannelSettings::resolve(&settings, 0);
        let right = ChannelSettings::resolve(&settings, 1);

        assert_eq!(left.delay_time_ms, 250.0);
        assert_eq!(left.feedback, 0.2);
        assert_eq!(right.delay_time_ms, 750.0);
        assert_eq!(right.feedback, 0.6);
    }

    #[test]
    fn test_delay_link_overrides_right() {
        let settings = DelaySettings {
            delay_link: true,
            ..unlinked()
        };
        let right = ChannelSettings::resolve(&settings, 1);
        assert_eq!(right.delay_time_ms, 250.0);
        // Feedback stays unlinked.
        assert_eq!(right.feedback, 0.6);
    }

    #[test]
    fn test_feedback_link_overrides_right() {
        let settings = DelaySettings {
            feedback_link: true,
            ..unlinked()
        };
        let right = ChannelSettings::resolve(&settings, 1);
        assert_eq!(right.feedback, 0.2);
        assert_eq!(right.delay_time_ms, 750.0);
    }

    #[test]
    fn test_extra_channels_follow_right() {
        let settings = unlinked();
        let third = ChannelSettings::resolve(&settings, 2);
        assert_eq!(third.delay_time_ms, 750.0);
        assert_eq!(third.feedback, 0.6);
    }

    #[test]
    fn test_mix_gains() {
        let left = ChannelSettings::resolve(&unlinked(), 0);
        assert!((left.wet_gain() - 0.4).abs() < 1e-6);
        assert!((left.dry_gain() - 0.6).abs() < 1e-6);
    }
}
