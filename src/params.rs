//! # Plugin Parameters
//!
//! The seven host-automatable parameters of the delay. Each has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to save
//!   and recall presets. Once published, never change these IDs or
//!   existing sessions will lose their settings.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range**, taken from the bounds in [`crate::dsp::parameters`].
//! - A **default value**. Everything defaults to zero / off, so a freshly
//!   inserted instance passes audio through unchanged.
//!
//! nih-plug stores the values atomically, so the audio thread can read them
//! through [`ParameterSource`] without locks while the host or UI thread
//! writes them.

use nih_plug::prelude::*;

use crate::dsp::parameters::{
    ParameterSource, DELAY_TIME_MS_MAX, DELAY_TIME_MS_MIN, DRY_WET_PERCENT_MAX,
    DRY_WET_PERCENT_MIN, FEEDBACK_MAX, FEEDBACK_MIN,
};

#[derive(Params)]
pub struct PluginParams {
    /// **Delay Left** — echo distance on the left channel, 0-2000 ms.
    #[id = "delay_l"]
    pub delay_time_left: FloatParam,

    /// **Delay Right** — echo distance on the right channel. Ignored while
    /// `delay_link` is on.
    #[id = "delay_r"]
    pub delay_time_right: FloatParam,

    /// **Delay Link** — right channel follows the left delay time.
    #[id = "delay_lnk"]
    pub delay_link: BoolParam,

    /// **Feedback Left** — how much of each left echo is fed back, 0-1.
    ///
    /// At 1.0 the echoes never decay.
    #[id = "fb_l"]
    pub feedback_left: FloatParam,

    /// **Feedback Right** — ignored while `feedback_link` is on.
    #[id = "fb_r"]
    pub feedback_right: FloatParam,

    /// **Feedback Link** — right channel follows the left feedback amount.
    #[id = "fb_lnk"]
    pub feedback_link: BoolParam,

    /// **Dry/Wet** — 0 % is the input only, 100 % the delayed signal only.
    #[id = "mix"]
    pub dry_wet: FloatParam,
}

fn delay_time_param(name: &'static str) -> FloatParam {
    FloatParam::new(
        name,
        0.0,
        FloatRange::Linear {
            min: DELAY_TIME_MS_MIN,
            max: DELAY_TIME_MS_MAX,
        },
    )
    .with_unit(" ms")
    .with_step_size(0.1)
}

fn feedback_param(name: &'static str) -> FloatParam {
    FloatParam::new(
        name,
        0.0,
        FloatRange::Linear {
            min: FEEDBACK_MIN,
            max: FEEDBACK_MAX,
        },
    )
    .with_unit("%")
    // Display as percentage: 0.40 → "40.0%"
    .with_value_to_string(formatters::v2s_f32_percentage(1))
    .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for PluginParams {
    fn default() -> Self {
        Self {
            delay_time_left: delay_time_param("Delay Left"),
            delay_time_right: delay_time_param("Delay Right"),
            delay_link: BoolParam::new("Delay Link", false),

            feedback_left: feedback_param("Feedback Left"),
            feedback_right: feedback_param("Feedback Right"),
            feedback_link: BoolParam::new("Feedback Link", false),

            // Already a percentage, unlike feedback, so no formatter.
            dry_wet: FloatParam::new(
                "Dry/Wet",
                0.0,
                FloatRange::Linear {
                    min: DRY_WET_PERCENT_MIN,
                    max: DRY_WET_PERCENT_MAX,
                },
            )
            .with_unit(" %")
            .with_step_size(0.1),
        }
    }
}

impl ParameterSource for PluginParams {
    fn delay_time_ms_left(&self) -> f32 {
        self.delay_time_left.value()
    }
    fn delay_time_ms_right(&self) -> f32 {
        self.delay_time_right.value()
    }
    fn delay_link(&self) -> bool {
        self.delay_link.value()
    }
    fn feedback_left(&self) -> f32 {
        self.feedback_left.value()
    }
    fn feedback_right(&self) -> f32 {
        self.feedback_right.value()
    }
    fn feedback_link(&self) -> bool {
        self.feedback_link.value()
    }
    fn dry_wet_percent(&self) -> f32 {
        self.dry_wet.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_audio_through() {
        let params = PluginParams::default();
        assert_eq!(params.dry_wet_percent(), 0.0);
        assert_eq!(params.delay_time_ms_left(), 0.0);
        assert_eq!(params.feedback_right(), 0.0);
        assert!(!params.delay_link());
        assert!(!params.feedback_link());
    }
}
