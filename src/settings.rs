//! # Delay Settings
//!
//! A plain-value snapshot of the seven delay parameters. It implements
//! [`ParameterSource`] so the processor can run without a plugin host
//! (offline rendering, tests), and it round-trips through TOML so a set of
//! values can be kept as a preset file:
//!
//! ```toml
//! delay_time_ms_left = 375.0
//! delay_time_ms_right = 500.0
//! delay_link = false
//! feedback_left = 0.35
//! feedback_right = 0.35
//! feedback_link = true
//! dry_wet_percent = 30.0
//! ```
//!
//! Missing keys fall back to the defaults (everything zero / off).
//! [`validate()`](DelaySettings::validate) is the range check; the DSP core
//! itself takes whatever it is given.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::parameters::{
    ParameterSource, DELAY_TIME_MS_MAX, DELAY_TIME_MS_MIN, DRY_WET_PERCENT_MAX,
    DRY_WET_PERCENT_MIN, FEEDBACK_MAX, FEEDBACK_MIN,
};
use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DelaySettings {
    pub delay_time_ms_left: f32,
    pub delay_time_ms_right: f32,
    pub delay_link: bool,
    pub feedback_left: f32,
    pub feedback_right: f32,
    pub feedback_link: bool,
    pub dry_wet_percent: f32,
}

impl DelaySettings {
    /// Load settings from a TOML preset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded delay settings");
        Ok(settings)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save settings to a TOML preset file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| SettingsError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value against its declared range.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let checks = [
            (
                "delay_time_ms_left",
                self.delay_time_ms_left,
                DELAY_TIME_MS_MIN,
                DELAY_TIME_MS_MAX,
            ),
            (
                "delay_time_ms_right",
                self.delay_time_ms_right,
                DELAY_TIME_MS_MIN,
                DELAY_TIME_MS_MAX,
            ),
            ("feedback_left", self.feedback_left, FEEDBACK_MIN, FEEDBACK_MAX),
            ("feedback_right", self.feedback_right, FEEDBACK_MIN, FEEDBACK_MAX),
            (
                "dry_wet_percent",
                self.dry_wet_percent,
                DRY_WET_PERCENT_MIN,
                DRY_WET_PERCENT_MAX,
            ),
        ];

        for (param, value, min, max) in checks {
            // NaN fails the range test too.
            if !(min..=max).contains(&value) {
                return Err(SettingsError::OutOfRange {
                    param,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl ParameterSource for DelaySettings {
    fn delay_time_ms_left(&self) -> f32 {
        self.delay_time_ms_left
    }
    fn delay_time_ms_right(&self) -> f32 {
        self.delay_time_ms_right
    }
    fn delay_link(&self) -> bool {
        self.delay_link
    }
    fn feedback_left(&self) -> f32 {
        self.feedback_left
    }
    fn feedback_right(&self) -> f32 {
        self.feedback_right
    }
    fn feedback_link(&self) -> bool {
        self.feedback_link
    }
    fn dry_wet_percent(&self) -> f32 {
        self.dry_wet_percent
    }
}
