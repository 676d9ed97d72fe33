//! Error types for preparing the processor and handling settings presets.
//!
//! Nothing in the audio callback returns an error. These are raised at the
//! boundaries: when the host hands us a configuration, and when settings
//! are loaded, saved or validated.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons [`DelayProcessor::prepare`](crate::dsp::processor::DelayProcessor::prepare)
/// refuses a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// Sample rate is zero, negative, NaN or infinite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// The host asked for zero channels.
    #[error("channel count must be at least 1")]
    NoChannels,

    /// The sample rate is so low that two seconds round to zero samples.
    #[error("sample rate {0} Hz gives an empty delay buffer")]
    ZeroCapacity(f32),
}

/// Errors from loading, saving or validating [`DelaySettings`](crate::settings::DelaySettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A value is outside its declared range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending parameter.
        param: &'static str,
        /// The rejected value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },

    /// Failed to read a preset file.
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a preset file.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML.
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
