//! # Circular Delay — A Block-Based Stereo Delay
//!
//! A stereo delay built around one multi-channel ring buffer that holds two
//! seconds of history. Left and right have their own delay time and
//! feedback amount, each of which can be linked so the right channel
//! follows the left. Ships as an AU/VST3/CLAP plugin through
//! [nih-plug](https://github.com/robbert-vdh/nih-plug); the DSP in [`dsp`]
//! has no framework dependency and can be driven directly.
//!
//! ## Signal Flow (per channel, per block)
//!
//! ```text
//! Input ──(× dry)──┬───────────────────────────────── × dry ───┐
//!                  │                                            │
//!                  ▼                                            ▼
//!           [ Ring Buffer ] ──► read (cursor - delay) ── × wet ─►(+)──┬──► Output
//!                  ▲                                                  │
//!                  └──────────────── (+) × feedback ◄─────────────────┘
//! ```
//!
//! The first `× dry` is the [`DryStaging::Doubled`] stage; see
//! [`dsp::processor`] for the exact ordering.
//!
//! ## Using the core without a host
//!
//! ```rust
//! use circular_delay::{DelayProcessor, DelaySettings, DryStaging};
//!
//! let mut delay = DelayProcessor::with_dry_staging(DryStaging::Single);
//! delay.prepare(48_000.0, 2).unwrap();
//!
//! let settings = DelaySettings {
//!     delay_time_ms_left: 250.0,
//!     delay_link: true,
//!     feedback_left: 0.4,
//!     feedback_link: true,
//!     dry_wet_percent: 35.0,
//!     ..DelaySettings::default()
//! };
//!
//! let mut left = vec![0.0_f32; 512];
//! let mut right = vec![0.0_f32; 512];
//! delay.process(&mut [&mut left[..], &mut right[..]], &settings);
//! ```

pub mod dsp;
pub mod error;
pub mod params;
pub mod settings;

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

pub use dsp::parameters::{ChannelSettings, ParameterSource};
pub use dsp::processor::{DelayProcessor, DryStaging, MAX_DELAY_SECONDS};
pub use dsp::ring_buffer::RingDelayBuffer;
pub use error::{PrepareError, SettingsError};
pub use params::PluginParams;
pub use settings::DelaySettings;

/// The plugin: host parameters plus the delay engine.
///
/// Parameters are shared with the host through an `Arc` and may be written
/// from any thread. The processor is owned by the audio thread and only
/// touched in `initialize()`, `reset()` and `process()`, which the host
/// never runs concurrently.
struct CircularDelay {
    params: Arc<PluginParams>,
    delay: DelayProcessor,
}

impl Default for CircularDelay {
    fn default() -> Self {
        Self {
            params: Arc::new(PluginParams::default()),
            // Unprepared until initialize() tells us the sample rate and
            // channel count.
            delay: DelayProcessor::new(),
        }
    }
}

impl Plugin for CircularDelay {
    const NAME: &'static str = "Circular Delay";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first, mono as a fallback. Input and output always match.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called on load and whenever the sample rate or channel layout
    /// changes. Reallocates the ring buffer; returning `false` tells the
    /// host this configuration can't be used.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(2);

        match self.delay.prepare(buffer_config.sample_rate, num_channels) {
            Ok(()) => true,
            Err(err) => {
                nih_error!("cannot prepare delay: {err}");
                false
            }
        }
    }

    /// Playback stopped or the plugin was bypassed: drop stale echoes so
    /// they don't burst out on the next play.
    fn reset(&mut self) {
        self.delay.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let params = self.params.as_ref();
        self.delay.process(buffer.as_slice(), params);

        // Keep being called after the input goes silent until the echoes
        // have died away.
        ProcessStatus::Tail(self.delay.tail_samples(params))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for CircularDelay {
    const CLAP_ID: &'static str = "com.loveless-audio.circular-delay";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Stereo ring-buffer delay with linkable delay time and feedback");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Delay,
    ];
}

impl Vst3Plugin for CircularDelay {
    // 16 ASCII bytes; must never change once published.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssCircDelay01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Delay];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports `clap_entry` for CLAP hosts, nih_export_vst3!
// exports `GetPluginFactory` for VST3 hosts, and clap_wrapper re-exports
// the CLAP entry point as AUv2 for Logic Pro.

nih_export_clap!(CircularDelay);
nih_export_vst3!(CircularDelay);

clap_wrapper::export_auv2!();
