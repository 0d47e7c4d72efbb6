//! Smoothed gain plugin built on gainstage-core.
//!
//! This crate is the host-independent body of a single-parameter gain
//! effect. A host adapter owns one [`GainPlugin`] per instance and maps its
//! own callbacks onto it:
//!
//! | Host concept | This crate |
//! |--------------|------------|
//! | parameter enumeration, automation, text entry | [`GainMainThread`] |
//! | activate with sample rate and block size | [`GainPlugin::activate`] |
//! | realtime process callback | [`GainAudioProcessor::process_block`] |
//! | save/restore state chunk | [`GainMainThread::save_state`] / [`GainMainThread::load_state`] |
//! | bus layout negotiation | [`GainPlugin::supports_layout`] |
//!
//! # Example
//!
//! ```rust
//! use gainstage_core::ProcessSpec;
//! use gainstage_plugin::GainPlugin;
//!
//! let plugin = GainPlugin::with_default_config().unwrap();
//! let mut audio = plugin.activate(ProcessSpec::stereo(48000.0, 256));
//!
//! plugin.main_thread().set_value("gain", -6.0);
//!
//! let mut left = vec![0.5_f32; 256];
//! let mut right = vec![0.5_f32; 256];
//! audio.process_block(&mut [&mut left[..], &mut right[..]]);
//!
//! let state = plugin.main_thread().save_state().unwrap();
//! plugin.main_thread().load_state(&state).unwrap();
//! ```

pub mod audio;
pub mod main_thread;
pub mod shared;
pub mod state;

pub use audio::GainAudioProcessor;
pub use main_thread::GainMainThread;
pub use shared::GainShared;
pub use state::{STATE_MAGIC, STATE_VERSION, StateDocument, StateError};

use gainstage_config::{ConfigError, EngineConfig};
use gainstage_core::{ParamError, ProcessSpec};
use thiserror::Error;

/// Stable id of the gain parameter. Persisted state is keyed by it.
pub const GAIN_PARAM_ID: &str = "gain";

/// Schema tag written into, and required of, persisted state.
pub const STATE_TAG: &str = "Parameters";

/// Errors constructing a plugin instance.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The engine config is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A parameter could not be declared.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// The config does not declare a parameter the plugin needs.
    #[error("required parameter '{0}' is not declared")]
    MissingParameter(&'static str),
}

/// One gain plugin instance.
pub struct GainPlugin {
    shared: GainShared,
}

impl GainPlugin {
    /// Create an instance from an engine config.
    ///
    /// The config is validated and every parameter declared up front; any
    /// problem fails construction.
    pub fn new(config: EngineConfig) -> Result<Self, PluginError> {
        let shared = GainShared::new(&config)?;
        tracing::info!(
            "gain plugin created: {} parameters, {} ms ramp",
            shared.store().len(),
            shared.ramp_ms()
        );
        Ok(Self { shared })
    }

    /// Create an instance with the default single gain parameter.
    pub fn with_default_config() -> Result<Self, PluginError> {
        Self::new(EngineConfig::default())
    }

    /// Shared state.
    pub fn shared(&self) -> &GainShared {
        &self.shared
    }

    /// Control-side handler.
    pub fn main_thread(&self) -> GainMainThread<'_> {
        GainMainThread::new(&self.shared)
    }

    /// Create an audio processor prepared for `spec`.
    ///
    /// Several processors may be active at once; they share parameter
    /// values but each keeps its own ramp.
    pub fn activate(&self, spec: ProcessSpec) -> GainAudioProcessor {
        let processor = GainAudioProcessor::new(self.shared.clone(), spec);
        tracing::info!(
            "activated: {} Hz, {} channels, {} sample ramp",
            spec.sample_rate,
            spec.num_channels,
            processor.gain_stage().ramp_samples()
        );
        processor
    }

    /// Whether a bus layout is supported.
    ///
    /// Mono or stereo, with as many inputs as outputs.
    pub fn supports_layout(input_channels: usize, output_channels: usize) -> bool {
        matches!(output_channels, 1 | 2) && input_channels == output_channels
    }
}
