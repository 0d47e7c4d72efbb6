//! Thread-safe shared state for the gain plugin.
//!
//! `GainShared` lives for the lifetime of the plugin instance and is
//! reachable from both the control side (parameters, state) and the audio
//! side (processing). Parameter values live in a lock-free
//! [`ParameterStore`]; everything else here is immutable after construction.

use std::sync::Arc;

use gainstage_config::{ConfigError, EngineConfig, validate_config};
use gainstage_core::{ParamHandle, ParameterStore, db_to_gain};

use crate::{GAIN_PARAM_ID, PluginError};

/// Inner storage for plugin shared state.
///
/// Held behind an `Arc` so `GainShared` clones cheaply into the audio
/// processor.
struct GainSharedData {
    /// Declared parameters and their current values.
    store: ParameterStore,
    /// Handle of the gain parameter, cached for the audio path.
    gain: ParamHandle,
    /// Gain ramp time in milliseconds.
    ramp_ms: f32,
    /// Level at or below which gain is exact silence, in dB.
    floor_db: f32,
}

/// Shared state accessible from all plugin threads.
///
/// The audio processor reads the gain value here once per block; the
/// control surface writes values in response to automation, UI or state
/// loads.
#[derive(Clone)]
pub struct GainShared {
    inner: Arc<GainSharedData>,
}

impl GainShared {
    /// Validate `config` and declare its parameters.
    ///
    /// Fails if the config is invalid or does not declare a parameter with
    /// id [`GAIN_PARAM_ID`].
    pub fn new(config: &EngineConfig) -> Result<Self, PluginError> {
        validate_config(config).map_err(ConfigError::from)?;

        let mut store = ParameterStore::new();
        for descriptor in config.descriptors() {
            store.declare(descriptor)?;
        }
        let gain = store
            .handle(GAIN_PARAM_ID)
            .ok_or(PluginError::MissingParameter(GAIN_PARAM_ID))?;

        Ok(Self {
            inner: Arc::new(GainSharedData {
                store,
                gain,
                ramp_ms: config.smoothing.ramp_ms,
                floor_db: config.smoothing.floor_db,
            }),
        })
    }

    /// The parameter store.
    pub fn store(&self) -> &ParameterStore {
        &self.inner.store
    }

    /// Handle of the gain parameter.
    pub fn gain_handle(&self) -> ParamHandle {
        self.inner.gain
    }

    /// Gain ramp time in milliseconds.
    pub fn ramp_ms(&self) -> f32 {
        self.inner.ramp_ms
    }

    /// Silence floor in dB.
    pub fn floor_db(&self) -> f32 {
        self.inner.floor_db
    }

    /// Current gain setting in dB (lock-free).
    #[inline]
    pub fn gain_db(&self) -> f32 {
        self.inner.store.value(self.inner.gain)
    }

    /// Current gain setting as a linear factor, with the floor applied.
    #[inline]
    pub fn target_gain(&self) -> f32 {
        db_to_gain(self.gain_db(), self.inner.floor_db)
    }
}
