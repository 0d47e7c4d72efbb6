//! Engine configuration file format and operations.

use std::path::Path;

use gainstage_core::{DEFAULT_FLOOR_DB, DEFAULT_RAMP_MS, ParamDescriptor, ParamScale, ParamUnit};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine configuration: smoothing behaviour plus the parameter layout.
///
/// # TOML Format
///
/// ```toml
/// [smoothing]
/// ramp_ms = 50.0
/// floor_db = -60.0
///
/// [[parameters]]
/// id = "gain"
/// name = "Gain"
/// unit = "db"
/// min = -60.0
/// max = 12.0
/// step = 0.1
/// default = 0.0
/// ```
///
/// Every section is optional. A missing `[smoothing]` table uses the
/// defaults above; a missing `parameters` list declares the single gain
/// parameter shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Gain smoothing settings.
    #[serde(default)]
    pub smoothing: SmoothingConfig,

    /// Parameters to declare, in order.
    #[serde(default = "default_parameters")]
    pub parameters: Vec<ParamConfig>,
}

/// Gain smoothing settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SmoothingConfig {
    /// Time for the gain to reach a new target, in milliseconds.
    #[serde(default = "default_ramp_ms")]
    pub ramp_ms: f32,

    /// Level at or below which gain becomes exact silence, in dB.
    #[serde(default = "default_floor_db")]
    pub floor_db: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            ramp_ms: DEFAULT_RAMP_MS,
            floor_db: DEFAULT_FLOOR_DB,
        }
    }
}

/// Display unit as written in config files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitConfig {
    /// Decibels.
    Db,
    /// Hertz.
    Hz,
    /// Milliseconds.
    Ms,
    /// Percent.
    Percent,
    /// Ratio (n:1).
    Ratio,
    /// Dimensionless.
    #[default]
    None,
}

impl From<UnitConfig> for ParamUnit {
    fn from(unit: UnitConfig) -> Self {
        match unit {
            UnitConfig::Db => ParamUnit::Decibels,
            UnitConfig::Hz => ParamUnit::Hertz,
            UnitConfig::Ms => ParamUnit::Milliseconds,
            UnitConfig::Percent => ParamUnit::Percent,
            UnitConfig::Ratio => ParamUnit::Ratio,
            UnitConfig::None => ParamUnit::None,
        }
    }
}

/// One parameter entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamConfig {
    /// Stable identifier used by lookups and persisted state.
    pub id: String,

    /// Display name. Falls back to the id when empty.
    #[serde(default)]
    pub name: String,

    /// Display unit.
    #[serde(default)]
    pub unit: UnitConfig,

    /// Minimum value.
    pub min: f32,

    /// Maximum value.
    pub max: f32,

    /// Control-surface step (`0.0` = continuous).
    #[serde(default)]
    pub step: f32,

    /// Normalization skew. `1.0` is linear.
    #[serde(default = "default_skew", skip_serializing_if = "is_unity")]
    pub skew: f32,

    /// Initial value.
    pub default: f32,
}

fn default_ramp_ms() -> f32 {
    DEFAULT_RAMP_MS
}

fn default_floor_db() -> f32 {
    DEFAULT_FLOOR_DB
}

fn default_skew() -> f32 {
    1.0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_unity(skew: &f32) -> bool {
    *skew == 1.0
}

fn default_parameters() -> Vec<ParamConfig> {
    vec![ParamConfig::gain()]
}

impl ParamConfig {
    /// The standard gain parameter: -60 to +12 dB in 0.1 dB steps, default 0 dB.
    pub fn gain() -> Self {
        Self {
            id: "gain".to_string(),
            name: "Gain".to_string(),
            unit: UnitConfig::Db,
            min: DEFAULT_FLOOR_DB,
            max: 12.0,
            step: 0.1,
            skew: 1.0,
            default: 0.0,
        }
    }

    /// Build the descriptor this entry declares.
    pub fn to_descriptor(&self) -> ParamDescriptor {
        let name = if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        };
        let scale = if self.skew == 1.0 {
            ParamScale::Linear
        } else {
            ParamScale::Power(self.skew)
        };
        ParamDescriptor::new(self.id.clone(), name, self.min, self.max, self.default)
            .with_unit(self.unit.into())
            .with_step(self.step)
            .with_scale(scale)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            parameters: default_parameters(),
        }
    }
}

impl EngineConfig {
    /// Load a config from a TOML file.
    ///
    /// The document is parsed but not validated; call
    /// [`validate_config`](crate::validate_config) or use
    /// [`load_validated`](Self::load_validated).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a config from a TOML file and validate it.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        crate::validation::validate_config(&config)?;
        Ok(config)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the config to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find a parameter entry by id.
    pub fn parameter(&self, id: &str) -> Option<&ParamConfig> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// Descriptors for every parameter entry, in order.
    pub fn descriptors(&self) -> Vec<ParamDescriptor> {
        self.parameters.iter().map(ParamConfig::to_descriptor).collect()
    }
}
