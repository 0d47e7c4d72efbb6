//! Configuration for the gainstage engine.
//!
//! An [`EngineConfig`] is a TOML document describing how the engine smooths
//! gain changes and which parameters it declares. Plugins load one at
//! construction, validate it, and turn each entry into a
//! [`ParamDescriptor`](gainstage_core::ParamDescriptor).
//!
//! # Features
//!
//! - **Engine Config**: Load and save smoothing settings and the parameter layout
//! - **Validation**: Report every problem in a document at once
//!
//! # Example
//!
//! ```rust,no_run
//! use gainstage_config::{EngineConfig, validate_config};
//!
//! let config = EngineConfig::load("gainstage.toml").unwrap();
//! validate_config(&config).unwrap();
//!
//! for descriptor in config.descriptors() {
//!     println!("{} [{}, {}]", descriptor.id, descriptor.min, descriptor.max);
//! }
//! ```

mod config;
mod error;

/// Engine configuration validation.
pub mod validation;

pub use config::{EngineConfig, ParamConfig, SmoothingConfig, UnitConfig};
pub use error::ConfigError;
pub use validation::{ValidationError, ValidationResult, validate_config};
