//! Gainstage Core - parameter storage and click-free gain for real-time audio
//!
//! This crate holds the pieces of a single-parameter audio effect that sit
//! between the host and the samples: a lock-free parameter store shared by the
//! control and audio contexts, and a gain stage that ramps linearly toward each
//! new value.
//!
//! # Core Abstractions
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Metadata for one parameter (id, range, unit, step)
//! - [`ParameterStore`] - Atomic current values, snapshot and restore
//! - [`ParamHandle`] - O(1) access token returned at declaration
//!
//! ## Smoothing
//!
//! - [`LinearRamp`] - Fixed-time linear ramp that lands exactly on its target
//! - [`SmoothedGainStage`] - Applies a ramped gain to every channel in place
//!
//! ## Stages
//!
//! - [`Stage`] - Object-safe trait for in-place block processors
//! - [`StageExt`] / [`Chain`] - Static composition
//! - [`Pipeline`] - Ordered runtime composition
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`], [`db_to_gain`]
//!
//! # Example
//!
//! ```rust
//! use gainstage_core::{
//!     DEFAULT_FLOOR_DB, ParamDescriptor, ParameterStore, ProcessSpec, SmoothedGainStage, Stage,
//!     db_to_gain,
//! };
//!
//! let mut store = ParameterStore::new();
//! let gain = store
//!     .declare(ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0))
//!     .unwrap();
//!
//! let spec = ProcessSpec::stereo(48000.0, 256);
//! let mut stage = SmoothedGainStage::new(&spec, 50.0);
//!
//! store.set("gain", 6.0);
//!
//! // Once per audio block:
//! let mut left = vec![0.5_f32; 256];
//! let mut right = vec![0.5_f32; 256];
//! stage.set_target(db_to_gain(store.value(gain), DEFAULT_FLOOR_DB));
//! stage.process(&mut [&mut left[..], &mut right[..]]);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or logging in `process`
//! - **Lock-free sharing**: Parameter values are `AtomicU32` bit patterns
//! - **Object-safe traits**: Dynamic dispatch when needed
//! - **Zero-cost abstractions**: Static dispatch chains optimize away

pub mod gain;
pub mod math;
pub mod param;
pub mod param_info;
pub mod stage;
pub mod store;

// Re-export main types at crate root
pub use gain::{DEFAULT_RAMP_MS, SmoothedGainStage};
pub use math::{
    DEFAULT_FLOOR_DB, db_to_gain, db_to_linear, flush_denormal, linear_to_db, ms_to_samples,
};
pub use param::{LinearRamp, RampState};
pub use param_info::{ParamDescriptor, ParamScale, ParamUnit};
pub use stage::{Chain, Pipeline, ProcessSpec, Stage, StageExt, frame_count};
pub use store::{ParamError, ParamHandle, ParameterStore};
