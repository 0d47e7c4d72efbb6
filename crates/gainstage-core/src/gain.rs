//! Smoothed gain stage.
//!
//! [`SmoothedGainStage`] multiplies every channel of a block by a gain that
//! ramps linearly toward its target, so control changes never produce a step
//! in the output. The target is a linear factor; convert from decibels at the
//! boundary with [`db_to_gain`](crate::db_to_gain).
//!
//! # Usage
//!
//! ```rust
//! use gainstage_core::{ProcessSpec, SmoothedGainStage, Stage, db_to_gain, DEFAULT_FLOOR_DB};
//!
//! let spec = ProcessSpec::stereo(48000.0, 512);
//! let mut stage = SmoothedGainStage::new(&spec, 50.0);
//! stage.set_target(db_to_gain(-6.0, DEFAULT_FLOOR_DB));
//!
//! let mut left = vec![1.0_f32; 512];
//! let mut right = vec![1.0_f32; 512];
//! stage.process(&mut [&mut left[..], &mut right[..]]);
//! assert!(left[511] < 1.0 && left[511] == right[511]);
//! ```

use crate::math::flush_denormal;
use crate::param::{LinearRamp, RampState};
use crate::stage::{ProcessSpec, Stage, frame_count};

/// Default ramp time for gain changes, in milliseconds.
pub const DEFAULT_RAMP_MS: f32 = 50.0;

/// Gain stage with a linear ramp on every target change.
///
/// Created prepared: there is no state in which `process` runs before the
/// ramp length is known. Starts at unity gain.
#[derive(Debug, Clone)]
pub struct SmoothedGainStage {
    ramp: LinearRamp,
    spec: ProcessSpec,
}

impl SmoothedGainStage {
    /// Create a stage prepared for `spec`, resting at unity gain.
    pub fn new(spec: &ProcessSpec, ramp_ms: f32) -> Self {
        Self {
            ramp: LinearRamp::new(1.0, spec.sample_rate, ramp_ms),
            spec: *spec,
        }
    }

    /// Set the linear gain to ramp toward.
    ///
    /// A new value restarts the full ramp from the gain currently applied.
    /// Passing the current target again has no effect.
    #[inline]
    pub fn set_target(&mut self, gain: f32) {
        self.ramp.set_target(gain);
    }

    /// Jump to a gain without ramping.
    pub fn set_immediate(&mut self, gain: f32) {
        self.ramp.set_immediate(gain);
    }

    /// Change the ramp time. Takes effect like a re-prepare.
    pub fn set_ramp_ms(&mut self, ramp_ms: f32) {
        self.ramp.configure(self.spec.sample_rate, ramp_ms);
    }

    /// Gain applied to the most recently processed frame.
    #[inline]
    pub fn gain(&self) -> f32 {
        self.ramp.get()
    }

    /// Gain being ramped toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.ramp.target()
    }

    /// Lifecycle state of the ramp.
    #[inline]
    pub fn state(&self) -> RampState {
        self.ramp.state()
    }

    /// Ramp length in samples at the prepared sample rate.
    #[inline]
    pub fn ramp_samples(&self) -> u32 {
        self.ramp.ramp_samples()
    }

    /// Ramp time in milliseconds.
    #[inline]
    pub fn ramp_ms(&self) -> f32 {
        self.ramp.ramp_ms()
    }

    /// Stream format this stage was last prepared for.
    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }
}

impl Stage for SmoothedGainStage {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.spec = *spec;
        self.ramp.configure(spec.sample_rate, self.ramp.ramp_ms());
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let frames = frame_count(buffer);

        if self.ramp.is_settled() {
            let gain = self.ramp.get();
            if gain == 1.0 {
                return;
            }
            for channel in buffer.iter_mut() {
                for sample in &mut channel[..frames] {
                    *sample *= gain;
                }
            }
            return;
        }

        for frame in 0..frames {
            let gain = self.ramp.advance();
            for channel in buffer.iter_mut() {
                channel[frame] = flush_denormal(channel[frame] * gain);
            }
        }
    }

    fn reset(&mut self) {
        self.ramp.snap_to_target();
    }
}
