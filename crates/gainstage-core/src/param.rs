//! Linear parameter ramps for zipper-free changes.
//!
//! Audio parameters need smooth transitions to avoid audible "zipper noise"
//! and clicks when values change. [`LinearRamp`] moves from its current value
//! to a new target over a fixed wall-clock time, so the same ramp setting
//! sounds the same at 44.1 kHz and at 192 kHz.
//!
//! ## Usage
//!
//! ```rust
//! use gainstage_core::LinearRamp;
//!
//! let mut gain = LinearRamp::new(1.0, 48000.0, 10.0); // 10 ms ramp
//!
//! gain.set_target(0.5);
//!
//! // In the audio callback, advance once per sample
//! for _ in 0..480 {
//!     let _factor = gain.advance();
//! }
//! assert_eq!(gain.get(), 0.5);
//! ```

use crate::math::ms_to_samples;

/// Lifecycle of a [`LinearRamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampState {
    /// Freshly configured; no target change since the last reconfiguration.
    Ready,
    /// Moving toward the target.
    Ramping,
    /// Reached the target and holding it.
    Settled,
}

/// A value that ramps linearly to its target over a fixed time.
///
/// Each [`advance`](Self::advance) moves the value by
/// `(target - current) / remaining`, so the final step lands exactly on the
/// target no matter how much floating-point error built up on the way.
/// Retargeting mid-ramp starts a fresh full-length ramp from wherever the
/// value currently is, never from the old start point.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Steps left until the target is reached
    remaining: u32,
    /// Full ramp length in samples
    ramp_samples: u32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Ramp time in milliseconds
    ramp_ms: f32,
    state: RampState,
}

impl LinearRamp {
    /// Create a ramp resting at `initial`.
    ///
    /// # Arguments
    /// * `initial` - Starting value (also the initial target)
    /// * `sample_rate` - Stream rate in Hz
    /// * `ramp_ms` - Time to reach a new target, in milliseconds
    pub fn new(initial: f32, sample_rate: f32, ramp_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            remaining: 0,
            ramp_samples: ramp_length(ramp_ms, sample_rate),
            sample_rate,
            ramp_ms,
            state: RampState::Ready,
        }
    }

    /// Set the target value.
    ///
    /// Starts a full-length ramp from the current value. Setting the target
    /// it already has is a no-op, so calling this once per audio block with
    /// an unchanged control value does not stretch a ramp in progress.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;
        if self.ramp_samples == 0 {
            self.current = target;
            self.remaining = 0;
            self.state = RampState::Settled;
        } else {
            self.remaining = self.ramp_samples;
            self.state = RampState::Ramping;
        }
    }

    /// Set value immediately, cancelling any ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.remaining = 0;
        self.state = RampState::Settled;
    }

    /// Reconfigure for a new sample rate and ramp time.
    ///
    /// Recomputes the ramp length as `round(ramp_ms / 1000 * sample_rate)`
    /// and snaps the current value to the last target. The ramp is then
    /// [`RampState::Ready`].
    pub fn configure(&mut self, sample_rate: f32, ramp_ms: f32) {
        self.sample_rate = sample_rate;
        self.ramp_ms = ramp_ms;
        self.ramp_samples = ramp_length(ramp_ms, sample_rate);
        self.current = self.target;
        self.remaining = 0;
        self.state = RampState::Ready;
    }

    /// Update the sample rate, keeping the ramp time.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.configure(sample_rate, self.ramp_ms);
    }

    /// Get next ramped value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.current += (self.target - self.current) / self.remaining as f32;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.current = self.target;
                self.state = RampState::Settled;
            }
        }
        self.current
    }

    /// Value produced by the last [`advance`](Self::advance).
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check whether no ramp is in progress.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> RampState {
        self.state
    }

    /// Steps left in the current ramp.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Full ramp length in samples at the configured sample rate.
    #[inline]
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Configured ramp time in milliseconds.
    #[inline]
    pub fn ramp_ms(&self) -> f32 {
        self.ramp_ms
    }

    /// Configured sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Finish any ramp now: the value jumps to the target.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.remaining = 0;
        self.state = RampState::Settled;
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0, 44100.0, 0.0)
    }
}

fn ramp_length(ramp_ms: f32, sample_rate: f32) -> u32 {
    let samples = libm::roundf(ms_to_samples(ramp_ms, sample_rate));
    if samples.is_finite() && samples > 0.0 {
        samples as u32
    } else {
        0
    }
}
