//! Audio processor for the gain plugin.
//!
//! Handles the real-time callback: reads the gain parameter once per block,
//! converts it to a linear target, and runs the smoothed gain stage followed
//! by any extra stages over the buffer in place. Nothing in the callback
//! allocates, locks or logs.

use gainstage_core::{Pipeline, ProcessSpec, SmoothedGainStage, Stage};

use crate::shared::GainShared;

/// Audio-side processor of a gain plugin instance.
///
/// Created by [`GainPlugin::activate`](crate::GainPlugin::activate), already
/// prepared for the stream format it was activated with.
pub struct GainAudioProcessor {
    shared: GainShared,
    gain: SmoothedGainStage,
    /// Stages run after the gain, in order.
    post: Pipeline,
    spec: ProcessSpec,
}

impl GainAudioProcessor {
    pub(crate) fn new(shared: GainShared, spec: ProcessSpec) -> Self {
        let gain = SmoothedGainStage::new(&spec, shared.ramp_ms());
        Self {
            shared,
            gain,
            post: Pipeline::new(),
            spec,
        }
    }

    /// Re-prepare for a new stream format.
    ///
    /// The gain snaps to its last target and the ramp length is recomputed
    /// for the new sample rate.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        tracing::debug!(
            "prepare: {} Hz, block {}, {} channels",
            spec.sample_rate,
            spec.max_block_size,
            spec.num_channels
        );
        self.spec = spec;
        self.gain.prepare(&spec);
        self.post.prepare(&spec);
    }

    /// Process one block in place, every channel of which is live input.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]]) {
        self.gain.set_target(self.shared.target_gain());
        self.gain.process(buffer);
        if !self.post.is_empty() {
            self.post.process(buffer);
        }
    }

    /// Process one block where only the first `input_channels` carry input.
    ///
    /// Output channels past the input count hold stale host memory and are
    /// cleared before processing.
    pub fn process_block_io(&mut self, buffer: &mut [&mut [f32]], input_channels: usize) {
        for channel in buffer.iter_mut().skip(input_channels) {
            channel.fill(0.0);
        }
        self.process_block(buffer);
    }

    /// Append a stage to run after the gain.
    ///
    /// The stage is prepared for the current format before it is added.
    /// Control context only: this allocates.
    pub fn push_stage(&mut self, mut stage: Box<dyn Stage + Send>) {
        stage.prepare(&self.spec);
        self.post.push(stage);
    }

    /// Clear processing state. The gain jumps to its current target.
    pub fn reset(&mut self) {
        self.gain.reset();
        self.post.reset();
    }

    /// Total processing latency in samples.
    pub fn latency_samples(&self) -> usize {
        self.gain.latency_samples() + self.post.latency_samples()
    }

    /// Samples of output that continue after input stops.
    pub fn tail_samples(&self) -> usize {
        0
    }

    /// Stream format currently prepared for.
    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    /// The gain stage, for inspection.
    pub fn gain_stage(&self) -> &SmoothedGainStage {
        &self.gain
    }
}
