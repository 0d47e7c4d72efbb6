//! Processing stage capability and its composition.
//!
//! A [`Stage`] is anything that can be prepared for a stream format and then
//! process multichannel audio in place. Stages compose two ways:
//!
//! - **Static**: [`StageExt::then`] builds a [`Chain`] whose type encodes the
//!   order. No boxing, no dynamic dispatch.
//! - **Dynamic**: [`Pipeline`] holds boxed stages in an explicit ordered list,
//!   for when the set of stages is decided at runtime.
//!
//! ## Design Decisions
//!
//! - **In place**: audio arrives as `&mut [&mut [f32]]`, one slice per
//!   channel, all the same length. Stages never own the buffer.
//! - **Object-safe**: `dyn Stage` works, so a pipeline can mix stage types.
//! - **No allocations**: `process` must be callable from the audio thread.
//!   `prepare` runs on the control side and may allocate.

/// Stream format a stage is prepared for.
///
/// Provided by the host before processing starts and again whenever the
/// sample rate or channel layout changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will pass to a single `process` call.
    pub max_block_size: usize,
    /// Number of channels in each block.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Create a spec.
    pub fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Standard stereo spec at the given sample rate and block size.
    pub fn stereo(sample_rate: f32, max_block_size: usize) -> Self {
        Self::new(sample_rate, max_block_size, 2)
    }
}

/// Number of frames shared by every channel of a buffer.
///
/// Channels are expected to have equal length; if they don't, only the
/// common prefix is processed.
#[inline]
pub fn frame_count(buffer: &[&mut [f32]]) -> usize {
    buffer.iter().map(|ch| ch.len()).min().unwrap_or(0)
}

/// Core trait for all processing stages.
///
/// # Example
///
/// ```rust
/// use gainstage_core::{ProcessSpec, Stage};
///
/// struct Invert;
///
/// impl Stage for Invert {
///     fn prepare(&mut self, _spec: &ProcessSpec) {}
///
///     fn process(&mut self, buffer: &mut [&mut [f32]]) {
///         for channel in buffer.iter_mut() {
///             for sample in channel.iter_mut() {
///                 *sample = -*sample;
///             }
///         }
///     }
/// }
/// ```
pub trait Stage {
    /// Configure for a stream format.
    ///
    /// Called before the first `process` and whenever the sample rate or
    /// channel count changes. Must not introduce a discontinuity in the
    /// output.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Process one block in place.
    ///
    /// Work must be bounded by `frames × channels`; no allocation, no locks.
    fn process(&mut self, buffer: &mut [&mut [f32]]);

    /// Clear internal state without changing parameters.
    ///
    /// Default does nothing, which is right for stateless stages.
    fn reset(&mut self) {}

    /// Processing latency in samples.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        (**self).prepare(spec);
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        (**self).process(buffer);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}

/// Extension trait for chaining stages.
pub trait StageExt: Stage + Sized {
    /// Chain this stage with another. The output of `self` feeds `next`.
    fn then<S: Stage>(self, next: S) -> Chain<Self, S> {
        Chain {
            first: self,
            second: next,
        }
    }
}

// Blanket implementation for all stages
impl<T: Stage> StageExt for T {}

/// Two stages chained in series.
///
/// Created by [`StageExt::then`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: Stage, B: Stage> Stage for Chain<A, B> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.first.prepare(spec);
        self.second.prepare(spec);
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        self.first.process(buffer);
        self.second.process(buffer);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}

impl<A, B> Chain<A, B> {
    /// Get a reference to the first stage in the chain.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get a mutable reference to the first stage in the chain.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// Get a reference to the second stage in the chain.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Get a mutable reference to the second stage in the chain.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

/// Ordered list of boxed stages, processed front to back.
///
/// Stages are added on the control side (`push` allocates); the audio side
/// only calls [`process`](Stage::process).
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage + Send>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the end of the pipeline.
    pub fn push(&mut self, stage: Box<dyn Stage + Send>) {
        self.stages.push(stage);
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Stage for Pipeline {
    fn prepare(&mut self, spec: &ProcessSpec) {
        for stage in &mut self.stages {
            stage.prepare(spec);
        }
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        for stage in &mut self.stages {
            stage.process(buffer);
        }
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    fn latency_samples(&self) -> usize {
        self.stages.iter().map(|s| s.latency_samples()).sum()
    }
}
