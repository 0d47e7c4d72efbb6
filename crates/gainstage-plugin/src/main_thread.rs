//! Control-side handler for the gain plugin.
//!
//! Answers parameter metadata queries, converts between values and display
//! text, and saves/restores state. Everything here runs on the control
//! context and may allocate.

use gainstage_core::ParamDescriptor;

use crate::STATE_TAG;
use crate::shared::GainShared;
use crate::state::{StateDocument, StateError};

/// Control surface of a gain plugin instance.
///
/// Borrowed from [`GainPlugin::main_thread`](crate::GainPlugin::main_thread).
/// Parameters are addressed by stable string id, except for the by-index
/// enumeration a host uses to discover them.
pub struct GainMainThread<'a> {
    shared: &'a GainShared,
}

impl<'a> GainMainThread<'a> {
    /// Create a handler referencing the shared state.
    pub fn new(shared: &'a GainShared) -> Self {
        Self { shared }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        self.shared.store().len()
    }

    /// Parameter metadata by declaration index.
    pub fn param_info(&self, index: usize) -> Option<&'a ParamDescriptor> {
        self.shared.store().descriptors().get(index)
    }

    /// Parameter metadata by id.
    pub fn descriptor(&self, id: &str) -> Option<&'a ParamDescriptor> {
        self.shared.store().descriptor_by_id(id)
    }

    /// Current plain value.
    pub fn get_value(&self, id: &str) -> Option<f32> {
        self.shared.store().get(id)
    }

    /// Write a plain value, clamped to range. Returns the stored value.
    pub fn set_value(&self, id: &str, value: f32) -> Option<f32> {
        self.shared.store().set(id, value)
    }

    /// Current value mapped into `0.0..=1.0`.
    pub fn get_normalized(&self, id: &str) -> Option<f32> {
        let store = self.shared.store();
        store.handle(id).and_then(|h| store.get_normalized(h))
    }

    /// Write a `0.0..=1.0` value, snapped to the parameter's step grid.
    pub fn set_normalized(&self, id: &str, normalized: f32) -> Option<f32> {
        let store = self.shared.store();
        store
            .handle(id)
            .and_then(|h| store.set_normalized(h, normalized))
    }

    /// Display text for a value, e.g. `"-6.0 dB"`.
    ///
    /// Unknown ids fall back to the bare number.
    pub fn value_to_text(&self, id: &str, value: f32) -> String {
        match self.descriptor(id) {
            Some(desc) => desc.format_value(value),
            None => format!("{value:.2}"),
        }
    }

    /// Parse user-entered text into a clamped value.
    pub fn text_to_value(&self, id: &str, text: &str) -> Option<f32> {
        self.descriptor(id)?.parse_value(text)
    }

    /// Write every parameter back to its default.
    pub fn reset_to_defaults(&self) {
        self.shared.store().reset_to_defaults();
    }

    /// Serialize the current parameter values into a state blob.
    pub fn save_state(&self) -> Result<Vec<u8>, StateError> {
        let document = StateDocument::new(STATE_TAG, self.shared.store().snapshot());
        let blob = document.to_blob()?;
        tracing::debug!(
            "state saved: {} parameters, {} bytes",
            document.params.len(),
            blob.len()
        );
        Ok(blob)
    }

    /// Restore parameter values from a state blob.
    ///
    /// The blob is fully decoded and checked before anything is written, so
    /// a rejected blob leaves every parameter unchanged. Returns how many
    /// parameters were restored.
    pub fn load_state(&self, blob: &[u8]) -> Result<usize, StateError> {
        let document = StateDocument::from_blob(blob)
            .and_then(|doc| doc.check(STATE_TAG).map(|()| doc))
            .inspect_err(|e| tracing::warn!("state rejected: {e}"))?;

        let restored = self.shared.store().restore(&document.params);
        tracing::debug!(
            "state loaded: {restored} of {} parameters",
            self.param_count()
        );
        Ok(restored)
    }
}
