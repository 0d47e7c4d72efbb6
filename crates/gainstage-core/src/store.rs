//! Lock-free parameter store shared between the control and audio contexts.
//!
//! [`ParameterStore`] owns every declared parameter's [`ParamDescriptor`] and
//! its current value. Values are stored as `f32` bit patterns in `AtomicU32`,
//! so the audio thread reads with a single atomic load and the control thread
//! writes with a single atomic store. There is no lock anywhere: neither side
//! can ever block the other, and a reader racing a writer sees either the old
//! or the new value, never a torn one.
//!
//! # Lifecycle
//!
//! 1. **Declare** (control context, before processing): [`declare`](ParameterStore::declare)
//!    registers a parameter and returns a [`ParamHandle`].
//! 2. **Share**: wrap the store in an `Arc` and hand clones to the control
//!    surface and the audio processor.
//! 3. **Read/write**: the audio path calls [`value`](ParameterStore::value)
//!    with its cached handle once per block; the control path calls
//!    [`set`](ParameterStore::set) or [`set_value`](ParameterStore::set_value).
//! 4. **Persist**: [`snapshot`](ParameterStore::snapshot) and
//!    [`restore`](ParameterStore::restore) run on the control context.
//!
//! # Example
//!
//! ```rust
//! use gainstage_core::{ParameterStore, ParamDescriptor};
//!
//! let mut store = ParameterStore::new();
//! let gain = store
//!     .declare(ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0))
//!     .unwrap();
//!
//! store.set("gain", 30.0); // clamped
//! assert_eq!(store.value(gain), 12.0);
//!
//! let saved = store.snapshot();
//! store.set("gain", -6.0);
//! store.restore(&saved);
//! assert_eq!(store.get("gain"), Some(12.0));
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

use crate::param_info::ParamDescriptor;

/// Errors raised while declaring parameters.
///
/// These are configuration mistakes, not runtime conditions: they surface
/// once at construction and the caller is expected to fail fast.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    /// A parameter with this identifier is already declared.
    #[error("duplicate parameter id '{id}'")]
    DuplicateParameter {
        /// The identifier that was declared twice.
        id: String,
    },

    /// The declared range is inverted or not finite.
    #[error("parameter '{id}' has invalid range [{min}, {max}]")]
    InvalidRange {
        /// The offending parameter.
        id: String,
        /// Declared minimum.
        min: f32,
        /// Declared maximum.
        max: f32,
    },
}

/// Index of a declared parameter.
///
/// Returned by [`ParameterStore::declare`]. Lookups through a handle are a
/// bounds-checked vector index plus one atomic load, which is what the audio
/// path should use. Handles stay valid for the lifetime of the store that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamHandle(usize);

impl ParamHandle {
    /// Position of the parameter in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Single source of truth for control values.
///
/// Declaration requires `&mut self` and therefore happens before the store is
/// shared; every read and write afterwards goes through `&self`.
#[derive(Debug, Default)]
pub struct ParameterStore {
    /// Descriptors in declaration order.
    descriptors: Vec<ParamDescriptor>,
    /// Current values as f32 bit-cast to u32, parallel to `descriptors`.
    values: Vec<AtomicU32>,
    /// Identifier → position.
    index: BTreeMap<String, usize>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter, initialized to its (clamped) default.
    ///
    /// Fails with [`ParamError::DuplicateParameter`] if the identifier is
    /// taken and with [`ParamError::InvalidRange`] if `min > max` or either
    /// bound is not finite.
    pub fn declare(&mut self, mut descriptor: ParamDescriptor) -> Result<ParamHandle, ParamError> {
        if self.index.contains_key(&descriptor.id) {
            return Err(ParamError::DuplicateParameter { id: descriptor.id });
        }
        if !descriptor.has_valid_range() {
            return Err(ParamError::InvalidRange {
                id: descriptor.id,
                min: descriptor.min,
                max: descriptor.max,
            });
        }

        descriptor.default = if descriptor.default.is_finite() {
            descriptor.clamp(descriptor.default)
        } else {
            descriptor.min
        };

        let handle = ParamHandle(self.descriptors.len());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            id = %descriptor.id,
            min = descriptor.min,
            max = descriptor.max,
            default = descriptor.default,
            "parameter declared"
        );
        self.index.insert(descriptor.id.clone(), handle.0);
        self.values.push(AtomicU32::new(descriptor.default.to_bits()));
        self.descriptors.push(descriptor);
        Ok(handle)
    }

    /// Shorthand for declaring an unitless parameter from its parts.
    pub fn declare_float(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        range: core::ops::RangeInclusive<f32>,
        step: f32,
        default: f32,
    ) -> Result<ParamHandle, ParamError> {
        self.declare(
            ParamDescriptor::new(id, name, *range.start(), *range.end(), default).with_step(step),
        )
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no parameters are declared.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Find the handle for an identifier.
    pub fn handle(&self, id: &str) -> Option<ParamHandle> {
        self.index.get(id).copied().map(ParamHandle)
    }

    /// Handle for the parameter at a declaration-order position.
    pub fn handle_at(&self, index: usize) -> Option<ParamHandle> {
        (index < self.descriptors.len()).then_some(ParamHandle(index))
    }

    /// Descriptor for a handle.
    pub fn descriptor(&self, handle: ParamHandle) -> Option<&ParamDescriptor> {
        self.descriptors.get(handle.0)
    }

    /// Descriptor for an identifier.
    pub fn descriptor_by_id(&self, id: &str) -> Option<&ParamDescriptor> {
        self.handle(id).and_then(|h| self.descriptor(h))
    }

    /// All descriptors, in declaration order.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.descriptors
    }

    /// Read the current value through a handle (lock-free, allocation-free).
    ///
    /// Returns `0.0` for a handle this store did not issue.
    #[inline]
    pub fn value(&self, handle: ParamHandle) -> f32 {
        self.values
            .get(handle.0)
            .map_or(0.0, |v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Read the current value by identifier (lock-free, allocation-free).
    #[inline]
    pub fn get(&self, id: &str) -> Option<f32> {
        self.handle(id).map(|h| self.value(h))
    }

    /// Write a value through a handle, clamped to the declared range.
    ///
    /// NaN has no place in any range and is ignored; infinities clamp to the
    /// nearest bound. Returns the stored value, or `None` if nothing was written.
    pub fn set_value(&self, handle: ParamHandle, value: f32) -> Option<f32> {
        let (atomic, desc) = self.values.get(handle.0).zip(self.descriptors.get(handle.0))?;
        if value.is_nan() {
            return None;
        }
        let clamped = desc.clamp(value);
        atomic.store(clamped.to_bits(), Ordering::Release);
        Some(clamped)
    }

    /// Write a value by identifier, clamped to the declared range.
    ///
    /// Unknown identifiers are ignored.
    pub fn set(&self, id: &str, value: f32) -> Option<f32> {
        self.handle(id).and_then(|h| self.set_value(h, value))
    }

    /// Read the current value mapped into `0.0..=1.0`.
    pub fn get_normalized(&self, handle: ParamHandle) -> Option<f32> {
        let desc = self.descriptor(handle)?;
        Some(desc.normalize(self.value(handle)))
    }

    /// Write a normalized `0.0..=1.0` value, snapped to the step grid.
    ///
    /// This is the path used by host automation and sliders.
    pub fn set_normalized(&self, handle: ParamHandle, normalized: f32) -> Option<f32> {
        let desc = self.descriptor(handle)?;
        if normalized.is_nan() {
            return None;
        }
        let plain = desc.quantize(desc.denormalize(normalized));
        self.set_value(handle, plain)
    }

    /// Iterate over `(descriptor, current value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamDescriptor, f32)> + '_ {
        self.descriptors
            .iter()
            .zip(&self.values)
            .map(|(d, v)| (d, f32::from_bits(v.load(Ordering::Acquire))))
    }

    /// Point-in-time copy of every current value, keyed by identifier.
    ///
    /// Each value is read atomically; the set as a whole is not. A write that
    /// lands mid-snapshot may or may not be included.
    pub fn snapshot(&self) -> BTreeMap<String, f32> {
        self.iter().map(|(d, v)| (d.id.clone(), v)).collect()
    }

    /// Apply a snapshot.
    ///
    /// Present, declared keys are clamped and written. Unknown keys are
    /// ignored, which keeps state from newer or older layouts loadable.
    /// Declared parameters missing from the snapshot keep their current
    /// value. Returns how many parameters were written.
    pub fn restore(&self, snapshot: &BTreeMap<String, f32>) -> usize {
        snapshot
            .iter()
            .filter_map(|(id, &value)| self.set(id, value))
            .count()
    }

    /// Write every parameter back to its default.
    pub fn reset_to_defaults(&self) {
        for (atomic, desc) in self.values.iter().zip(&self.descriptors) {
            atomic.store(desc.default.to_bits(), Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn gain_store() -> (ParameterStore, ParamHandle) {
        let mut store = ParameterStore::new();
        let handle = store
            .declare(ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0))
            .unwrap();
        (store, handle)
    }

    #[test]
    fn declare_initializes_to_default() {
        let (store, gain) = gain_store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.value(gain), 0.0);
        assert_eq!(store.get("gain"), Some(0.0));
        assert_eq!(gain.index(), 0);
    }

    #[test]
    fn declare_rejects_duplicates() {
        let (mut store, _) = gain_store();
        let err = store
            .declare(ParamDescriptor::gain_db("gain", "Other", -10.0, 10.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::DuplicateParameter {
                id: "gain".to_string()
            }
        );
        assert_eq!(err.to_string(), "duplicate parameter id 'gain'");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn declare_rejects_invalid_range() {
        let mut store = ParameterStore::new();
        let err = store
            .declare(ParamDescriptor::new("x", "X", 5.0, 1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidRange { ref id, .. } if id == "x"));
        assert!(store.is_empty());
    }

    #[test]
    fn declare_clamps_default() {
        let mut store = ParameterStore::new();
        let h = store
            .declare(ParamDescriptor::new("x", "X", 0.0, 1.0, 5.0))
            .unwrap();
        assert_eq!(store.value(h), 1.0);
        assert_eq!(store.descriptor(h).unwrap().default, 1.0);
    }

    #[test]
    fn declare_float_shorthand() {
        let mut store = ParameterStore::new();
        let h = store.declare_float("mix", "Mix", 0.0..=100.0, 1.0, 50.0).unwrap();
        let desc = store.descriptor(h).unwrap();
        assert_eq!((desc.min, desc.max, desc.step), (0.0, 100.0, 1.0));
        assert_eq!(store.value(h), 50.0);
    }

    #[test]
    fn set_clamps_to_range() {
        let (store, gain) = gain_store();
        assert_eq!(store.set("gain", 100.0), Some(12.0));
        assert_eq!(store.value(gain), 12.0);
        assert_eq!(store.set("gain", -100.0), Some(-60.0));
        assert_eq!(store.value(gain), -60.0);
        assert_eq!(store.set("gain", 6.0), Some(6.0));
        assert_eq!(store.value(gain), 6.0);
    }

    #[test]
    fn set_infinite_clamps_nan_is_ignored() {
        let (store, gain) = gain_store();
        store.set_value(gain, 3.0);
        assert_eq!(store.set_value(gain, f32::NAN), None);
        assert_eq!(store.value(gain), 3.0);
        assert_eq!(store.set_value(gain, f32::INFINITY), Some(12.0));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (store, _) = gain_store();
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.set("missing", 1.0), None);
        assert!(store.handle("missing").is_none());
        assert!(store.descriptor_by_id("missing").is_none());
        assert!(store.handle_at(5).is_none());
    }

    #[test]
    fn normalized_access_snaps_to_step() {
        let (store, gain) = gain_store();
        store.set_normalized(gain, 1.0);
        assert_eq!(store.value(gain), 12.0);
        store.set_normalized(gain, 0.0);
        assert_eq!(store.value(gain), -60.0);

        // 0.5 → -24.0 exactly on the 0.1 grid.
        store.set_normalized(gain, 0.5);
        assert!((store.value(gain) - (-24.0)).abs() < 1e-4);
        assert!((store.get_normalized(gain).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut store = ParameterStore::new();
        store
            .declare(ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0))
            .unwrap();
        store.declare_float("mix", "Mix", 0.0..=1.0, 0.0, 1.0).unwrap();

        store.set("gain", -7.3);
        store.set("mix", 0.25);
        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);

        store.set("gain", 3.0);
        store.set("mix", 0.9);
        assert_eq!(store.restore(&snap), 2);
        assert_eq!(store.get("gain"), Some(-7.3));
        assert_eq!(store.get("mix"), Some(0.25));
    }

    #[test]
    fn partial_restore_leaves_missing_keys() {
        let mut store = ParameterStore::new();
        store.declare_float("a", "A", 0.0..=1.0, 0.0, 0.0).unwrap();
        store.declare_float("b", "B", 0.0..=1.0, 0.0, 0.0).unwrap();
        store.set("a", 0.4);
        store.set("b", 0.6);

        let mut partial = BTreeMap::new();
        partial.insert("a".to_string(), 0.9);
        partial.insert("unknown".to_string(), 123.0);
        assert_eq!(store.restore(&partial), 1);

        assert_eq!(store.get("a"), Some(0.9));
        assert_eq!(store.get("b"), Some(0.6));
    }

    #[test]
    fn restore_clamps_out_of_range() {
        let (store, gain) = gain_store();
        let mut snap = BTreeMap::new();
        snap.insert("gain".to_string(), 99.0);
        store.restore(&snap);
        assert_eq!(store.value(gain), 12.0);
    }

    #[test]
    fn reset_to_defaults() {
        let (store, gain) = gain_store();
        store.set_value(gain, 9.0);
        store.reset_to_defaults();
        assert_eq!(store.value(gain), 0.0);
    }

    #[test]
    fn iter_in_declaration_order() {
        let mut store = ParameterStore::new();
        store.declare_float("z", "Z", 0.0..=1.0, 0.0, 0.1).unwrap();
        store.declare_float("a", "A", 0.0..=1.0, 0.0, 0.2).unwrap();
        let ids: Vec<_> = store.iter().map(|(d, _)| d.id.as_str()).collect();
        assert_eq!(ids, ["z", "a"]);
        assert_eq!(store.handle_at(1), store.handle("a"));
    }

    #[test]
    fn concurrent_reads_never_see_torn_values() {
        let (store, gain) = gain_store();
        let store = Arc::new(store);
        let allowed = [-60.0_f32, 12.0];
        store.set_value(gain, allowed[0]);

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..10_000 {
                    store.set_value(gain, allowed[i % 2]);
                }
            })
        };

        for _ in 0..10_000 {
            let v = store.value(gain);
            assert!(allowed.contains(&v), "torn or unexpected value {v}");
        }
        writer.join().unwrap();
    }
}
