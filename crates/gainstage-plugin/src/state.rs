//! Persisted plugin state.
//!
//! Hosts store plugin state as an opaque byte blob. The blob wraps a
//! self-describing JSON document:
//!
//! ```text
//! +--------+-------------+------------------------------------------+
//! | "GSTB" | len: u32 LE | {"tag":"Parameters","version":1,         |
//! |        |             |  "params":{"gain":6.0}}                  |
//! +--------+-------------+------------------------------------------+
//! ```
//!
//! Parameters are keyed by stable string id, not index, so state survives
//! reordering and additions across plugin versions. Values are written in
//! shortest `f32` form and read back bit-exact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leading bytes of every state blob.
pub const STATE_MAGIC: [u8; 4] = *b"GSTB";

/// Document version written by this crate.
pub const STATE_VERSION: u32 = 1;

/// Magic plus the payload length.
const HEADER_LEN: usize = 8;

/// Errors decoding or encoding a state blob.
#[derive(Debug, Error)]
pub enum StateError {
    /// Fewer bytes than the fixed header.
    #[error("state blob is {0} bytes, shorter than its header")]
    TooShort(usize),

    /// The blob does not start with [`STATE_MAGIC`].
    #[error("state blob has unrecognized magic {0:02x?}")]
    BadMagic([u8; 4]),

    /// The header promises more payload than the blob holds.
    #[error("state payload truncated: header says {expected} bytes, found {found}")]
    Truncated {
        /// Payload length from the header.
        expected: usize,
        /// Bytes actually present after the header.
        found: usize,
    },

    /// Payload does not fit the `u32` length field.
    #[error("state payload of {0} bytes is too large")]
    TooLarge(usize),

    /// Payload is not a valid state document.
    #[error("state payload is not a valid document: {0}")]
    Json(#[from] serde_json::Error),

    /// Document belongs to a different schema.
    #[error("state tag '{found}' does not match '{expected}'")]
    TagMismatch {
        /// Tag this plugin writes.
        expected: String,
        /// Tag found in the document.
        found: String,
    },

    /// Document written by a newer version of this format.
    #[error("state version {0} is newer than supported version {STATE_VERSION}")]
    UnsupportedVersion(u32),
}

/// The JSON document inside a state blob.
///
/// Unknown fields are ignored so that newer writers can add data without
/// breaking older readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Schema identifier. Must match the reader's tag.
    pub tag: String,

    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Parameter values by stable id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl StateDocument {
    /// Create a current-version document.
    pub fn new(tag: impl Into<String>, params: BTreeMap<String, f32>) -> Self {
        Self {
            tag: tag.into(),
            version: STATE_VERSION,
            params,
        }
    }

    /// Encode as a blob: magic, payload length, JSON payload.
    pub fn to_blob(&self) -> Result<Vec<u8>, StateError> {
        let payload = serde_json::to_vec(self)?;
        let len = u32::try_from(payload.len()).map_err(|_| StateError::TooLarge(payload.len()))?;

        let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
        blob.extend_from_slice(&STATE_MAGIC);
        blob.extend_from_slice(&len.to_le_bytes());
        blob.extend_from_slice(&payload);
        Ok(blob)
    }

    /// Decode a blob.
    ///
    /// Checks framing and parses the document. Bytes after the declared
    /// payload are ignored. The tag is not checked here; see
    /// [`check`](Self::check).
    pub fn from_blob(blob: &[u8]) -> Result<Self, StateError> {
        let Some((header, rest)) = blob.split_first_chunk::<HEADER_LEN>() else {
            return Err(StateError::TooShort(blob.len()));
        };
        let (magic, len) = header.split_at(4);
        if magic != STATE_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(StateError::BadMagic(found));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(len);
        let expected = u32::from_le_bytes(len_bytes) as usize;
        let payload = rest.get(..expected).ok_or(StateError::Truncated {
            expected,
            found: rest.len(),
        })?;

        Ok(serde_json::from_slice(payload)?)
    }

    /// Verify the document belongs to schema `tag` and a supported version.
    pub fn check(&self, tag: &str) -> Result<(), StateError> {
        if self.tag != tag {
            return Err(StateError::TagMismatch {
                expected: tag.to_string(),
                found: self.tag.clone(),
            });
        }
        if self.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}
