//! # Error Types
//!
//! Errors raised while packing or unpacking typed envelopes.

use thiserror::Error;

/// Errors produced by the [`crate::PayloadRegistry`] and envelope helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No decoder is registered for the envelope's type tag.
    #[error("Unknown payload type: {0}")]
    UnknownType(String),

    /// The type tag is known but its value could not be decoded.
    #[error("Failed to decode {type_url}: {reason}")]
    Decode { type_url: String, reason: String },

    /// A payload could not be encoded into an envelope.
    #[error("Failed to encode {type_url}: {reason}")]
    Encode { type_url: String, reason: String },

    /// A decoder for this type tag was already registered.
    #[error("Payload type already registered: {0}")]
    DuplicateType(String),
}
