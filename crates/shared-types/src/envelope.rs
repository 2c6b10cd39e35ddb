//! # `TypedEnvelope`
//!
//! The opaque wrapper every queued payload travels in.
//!
//! The envelope carries a type tag (`type_url`) and the JSON encoding of the
//! concrete value. The relay never inspects `value` directly; it hands the
//! envelope to a [`crate::PayloadRegistry`] which picks the decoder by tag.

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::errors::RegistryError;
use crate::payloads::SignablePayload;

/// A type-tagged, opaque payload.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedEnvelope {
    /// Type tag selecting the decoder, e.g. `/relay.SubmitLogicCall`.
    pub type_url: String,
    /// Encoded value. Base64 on the wire.
    #[serde_as(as = "Base64")]
    pub value: Vec<u8>,
}

impl TypedEnvelope {
    /// Create an envelope from raw parts.
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Pack a concrete payload under its own type tag.
    pub fn pack<P>(payload: &P) -> Result<Self, RegistryError>
    where
        P: SignablePayload + Serialize,
    {
        let value = serde_json::to_vec(payload).map_err(|e| RegistryError::Encode {
            type_url: payload.type_url().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(payload.type_url(), value))
    }
}
