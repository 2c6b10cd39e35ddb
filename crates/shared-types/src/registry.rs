//! # Payload Registry - Envelope Decoding
//!
//! Maps envelope type tags to decoders for the closed set of signable
//! payloads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Built once by the composition root, then shared by reference.
//! let registry = Arc::new(PayloadRegistry::with_default_payloads());
//!
//! let signable = registry.unpack(&wire.payload)?;
//! ```
//!
//! Registration is typed: only types implementing [`ExpectedPayload`] (and
//! therefore [`crate::SignablePayload`]) can be registered, so every decoded
//! value is guaranteed to expose an identifier and its raw message.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::envelope::TypedEnvelope;
use crate::errors::RegistryError;
use crate::payloads::{
    ExpectedPayload, Signable, SubmitLogicCall, UpdateValset, UploadSmartContract,
    ValidatorBalancesAttestation,
};

type Decoder = fn(&[u8]) -> Result<Signable, serde_json::Error>;

fn decode_as<P>(bytes: &[u8]) -> Result<Signable, serde_json::Error>
where
    P: ExpectedPayload + DeserializeOwned + Into<Signable>,
{
    serde_json::from_slice::<P>(bytes).map(Into::into)
}

/// Registry of payload decoders keyed by type tag.
#[derive(Default)]
pub struct PayloadRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl PayloadRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in signable payload registered.
    pub fn with_default_payloads() -> Self {
        let mut registry = Self::new();
        registry.insert::<UpdateValset>();
        registry.insert::<SubmitLogicCall>();
        registry.insert::<UploadSmartContract>();
        registry.insert::<ValidatorBalancesAttestation>();
        info!(
            "[Registry] Registered {} payload types",
            registry.decoders.len()
        );
        registry
    }

    /// Register a decoder for `P`.
    ///
    /// Fails if `P`'s type tag already has a decoder.
    pub fn register<P>(&mut self) -> Result<(), RegistryError>
    where
        P: ExpectedPayload + DeserializeOwned + Into<Signable>,
    {
        let type_url = P::expected_type();
        if self.decoders.contains_key(type_url) {
            return Err(RegistryError::DuplicateType(type_url.to_string()));
        }
        self.insert::<P>();
        debug!("[Registry] Registered payload type {}", type_url);
        Ok(())
    }

    fn insert<P>(&mut self)
    where
        P: ExpectedPayload + DeserializeOwned + Into<Signable>,
    {
        self.decoders.insert(P::expected_type(), decode_as::<P>);
    }

    /// Check whether a type tag has a decoder.
    pub fn is_registered(&self, type_url: &str) -> bool {
        self.decoders.contains_key(type_url)
    }

    /// All registered type tags, sorted.
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.decoders.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Decode an envelope into the signable payload its tag names.
    pub fn unpack(&self, envelope: &TypedEnvelope) -> Result<Signable, RegistryError> {
        let decoder = self
            .decoders
            .get(envelope.type_url.as_str())
            .ok_or_else(|| RegistryError::UnknownType(envelope.type_url.clone()))?;

        decoder(&envelope.value).map_err(|e| RegistryError::Decode {
            type_url: envelope.type_url.clone(),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for PayloadRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
