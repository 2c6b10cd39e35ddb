//! # Queue Entities
//!
//! Records the relay reads from and writes back to the remote ledger.
//!
//! - [`WireMessage`]: one queue entry as returned by the query endpoint
//! - [`QueuedMessage`]: a wire entry whose payload has been decoded
//! - [`SignatureRecord`]: one signature destined for the submission batch

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::envelope::TypedEnvelope;

/// Identifier of a message, unique within one queue.
pub type MessageId = u64;

/// A queued message as it arrives from the query endpoint.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub id: MessageId,
    #[serde_as(as = "Base64")]
    pub nonce: Vec<u8>,
    pub payload: TypedEnvelope,
}

impl WireMessage {
    pub fn new(id: MessageId, nonce: Vec<u8>, payload: TypedEnvelope) -> Self {
        Self { id, nonce, payload }
    }
}

/// A queued message whose payload decoded to the expected type `T`.
///
/// Read-only to the relay: `id` and `nonce` are exactly what the ledger sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage<T> {
    pub id: MessageId,
    pub nonce: Vec<u8>,
    pub payload: T,
}

/// A signature produced during one relay run.
///
/// Lives only until the batch containing it is submitted.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: MessageId,
    pub queue_type_name: String,
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
}
