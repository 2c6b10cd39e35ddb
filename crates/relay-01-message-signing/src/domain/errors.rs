//! # Domain Errors
//!
//! Error types for the Message Signing subsystem.
//!
//! Every variant that can abort a relay run carries the queue and, where one
//! exists, the message id it failed on.

use shared_types::{MessageId, RegistryError};
use thiserror::Error;

/// A value could not be given a canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Float with no canonical textual form (NaN or infinite).
    #[error("Non-finite number has no canonical form: {0}")]
    NonFiniteNumber(String),

    /// Value the structural representation cannot express (e.g. non-string map keys).
    #[error("Unrepresentable value: {0}")]
    Unrepresentable(String),
}

/// Failure reported by a credential backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No key is loaded under this credential id.
    #[error("Credential unavailable: {0}")]
    Unavailable(String),

    /// The key exists but is locked.
    #[error("Credential locked: {0}")]
    Locked(String),

    /// The backend refused to sign the input.
    #[error("Credential {credential} rejected input: {reason}")]
    Rejected {
        /// Credential id that refused.
        credential: String,
        /// Backend's reason.
        reason: String,
    },
}

/// Failure of a single `sign_bytes` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The payload could not be encoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The backend could not sign.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Errors that abort a relay run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Cancellation observed at a boundary check.
    #[error("Context cancelled before {stage}")]
    ContextCancelled {
        /// Queue name, or `"broadcast"`, that was about to start.
        stage: String,
    },

    /// The query endpoint failed.
    #[error("Query failed for queue {queue_type_name}: {reason}")]
    Query {
        /// Queue being fetched
        queue_type_name: String,
        /// Client error text
        reason: String,
    },

    /// The envelope could not be decoded into any known payload.
    #[error("Unpack failed for message {message_id} in queue {queue_type_name}: {source}")]
    Unpack {
        /// Queue the message came from
        queue_type_name: String,
        /// Failing message
        message_id: MessageId,
        /// Decoder error
        #[source]
        source: RegistryError,
    },

    /// The envelope decoded, but not to the expected payload type.
    #[error(
        "Type mismatch for message {message_id} in queue {queue_type_name}: expected {expected}, got {actual}"
    )]
    TypeMismatch {
        /// Queue the message came from
        queue_type_name: String,
        /// Failing message
        message_id: MessageId,
        /// Type the caller asked for
        expected: String,
        /// Type the envelope decoded to
        actual: String,
    },

    /// The payload had no canonical encoding.
    #[error("Encoding failed for message {message_id} in queue {queue_type_name}: {source}")]
    Encoding {
        /// Queue the message came from
        queue_type_name: String,
        /// Failing message
        message_id: MessageId,
        /// Encoder error
        #[source]
        source: EncodingError,
    },

    /// The credential backend failed.
    #[error("Signing failed for message {message_id} in queue {queue_type_name}: {source}")]
    Signing {
        /// Queue the message came from
        queue_type_name: String,
        /// Failing message
        message_id: MessageId,
        /// Backend error
        #[source]
        source: CredentialError,
    },

    /// Submission failed; the whole batch is unsent.
    #[error("Broadcast of {batch_size} signatures failed: {reason}")]
    Broadcast {
        /// Signatures in the rejected batch
        batch_size: usize,
        /// Submitter error text
        reason: String,
    },
}

impl RelayError {
    /// Attach queue and message context to a signing failure.
    pub fn from_sign(err: SignError, queue_type_name: &str, message_id: MessageId) -> Self {
        let queue_type_name = queue_type_name.to_string();
        match err {
            SignError::Encoding(source) => Self::Encoding {
                queue_type_name,
                message_id,
                source,
            },
            SignError::Credential(source) => Self::Signing {
                queue_type_name,
                message_id,
                source,
            },
        }
    }

    /// Whether re-running the pipeline may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ContextCancelled { .. } | Self::Query { .. } | Self::Broadcast { .. }
        )
    }
}
