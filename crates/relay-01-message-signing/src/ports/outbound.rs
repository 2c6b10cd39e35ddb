//! # Outbound Ports
//!
//! Traits for external dependencies (query endpoint, submission endpoint,
//! credential backend).

use async_trait::async_trait;
use shared_types::{SignatureRecord, WireMessage};
use std::sync::Arc;

use crate::domain::{CredentialError, RelayError};

/// Query endpoint for queued messages - outbound port.
#[async_trait]
pub trait MessageQueryClient: Send + Sync {
    /// Messages in `queue_type_name` awaiting `validator`'s signature, in queue order.
    ///
    /// Transport failures are reported as [`RelayError::Query`].
    async fn fetch_queued_messages(
        &self,
        queue_type_name: &str,
        validator: &str,
    ) -> Result<Vec<WireMessage>, RelayError>;
}

/// Submission endpoint for signature batches - outbound port.
#[async_trait]
pub trait SignatureSubmitter: Send + Sync {
    /// Submit a whole batch in one call.
    ///
    /// Failures are reported as [`RelayError::Broadcast`].
    async fn submit_signatures(&self, batch: &[SignatureRecord]) -> Result<(), RelayError>;
}

/// Signing key store - outbound port.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Sign `bytes` with the key registered under `credential_id`.
    async fn sign(&self, credential_id: &str, bytes: &[u8]) -> Result<Vec<u8>, CredentialError>;
}

#[async_trait]
impl<T: MessageQueryClient + ?Sized> MessageQueryClient for Arc<T> {
    async fn fetch_queued_messages(
        &self,
        queue_type_name: &str,
        validator: &str,
    ) -> Result<Vec<WireMessage>, RelayError> {
        (**self)
            .fetch_queued_messages(queue_type_name, validator)
            .await
    }
}

#[async_trait]
impl<T: SignatureSubmitter + ?Sized> SignatureSubmitter for Arc<T> {
    async fn submit_signatures(&self, batch: &[SignatureRecord]) -> Result<(), RelayError> {
        (**self).submit_signatures(batch).await
    }
}

#[async_trait]
impl<T: CredentialBackend + ?Sized> CredentialBackend for Arc<T> {
    async fn sign(&self, credential_id: &str, bytes: &[u8]) -> Result<Vec<u8>, CredentialError> {
        (**self).sign(credential_id, bytes).await
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock credential backend: the "signature" is the credential id followed by the input.
#[derive(Clone, Debug, Default)]
pub struct MockCredentialBackend {
    /// Should fail?
    pub should_fail: bool,
}

#[async_trait]
impl CredentialBackend for MockCredentialBackend {
    async fn sign(&self, credential_id: &str, bytes: &[u8]) -> Result<Vec<u8>, CredentialError> {
        if self.should_fail {
            return Err(CredentialError::Unavailable(credential_id.to_string()));
        }
        let mut signature = credential_id.as_bytes().to_vec();
        signature.extend_from_slice(bytes);
        Ok(signature)
    }
}
