//! # Message Fetcher
//!
//! Pulls queued messages for one queue and decodes each envelope into the
//! payload type the caller expects.
//!
//! A record whose envelope cannot be decoded fails the fetch with
//! [`RelayError::Unpack`]; one that decodes to a different variant fails it
//! with [`RelayError::TypeMismatch`]. Records are never dropped or coerced.

use shared_types::{ExpectedPayload, PayloadRegistry, QueuedMessage, SignablePayload};
use std::sync::Arc;
use tracing::debug;

use crate::domain::RelayError;
use crate::ports::outbound::MessageQueryClient;

/// Decoding front-end over a [`MessageQueryClient`].
pub struct MessageFetcher<Q: MessageQueryClient> {
    client: Q,
    registry: Arc<PayloadRegistry>,
}

impl<Q: MessageQueryClient> MessageFetcher<Q> {
    /// Create a fetcher over `client`, decoding with `registry`.
    pub fn new(client: Q, registry: Arc<PayloadRegistry>) -> Self {
        Self { client, registry }
    }

    /// Fetch every message queued in `queue_type_name` for `validator`.
    ///
    /// `id` and `nonce` are copied verbatim and backend order is kept.
    pub async fn fetch_for_signing<T: ExpectedPayload>(
        &self,
        queue_type_name: &str,
        validator: &str,
    ) -> Result<Vec<QueuedMessage<T>>, RelayError> {
        let wire = self
            .client
            .fetch_queued_messages(queue_type_name, validator)
            .await?;

        debug!(
            queue_type_name,
            count = wire.len(),
            "[relay-01] Fetched queued messages"
        );

        wire.into_iter()
            .map(|message| {
                let signable = self.registry.unpack(&message.payload).map_err(|source| {
                    RelayError::Unpack {
                        queue_type_name: queue_type_name.to_string(),
                        message_id: message.id,
                        source,
                    }
                })?;

                let payload = T::from_signable(signable).map_err(|actual| {
                    RelayError::TypeMismatch {
                        queue_type_name: queue_type_name.to_string(),
                        message_id: message.id,
                        expected: T::expected_type().to_string(),
                        actual: actual.type_url().to_string(),
                    }
                })?;

                Ok(QueuedMessage {
                    id: message.id,
                    nonce: message.nonce,
                    payload,
                })
            })
            .collect()
    }
}
