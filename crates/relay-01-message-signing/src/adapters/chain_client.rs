//! In-Memory Chain Client Adapter
//!
//! Implements the `MessageQueryClient` and `SignatureSubmitter` ports against
//! an in-process queue. Submitted messages leave their queue, the way the
//! remote ledger stops offering a message once this validator's signature
//! for it has landed.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use shared_types::{
    MessageId, RegistryError, SignablePayload, SignatureRecord, TypedEnvelope, WireMessage,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::domain::RelayError;
use crate::ports::outbound::{MessageQueryClient, SignatureSubmitter};

/// In-process stand-in for the remote ledger's queue endpoints.
#[derive(Default)]
pub struct InMemoryChainClient {
    /// Pending messages per queue, in queue order.
    queues: RwLock<HashMap<String, Vec<WireMessage>>>,
    /// Every successful submission, in call order.
    submissions: Mutex<Vec<Vec<SignatureRecord>>>,
    /// Queues whose queries fail.
    failing_queues: RwLock<HashSet<String>>,
    /// Reason returned by the next submissions, if set.
    submit_failure: RwLock<Option<String>>,
    /// Number of submission calls, failed ones included.
    submit_calls: Mutex<usize>,
}

impl InMemoryChainClient {
    /// Create an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw wire message to a queue.
    pub fn enqueue(&self, queue_type_name: &str, message: WireMessage) {
        self.queues
            .write()
            .entry(queue_type_name.to_string())
            .or_default()
            .push(message);
    }

    /// Pack `payload` into an envelope and append it to a queue.
    pub fn enqueue_payload<P>(
        &self,
        queue_type_name: &str,
        id: MessageId,
        nonce: &[u8],
        payload: &P,
    ) -> Result<(), RegistryError>
    where
        P: SignablePayload + Serialize,
    {
        let envelope = TypedEnvelope::pack(payload)?;
        self.enqueue(
            queue_type_name,
            WireMessage::new(id, nonce.to_vec(), envelope),
        );
        Ok(())
    }

    /// Make queries against `queue_type_name` fail.
    pub fn fail_queue(&self, queue_type_name: &str) {
        self.failing_queues
            .write()
            .insert(queue_type_name.to_string());
    }

    /// Make submissions fail with `reason` (or succeed again with `None`).
    pub fn set_submit_failure(&self, reason: Option<&str>) {
        *self.submit_failure.write() = reason.map(str::to_string);
    }

    /// Messages still pending in a queue.
    pub fn pending(&self, queue_type_name: &str) -> usize {
        self.queues
            .read()
            .get(queue_type_name)
            .map_or(0, Vec::len)
    }

    /// Successful submissions so far.
    pub fn submissions(&self) -> Vec<Vec<SignatureRecord>> {
        self.submissions.lock().clone()
    }

    /// Submission calls so far, failed ones included.
    pub fn submit_calls(&self) -> usize {
        *self.submit_calls.lock()
    }
}

#[async_trait]
impl MessageQueryClient for InMemoryChainClient {
    async fn fetch_queued_messages(
        &self,
        queue_type_name: &str,
        validator: &str,
    ) -> Result<Vec<WireMessage>, RelayError> {
        debug!(
            "[relay-01] Querying queue {} for validator {}",
            queue_type_name, validator
        );

        if self.failing_queues.read().contains(queue_type_name) {
            return Err(RelayError::Query {
                queue_type_name: queue_type_name.to_string(),
                reason: "query endpoint unavailable".to_string(),
            });
        }

        Ok(self
            .queues
            .read()
            .get(queue_type_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl SignatureSubmitter for InMemoryChainClient {
    async fn submit_signatures(&self, batch: &[SignatureRecord]) -> Result<(), RelayError> {
        *self.submit_calls.lock() += 1;

        let failure = self.submit_failure.read().clone();
        if let Some(reason) = failure {
            return Err(RelayError::Broadcast {
                batch_size: batch.len(),
                reason,
            });
        }

        let mut queues = self.queues.write();
        for record in batch {
            if let Some(queue) = queues.get_mut(&record.queue_type_name) {
                queue.retain(|m| m.id != record.id);
            }
        }
        drop(queues);

        self.submissions.lock().push(batch.to_vec());
        info!("[relay-01] Accepted batch of {} signatures", batch.len());
        Ok(())
    }
}
