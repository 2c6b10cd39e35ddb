//! # Relay Signing Service
//!
//! Application service layer that implements the `MessageSigningApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`MessageSigningApi`)
//! - Uses the outbound ports (`MessageQueryClient`, `SignatureSubmitter`,
//!   `CredentialBackend`) for every network interaction
//! - Delegates encoding and signing to the algorithms layer
//!
//! ## Run semantics
//!
//! Queues are processed strictly in order. Every signature lands in one
//! batch which is submitted in a single call at the end. Any failure aborts
//! the run before that call, so a batch is either broadcast whole or not at
//! all. An empty batch skips submission.

use async_trait::async_trait;
use shared_types::{PayloadRegistry, Signable, SignatureRecord};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::algorithms::{sign_bytes, CanonicalJsonEncoder};
use crate::domain::{
    ActiveCredential, PartitionSummary, PipelineState, RelayError, RelayReport, SigningConfig,
};
use crate::fetcher::MessageFetcher;
use crate::ports::inbound::MessageSigningApi;
use crate::ports::outbound::{CredentialBackend, MessageQueryClient, SignatureSubmitter};

/// Relay Signing Service.
///
/// Drives fetch -> sign -> accumulate -> broadcast for a set of queues.
pub struct RelaySigningService<Q, S, C>
where
    Q: MessageQueryClient,
    S: SignatureSubmitter,
    C: CredentialBackend,
{
    config: SigningConfig,
    fetcher: MessageFetcher<Q>,
    submitter: S,
    backend: C,
    active: ActiveCredential,
    encoder: CanonicalJsonEncoder,
}

impl<Q, S, C> RelaySigningService<Q, S, C>
where
    Q: MessageQueryClient,
    S: SignatureSubmitter,
    C: CredentialBackend,
{
    /// Create a new relay signing service.
    ///
    /// # Arguments
    /// * `config` - Validator identity
    /// * `query` - Query endpoint for queued messages
    /// * `submitter` - Submission endpoint for signature batches
    /// * `backend` - Credential backend that holds the signing keys
    /// * `active` - Slot holding the credential to sign with
    /// * `registry` - Payload decoders, built once at startup
    pub fn new(
        config: SigningConfig,
        query: Q,
        submitter: S,
        backend: C,
        active: ActiveCredential,
        registry: Arc<PayloadRegistry>,
    ) -> Self {
        Self {
            config,
            fetcher: MessageFetcher::new(query, registry),
            submitter,
            backend,
            active,
            encoder: CanonicalJsonEncoder,
        }
    }

    /// Validator this service signs for.
    pub fn validator(&self) -> &str {
        &self.config.validator
    }

    async fn run(
        &self,
        queue_type_names: &[String],
        cancel: &watch::Receiver<bool>,
        state: &mut PipelineState,
    ) -> Result<RelayReport, RelayError> {
        // One credential for the whole batch, even if a rotation lands mid-run.
        let credential = self.active.current();
        let mut batch: Vec<SignatureRecord> = Vec::new();
        let mut report = RelayReport {
            credential: credential.clone(),
            ..RelayReport::default()
        };

        for queue_type_name in queue_type_names {
            ensure_not_cancelled(cancel, queue_type_name)?;

            transition(state, PipelineState::Fetching(queue_type_name.clone()));
            let messages = self
                .fetcher
                .fetch_for_signing::<Signable>(queue_type_name, &self.config.validator)
                .await?;

            transition(state, PipelineState::Signing(queue_type_name.clone()));
            for message in &messages {
                let signed = sign_bytes(
                    &self.backend,
                    &credential,
                    &self.encoder,
                    &message.payload,
                    &message.nonce,
                )
                .await
                .map_err(|e| RelayError::from_sign(e, queue_type_name, message.id))?;

                batch.push(SignatureRecord {
                    id: message.id,
                    queue_type_name: queue_type_name.clone(),
                    signature: signed.signature,
                });
            }

            debug!(
                queue_type_name = %queue_type_name,
                signed = messages.len(),
                "[relay-01] Signed queue"
            );
            report.partitions.push(PartitionSummary {
                queue_type_name: queue_type_name.clone(),
                signed: messages.len(),
            });
        }

        ensure_not_cancelled(cancel, "broadcast")?;

        if batch.is_empty() {
            debug!("[relay-01] Nothing to sign, skipping broadcast");
            transition(state, PipelineState::Done);
            report.state = state.clone();
            return Ok(report);
        }

        transition(state, PipelineState::Broadcasting);
        self.submitter.submit_signatures(&batch).await?;
        report.broadcast = true;
        transition(state, PipelineState::Done);
        report.state = state.clone();

        Ok(report)
    }
}

#[async_trait]
impl<Q, S, C> MessageSigningApi for RelaySigningService<Q, S, C>
where
    Q: MessageQueryClient,
    S: SignatureSubmitter,
    C: CredentialBackend,
{
    async fn sign_messages_for_execution(
        &self,
        queue_type_names: &[String],
        cancel: &watch::Receiver<bool>,
    ) -> Result<RelayReport, RelayError> {
        let mut state = PipelineState::Idle;

        match self.run(queue_type_names, cancel, &mut state).await {
            Ok(report) => {
                info!(
                    validator = %self.config.validator,
                    credential = %report.credential,
                    batch_size = report.total_signed(),
                    broadcast = report.broadcast,
                    "[relay-01] Relay run complete"
                );
                Ok(report)
            }
            Err(err) => {
                let failed_at = state.clone();
                transition(&mut state, PipelineState::Aborted);
                warn!(
                    validator = %self.config.validator,
                    failed_at = %failed_at,
                    state = %state,
                    error = %err,
                    "[relay-01] Relay run aborted"
                );
                Err(err)
            }
        }
    }
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    debug_assert!(
        state.can_transition_to(&next),
        "invalid pipeline transition {state} -> {next}"
    );
    debug!("[relay-01] {} -> {}", state, next);
    *state = next;
}

fn ensure_not_cancelled(cancel: &watch::Receiver<bool>, stage: &str) -> Result<(), RelayError> {
    if *cancel.borrow() {
        return Err(RelayError::ContextCancelled {
            stage: stage.to_string(),
        });
    }
    Ok(())
}
