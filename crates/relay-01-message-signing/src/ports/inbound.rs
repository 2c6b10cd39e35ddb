//! # Inbound Ports
//!
//! API trait defining what the Message Signing subsystem can do.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{RelayError, RelayReport};

/// Message signing API - inbound port.
#[async_trait]
pub trait MessageSigningApi: Send + Sync {
    /// Fetch, sign and broadcast every queued message in `queue_type_names`.
    ///
    /// Queues are processed in order. `cancel` is checked before each queue
    /// and once before the broadcast; when it reads `true` the run stops
    /// without submitting anything.
    async fn sign_messages_for_execution(
        &self,
        queue_type_names: &[String],
        cancel: &watch::Receiver<bool>,
    ) -> Result<RelayReport, RelayError>;
}
