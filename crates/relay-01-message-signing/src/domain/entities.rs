//! # Domain Entities
//!
//! Run-scoped state and configuration for the signing pipeline.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Output of one `sign_bytes` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedMessage {
    /// Signature over `signed_bytes`.
    pub signature: Vec<u8>,
    /// Canonical payload encoding followed by the nonce.
    pub signed_bytes: Vec<u8>,
}

/// Pipeline state machine.
///
/// ```text
/// Idle -> Fetching(i) -> Signing(i) -> ... -> Broadcasting -> Done
///            \______________\_______________\___> Aborted
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// Run not started.
    #[default]
    Idle,
    /// Fetching the named queue.
    Fetching(String),
    /// Signing messages from the named queue.
    Signing(String),
    /// Submitting the batch.
    Broadcasting,
    /// Finished; the batch was submitted or was empty.
    Done,
    /// Failed or cancelled before any submission completed.
    Aborted,
}

impl PipelineState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        match (self, next) {
            (_, Self::Aborted) => !self.is_terminal(),
            (Self::Idle, Self::Fetching(_)) => true,
            (Self::Idle, Self::Done) => true,
            (Self::Fetching(a), Self::Signing(b)) => a == b,
            (Self::Signing(_), Self::Fetching(_)) => true,
            (Self::Signing(_), Self::Broadcasting) => true,
            (Self::Signing(_), Self::Done) => true,
            (Self::Broadcasting, Self::Done) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Fetching(q) => write!(f, "Fetching({q})"),
            Self::Signing(q) => write!(f, "Signing({q})"),
            Self::Broadcasting => write!(f, "Broadcasting"),
            Self::Done => write!(f, "Done"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}

/// Messages signed from one queue during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSummary {
    /// Queue the messages came from.
    pub queue_type_name: String,
    /// Messages signed from it.
    pub signed: usize,
}

/// Outcome of a successful relay run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// State the run finished in.
    pub state: PipelineState,
    /// Per-queue counts, in processing order.
    pub partitions: Vec<PartitionSummary>,
    /// Whether a submission call was made.
    pub broadcast: bool,
    /// Credential the batch was signed with.
    pub credential: String,
}

impl RelayReport {
    /// Total signatures in the batch.
    pub fn total_signed(&self) -> usize {
        self.partitions.iter().map(|p| p.signed).sum()
    }
}

/// Signing-service configuration.
#[derive(Clone, Debug)]
pub struct SigningConfig {
    /// Validator identity passed to the query endpoint.
    pub validator: String,
}

impl SigningConfig {
    /// Config signing for `validator`.
    pub fn new(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
        }
    }
}

/// The credential id the validator currently signs with.
///
/// Written by the rotation callback, read by the pipeline at the start of each
/// run. Clones share the same slot.
#[derive(Clone, Debug)]
pub struct ActiveCredential(Arc<RwLock<String>>);

impl ActiveCredential {
    /// Slot initially holding `credential_id`.
    pub fn new(credential_id: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(credential_id.into())))
    }

    /// Snapshot of the current credential id.
    pub fn current(&self) -> String {
        self.0.read().clone()
    }

    /// Replace the current credential id.
    pub fn set(&self, credential_id: &str) {
        *self.0.write() = credential_id.to_string();
    }
}
