//! # Relay-01 Message Signing
//!
//! Fetches messages the remote ledger has queued for this validator, signs
//! each one over its canonical encoding plus nonce, and broadcasts the whole
//! batch in a single submission.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Canonical bytes | RFC 8785 JCS via `serde_jcs`, NaN/Inf rejected |
//! | Nonce binding | `signed_bytes = canonical(payload) ++ nonce` |
//! | Fail-fast | First fetch, decode, type or signing error aborts the run |
//! | All-or-nothing | One submission per run, skipped when the batch is empty |
//! | Cancellation | Checked before each queue and once before broadcast |
//!
//! ## Module Structure
//!
//! ```text
//! relay-01-message-signing/
//! ├── domain/          # RelayError, PipelineState, ActiveCredential
//! ├── algorithms/      # Canonical JSON encoder, sign_bytes
//! ├── ports/           # MessageSigningApi, MessageQueryClient, CredentialBackend
//! ├── adapters/        # InMemoryChainClient, LocalKeyring
//! ├── fetcher.rs       # Envelope decoding and type narrowing
//! └── service.rs       # RelaySigningService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod fetcher;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemoryChainClient, LocalKeyring};
pub use algorithms::{
    decode_canonical, encode_canonical, sign_bytes, signing_bytes, CanonicalJsonEncoder,
    MessageEncoder,
};
pub use domain::{
    ActiveCredential, CredentialError, EncodingError, PartitionSummary, PipelineState,
    RelayError, RelayReport, SignError, SignedMessage, SigningConfig,
};
pub use fetcher::MessageFetcher;
pub use ports::{
    CredentialBackend, MessageQueryClient, MessageSigningApi, MockCredentialBackend,
    SignatureSubmitter,
};
pub use service::RelaySigningService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
