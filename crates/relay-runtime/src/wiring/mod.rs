//! # Subsystem Wiring
//!
//! Connects the rotator to the signing service.
//!
//! ```text
//!  ┌──────────────┐  rotate_next()   ┌──────────────────┐
//!  │  relay-02    │ ───────────────► │ ActiveCredential │
//!  │  Rotator     │    callback      │  (shared slot)   │
//!  └──────────────┘                  └────────┬─────────┘
//!                                             │ snapshot per run
//!                                             ▼
//!                                    ┌──────────────────┐
//!                                    │    relay-01      │
//!                                    │ SigningService   │
//!                                    └──────────────────┘
//! ```

use relay_01_message_signing::ActiveCredential;
use relay_02_credential_rotation::{CredentialRotator, RotationError};
use relay_telemetry::log_event;
use shared_types::PayloadRegistry;
use std::sync::Arc;

/// Build the payload registry once, with every known payload type.
pub fn build_registry() -> Arc<PayloadRegistry> {
    Arc::new(PayloadRegistry::with_default_payloads())
}

/// Build a rotator whose callback writes the new id into `active`.
pub fn wire_rotator(
    credentials: Vec<String>,
    active: ActiveCredential,
) -> Result<CredentialRotator, RotationError> {
    CredentialRotator::new(credentials, move |credential| {
        active.set(credential);
        log_event!(info, "relay-02", credential, "[relay-02] Rotated active credential");
    })
}
