//! # Rotation Errors

use thiserror::Error;

/// Errors raised while building a rotator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    /// A rotator needs at least one credential to cycle through.
    #[error("Credential set is empty")]
    EmptyCredentialSet,
}
