//! # Relay-02 Credential Rotation
//!
//! Serialized rotation of the active signing credential.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Standalone primitive, no dependency on the signing pipeline
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Cyclic order | `ids[0] -> ids[1] -> ... -> ids[n-1] -> ids[0]` |
//! | Total order | Concurrent `rotate_next` calls are serialized |
//! | No overlap | The callback runs inside the critical section |
//!
//! ## Usage
//!
//! ```rust
//! use relay_02_credential_rotation::CredentialRotator;
//!
//! let rotator = CredentialRotator::new(
//!     vec!["foo".to_string(), "bar".to_string()],
//!     |id| println!("now signing with {id}"),
//! )
//! .unwrap();
//! rotator.rotate_next(); // announces "bar"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod rotator;

// Re-exports
pub use domain::RotationError;
pub use rotator::{CredentialRotator, RotationCallback};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
