//! # Shared Types Crate
//!
//! Types exchanged between the relay subsystems and the remote ledger.
//!
//! ## Design Principles
//!
//! - **Opaque envelopes**: payloads arrive as a [`TypedEnvelope`] (type tag +
//!   encoded value) and are only ever turned into concrete values through a
//!   [`PayloadRegistry`].
//! - **Closed set of payloads**: every signable variant is a member of
//!   [`Signable`] and implements [`SignablePayload`].
//! - **Explicit initialisation**: the registry is built by the composition root
//!   and passed by reference; there is no global lookup table.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod payloads;
pub mod registry;

pub use entities::*;
pub use envelope::TypedEnvelope;
pub use errors::*;
pub use payloads::*;
pub use registry::PayloadRegistry;
