//! # Algorithms Module
//!
//! Canonical encoding and nonce-bound signing.

pub mod canonical;
mod finite;
pub mod signer;

pub use canonical::{decode_canonical, encode_canonical, CanonicalJsonEncoder, MessageEncoder};
pub use signer::{sign_bytes, signing_bytes};
