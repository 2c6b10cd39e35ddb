//! # Message Signing
//!
//! Binds a canonically encoded payload to its nonce and signs the result.
//!
//! `signed_bytes = encode(message) ++ nonce`. The nonce is appended raw, not
//! hashed separately, so identical `(message, nonce, credential)` triples
//! always produce identical `signed_bytes`.

use serde::Serialize;

use super::canonical::MessageEncoder;
use crate::domain::{SignError, SignedMessage};
use crate::ports::outbound::CredentialBackend;

/// The bytes a validator signs for `message` under `nonce`.
pub fn signing_bytes<E, T>(encoder: &E, message: &T, nonce: &[u8]) -> Result<Vec<u8>, SignError>
where
    E: MessageEncoder,
    T: Serialize + ?Sized,
{
    let mut bytes = encoder.encode(message)?;
    bytes.extend_from_slice(nonce);
    Ok(bytes)
}

/// Encode `message`, append `nonce`, and sign with `credential_id`.
pub async fn sign_bytes<C, E, T>(
    backend: &C,
    credential_id: &str,
    encoder: &E,
    message: &T,
    nonce: &[u8],
) -> Result<SignedMessage, SignError>
where
    C: CredentialBackend + ?Sized,
    E: MessageEncoder,
    T: Serialize + ?Sized,
{
    let signed_bytes = signing_bytes(encoder, message, nonce)?;
    let signature = backend.sign(credential_id, &signed_bytes).await?;
    Ok(SignedMessage {
        signature,
        signed_bytes,
    })
}
