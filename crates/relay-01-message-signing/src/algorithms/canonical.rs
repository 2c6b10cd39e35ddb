//! # Canonical Encoding
//!
//! Deterministic byte encoding of structured values, following the JSON
//! Canonicalization Scheme (RFC 8785) through `serde_jcs`.
//!
//! 1. Reject non-finite floats.
//! 2. Write JCS: compact, object keys sorted at every depth, numbers in their
//!    shortest ECMAScript form (`1.0` and `1` encode alike).
//!
//! Two values with the same key/value pairs encode to the same bytes whatever
//! their field declaration order or map iteration order. Binary fields must
//! already be textual (the payload types carry them as base64).

use serde::Serialize;
use serde_json::Value;

use super::finite::ensure_finite;
use crate::domain::EncodingError;

/// Byte encoder used when signing.
pub trait MessageEncoder: Send + Sync {
    /// Encode `value` into bytes.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodingError>;
}

/// JCS encoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalJsonEncoder;

impl MessageEncoder for CanonicalJsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodingError> {
        encode_canonical(value)
    }
}

/// Encode `value` canonically.
pub fn encode_canonical<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodingError> {
    ensure_finite(value)?;
    serde_jcs::to_vec(value).map_err(|e| EncodingError::Unrepresentable(e.to_string()))
}

/// Parse bytes produced by [`encode_canonical`] back into a structural value.
pub fn decode_canonical(bytes: &[u8]) -> Result<Value, EncodingError> {
    serde_json::from_slice(bytes).map_err(|e| EncodingError::Unrepresentable(e.to_string()))
}
