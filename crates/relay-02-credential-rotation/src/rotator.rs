//! # Credential Rotator
//!
//! Cycles the active signing credential through a fixed, ordered list.
//!
//! The cursor starts on the first id. Each `rotate_next` advances it one step
//! (wrapping at the end) and announces the new id to the callback. The
//! advance and the callback run inside one critical section, so concurrent
//! callers observe a single total order and callbacks never overlap.

use parking_lot::Mutex;
use std::fmt;
use tracing::debug;

use crate::domain::RotationError;

/// Callback invoked with the newly active credential id.
pub type RotationCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Fixed-length credential list plus the index of the active slot.
struct SlotRing {
    slots: Vec<String>,
    cursor: usize,
}

impl SlotRing {
    fn advance(&mut self) -> &str {
        self.cursor = (self.cursor + 1) % self.slots.len();
        &self.slots[self.cursor]
    }
}

/// Serialized cyclic rotation over credential ids.
pub struct CredentialRotator {
    ring: Mutex<SlotRing>,
    on_rotate: RotationCallback,
    // Fixed at construction; read without the lock.
    credential_count: usize,
}

impl CredentialRotator {
    /// Build a rotator over `credential_ids` in the given order.
    ///
    /// The first id is active from construction but is not announced until
    /// a rotation happens.
    pub fn new<F>(credential_ids: Vec<String>, on_rotate: F) -> Result<Self, RotationError>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if credential_ids.is_empty() {
            return Err(RotationError::EmptyCredentialSet);
        }

        debug!(
            "[relay-02] Rotator initialised with {} credentials",
            credential_ids.len()
        );

        Ok(Self {
            credential_count: credential_ids.len(),
            ring: Mutex::new(SlotRing {
                slots: credential_ids,
                cursor: 0,
            }),
            on_rotate: Box::new(on_rotate),
        })
    }

    /// Advance to the next credential and invoke the callback with it.
    ///
    /// The lock is held across the callback, so the callback must not call
    /// back into this rotator.
    pub fn rotate_next(&self) {
        let mut ring = self.ring.lock();
        let next = ring.advance();
        (self.on_rotate)(next);
    }

    /// Number of credentials in the cycle. Never zero.
    pub fn credential_count(&self) -> usize {
        self.credential_count
    }
}

impl fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRotator")
            .field("credential_count", &self.credential_count)
            .finish_non_exhaustive()
    }
}
