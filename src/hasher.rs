//! State fingerprinting using Blake3

use blake3::Hasher as Blake3Hasher;
use serde::Serialize;
use crate::error::SerializationError;
use crate::types::StateHash;

/// StateHasher fingerprints match state
///
/// The bincode encoding of the value is hashed with Blake3, so equal states
/// hash equally across platforms and runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateHasher;

impl StateHasher {
    pub fn new() -> Self {
        Self
    }

    /// Compute the hash of any serializable state
    pub fn hash<S: Serialize + ?Sized>(&self, state: &S) -> Result<StateHash, SerializationError> {
        let serialized = bincode::serialize(state).map_err(|e| SerializationError::SerializationFailed {
            reason: format!("State encoding for hashing failed: {}", e),
        })?;

        let mut hasher = Blake3Hasher::new();
        hasher.update(&serialized);
        Ok(StateHash(*hasher.finalize().as_bytes()))
    }

    /// Extend a hash chain with one more state hash.
    ///
    /// The first link is the new hash on its own.
    pub fn extend_chain(&self, previous_chain_hash: Option<&StateHash>, new_hash: &StateHash) -> StateHash {
        let mut hasher = Blake3Hasher::new();
        if let Some(previous) = previous_chain_hash {
            hasher.update(&previous.0);
        }
        hasher.update(&new_hash.0);
        StateHash(*hasher.finalize().as_bytes())
    }
}
