//! Pluggable encoding for match state, snapshots and intent logs

use serde::{Serialize, de::DeserializeOwned};
use crate::error::SerializationError;

/// Trait for pluggable serialization backends
pub trait StateSerializer: Send + Sync {
    /// Serialize a value to bytes
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize a value from bytes
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializationError>;

    /// Get the name of this serialization method
    fn name(&self) -> &str;
}

/// Bincode backend.
///
/// Compact, but cannot decode internally tagged enums such as `Intent`;
/// use JSON for intent logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeSerializer;

impl BincodeSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl StateSerializer for BincodeSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SerializationError> {
        bincode::serialize(value).map_err(|e| SerializationError::SerializationFailed {
            reason: format!("Bincode serialization failed: {}", e),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializationError> {
        bincode::deserialize(bytes).map_err(|e| SerializationError::DeserializationFailed {
            reason: format!("Bincode deserialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "bincode"
    }
}

/// JSON backend
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }
}

impl StateSerializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SerializationError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };

        result.map_err(|e| SerializationError::SerializationFailed {
            reason: format!("JSON serialization failed: {}", e),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializationError> {
        serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializationFailed {
            reason: format!("JSON deserialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "json"
    }
}
