//! JSON encoding of the session and settings cache files.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error raised while encoding or decoding a stored file.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The value could not be encoded.
    #[error("JSON serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// The file content is not valid JSON for the expected type.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Encodes a value as pretty JSON (2-space indent) ending in a newline.
///
/// # Errors
///
/// Returns `SerializationError::Serialize` if the value cannot be encoded.
pub fn to_json_file_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(SerializationError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes a stored file.
///
/// # Errors
///
/// Returns `SerializationError::Deserialize` if the JSON is invalid or
/// doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}
