//! Result payloads and their on-disk encodings
//!
//! The payload kinds are a closed set: PNG images and generic JSON values.
//! Each kind owns its file extension and (de)serialization; a stored blob
//! with any other extension is an unsupported-type error, never silently
//! coerced.

use crate::error::{CacheError, Result};

/// File extension for image payloads
pub const IMAGE_EXTENSION: &str = "png";
/// File extension for generic serialized payloads
pub const VALUE_EXTENSION: &str = "json";
/// All extensions the store can resolve
pub const SUPPORTED_EXTENSIONS: &[&str] = &[IMAGE_EXTENSION, VALUE_EXTENSION];

/// Eight-byte signature at the start of every PNG file
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A cached run result
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A PNG-encoded image, stored byte for byte
    Image(Vec<u8>),
    /// Any other serializable value, stored as JSON
    Value(serde_json::Value),
}

impl Payload {
    /// Convenience constructor for plain text results
    pub fn text(value: impl Into<String>) -> Self {
        Payload::Value(serde_json::Value::String(value.into()))
    }

    /// The text content, if this payload is a plain string value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Value(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The file extension this payload persists under
    pub fn extension(&self) -> &'static str {
        match self {
            Payload::Image(_) => IMAGE_EXTENSION,
            Payload::Value(_) => VALUE_EXTENSION,
        }
    }

    /// Serialize the payload to the bytes stored in its blob file.
    ///
    /// Image bytes are checked against the PNG signature so a `.png` blob is
    /// always actually a PNG.
    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Image(bytes) => {
                if !bytes.starts_with(&PNG_SIGNATURE) {
                    return Err(CacheError::InvalidImage {
                        reason: "missing PNG signature".to_string(),
                    });
                }
                Ok(bytes.clone())
            }
            Payload::Value(value) => Ok(serde_json::to_vec(value)?),
        }
    }

    /// Reconstruct a payload from a blob file's extension and bytes
    pub(crate) fn decode(extension: &str, bytes: Vec<u8>) -> Result<Self> {
        match extension {
            IMAGE_EXTENSION => {
                if !bytes.starts_with(&PNG_SIGNATURE) {
                    return Err(CacheError::InvalidImage {
                        reason: "stored blob is not a PNG".to_string(),
                    });
                }
                Ok(Payload::Image(bytes))
            }
            VALUE_EXTENSION => Ok(Payload::Value(serde_json::from_slice(&bytes)?)),
            other => Err(CacheError::unsupported_blob_type(other)),
        }
    }
}
