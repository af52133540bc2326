//! Content hashing for deterministic composition checks.
//!
//! Produces a SHA-256 digest of a serializable value (typically a composed
//! timeline), so two runs can be compared without diffing their full output.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::TableauResult;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash raw bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update((data.len() as u64).to_le_bytes());
    hasher.update(data);
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

/// Hash the canonical JSON encoding of a value.
pub fn hash_value<T: Serialize>(value: &T) -> TableauResult<ContentHash> {
    let encoded = serde_json::to_vec(value)?;
    Ok(hash_bytes(&encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash_bytes(b"query"), hash_bytes(b"query"));
        assert_ne!(hash_bytes(b"query"), hash_bytes(b"key"));
    }

    #[test]
    fn test_hash_value_tracks_content() {
        let a = hash_value(&vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let b = hash_value(&vec![1.0, 1.0, 0.0, 1.0]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, hash_value(&vec![1.0, 0.0, 0.0, 1.0]).unwrap());
    }

    #[test]
    fn test_hash_hex_format() {
        let hash = hash_bytes(b"");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash.short(), hex[..12]);
        assert_eq!(format!("{}", hash), hex);
    }
}
