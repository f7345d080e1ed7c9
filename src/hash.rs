//! Content fingerprints for diff results

use crate::error::Result;
use crate::model::DiffResult;
use blake3::Hasher;

/// A hash value represented as a hex string
pub type HashValue = String;

/// Fingerprint of everything a result records. Two runs over unchanged inputs
/// produce the same fingerprint.
pub fn fingerprint(result: &DiffResult) -> Result<HashValue> {
    let bytes = serde_json::to_vec(result)?;
    Ok(hash_bytes(&bytes))
}

pub fn hash_bytes(bytes: &[u8]) -> HashValue {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}
