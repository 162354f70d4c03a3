use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::SeqError;
use crate::serde::to_canonical_json_bytes;

/// Hex SHA-256 fingerprint of a value's canonical JSON encoding.
///
/// Map key order does not affect the result, so reports built from the same
/// tables and options carry the same fingerprint.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SeqError> {
    let mut hasher = Sha256::new();
    hasher.update(to_canonical_json_bytes(value)?);
    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}
