//! # Content Hashing
//!
//! Canonical SHA-256 hashing for transcript documents. The registry itself
//! only ever compares stored hashes byte-for-byte; this module is how
//! callers produce a well-formed 32-byte hash in the first place.

use sha2::{Digest, Sha256};

use crate::transcript::ContentHash;

/// Hashes an arbitrary transcript document to the registry's fixed 32-byte
/// content hash.
pub fn content_hash(document: &[u8]) -> ContentHash {
    let digest = Sha256::digest(document);
    digest.into()
}

/// Renders a content hash as lowercase hex, the form used at API
/// boundaries and in logs.
pub fn to_hex(hash: &ContentHash) -> String {
    hex::encode(hash)
}

/// Parses a hex-encoded hash back into raw bytes, without enforcing the
/// 32-byte length — that is the validator's job, so that a wrong-length
/// hash surfaces as the registry's own error rather than a parse failure.
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}
