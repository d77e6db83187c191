//! # Transcript Records
//!
//! The two record types owned by the store: the [`Transcript`] itself,
//! created exactly once per successful issuance and never deleted, and the
//! [`TranscriptUpdate`], the single most-recent amendment — overwritten on
//! each update, never appended. There is no amendment history beyond it.

use serde::{Deserialize, Serialize};

use crate::config::HASH_LENGTH;
use crate::identity::{Address, TranscriptId};

/// A fixed 32-byte content hash of the canonical transcript document.
pub type ContentHash = [u8; HASH_LENGTH];

/// An issued academic transcript.
///
/// Only `gpa`, `courses`, and `timestamp` change after issuance (via the
/// update operation); every other field is immutable for the life of the
/// record. The `issuer` in particular is fixed at creation and is the only
/// identity allowed to amend the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Dense sequential identifier, assigned at issuance.
    pub id: TranscriptId,
    /// The student this transcript was issued to.
    pub student: Address,
    /// The issuing identity. Immutable; gates updates.
    pub issuer: Address,
    /// SHA-256 digest of the canonical transcript document.
    #[serde(with = "hash_hex")]
    pub hash: ContentHash,
    /// Scaled GPA: 0-400 inclusive, where 400 means 4.00.
    pub gpa: u16,
    /// Course names, at most 20.
    pub courses: Vec<String>,
    /// Ledger height at issuance, refreshed on update.
    pub timestamp: u64,
    /// Degree name, 1-50 characters.
    pub degree: String,
    /// Major name, 1-50 characters.
    pub major: String,
    /// Institution name, 1-100 characters.
    pub institution: String,
    /// Graduation date as a positive integer (e.g. 20230101).
    pub graduation_date: u64,
    /// Credit count.
    pub credits: u64,
    /// Campus location, up to 100 characters. May be empty.
    pub location: String,
    /// Set true at issuance. No in-scope operation reads or clears it.
    pub status: bool,
}

/// The single most-recent amendment to a transcript.
///
/// Overwritten in place on every update — this is the latest amendment,
/// not a history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    /// GPA written by the amendment.
    pub gpa: u16,
    /// Course list written by the amendment.
    pub courses: Vec<String>,
    /// Ledger height at which the amendment was applied.
    pub timestamp: u64,
    /// Who applied the amendment. Always the transcript's issuer, by
    /// construction — recorded anyway for audit.
    pub updater: Address,
}

/// The full set of caller-supplied inputs to an issuance.
///
/// The hash arrives as raw bytes of unchecked length — the validator
/// enforces the 32-byte requirement — and `credits` arrives signed so that
/// a negative count is a distinct, reportable rejection rather than a
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    /// The student the transcript is for.
    pub student: Address,
    /// Candidate content hash. Must be exactly 32 bytes.
    pub hash: Vec<u8>,
    /// Scaled GPA, 0-400.
    pub gpa: u16,
    /// Course names, at most 20.
    pub courses: Vec<String>,
    /// Degree name.
    pub degree: String,
    /// Major name.
    pub major: String,
    /// Institution name.
    pub institution: String,
    /// Graduation date, must be positive.
    pub graduation_date: u64,
    /// Credit count, must be non-negative.
    pub credits: i64,
    /// Campus location. May be empty.
    pub location: String,
}

/// Serde adapter rendering the 32-byte hash as lowercase hex.
mod hash_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ContentHash;
    use crate::config::HASH_LENGTH;

    pub fn serialize<S: Serializer>(hash: &ContentHash, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<ContentHash, D::Error> {
        let s = String::deserialize(de)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let array: ContentHash = bytes.try_into().map_err(|b: Vec<u8>| {
            serde::de::Error::custom(format!("expected {} bytes, got {}", HASH_LENGTH, b.len()))
        })?;
        Ok(array)
    }
}
