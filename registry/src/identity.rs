//! # Identities and Handles
//!
//! The registry treats caller identity as already resolved: an [`Address`]
//! is an opaque principal string established by the surrounding execution
//! environment. The only structure the registry imposes on it is equality
//! (case-sensitive, exact match) and the null-sentinel check used to reject
//! transcripts issued to the burn address.

use serde::{Deserialize, Serialize};

use crate::config::BURN_ADDRESS;

/// Dense, strictly increasing, never-reused handle for a transcript.
/// Allocation starts at 0 and the counter never decreases.
pub type TranscriptId = u64;

/// An opaque principal identity — student, issuer, or fee recipient.
///
/// Comparison is case-sensitive exact match on the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps a raw principal string.
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Returns the underlying principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the null/burn sentinel address.
    ///
    /// Transcripts must never be issued to it — there is no keyholder on
    /// the other side.
    pub fn is_burn(&self) -> bool {
        self.0 == BURN_ADDRESS
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}
