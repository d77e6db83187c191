//! # Registry Errors
//!
//! One tagged variant per user-visible failure kind. Every mutating
//! operation either commits all of its effects or returns one of these
//! with no state change at all — there is no partially-applied outcome.
//!
//! The taxonomy, roughly: configuration errors guard one-time setup
//! ordering; authorization errors are caller-identity mismatches;
//! validation errors are malformed input; `MaxExceeded` is capacity
//! exhaustion; `NotFound` means the referenced identifier is absent (pure
//! lookups like `get` return `Option`/empty instead — absence there is not
//! an error); `LedgerTransferFailed` is the one external dependency
//! failing.

use thiserror::Error;

use crate::identity::{Address, TranscriptId};
use crate::ledger::TransferError;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The fee recipient has already been configured. It is write-once.
    #[error("fee recipient already configured")]
    AlreadyConfigured,

    /// No fee recipient is configured yet. Issuance and fee changes both
    /// require one.
    #[error("no fee recipient configured")]
    NotConfigured,

    /// The caller is not in the issuer allow-list.
    #[error("address {0} is not an authorized issuer")]
    UnauthorizedIssuer(Address),

    /// The caller is not the transcript's original issuer. Only the
    /// issuer may amend a transcript.
    #[error("address {caller} may not update transcript {id}")]
    Unauthorized {
        /// The transcript being updated.
        id: TranscriptId,
        /// The rejected caller.
        caller: Address,
    },

    /// The student identity is the null/burn sentinel.
    #[error("student address is the burn address")]
    InvalidStudent,

    /// The content hash is not exactly 32 bytes.
    #[error("content hash must be 32 bytes, got {0}")]
    InvalidHash(usize),

    /// GPA outside the [0, 400] scaled range.
    #[error("gpa {0} out of range (max 400)")]
    InvalidGpa(u16),

    /// More course names than the per-transcript bound allows.
    #[error("too many courses: {0} exceeds the maximum of 20")]
    TooManyCourses(usize),

    /// Degree name empty or over 50 characters.
    #[error("degree name must be 1-50 characters")]
    InvalidDegree,

    /// Major name empty or over 50 characters.
    #[error("major name must be 1-50 characters")]
    InvalidMajor,

    /// Institution name empty or over 100 characters.
    #[error("institution name must be 1-100 characters")]
    InvalidInstitution,

    /// Graduation date must be a positive integer.
    #[error("graduation date must be positive")]
    InvalidGraduationDate,

    /// Credit count must be non-negative.
    #[error("credit count must be non-negative, got {0}")]
    InvalidCredits(i64),

    /// Location over 100 characters (empty is fine).
    #[error("location must be at most 100 characters")]
    InvalidLocation,

    /// The identifier counter has reached the configured cap.
    #[error("maximum transcript count of {0} reached")]
    MaxExceeded(u64),

    /// No transcript exists at the referenced identifier.
    #[error("transcript {0} not found")]
    NotFound(TranscriptId),

    /// The external fee transfer failed. Issuance aborts with no state
    /// change: no identifier consumed, no record written.
    #[error("issuance fee transfer failed: {0}")]
    LedgerTransferFailed(#[from] TransferError),
}
