//! # Registry Bounds & Configuration
//!
//! Every field bound enforced by the validator lives here, alongside the
//! process-wide [`RegistryConfig`]. If you're hardcoding one of these
//! limits somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! The configuration is an explicit state object constructed at startup and
//! handed to the registry — there are no ambient globals and no implicit
//! re-initialization.

use serde::{Deserialize, Serialize};

use crate::identity::Address;

// ---------------------------------------------------------------------------
// Field Bounds
// ---------------------------------------------------------------------------

/// Content hashes are exactly 32 bytes — a SHA-256 digest of the canonical
/// transcript document. Not 20, not 64. Thirty-two.
pub const HASH_LENGTH: usize = 32;

/// GPA is a scaled decimal: 400 means 4.00. Anything above is rejected.
pub const GPA_MAX: u16 = 400;

/// Maximum number of course names on a single transcript.
pub const MAX_COURSES: usize = 20;

/// Degree name length bound in characters (non-empty required).
pub const MAX_DEGREE_LENGTH: usize = 50;

/// Major name length bound in characters (non-empty required).
pub const MAX_MAJOR_LENGTH: usize = 50;

/// Institution name length bound in characters (non-empty required).
pub const MAX_INSTITUTION_LENGTH: usize = 100;

/// Location length bound in characters. Empty is allowed — not every
/// institution publishes a campus location.
pub const MAX_LOCATION_LENGTH: usize = 100;

/// The null/burn principal. Issuing a transcript to it would strand the
/// record forever, so the validator rejects it outright.
pub const BURN_ADDRESS: &str = "SP000000000000000000002Q6VF78";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default issuance fee charged per transcript, in the ledger's smallest
/// unit. Overridable once a fee recipient is configured.
pub const DEFAULT_ISSUANCE_FEE: u64 = 500;

/// Default cap on the total number of transcripts ever issued. Large
/// enough to never matter in practice, small enough to bound the store.
pub const DEFAULT_MAX_TRANSCRIPTS: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Process-wide registry configuration, read by every issuance.
///
/// The fee recipient starts unset and can be configured exactly once; the
/// fee itself is mutable afterwards. Fee changes apply to subsequent
/// issuances only — already-issued transcripts are untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fee charged per issuance, moved from issuer to recipient.
    pub issuance_fee: u64,
    /// Where issuance fees go. `None` until configured; issuance is
    /// impossible while unset.
    pub fee_recipient: Option<Address>,
    /// Hard cap on the identifier counter.
    pub max_transcripts: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            issuance_fee: DEFAULT_ISSUANCE_FEE,
            fee_recipient: None,
            max_transcripts: DEFAULT_MAX_TRANSCRIPTS,
        }
    }
}
