//! # Issuer Allow-List
//!
//! "Who may issue" is an explicit capability set, not type-based
//! polymorphism: a set of addresses injected at construction and mutated
//! only through the dedicated administrative operations. Every mutating
//! transcript operation consults it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// The set of addresses authorized to issue transcripts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuerSet {
    issuers: HashSet<Address>,
}

impl IssuerSet {
    /// Creates an empty issuer set. Nobody can issue until someone is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set pre-seeded with the given issuers.
    pub fn with_issuers(issuers: impl IntoIterator<Item = Address>) -> Self {
        Self {
            issuers: issuers.into_iter().collect(),
        }
    }

    /// Grants issuance rights. Idempotent; returns `true` if the address
    /// was newly added.
    pub fn add(&mut self, issuer: Address) -> bool {
        self.issuers.insert(issuer)
    }

    /// Revokes issuance rights. Returns `true` if the address was present.
    /// Already-issued transcripts keep their recorded issuer.
    pub fn remove(&mut self, issuer: &Address) -> bool {
        self.issuers.remove(issuer)
    }

    /// Returns `true` if `address` may issue transcripts.
    pub fn contains(&self, address: &Address) -> bool {
        self.issuers.contains(address)
    }

    /// Returns the number of authorized issuers.
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    /// Returns `true` if no issuer is authorized.
    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}
