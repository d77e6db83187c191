//! # Ledger Transfer Seam
//!
//! The registry never moves value itself. Issuance fees go through the
//! [`LedgerTransfer`] trait: an external, synchronous capability that
//! either moves the full amount atomically or fails. The issuance call
//! does not return until the transfer completes, and a failed transfer
//! aborts the whole issuance before any registry state changes.
//!
//! Two implementations ship with the crate:
//!
//! - [`RecordingLedger`] always succeeds and logs every transfer, so tests
//!   and the node can assert exactly which fees moved where.
//! - [`FailingLedger`] always fails, for exercising the abort path.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Address;

/// Errors produced by the external transfer capability.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    /// The sender's ledger balance cannot cover the amount.
    #[error("insufficient funds: {from} cannot cover {amount}")]
    InsufficientFunds {
        /// The debited party.
        from: Address,
        /// The amount that could not be covered.
        amount: u64,
    },

    /// The ledger rejected the transfer for a reason of its own.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// A single completed fee movement, as observed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Amount moved, in the ledger's smallest unit.
    pub amount: u64,
    /// Debited party (the issuer).
    pub from: Address,
    /// Credited party (the fee recipient).
    pub to: Address,
}

/// External, atomic value-movement capability invoked during issuance.
///
/// Implementations must be all-or-nothing: on `Ok(())` the full amount has
/// moved, on `Err` nothing has.
pub trait LedgerTransfer: Send + Sync {
    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the ledger cannot complete the
    /// movement. No partial transfer may remain.
    fn transfer(&self, amount: u64, from: &Address, to: &Address) -> Result<(), TransferError>;
}

/// An in-memory ledger that accepts every transfer and records it.
///
/// Interior mutability via a mutex so the registry can hold it behind a
/// shared reference; lock scope is a single push or read.
#[derive(Debug, Default)]
pub struct RecordingLedger {
    transfers: Mutex<Vec<TransferRecord>>,
}

impl RecordingLedger {
    /// Creates an empty recording ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every transfer performed so far, in order.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.lock().clone()
    }

    /// Returns the number of transfers performed so far.
    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().len()
    }
}

impl LedgerTransfer for RecordingLedger {
    fn transfer(&self, amount: u64, from: &Address, to: &Address) -> Result<(), TransferError> {
        self.transfers.lock().push(TransferRecord {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }
}

/// A ledger that rejects every transfer. Test-oriented, but usable anywhere
/// a "payments disabled" mode is needed.
#[derive(Debug, Default)]
pub struct FailingLedger;

impl LedgerTransfer for FailingLedger {
    fn transfer(&self, amount: u64, from: &Address, _to: &Address) -> Result<(), TransferError> {
        Err(TransferError::InsufficientFunds {
            from: from.clone(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_ledger_logs_in_order() {
        let ledger = RecordingLedger::new();
        ledger
            .transfer(500, &Address::from("I"), &Address::from("R"))
            .unwrap();
        ledger
            .transfer(1000, &Address::from("I"), &Address::from("R"))
            .unwrap();

        let log = ledger.transfers();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].amount, 500);
        assert_eq!(log[1].amount, 1000);
    }

    #[test]
    fn failing_ledger_rejects_everything() {
        let ledger = FailingLedger;
        let result = ledger.transfer(1, &Address::from("I"), &Address::from("R"));
        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds { amount: 1, .. })
        ));
    }
}
