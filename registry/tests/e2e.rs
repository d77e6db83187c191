//! End-to-end integration tests for the Attesta registry.
//!
//! These tests exercise the full issuance lifecycle from configuration
//! through issuance, amendment, and verification. They prove that the
//! registry's components compose correctly: fee configuration, issuer
//! authorization, input validation, the ledger-transfer seam, identifier
//! allocation, and the student index.
//!
//! Each test builds its own registry and ledger. No shared state, no test
//! ordering dependencies, no flaky failures.

use std::sync::Arc;

use attesta_registry::access::IssuerSet;
use attesta_registry::config::RegistryConfig;
use attesta_registry::hashing::content_hash;
use attesta_registry::ledger::{LedgerTransfer, RecordingLedger, TransferRecord};
use attesta_registry::transcript::IssueRequest;
use attesta_registry::{Address, RegistryError, TranscriptRegistry};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A fresh registry with one authorized issuer, no fee recipient yet, and
/// a recording ledger the test keeps a handle to.
fn setup() -> (TranscriptRegistry, Arc<RecordingLedger>) {
    let ledger = Arc::new(RecordingLedger::new());
    let registry = TranscriptRegistry::new(
        RegistryConfig::default(),
        IssuerSet::with_issuers([Address::from("I")]),
        Arc::clone(&ledger) as Arc<dyn LedgerTransfer>,
    );
    (registry, ledger)
}

/// A well-formed issuance request for student `s`, hashing a small document
/// so the content hash is a genuine SHA-256 digest.
fn request_for(s: &str) -> IssueRequest {
    IssueRequest {
        student: Address::from(s),
        hash: content_hash(format!("transcript document for {}", s).as_bytes()).to_vec(),
        gpa: 350,
        courses: vec!["Algorithms".into(), "Linear Algebra".into()],
        degree: "Bachelor of Science".into(),
        major: "Computer Science".into(),
        institution: "University of Example".into(),
        graduation_date: 20230601,
        credits: 120,
        location: "Example City".into(),
    }
}

// ---------------------------------------------------------------------------
// 1. Full Issuance Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_issuance_lifecycle() {
    let (mut registry, ledger) = setup();

    // Configure recipient "R" with the default fee of 500.
    registry.set_fee_recipient(Address::from("R")).unwrap();

    // Issuer "I" issues a transcript for student "S".
    let req = request_for("S");
    let expected_hash = req.hash.clone();
    let id = registry.issue(req, &Address::from("I"), 10).unwrap();
    assert_eq!(id, 0);
    assert_eq!(registry.count(), 1);

    // Exactly one transfer {500, I, R}.
    assert_eq!(
        ledger.transfers(),
        vec![TransferRecord {
            amount: 500,
            from: Address::from("I"),
            to: Address::from("R"),
        }]
    );

    // Raise the fee and issue again: id 1, transfer {1000, I, R}.
    registry.set_issuance_fee(1000).unwrap();
    let id = registry.issue(request_for("S"), &Address::from("I"), 11).unwrap();
    assert_eq!(id, 1);
    assert_eq!(registry.count(), 2);

    let log = ledger.transfers();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].amount, 1000);
    assert_eq!(log[1].from, Address::from("I"));
    assert_eq!(log[1].to, Address::from("R"));

    // The student's index lists both, in issuance order.
    assert_eq!(registry.transcripts_for_student(&Address::from("S")), &[0, 1]);

    // The stored hash verifies byte-for-byte; a perturbed one does not.
    assert!(registry.verify_hash(0, &expected_hash).unwrap());
    let mut wrong = expected_hash.clone();
    wrong[0] ^= 0xFF;
    assert!(!registry.verify_hash(0, &wrong).unwrap());
}

// ---------------------------------------------------------------------------
// 2. Configuration Ordering
// ---------------------------------------------------------------------------

#[test]
fn nothing_works_before_configuration() {
    let (mut registry, ledger) = setup();

    // Issuance with perfectly valid inputs still fails while unconfigured.
    let result = registry.issue(request_for("S"), &Address::from("I"), 0);
    assert!(matches!(result, Err(RegistryError::NotConfigured)));

    // So does changing the fee.
    assert!(matches!(
        registry.set_issuance_fee(1000),
        Err(RegistryError::NotConfigured)
    ));

    assert_eq!(registry.count(), 0);
    assert_eq!(ledger.transfer_count(), 0);

    // Configuration is one-shot.
    registry.set_fee_recipient(Address::from("R")).unwrap();
    assert!(matches!(
        registry.set_fee_recipient(Address::from("R2")),
        Err(RegistryError::AlreadyConfigured)
    ));
}

// ---------------------------------------------------------------------------
// 3. Amendment Semantics
// ---------------------------------------------------------------------------

#[test]
fn amendment_is_issuer_only_and_bounded() {
    let (mut registry, _ledger) = setup();
    registry.set_fee_recipient(Address::from("R")).unwrap();
    let id = registry.issue(request_for("S"), &Address::from("I"), 5).unwrap();

    // A stranger cannot amend.
    let result = registry.update(id, 300, vec![], &Address::from("EVE"), 6);
    assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));
    assert_eq!(registry.get(id).unwrap().gpa, 350);

    // The issuer can, and only GPA/courses/timestamp move.
    registry
        .update(id, 399, vec!["Compilers".into()], &Address::from("I"), 9)
        .unwrap();
    let t = registry.get(id).unwrap();
    assert_eq!(t.gpa, 399);
    assert_eq!(t.courses, vec!["Compilers"]);
    assert_eq!(t.timestamp, 9);
    assert_eq!(t.degree, "Bachelor of Science");
    assert_eq!(t.graduation_date, 20230601);

    // The single amendment record reflects the latest change.
    let update = registry.latest_update(id).unwrap();
    assert_eq!(update.gpa, 399);
    assert_eq!(update.updater, Address::from("I"));
}

// ---------------------------------------------------------------------------
// 4. Multiple Students, Multiple Issuers
// ---------------------------------------------------------------------------

#[test]
fn indexes_stay_per_student_across_issuers() {
    let (mut registry, _ledger) = setup();
    registry.set_fee_recipient(Address::from("R")).unwrap();
    registry.add_issuer(Address::from("I2"));

    let a0 = registry.issue(request_for("A"), &Address::from("I"), 0).unwrap();
    let b0 = registry.issue(request_for("B"), &Address::from("I2"), 1).unwrap();
    let a1 = registry.issue(request_for("A"), &Address::from("I2"), 2).unwrap();

    assert_eq!(registry.transcripts_for_student(&Address::from("A")), &[a0, a1]);
    assert_eq!(registry.transcripts_for_student(&Address::from("B")), &[b0]);
    assert!(registry
        .transcripts_for_student(&Address::from("C"))
        .is_empty());

    // Each transcript is amendable by its own issuer only.
    assert!(registry
        .update(a1, 111, vec![], &Address::from("I"), 3)
        .is_err());
    assert!(registry
        .update(a1, 111, vec![], &Address::from("I2"), 3)
        .is_ok());
}
