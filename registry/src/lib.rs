// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Attesta Registry — Core Library
//!
//! An authenticated record store for academic transcripts. Authorized
//! issuers register transcripts against students, pay an issuance fee to a
//! configured recipient, and may later amend a bounded subset of fields
//! (GPA and course list — nothing else). Consumers look transcripts up by
//! identifier or by student, and can check an externally supplied content
//! hash against the stored one.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of the
//! registry, leaf-first:
//!
//! - **identity** — opaque principal addresses and transcript identifiers.
//! - **config** — field bounds and the process-wide registry configuration.
//! - **error** — one tagged failure kind per user-visible error. No partial
//!   state mutations, ever.
//! - **validator** — stateless field checks applied before any state change.
//! - **access** — the explicit allow-list of issuer identities.
//! - **ledger** — the external value-transfer seam. Issuance fees move
//!   through it atomically; if it fails, nothing else happens.
//! - **index** — append-only student → transcript-id index.
//! - **store** — the engine: monotonic id allocation, the transcript and
//!   update maps, and every public operation.
//! - **hashing** — canonical SHA-256 content hashing for transcript
//!   documents.
//!
//! ## Design Philosophy
//!
//! 1. Every mutating operation is all-or-nothing.
//! 2. Every rejection is a distinct, structured error.
//! 3. If it touches money, it has tests. Plural.

pub mod access;
pub mod config;
pub mod error;
pub mod hashing;
pub mod identity;
pub mod index;
pub mod ledger;
pub mod store;
pub mod transcript;
pub mod validator;

pub use error::RegistryError;
pub use identity::{Address, TranscriptId};
pub use store::TranscriptRegistry;
pub use transcript::{Transcript, TranscriptUpdate};
