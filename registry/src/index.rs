//! # Student Index
//!
//! Maps each student to the ordered sequence of transcript identifiers
//! issued to them. Entries are created lazily on first issuance and only
//! ever appended to — the order is issuance order, duplicates of the same
//! student simply accumulate, and nothing here ever shrinks.

use std::collections::HashMap;

use crate::identity::{Address, TranscriptId};

/// Append-only index from student identity to issued transcript ids.
#[derive(Debug, Clone, Default)]
pub struct StudentIndex {
    by_student: HashMap<Address, Vec<TranscriptId>>,
}

impl StudentIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the student's sequence, creating it on first use.
    pub fn record(&mut self, student: &Address, id: TranscriptId) {
        self.by_student.entry(student.clone()).or_default().push(id);
    }

    /// Returns the student's transcript ids in issuance order.
    ///
    /// A student with no transcripts gets the empty slice — absence is a
    /// valid result here, never an error.
    pub fn transcripts_for(&self, student: &Address) -> &[TranscriptId] {
        self.by_student
            .get(student)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the number of students with at least one transcript.
    pub fn student_count(&self) -> usize {
        self.by_student.len()
    }
}
