//! Roster error types.
//!
//! Rejected mark text is not an error (see [`MarkUpdate`](crate::mark::MarkUpdate));
//! these cover callers addressing entries that do not exist.

use thiserror::Error;

/// Errors returned by roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No subject at the given position.
    #[error("subject {index} out of range (roster has {len})")]
    SubjectOutOfRange { index: usize, len: usize },

    /// No mark at the given position within a subject.
    #[error("mark {index} out of range for subject {subject} (subject has {len})")]
    MarkOutOfRange {
        subject: usize,
        index: usize,
        len: usize,
    },
}
