//! Error taxonomy for roster mutations and roster construction.

use thiserror::Error;

use crate::roster::Subject;

/// Errors raised by core roster operations.
///
/// All of them are local to the call that produced them: the caller keeps its
/// last valid roster and derived views are never computed from a failed edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid subject '{0}' (expected korean, english or math)")]
    InvalidSubject(String),

    #[error("unknown student id {0}")]
    UnknownStudentId(u32),

    #[error("duplicate student id {0}")]
    DuplicateStudentId(u32),

    #[error("student {id}: {subject} score {value} out of range 0..=100")]
    ScoreOutOfRange { id: u32, subject: Subject, value: u8 },
}

impl EngineError {
    /// True for errors caused by a rejected edit command rather than corrupt data.
    pub fn is_rejected_edit(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidSubject(_) | EngineError::UnknownStudentId(_)
        )
    }
}
