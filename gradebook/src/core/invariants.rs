//! Roster invariants enforced on construction and deserialization.

use std::collections::HashSet;

use crate::core::error::EngineError;
use crate::roster::{MAX_SCORE, Student, Subject};

/// Check roster invariants, failing on the first violation:
/// - No duplicate ids
/// - Every subject score within `0..=100`
pub fn validate_students(students: &[Student]) -> Result<(), EngineError> {
    match invariant_violations(students).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Collect every violation instead of stopping at the first one.
///
/// Used by `gradebook validate` to report all problems in a snapshot at once.
pub fn invariant_violations(students: &[Student]) -> Vec<EngineError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for student in students {
        if !seen.insert(student.id) {
            errors.push(EngineError::DuplicateStudentId(student.id));
        }
        for subject in Subject::ALL {
            let value = student.score(subject);
            if value > MAX_SCORE {
                errors.push(EngineError::ScoreOutOfRange {
                    id: student.id,
                    subject,
                    value,
                });
            }
        }
    }
    errors
}
