//! Student roster data model.
//!
//! A [`Roster`] is an immutable-per-snapshot value: every mutation in
//! [`crate::core::validator`] returns a new roster instead of editing in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::invariants::validate_students;

/// Highest score a subject can hold.
pub const MAX_SCORE: u8 = 100;

/// The three scored subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Korean,
    English,
    Math,
}

impl Subject {
    /// All subjects in display order.
    pub const ALL: [Subject; 3] = [Subject::Korean, Subject::English, Subject::Math];

    /// Stable lowercase key, also used in the snapshot format.
    pub fn key(self) -> &'static str {
        match self {
            Subject::Korean => "korean",
            Subject::English => "english",
            Subject::Math => "math",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Subject {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "korean" => Ok(Subject::Korean),
            "english" => Ok(Subject::English),
            "math" => Ok(Subject::Math),
            _ => Err(EngineError::InvalidSubject(raw.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub korean: u8,
    pub english: u8,
    pub math: u8,
}

impl Student {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            korean: 0,
            english: 0,
            math: 0,
        }
    }

    pub fn score(&self, subject: Subject) -> u8 {
        match subject {
            Subject::Korean => self.korean,
            Subject::English => self.english,
            Subject::Math => self.math,
        }
    }

    /// Copy of this student with one subject replaced.
    pub fn with_score(&self, subject: Subject, score: u8) -> Self {
        let mut next = self.clone();
        match subject {
            Subject::Korean => next.korean = score,
            Subject::English => next.english = score,
            Subject::Math => next.math = score,
        }
        next
    }
}

/// Students ordered by id ascending, ids unique, scores within `0..=100`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<Student>", into = "Vec<Student>")]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    /// Build a roster, sorting by id and rejecting duplicate ids or
    /// out-of-range scores.
    pub fn new(mut students: Vec<Student>) -> Result<Self, EngineError> {
        students.sort_by_key(|student| student.id);
        validate_students(&students)?;
        Ok(Self { students })
    }

    /// Internal constructor for callers that already preserve the invariants.
    pub(crate) fn from_sorted(students: Vec<Student>) -> Self {
        debug_assert!(validate_students(&students).is_ok());
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: u32) -> Option<&Student> {
        self.students
            .binary_search_by_key(&id, |student| student.id)
            .ok()
            .map(|index| &self.students[index])
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Raw score series for one subject, in id order.
    pub fn scores(&self, subject: Subject) -> Vec<u8> {
        self.students
            .iter()
            .map(|student| student.score(subject))
            .collect()
    }
}

impl TryFrom<Vec<Student>> for Roster {
    type Error = EngineError;

    fn try_from(students: Vec<Student>) -> Result<Self, Self::Error> {
        Roster::new(students)
    }
}

impl From<Roster> for Vec<Student> {
    fn from(roster: Roster) -> Self {
        roster.students
    }
}

/// Roster used when no snapshot is available: ids `1..=size`, zero scores.
pub fn default_roster(size: usize, name_prefix: &str) -> Roster {
    let students = (1..=size as u32)
        .map(|id| Student::new(id, format!("{name_prefix}{id}")))
        .collect();
    Roster::from_sorted(students)
}
