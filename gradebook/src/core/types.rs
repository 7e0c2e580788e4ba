//! Derived, read-only projections of a roster.
//!
//! These types are outputs only: they are recomputed from a [`Roster`] and
//! never fed back into it.
//!
//! [`Roster`]: crate::roster::Roster

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ranker::sorted_by_rank;
use crate::roster::Subject;

/// Letter grade derived from a student's average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Bands are inclusive on their lower bound, checked top-down.
    pub fn from_average(average: f64) -> Self {
        if average >= 90.0 {
            Grade::A
        } else if average >= 80.0 {
            Grade::B
        } else if average >= 70.0 {
            Grade::C
        } else if average >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Student with aggregate scores but no rank yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStudent {
    pub id: u32,
    pub name: String,
    pub korean: u8,
    pub english: u8,
    pub math: u8,
    pub total: u16,
    pub average: f64,
    pub grade: Grade,
}

/// Fully derived student row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStudent {
    pub id: u32,
    pub name: String,
    pub korean: u8,
    pub english: u8,
    pub math: u8,
    pub total: u16,
    pub average: f64,
    pub grade: Grade,
    /// Competition rank: ties share a rank, the next distinct total skips ahead.
    pub rank: u32,
}

impl DerivedStudent {
    pub fn from_scored(scored: ScoredStudent, rank: u32) -> Self {
        Self {
            id: scored.id,
            name: scored.name,
            korean: scored.korean,
            english: scored.english,
            math: scored.math,
            total: scored.total,
            average: scored.average,
            grade: scored.grade,
            rank,
        }
    }
}

/// Min, max and population standard deviation of one subject's raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectStats {
    pub min: u8,
    pub max: u8,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectStatsSet {
    pub korean: SubjectStats,
    pub english: SubjectStats,
    pub math: SubjectStats,
}

impl SubjectStatsSet {
    pub fn get(&self, subject: Subject) -> &SubjectStats {
        match subject {
            Subject::Korean => &self.korean,
            Subject::English => &self.english,
            Subject::Math => &self.math,
        }
    }
}

/// Output of the expensive statistics nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    /// Population standard deviation of the students' averages.
    pub overall_std_dev: f64,
    pub subject_stats: Option<SubjectStatsSet>,
}

/// Everything the presentation layer needs for one roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    /// Ranked students in id order.
    pub ranked_roster: Vec<DerivedStudent>,
    pub overall_std_dev: f64,
    pub subject_stats: Option<SubjectStatsSet>,
}

impl DerivedView {
    /// Students ordered by rank, ties broken by name.
    pub fn sorted_by_rank(&self) -> Vec<DerivedStudent> {
        sorted_by_rank(&self.ranked_roster)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            overall_std_dev: self.overall_std_dev,
            subject_stats: self.subject_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_are_inclusive_on_lower_bound() {
        assert_eq!(Grade::from_average(100.0), Grade::A);
        assert_eq!(Grade::from_average(90.0), Grade::A);
        assert_eq!(Grade::from_average(89.999), Grade::B);
        assert_eq!(Grade::from_average(80.0), Grade::B);
        assert_eq!(Grade::from_average(70.0), Grade::C);
        assert_eq!(Grade::from_average(60.0), Grade::D);
        assert_eq!(Grade::from_average(59.999), Grade::F);
        assert_eq!(Grade::from_average(0.0), Grade::F);
    }
}
