//! Per-student totals, averages and grades.

use crate::core::types::{Grade, ScoredStudent};
use crate::roster::{Roster, Student};

/// Aggregate every student's scores. Output order equals roster order.
pub fn derive_scores(roster: &Roster) -> Vec<ScoredStudent> {
    roster.students().iter().map(score_student).collect()
}

fn score_student(student: &Student) -> ScoredStudent {
    let total = u16::from(student.korean) + u16::from(student.english) + u16::from(student.math);
    // no rounding here; display precision is the renderer's job
    let average = f64::from(total) / 3.0;
    ScoredStudent {
        id: student.id,
        name: student.name.clone(),
        korean: student.korean,
        english: student.english,
        math: student.math,
        total,
        average,
        grade: Grade::from_average(average),
    }
}
