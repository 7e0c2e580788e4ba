//! Competition ranking over student totals.

use crate::core::types::{DerivedStudent, ScoredStudent};

/// Assign competition ranks by total (descending) and return rows in id order.
///
/// Equal totals share a rank and the next distinct total takes its 1-based
/// position, so totals `[90, 90, 80]` rank as `[1, 1, 3]`.
pub fn assign_ranks(scored: Vec<ScoredStudent>) -> Vec<DerivedStudent> {
    let mut by_total = scored;
    // stable: equal totals keep their id order
    by_total.sort_by(|a, b| b.total.cmp(&a.total));

    let mut ranked: Vec<DerivedStudent> = Vec::with_capacity(by_total.len());
    for (position, student) in by_total.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.total == student.total => prev.rank,
            _ => position as u32 + 1,
        };
        ranked.push(DerivedStudent::from_scored(student, rank));
    }

    ranked.sort_by_key(|student| student.id);
    ranked
}

/// Order rows by rank ascending, then case-insensitive name, then exact name,
/// then id.
pub fn sorted_by_rank(ranked: &[DerivedStudent]) -> Vec<DerivedStudent> {
    let mut sorted = ranked.to_vec();
    sorted.sort_by_cached_key(|student| {
        (
            student.rank,
            student.name.to_lowercase(),
            student.name.clone(),
            student.id,
        )
    });
    sorted
}
