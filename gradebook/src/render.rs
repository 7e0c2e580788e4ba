//! Plain-text rendering of derived views for the CLI.
//!
//! Averages and standard deviations are shown with two decimals; the derived
//! values themselves are never rounded.

use std::fmt::Write;

use crate::core::types::{DerivedStudent, DerivedView, StatisticsSnapshot};
use crate::roster::Subject;

/// Render the ranked roster, then the statistics.
///
/// `by_rank` switches the row order from id to rank (ties by name).
pub fn render_view(view: &DerivedView, by_rank: bool) -> String {
    let rows = if by_rank {
        view.sorted_by_rank()
    } else {
        view.ranked_roster.clone()
    };
    let mut out = render_table(&rows);
    out.push('\n');
    out.push_str(&render_statistics(&view.statistics()));
    out
}

pub fn render_table(rows: &[DerivedStudent]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<name_width$}  {:>6}  {:>7}  {:>4}  {:>5}  {:>7}  {:>5}  {:>4}",
        "ID", "Name", "Korean", "English", "Math", "Total", "Average", "Grade", "Rank"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:>6}  {:>7}  {:>4}  {:>5}  {:>7.2}  {:>5}  {:>4}",
            row.id,
            row.name,
            row.korean,
            row.english,
            row.math,
            row.total,
            row.average,
            row.grade.to_string(),
            row.rank
        );
    }
    out
}

pub fn render_statistics(stats: &StatisticsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Std dev of averages: {:.2}", stats.overall_std_dev);
    if let Some(subjects) = &stats.subject_stats {
        for subject in Subject::ALL {
            let entry = subjects.get(subject);
            let _ = writeln!(
                out,
                "{:<8} max {:>3}  min {:>3}  std dev {:.2}",
                subject.key(),
                entry.max,
                entry.min,
                entry.std_dev
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinator::DerivedViewCoordinator;
    use crate::core::statistics::PopulationStatistics;
    use crate::test_support::{roster_of, student};
    use std::sync::Arc;

    fn view(subjects: bool) -> DerivedView {
        let roster = roster_of(vec![
            student(1, "Bravo", 90, 90, 90),
            student(2, "Alpha", 90, 90, 90),
            student(3, "Charlie", 80, 80, 81),
        ]);
        DerivedViewCoordinator::new(Arc::new(PopulationStatistics))
            .with_subject_stats(subjects)
            .recompute(&roster)
    }

    #[test]
    fn table_rows_follow_requested_order() {
        let by_id = render_view(&view(false), false);
        let by_rank = render_view(&view(false), true);

        let first_row = |text: &str| text.lines().nth(1).map(str::to_string).expect("row");
        assert!(first_row(&by_id).contains("Bravo"));
        assert!(first_row(&by_rank).contains("Alpha"));
    }

    #[test]
    fn averages_render_with_two_decimals() {
        let text = render_view(&view(false), false);
        assert!(text.contains("80.33"));
        assert!(text.contains("Std dev of averages:"));
    }

    #[test]
    fn subject_lines_only_when_enabled() {
        assert!(!render_view(&view(false), false).contains("korean"));
        let text = render_view(&view(true), false);
        assert!(text.contains("korean   max  90  min  80"));
        assert!(text.contains("math"));
    }
}
