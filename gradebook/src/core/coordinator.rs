//! Memoized dependency graph from a roster to its derived view.
//!
//! ```text
//! roster ──► ranked roster ──► averages ──► overall std dev
//!    └──────────────────────────────────► subject stats (optional)
//! ```
//!
//! Each arrow target is a [`Memo`] node keyed by exactly the input it reads,
//! so the expensive nodes only run when their own inputs change.

use std::sync::Arc;

use tracing::debug;

use crate::core::aggregator::derive_scores;
use crate::core::memo::{Memo, SeriesKey};
use crate::core::ranker::assign_ranks;
use crate::core::statistics::{StatisticsEngine, subject_stats_set};
use crate::core::types::{DerivedStudent, DerivedView, StatisticsSnapshot, SubjectStatsSet};
use crate::roster::Roster;

/// How many times each node actually computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub ranked: u64,
    pub overall_std_dev: u64,
    pub subject_stats: u64,
}

#[derive(Debug)]
pub struct DerivedViewCoordinator {
    engine: Arc<dyn StatisticsEngine>,
    subject_stats_enabled: bool,
    ranked: Memo<Roster, Vec<DerivedStudent>>,
    overall: Memo<SeriesKey, f64>,
    subjects: Memo<Roster, SubjectStatsSet>,
}

impl DerivedViewCoordinator {
    pub fn new(engine: Arc<dyn StatisticsEngine>) -> Self {
        Self {
            engine,
            subject_stats_enabled: false,
            ranked: Memo::new("ranked_roster"),
            overall: Memo::new("overall_std_dev"),
            subjects: Memo::new("subject_stats"),
        }
    }

    pub fn with_subject_stats(mut self, enabled: bool) -> Self {
        self.subject_stats_enabled = enabled;
        self
    }

    /// Toggle the per-subject node. Disabling keeps its cache for re-enabling.
    pub fn set_subject_stats(&mut self, enabled: bool) {
        self.subject_stats_enabled = enabled;
    }

    pub fn subject_stats_enabled(&self) -> bool {
        self.subject_stats_enabled
    }

    /// Cheap node only: ranked students in id order.
    pub fn ranked(&mut self, roster: &Roster) -> &[DerivedStudent] {
        self.ranked
            .get_or_compute(roster.clone(), |roster| assign_ranks(derive_scores(roster)))
    }

    /// Expensive nodes: overall and (if enabled) per-subject statistics.
    pub fn statistics(&mut self, roster: &Roster) -> StatisticsSnapshot {
        let averages: Vec<f64> = self.ranked(roster).iter().map(|s| s.average).collect();
        let engine = &self.engine;

        let overall_std_dev = *self
            .overall
            .get_or_compute(SeriesKey::new(&averages), |key| {
                debug!(students = averages.len(), "computing overall std dev");
                engine.standard_deviation(&key.values())
            });

        let subject_stats = if self.subject_stats_enabled {
            Some(*self.subjects.get_or_compute(roster.clone(), |roster| {
                debug!(students = roster.len(), "computing subject stats");
                subject_stats_set(roster, engine.as_ref())
            }))
        } else {
            None
        };

        StatisticsSnapshot {
            overall_std_dev,
            subject_stats,
        }
    }

    /// Full derived view. Unchanged inputs are served from the memo nodes.
    pub fn recompute(&mut self, roster: &Roster) -> DerivedView {
        let statistics = self.statistics(roster);
        DerivedView {
            ranked_roster: self.ranked(roster).to_vec(),
            overall_std_dev: statistics.overall_std_dev,
            subject_stats: statistics.subject_stats,
        }
    }

    pub fn memo_stats(&self) -> MemoStats {
        MemoStats {
            ranked: self.ranked.computations(),
            overall_std_dev: self.overall.computations(),
            subject_stats: self.subjects.computations(),
        }
    }
}
