//! Orchestration for a gradebook session.
//!
//! A [`Gradebook`] owns the current roster and is its only writer. Every
//! committed edit replaces the roster value, bumps the generation, saves a
//! snapshot and (in background mode) hands the new roster to the statistics
//! worker. Rejected edits leave all of that untouched.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::coordinator::{DerivedViewCoordinator, MemoStats};
use crate::core::error::EngineError;
use crate::core::statistics::{PopulationStatistics, StatisticsEngine};
use crate::core::types::{DerivedStudent, DerivedView, StatisticsSnapshot};
use crate::core::validator::{FillTarget, fill_random, update_score};
use crate::io::config::GradebookConfig;
use crate::io::snapshot_store::SnapshotStore;
use crate::io::stats_worker::StatsWorker;
use crate::roster::{Roster, default_roster};

/// Upper bound on how long [`Gradebook::view`] waits for the worker.
const VIEW_STATS_TIMEOUT: Duration = Duration::from_secs(30);

/// View that never waits on the expensive statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveView {
    /// Ranked students in id order, always reflecting the latest edit.
    pub ranked_roster: Vec<DerivedStudent>,
    /// Latest published statistics, possibly for an older roster.
    pub statistics: Option<StatisticsSnapshot>,
    /// True when `statistics` were computed from the current roster.
    pub stats_current: bool,
}

pub struct Gradebook<S: SnapshotStore> {
    store: S,
    roster: Roster,
    generation: u64,
    subject_stats: bool,
    coordinator: DerivedViewCoordinator,
    worker: Option<StatsWorker>,
}

impl<S: SnapshotStore> Gradebook<S> {
    pub fn open(store: S, config: &GradebookConfig) -> Result<Self> {
        Self::open_with_engine(store, config, Arc::new(PopulationStatistics))
    }

    /// Open a session, restoring the roster from `store` when possible.
    ///
    /// A missing or unreadable snapshot falls back to the default roster.
    pub fn open_with_engine(
        store: S,
        config: &GradebookConfig,
        engine: Arc<dyn StatisticsEngine>,
    ) -> Result<Self> {
        config.validate()?;
        let roster = match store.load() {
            Ok(Some(roster)) => roster,
            Ok(None) => {
                debug!("no snapshot, using default roster");
                default_roster(config.default_roster_size, &config.name_prefix)
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "snapshot load failed, using default roster");
                default_roster(config.default_roster_size, &config.name_prefix)
            }
        };

        let worker = if config.background_stats {
            Some(StatsWorker::spawn(Arc::clone(&engine))?)
        } else {
            None
        };
        let coordinator =
            DerivedViewCoordinator::new(engine).with_subject_stats(config.subject_stats);

        let session = Self {
            store,
            roster,
            generation: 0,
            subject_stats: config.subject_stats,
            coordinator,
            worker,
        };
        session.submit_statistics();
        info!(
            students = session.roster.len(),
            background = session.worker.is_some(),
            "gradebook session opened"
        );
        Ok(session)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of committed changes since the session opened.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply a raw score edit. See [`update_score`] for coercion rules.
    pub fn update_score(&mut self, id: u32, subject: &str, raw: &str) -> Result<(), EngineError> {
        match update_score(&self.roster, id, subject, raw) {
            Ok(next) => {
                self.commit(next);
                Ok(())
            }
            Err(err) => {
                info!(id, subject, %err, "score edit rejected");
                Err(err)
            }
        }
    }

    pub fn fill_random<R: Rng + ?Sized>(&mut self, target: FillTarget, rng: &mut R) {
        let next = fill_random(&self.roster, target, rng);
        self.commit(next);
    }

    pub fn set_subject_stats(&mut self, enabled: bool) {
        if self.subject_stats == enabled {
            return;
        }
        self.subject_stats = enabled;
        self.coordinator.set_subject_stats(enabled);
        // the published statistics no longer match the requested shape
        self.generation += 1;
        self.submit_statistics();
    }

    /// Full derived view.
    ///
    /// Inline mode computes stale statistics on the caller's thread. With a
    /// background worker the statistics come from the worker's snapshot for the
    /// current generation; the session never computes them a second time.
    pub fn view(&mut self) -> DerivedView {
        let Some(worker) = &self.worker else {
            return self.coordinator.recompute(&self.roster);
        };
        let generation = self.generation;
        let published = worker
            .wait_for(generation, VIEW_STATS_TIMEOUT)
            .filter(|update| update.generation == generation);
        let statistics = match published {
            Some(update) => update.statistics,
            None => {
                warn!(generation, "statistics worker fell behind, computing inline");
                self.coordinator.statistics(&self.roster)
            }
        };
        DerivedView {
            ranked_roster: self.coordinator.ranked(&self.roster).to_vec(),
            overall_std_dev: statistics.overall_std_dev,
            subject_stats: statistics.subject_stats,
        }
    }

    /// Cheap values now; statistics from the worker if it has caught up.
    ///
    /// Without a background worker the statistics are computed inline and
    /// always current.
    pub fn live_view(&mut self) -> LiveView {
        let ranked_roster = self.coordinator.ranked(&self.roster).to_vec();
        match &self.worker {
            Some(worker) => {
                let latest = worker.latest();
                let stats_current = latest
                    .as_ref()
                    .is_some_and(|update| update.generation == self.generation);
                LiveView {
                    ranked_roster,
                    statistics: latest.map(|update| update.statistics),
                    stats_current,
                }
            }
            None => LiveView {
                ranked_roster,
                statistics: Some(self.coordinator.statistics(&self.roster)),
                stats_current: true,
            },
        }
    }

    /// Block until statistics for the current roster are available.
    pub fn wait_for_statistics(&mut self, timeout: Duration) -> Option<StatisticsSnapshot> {
        match &self.worker {
            Some(worker) => worker
                .wait_for(self.generation, timeout)
                .filter(|update| update.generation == self.generation)
                .map(|update| update.statistics),
            None => Some(self.coordinator.statistics(&self.roster)),
        }
    }

    pub fn memo_stats(&self) -> MemoStats {
        self.coordinator.memo_stats()
    }

    fn commit(&mut self, roster: Roster) {
        self.roster = roster;
        self.generation += 1;
        debug!(generation = self.generation, "roster committed");
        if let Err(err) = self.store.save(&self.roster) {
            warn!(error = %format!("{err:#}"), "snapshot save failed");
        }
        self.submit_statistics();
    }

    fn submit_statistics(&self) {
        if let Some(worker) = &self.worker {
            worker.submit(self.generation, self.roster.clone(), self.subject_stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::snapshot_store::MemoryStore;
    use crate::test_support::{CountingStatistics, roster_of, student};

    fn inline_config() -> GradebookConfig {
        GradebookConfig::default()
    }

    #[test]
    fn open_without_snapshot_uses_default_roster() {
        let session = Gradebook::open(MemoryStore::new(), &inline_config()).expect("open");
        assert_eq!(session.roster(), &default_roster(5, "Student"));
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn open_with_corrupt_snapshot_falls_back_to_default() {
        let store = MemoryStore::with_contents("{not json");
        let session = Gradebook::open(store, &inline_config()).expect("open");
        assert_eq!(session.roster().len(), 5);
    }

    #[test]
    fn committed_edit_is_saved_and_ranked() {
        let mut session = Gradebook::open(MemoryStore::new(), &inline_config()).expect("open");
        session.update_score(3, "korean", "100").expect("edit");

        assert_eq!(session.generation(), 1);
        assert_eq!(session.store().save_count(), 1);
        let view = session.view();
        assert_eq!(view.ranked_roster[2].rank, 1);
        assert_eq!(view.ranked_roster[0].rank, 2);
    }

    #[test]
    fn rejected_edit_changes_nothing() {
        let mut session = Gradebook::open(MemoryStore::new(), &inline_config()).expect("open");
        let before = session.roster().clone();

        let err = session.update_score(99, "math", "50").unwrap_err();
        assert_eq!(err, EngineError::UnknownStudentId(99));
        let err = session.update_score(1, "music", "50").unwrap_err();
        assert!(err.is_rejected_edit());

        assert_eq!(session.roster(), &before);
        assert_eq!(session.generation(), 0);
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn toggling_subject_stats_only_adds_subject_node() {
        let counter = Arc::new(CountingStatistics::default());
        let roster = roster_of(vec![student(1, "a", 10, 20, 30)]);
        let store = MemoryStore::with_roster(&roster).expect("store");
        let mut session =
            Gradebook::open_with_engine(store, &inline_config(), counter.clone()).expect("open");

        session.view();
        assert_eq!(counter.calls(), 1);
        session.set_subject_stats(true);
        let view = session.view();

        assert!(view.subject_stats.is_some());
        assert_eq!(counter.calls(), 4);
        assert_eq!(session.memo_stats().overall_std_dev, 1);
    }

    #[test]
    fn inline_live_view_is_always_current() {
        let mut session = Gradebook::open(MemoryStore::new(), &inline_config()).expect("open");
        session.update_score(1, "math", "90").expect("edit");
        let live = session.live_view();
        assert!(live.stats_current);
        assert_eq!(
            live.statistics.map(|s| s.overall_std_dev),
            Some(session.view().overall_std_dev)
        );
    }
}
