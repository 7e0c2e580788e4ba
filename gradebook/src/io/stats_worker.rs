//! Background worker for the expensive statistics nodes.
//!
//! The edit path never waits on this worker. It hands over the newest roster
//! with a generation number and keeps going; the worker computes statistics
//! for whatever roster is newest when it becomes free.
//!
//! - The inbox holds at most one job. Submitting replaces a pending job, so a
//!   burst of edits costs one computation, not one per edit.
//! - A single thread means at most one computation is in flight.
//! - Results are published only if their generation is newer than the one
//!   already published.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::core::coordinator::DerivedViewCoordinator;
use crate::core::statistics::StatisticsEngine;
use crate::core::types::StatisticsSnapshot;
use crate::roster::Roster;

/// Statistics computed for a specific roster generation.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsUpdate {
    pub generation: u64,
    pub statistics: StatisticsSnapshot,
}

#[derive(Debug)]
struct Job {
    generation: u64,
    roster: Roster,
    subject_stats: bool,
}

#[derive(Debug, Default)]
struct Inbox {
    job: Option<Job>,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct Shared {
    inbox: Mutex<Inbox>,
    job_ready: Condvar,
    published: Mutex<Option<StatsUpdate>>,
    publish_ready: Condvar,
    superseded: AtomicU64,
}

#[derive(Debug)]
pub struct StatsWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl StatsWorker {
    pub fn spawn(engine: Arc<dyn StatisticsEngine>) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("gradebook-stats".to_string())
            .spawn(move || run_worker(&worker_shared, engine))
            .context("spawn statistics worker")?;
        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queue statistics for `roster`, replacing any job not yet started.
    pub fn submit(&self, generation: u64, roster: Roster, subject_stats: bool) {
        let job = Job {
            generation,
            roster,
            subject_stats,
        };
        let mut inbox = self.shared.inbox.lock();
        if let Some(previous) = inbox.job.replace(job) {
            debug!(
                superseded = previous.generation,
                generation, "dropping superseded stats job"
            );
            self.shared.superseded.fetch_add(1, Ordering::Relaxed);
        }
        self.shared.job_ready.notify_one();
    }

    /// Most recently published statistics, without blocking on computation.
    pub fn latest(&self) -> Option<StatsUpdate> {
        self.shared.published.lock().clone()
    }

    /// Block until statistics for `generation` (or newer) are published.
    ///
    /// Returns `None` if the timeout passes first.
    pub fn wait_for(&self, generation: u64, timeout: Duration) -> Option<StatsUpdate> {
        let deadline = Instant::now() + timeout;
        let mut published = self.shared.published.lock();
        loop {
            if let Some(update) = published.as_ref().filter(|u| u.generation >= generation) {
                return Some(update.clone());
            }
            if self
                .shared
                .publish_ready
                .wait_until(&mut published, deadline)
                .timed_out()
            {
                return published
                    .as_ref()
                    .filter(|u| u.generation >= generation)
                    .cloned();
            }
        }
    }

    /// Number of jobs replaced before the worker picked them up.
    pub fn superseded_jobs(&self) -> u64 {
        self.shared.superseded.load(Ordering::Relaxed)
    }
}

impl Drop for StatsWorker {
    fn drop(&mut self) {
        {
            let mut inbox = self.shared.inbox.lock();
            inbox.shutdown = true;
            self.shared.job_ready.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("statistics worker panicked");
            }
        }
    }
}

fn run_worker(shared: &Shared, engine: Arc<dyn StatisticsEngine>) {
    let mut coordinator = DerivedViewCoordinator::new(engine);
    while let Some(job) = next_job(shared) {
        debug!(generation = job.generation, "computing statistics");
        coordinator.set_subject_stats(job.subject_stats);
        let statistics = coordinator.statistics(&job.roster);

        let mut published = shared.published.lock();
        if published
            .as_ref()
            .is_some_and(|current| current.generation >= job.generation)
        {
            debug!(generation = job.generation, "discarding stale statistics");
            continue;
        }
        *published = Some(StatsUpdate {
            generation: job.generation,
            statistics,
        });
        shared.publish_ready.notify_all();
    }
    debug!("statistics worker stopped");
}

fn next_job(shared: &Shared) -> Option<Job> {
    let mut inbox = shared.inbox.lock();
    loop {
        if inbox.shutdown {
            return None;
        }
        if let Some(job) = inbox.job.take() {
            return Some(job);
        }
        shared.job_ready.wait(&mut inbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statistics::PopulationStatistics;
    use crate::test_support::{CountingStatistics, SlowStatistics, roster_with_totals};

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn publishes_statistics_for_submitted_generation() {
        let worker = StatsWorker::spawn(Arc::new(PopulationStatistics)).expect("spawn");
        worker.submit(1, roster_with_totals(&[300, 0]), false);

        let update = worker.wait_for(1, WAIT).expect("published");
        assert_eq!(update.generation, 1);
        assert_eq!(update.statistics.overall_std_dev, 50.0);
        assert!(update.statistics.subject_stats.is_none());
    }

    #[test]
    fn burst_of_submissions_converges_on_latest() {
        let engine = Arc::new(SlowStatistics::new(Duration::from_millis(50)));
        let worker = StatsWorker::spawn(engine.clone()).expect("spawn");

        for generation in 1..=20u64 {
            let total = (generation * 15).min(300) as u16;
            worker.submit(generation, roster_with_totals(&[total, 0]), false);
        }

        let update = worker.wait_for(20, WAIT).expect("published");
        assert_eq!(update.generation, 20);
        assert_eq!(update.statistics.overall_std_dev, 50.0);
        // superseded jobs were dropped rather than computed
        assert!(engine.calls() < 20);
        assert!(worker.superseded_jobs() > 0);
    }

    #[test]
    fn repeated_input_is_not_recomputed() {
        let engine = Arc::new(CountingStatistics::default());
        let worker = StatsWorker::spawn(engine.clone()).expect("spawn");
        let roster = roster_with_totals(&[90, 60, 30]);

        worker.submit(1, roster.clone(), false);
        worker.wait_for(1, WAIT).expect("first");
        worker.submit(2, roster, false);
        let update = worker.wait_for(2, WAIT).expect("second");

        assert_eq!(update.generation, 2);
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn stale_generation_never_overwrites_newer_result() {
        let worker = StatsWorker::spawn(Arc::new(PopulationStatistics)).expect("spawn");
        worker.submit(5, roster_with_totals(&[300, 0]), false);
        worker.wait_for(5, WAIT).expect("published");

        worker.submit(3, roster_with_totals(&[0, 0]), false);
        worker.submit(6, roster_with_totals(&[150, 150]), false);
        let update = worker.wait_for(6, WAIT).expect("published");

        assert_eq!(update.generation, 6);
        assert_eq!(update.statistics.overall_std_dev, 0.0);
        assert_eq!(worker.latest().map(|u| u.generation), Some(6));
    }

    #[test]
    fn wait_for_times_out_without_submission() {
        let worker = StatsWorker::spawn(Arc::new(PopulationStatistics)).expect("spawn");
        assert!(worker.wait_for(1, Duration::from_millis(20)).is_none());
        assert!(worker.latest().is_none());
    }
}
