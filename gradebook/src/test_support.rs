//! Test-only helpers for constructing rosters and instrumented statistics engines.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::statistics::{StatisticsEngine, standard_deviation};
use crate::roster::{Roster, Student};

/// Create a student with explicit scores.
pub fn student(id: u32, name: &str, korean: u8, english: u8, math: u8) -> Student {
    Student {
        id,
        name: name.to_string(),
        korean,
        english,
        math,
    }
}

/// Build a roster, panicking on invariant violations.
pub fn roster_of(students: Vec<Student>) -> Roster {
    Roster::new(students).expect("valid test roster")
}

/// Roster whose students have the given totals, split as evenly as possible.
pub fn roster_with_totals(totals: &[u16]) -> Roster {
    let students = totals
        .iter()
        .enumerate()
        .map(|(index, total)| {
            let base = (total / 3) as u8;
            let extra = (total % 3) as u8;
            let id = index as u32 + 1;
            student(
                id,
                &format!("S{id}"),
                base + u8::from(extra > 0),
                base + u8::from(extra > 1),
                base,
            )
        })
        .collect();
    roster_of(students)
}

/// Statistics engine that counts how often it is invoked.
#[derive(Debug, Default)]
pub struct CountingStatistics {
    calls: AtomicUsize,
}

impl CountingStatistics {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatisticsEngine for CountingStatistics {
    fn standard_deviation(&self, series: &[f64]) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        standard_deviation(series)
    }
}

/// Statistics engine that sleeps before computing, standing in for a costly backend.
#[derive(Debug)]
pub struct SlowStatistics {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowStatistics {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatisticsEngine for SlowStatistics {
    fn standard_deviation(&self, series: &[f64]) -> f64 {
        std::thread::sleep(self.delay);
        self.calls.fetch_add(1, Ordering::SeqCst);
        standard_deviation(series)
    }
}
