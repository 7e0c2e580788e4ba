//! Derived-statistics engine for a student grade roster.
//!
//! Raw per-subject scores go in; totals, averages, letter grades, competition
//! ranks and standard deviations come out, recomputed only where inputs
//! changed. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (validation, aggregation, ranking,
//!   statistics, memoized coordination). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (snapshot files, config, the
//!   background statistics thread).
//!
//! [`session`] coordinates core logic with I/O; [`render`] and [`validate`]
//! back the `gradebook` CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod render;
pub mod roster;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
