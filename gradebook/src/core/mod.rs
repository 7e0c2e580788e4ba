//! Deterministic, pure logic for deriving grade views.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! rosters and return deterministic outputs suitable for tests.

pub mod aggregator;
pub mod coordinator;
pub mod error;
pub mod invariants;
pub mod memo;
pub mod ranker;
pub mod statistics;
pub mod types;
pub mod validator;
