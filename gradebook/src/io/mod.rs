//! I/O helpers for gradebook sessions and commands.

pub mod config;
pub mod init;
pub mod snapshot_store;
pub mod stats_worker;
