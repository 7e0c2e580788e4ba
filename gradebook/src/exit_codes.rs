//! Stable exit codes for gradebook CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid layout/config/snapshot or other errors.
pub const INVALID: i32 = 1;
/// `gradebook set`/`fill` rejected the edit (unknown subject or student id).
pub const REJECTED: i32 = 2;
