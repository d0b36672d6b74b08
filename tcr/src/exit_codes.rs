//! Stable exit codes for tcr CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, script, layout or other errors.
pub const INVALID: i32 = 1;
