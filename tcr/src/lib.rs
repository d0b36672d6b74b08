//! Test && Commit || Revert policy engines.
//!
//! A session pairs two engines with the host adapter that serves them:
//!
//! - **[`core`]**: Pure policy logic (TCR decisions, auto-revert countdown,
//!   revert exemptions, branch witness). No I/O; engines talk to the host only
//!   through the `TcrHost` and `AutoRevertHost` traits.
//! - **[`io`]**: Side-effecting pieces (config file, event scripts, `.tcr/`
//!   scaffolding) plus the scripted reference host.
//!
//! [`session`] routes host notifications to the engines, and [`replay`]
//! drives a session from an event script for the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod replay;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
