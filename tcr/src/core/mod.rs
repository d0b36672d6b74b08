//! Deterministic policy logic.
//!
//! Core modules are free of I/O side effects. Engines receive the host as a
//! parameter on every call and never hold on to it.

pub mod auto_revert;
pub mod branch;
pub mod exemptions;
pub mod host_request;
pub mod tcr;
pub mod types;
