//! I/O helpers for tcr commands.

pub mod config;
pub mod events;
pub mod init;
pub mod script_host;
