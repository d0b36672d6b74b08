//! Diagnostic tracing for tcr.
//!
//! `tcr replay` writes its host-request records to stdout, one JSON object per
//! line. Engine decisions and auto-revert timeouts are traced to stderr and
//! filtered by `RUST_LOG`; stdout is the same at every level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. Call once, before any command runs.
///
/// Uses `RUST_LOG` when set, otherwise `warn`.
///
/// # Example
/// ```bash
/// RUST_LOG=tcr::core=debug tcr replay .tcr/scripts/example.jsonl > requests.jsonl
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
