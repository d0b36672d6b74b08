//! Replay helpers for `tcr replay` and `tcr validate`.
//!
//! Feeds an event script through a [`Session`] backed by a [`ScriptHost`] and
//! collects what the engines asked the host to do, tagged with the script line
//! that caused it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::host_request::HostRequest;
use crate::io::config::{Config, load_config};
use crate::io::events::{ScriptEvent, ScriptLine, load_script};
use crate::io::init::TcrPaths;
use crate::io::script_host::ScriptHost;
use crate::session::{EventOutcome, HostEvent, Session};

/// Options for `replay_script`.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Also report countdown display updates.
    pub countdown: bool,
}

/// One output record, printed as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayRecord {
    pub line: usize,
    #[serde(flatten)]
    pub entry: ReplayEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplayEntry {
    Request(HostRequest),
    /// Answer to a `commit_attempt` event.
    CommitCheck { commit_allowed: bool },
}

/// Replay `script` against a fresh session built from `config`.
#[instrument(skip_all, fields(events = script.len()))]
pub fn replay_script(
    config: &Config,
    script: &[ScriptLine],
    options: &ReplayOptions,
) -> Result<Vec<ReplayRecord>> {
    config.validate().context("invalid config")?;
    let mut session = Session::new(ScriptHost::new(), config);
    let mut records = Vec::new();

    for ScriptLine { line, event } in script {
        let line = *line;
        let outcome = apply_event(&mut session, event).with_context(|| format!("line {line}"))?;
        for request in session.host_mut().drain_requests() {
            if request.is_display() && !options.countdown {
                continue;
            }
            records.push(ReplayRecord {
                line,
                entry: ReplayEntry::Request(request),
            });
        }
        if let Some(EventOutcome::CommitChecked { allowed }) = outcome {
            records.push(ReplayRecord {
                line,
                entry: ReplayEntry::CommitCheck {
                    commit_allowed: allowed,
                },
            });
        }
    }

    debug!(records = records.len(), "replay finished");
    Ok(records)
}

/// Load config and script from disk, then replay.
///
/// `config_path` defaults to `.tcr/config.toml` under `root`.
pub fn replay_from_root(
    root: &Path,
    script_path: &Path,
    config_path: Option<&Path>,
    options: &ReplayOptions,
) -> Result<Vec<ReplayRecord>> {
    let config = load_workspace_config(root, config_path)?;
    let script = load_script(script_path)?;
    replay_script(&config, &script, options)
}

/// Check the workspace config and, if given, an event script.
///
/// Returns the number of script events checked.
pub fn validate_workspace(
    root: &Path,
    config_path: Option<&Path>,
    script_path: Option<&Path>,
) -> Result<usize> {
    load_workspace_config(root, config_path)?;
    match script_path {
        Some(path) => Ok(load_script(path)?.len()),
        None => Ok(0),
    }
}

fn load_workspace_config(root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let default_path = TcrPaths::new(root).config_path;
    let path = config_path.unwrap_or(&default_path);
    load_config(path).with_context(|| format!("load config {}", path.display()))
}

/// Apply one script event: host-side state first, then the session event.
///
/// Returns `None` for events that only change host state or repeat ticks.
fn apply_event(
    session: &mut Session<ScriptHost>,
    event: &ScriptEvent,
) -> Result<Option<EventOutcome>> {
    let outcome = match event {
        ScriptEvent::Modified { units } => {
            session
                .host_mut()
                .set_modifications(ScriptEvent::modifications(units));
            return Ok(None);
        }
        ScriptEvent::Branches { roots } => {
            session.host_mut().set_branches(roots.clone());
            return Ok(None);
        }
        ScriptEvent::Tick { count } => {
            for _ in 0..*count {
                session.handle(HostEvent::Tick);
            }
            return Ok(None);
        }
        ScriptEvent::TestPassed { test } => session.handle(HostEvent::TestPassed(test.clone())),
        ScriptEvent::TestFailed { test } => session.handle(HostEvent::TestFailed(test.clone())),
        ScriptEvent::CommitAttempt => session.handle(HostEvent::CommitAttempt),
        ScriptEvent::Committed { all_changes } => {
            let outcome = session.handle(HostEvent::Committed {
                all_changes: *all_changes,
            });
            if *all_changes {
                session.host_mut().clear_modifications();
            }
            outcome
        }
        ScriptEvent::ForceCommit => session.handle(HostEvent::ForceCommit),
        ScriptEvent::Settings { tcr, auto_revert } => {
            let config = ScriptEvent::settings_config(tcr, auto_revert)?;
            session.handle(HostEvent::SettingsChanged(config))
        }
        ScriptEvent::AutoRevertStart => session.handle(HostEvent::AutoRevertStart),
        ScriptEvent::AutoRevertStop => session.handle(HostEvent::AutoRevertStop),
        ScriptEvent::RolledBack => {
            session.host_mut().clear_modifications();
            session.handle(HostEvent::RolledBack)
        }
    };
    Ok(Some(outcome))
}
