//! Event scripts: JSON-lines recordings of host notifications.
//!
//! Each non-blank line that does not start with `#` is one event object,
//! checked against `schemas/event_script.schema.json` before it is parsed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::branch::RootBranches;
use crate::core::types::{ChangeListModifications, TcrSettings, TestName};
use crate::io::config::{AutoRevertConfig, Config};

const EVENT_SCRIPT_SCHEMA: &str = include_str!("../../schemas/event_script.schema.json");

/// One scripted host notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Replace the workspace fingerprint.
    Modified { units: BTreeMap<String, u64> },
    TestPassed { test: TestName },
    TestFailed { test: TestName },
    /// Manual commit attempt (pre-commit permission check).
    CommitAttempt,
    Committed {
        #[serde(default = "default_true")]
        all_changes: bool,
    },
    ForceCommit,
    Settings {
        #[serde(default)]
        tcr: TcrSettings,
        #[serde(default)]
        auto_revert: AutoRevertConfig,
    },
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },
    AutoRevertStart,
    AutoRevertStop,
    RolledBack,
    Branches { roots: Vec<RootBranches> },
}

fn default_true() -> bool {
    true
}

fn default_tick_count() -> u32 {
    1
}

impl ScriptEvent {
    pub fn modifications(units: &BTreeMap<String, u64>) -> ChangeListModifications {
        ChangeListModifications::new(units.clone())
    }

    /// Settings payload as a validated config snapshot.
    pub fn settings_config(tcr: &TcrSettings, auto_revert: &AutoRevertConfig) -> Result<Config> {
        let cfg = Config {
            tcr: tcr.clone(),
            auto_revert: *auto_revert,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Event plus the 1-indexed script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub event: ScriptEvent,
}

/// Load and validate an event script from disk.
pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read script {}", path.display()))?;
    let events =
        parse_script(&contents).with_context(|| format!("parse script {}", path.display()))?;
    debug!(path = %path.display(), events = events.len(), "event script loaded");
    Ok(events)
}

/// Parse event script text, validating every line against the schema.
pub fn parse_script(contents: &str) -> Result<Vec<ScriptLine>> {
    let validator = compile_schema()?;
    let mut events = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value: Value =
            serde_json::from_str(trimmed).with_context(|| format!("line {line}: parse json"))?;
        validate_line(&validator, &value).with_context(|| format!("line {line}"))?;
        let event: ScriptEvent = serde_json::from_value(value)
            .with_context(|| format!("line {line}: parse event"))?;
        events.push(ScriptLine { line, event });
    }
    Ok(events)
}

fn compile_schema() -> Result<Validator> {
    let schema: Value =
        serde_json::from_str(EVENT_SCRIPT_SCHEMA).context("parse event script schema")?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| anyhow!("compile event script schema: {err}"))
}

fn validate_line(validator: &Validator, instance: &Value) -> Result<()> {
    let messages: Vec<String> = validator
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TcrAction;

    #[test]
    fn parses_events_and_skips_comments() {
        let script = r#"
# setup
{"event":"modified","units":{"src/lib.rs":1}}
{"event":"test_passed","test":"adds"}

{"event":"committed"}
{"event":"tick","count":3}
"#;
        let events = parse_script(script).expect("parse");
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].line, 3);
        assert_eq!(
            events[1].event,
            ScriptEvent::TestPassed {
                test: TestName::new("adds")
            }
        );
        assert_eq!(events[2].event, ScriptEvent::Committed { all_changes: true });
        assert_eq!(events[3].event, ScriptEvent::Tick { count: 3 });
    }

    #[test]
    fn parses_settings_with_defaults() {
        let script =
            r#"{"event":"settings","tcr":{"enabled":true,"action_on_passed_test":"amend_commit"}}"#;
        let events = parse_script(script).expect("parse");
        let ScriptEvent::Settings { tcr, auto_revert } = &events[0].event else {
            panic!("expected settings event");
        };
        assert!(tcr.enabled);
        assert_eq!(tcr.action_on_passed_test, TcrAction::AmendCommit);
        assert_eq!(*auto_revert, AutoRevertConfig::default());
    }

    #[test]
    fn parses_branches() {
        let script =
            r#"{"event":"branches","roots":[{"current":"main","containing":["main","dev"]}]}"#;
        let events = parse_script(script).expect("parse");
        let ScriptEvent::Branches { roots } = &events[0].event else {
            panic!("expected branches event");
        };
        assert_eq!(roots[0].current, "main");
        assert_eq!(roots[0].containing.len(), 2);
    }

    #[test]
    fn rejects_unknown_event_with_line_number() {
        let script = "{\"event\":\"committed\"}\n{\"event\":\"explode\"}\n";
        let err = parse_script(script).expect_err("invalid");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_missing_test_name() {
        let err = parse_script(r#"{"event":"test_failed"}"#).expect_err("invalid");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn rejects_negative_counter() {
        assert!(parse_script(r#"{"event":"modified","units":{"a":-1}}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_script("{not json").expect_err("invalid");
        assert!(format!("{err:#}").contains("line 1: parse json"));
    }

    #[test]
    fn tick_count_is_bounded() {
        let events = parse_script(r#"{"event":"tick","count":86400}"#).expect("parse");
        assert_eq!(events[0].event, ScriptEvent::Tick { count: 86400 });

        for count in ["86401", "4294967295", "0"] {
            let line = format!(r#"{{"event":"tick","count":{count}}}"#);
            let err = parse_script(&line).expect_err("over limit");
            assert!(format!("{err:#}").contains("schema validation failed"), "{count}");
        }
    }

    #[test]
    fn rejects_misspelled_settings_key() {
        let err = parse_script(r#"{"event":"settings","tcr":{"enabeld":true}}"#)
            .expect_err("invalid");
        assert!(format!("{err:#}").contains("schema validation failed"));

        assert!(
            parse_script(r#"{"event":"settings","auto_revert":{"minutes":3}}"#).is_err()
        );
    }
}
