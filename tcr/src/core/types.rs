//! Shared value types for the TCR and auto-revert engines.
//!
//! These types are immutable snapshots handed between the host and the
//! engines. They carry no I/O and compare by value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fingerprint of the uncommitted working set.
///
/// Maps each tracked unit (usually a file path) to its modification counter.
/// Two fingerprints are equal only if they track the same units with the same
/// counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeListModifications(BTreeMap<String, u64>);

impl ChangeListModifications {
    pub fn new(units: BTreeMap<String, u64>) -> Self {
        Self(units)
    }

    /// True if nothing is modified (nothing to commit).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(unit, count)| (unit.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ChangeListModifications {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(unit, count)| (unit.into(), count))
                .collect(),
        )
    }
}

/// Identifier of an executed unit test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestName(String);

impl TestName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What the host should do once a unit test passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TcrAction {
    #[default]
    OpenCommitDialog,
    Commit,
    AmendCommit,
    CommitAndPush,
}

/// Configuration snapshot for the TCR engine.
///
/// Replaced wholesale on every settings update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TcrSettings {
    pub enabled: bool,
    pub notify_on_revert: bool,
    pub action_on_passed_test: TcrAction,
    /// Ask the host to leave test sources alone when reverting.
    pub do_not_revert_tests: bool,
    /// Glob patterns of paths the host must not revert.
    pub do_not_revert_files: BTreeSet<String>,
}

impl Default for TcrSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_on_revert: true,
            action_on_passed_test: TcrAction::OpenCommitDialog,
            do_not_revert_tests: false,
            do_not_revert_files: BTreeSet::new(),
        }
    }
}

/// Configuration snapshot for the auto-revert engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRevertSettings {
    pub enabled: bool,
    pub seconds_till_revert: u32,
    pub notify_on_revert: bool,
}

impl Default for AutoRevertSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            seconds_till_revert: 2 * 60,
            notify_on_revert: true,
        }
    }
}
