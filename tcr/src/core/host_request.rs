//! Serializable record of what an engine asked its host to do.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One host action requested by the TCR or auto-revert engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum HostRequest {
    /// TCR revert after a failed test, with the exemptions the host must honor.
    RevertCurrentChangeList {
        do_not_revert_tests: bool,
        do_not_revert_files: BTreeSet<String>,
    },
    /// Auto-revert timeout: revert everything uncommitted.
    RevertAll,
    OpenCommitDialog,
    CommitWithoutDialog,
    AmendCommitWithoutDialog,
    CommitWithoutDialogAndPush,
    NotifyChangesReverted,
    NotifyCommitCancelled,
    ShowTimeTillRevert {
        seconds: u32,
    },
    ShowAutoRevertStopped,
}

impl HostRequest {
    /// True for status display updates that carry no VCS or notification effect.
    pub fn is_display(&self) -> bool {
        matches!(
            self,
            HostRequest::ShowTimeTillRevert { .. } | HostRequest::ShowAutoRevertStopped
        )
    }
}
