//! Reference host adapter driven by an event script.
//!
//! Keeps an in-memory model of the workspace (the current fingerprint and the
//! branch facts) and records every engine request instead of touching a VCS.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::core::auto_revert::AutoRevertHost;
use crate::core::branch::{RootBranches, last_commit_exists_only_on_current_branch};
use crate::core::exemptions::RevertExemptions;
use crate::core::host_request::HostRequest;
use crate::core::tcr::{FingerprintSource, TcrHost};
use crate::core::types::ChangeListModifications;

#[derive(Debug, Default)]
pub struct ScriptHost {
    modifications: ChangeListModifications,
    roots: Vec<RootBranches>,
    requests: Vec<HostRequest>,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current workspace fingerprint.
    pub fn modifications(&self) -> &ChangeListModifications {
        &self.modifications
    }

    pub fn set_modifications(&mut self, modifications: ChangeListModifications) {
        self.modifications = modifications;
    }

    pub fn set_branches(&mut self, roots: Vec<RootBranches>) {
        self.roots = roots;
    }

    /// A full commit leaves nothing uncommitted.
    pub fn clear_modifications(&mut self) {
        self.modifications = ChangeListModifications::default();
    }

    pub fn requests(&self) -> &[HostRequest] {
        &self.requests
    }

    /// Take the requests recorded since the last drain.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Drop every unit not covered by `exemptions`, returning how many were dropped.
    fn revert_units(&mut self, exemptions: Option<&RevertExemptions>) -> usize {
        let before = self.modifications.len();
        self.modifications = self
            .modifications
            .units()
            .filter(|(unit, _)| exemptions.is_some_and(|ex| ex.is_exempt(unit)))
            .collect();
        before - self.modifications.len()
    }
}

impl TcrHost for ScriptHost {
    fn revert_current_change_list(
        &mut self,
        do_not_revert_tests: bool,
        do_not_revert_files: &BTreeSet<String>,
    ) -> usize {
        self.requests.push(HostRequest::RevertCurrentChangeList {
            do_not_revert_tests,
            do_not_revert_files: do_not_revert_files.clone(),
        });
        let exemptions = match RevertExemptions::new(do_not_revert_tests, do_not_revert_files) {
            Ok(exemptions) => exemptions,
            Err(err) => {
                warn!(error = %err, "invalid revert exemptions, skipping revert");
                return 0;
            }
        };
        let reverted = self.revert_units(Some(&exemptions));
        debug!(reverted, kept = self.modifications.len(), "tcr revert applied");
        reverted
    }

    fn open_commit_dialog(&mut self) {
        self.requests.push(HostRequest::OpenCommitDialog);
    }

    fn commit_without_dialog(&mut self) {
        self.requests.push(HostRequest::CommitWithoutDialog);
    }

    fn amend_commit_without_dialog(&mut self) {
        self.requests.push(HostRequest::AmendCommitWithoutDialog);
    }

    fn commit_without_dialog_and_push(&mut self) {
        self.requests.push(HostRequest::CommitWithoutDialogAndPush);
    }

    fn notify_that_changes_were_reverted(&mut self) {
        self.requests.push(HostRequest::NotifyChangesReverted);
    }

    fn notify_that_commit_was_cancelled(&mut self) {
        self.requests.push(HostRequest::NotifyCommitCancelled);
    }

    fn last_commit_exist_only_on_current_branch(&mut self) -> bool {
        last_commit_exists_only_on_current_branch(&self.roots)
    }
}

impl FingerprintSource for ScriptHost {
    fn current_modifications(&self) -> ChangeListModifications {
        self.modifications.clone()
    }
}

impl AutoRevertHost for ScriptHost {
    fn revert_current_change_list(&mut self) -> usize {
        self.requests.push(HostRequest::RevertAll);
        let reverted = self.revert_units(None);
        debug!(reverted, "auto-revert applied");
        reverted
    }

    fn notify_that_changes_were_reverted(&mut self) {
        self.requests.push(HostRequest::NotifyChangesReverted);
    }

    fn show_time_till_revert(&mut self, seconds: u32) {
        self.requests.push(HostRequest::ShowTimeTillRevert { seconds });
    }

    fn show_that_auto_revert_stopped(&mut self) {
        self.requests.push(HostRequest::ShowAutoRevertStopped);
    }
}
