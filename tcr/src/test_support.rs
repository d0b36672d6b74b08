//! Test-only host doubles and fixtures.

use std::collections::BTreeSet;

pub use crate::core::host_request::HostRequest;
use crate::core::auto_revert::AutoRevertHost;
use crate::core::tcr::{FingerprintSource, TcrHost};
use crate::core::types::{ChangeListModifications, TcrAction, TcrSettings};

/// Host that records every request and answers queries from fixed values.
///
/// Reverts are recorded but report zero reverted units.
#[derive(Debug, Default)]
pub struct RecordingHost {
    requests: Vec<HostRequest>,
    modifications: ChangeListModifications,
    last_commit_only_on_current_branch: bool,
}

impl RecordingHost {
    pub fn requests(&self) -> &[HostRequest] {
        &self.requests
    }

    /// Fingerprint reported to the session.
    pub fn set_modifications(&mut self, modifications: ChangeListModifications) {
        self.modifications = modifications;
    }

    pub fn set_last_commit_only_on_current_branch(&mut self, value: bool) {
        self.last_commit_only_on_current_branch = value;
    }
}

impl TcrHost for RecordingHost {
    fn revert_current_change_list(
        &mut self,
        do_not_revert_tests: bool,
        do_not_revert_files: &BTreeSet<String>,
    ) -> usize {
        self.requests.push(HostRequest::RevertCurrentChangeList {
            do_not_revert_tests,
            do_not_revert_files: do_not_revert_files.clone(),
        });
        0
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
        self.last_commit_only_on_current_branch
    }
}

impl FingerprintSource for RecordingHost {
    fn current_modifications(&self) -> ChangeListModifications {
        self.modifications.clone()
    }
}

impl AutoRevertHost for RecordingHost {
    fn revert_current_change_list(&mut self) -> usize {
        self.requests.push(HostRequest::RevertAll);
        0
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

/// Enabled TCR settings with the given action and no revert exemptions.
pub fn enabled_tcr(action: TcrAction) -> TcrSettings {
    TcrSettings {
        enabled: true,
        notify_on_revert: true,
        action_on_passed_test: action,
        do_not_revert_tests: false,
        do_not_revert_files: BTreeSet::new(),
    }
}

/// Fingerprint from `(unit, counter)` pairs.
pub fn modifications(units: &[(&str, u64)]) -> ChangeListModifications {
    units.iter().map(|(unit, count)| (*unit, *count)).collect()
}
