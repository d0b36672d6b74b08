//! "Test && Commit || Revert" decision engine.
//!
//! The engine tracks whether a passing test has been observed for the current
//! working set and turns test outcomes into host requests. It never performs
//! VCS work itself: everything goes through [`TcrHost`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::types::{ChangeListModifications, TcrAction, TcrSettings, TestName};

/// Host-side actions the TCR engine may request.
pub trait TcrHost {
    /// Revert uncommitted changes, returning how many units were reverted.
    fn revert_current_change_list(
        &mut self,
        do_not_revert_tests: bool,
        do_not_revert_files: &BTreeSet<String>,
    ) -> usize;
    fn open_commit_dialog(&mut self);
    fn commit_without_dialog(&mut self);
    fn amend_commit_without_dialog(&mut self);
    fn commit_without_dialog_and_push(&mut self);
    fn notify_that_changes_were_reverted(&mut self);
    fn notify_that_commit_was_cancelled(&mut self);
    fn last_commit_exist_only_on_current_branch(&mut self) -> bool;
}

/// Host-side query for the current workspace fingerprint.
pub trait FingerprintSource {
    fn current_modifications(&self) -> ChangeListModifications;
}

/// TCR engine for a single workspace.
///
/// Event methods take the host as a parameter; the engine keeps no handle to it.
#[derive(Debug, Clone)]
pub struct Tcr {
    settings: TcrSettings,
    tested_modifications: Option<ChangeListModifications>,
    last_passed_test: Option<TestName>,
    allow_one_commit: bool,
}

impl Tcr {
    pub fn new(settings: TcrSettings) -> Self {
        Self {
            settings,
            tested_modifications: None,
            last_passed_test: None,
            allow_one_commit: false,
        }
    }

    pub fn settings(&self) -> &TcrSettings {
        &self.settings
    }

    /// True if committing `modifications` is currently permitted.
    pub fn is_commit_allowed(&self, modifications: &ChangeListModifications) -> bool {
        if !self.settings.enabled || self.allow_one_commit {
            return true;
        }
        self.tested_modifications.as_ref() == Some(modifications)
    }

    /// Pre-commit check for a manual commit; notifies the host on denial.
    pub fn on_commit_attempt<H: TcrHost>(
        &self,
        host: &mut H,
        modifications: &ChangeListModifications,
    ) -> bool {
        let allowed = self.is_commit_allowed(modifications);
        if !allowed {
            debug!(
                units = modifications.len(),
                "commit cancelled: no passing test for current changes"
            );
            host.notify_that_commit_was_cancelled();
        }
        allowed
    }

    pub fn on_unit_test_succeeded<H: TcrHost>(
        &mut self,
        host: &mut H,
        modifications: ChangeListModifications,
        test: TestName,
    ) {
        if !self.settings.enabled {
            return;
        }

        if modifications.is_empty() {
            debug!(test = %test, "test passed with nothing to commit");
        } else {
            self.dispatch_passed_test_action(host, &test);
        }

        self.tested_modifications = Some(modifications);
        self.last_passed_test = Some(test);
    }

    pub fn on_unit_test_failed<H: TcrHost>(&self, host: &mut H, test: &TestName) {
        if !self.settings.enabled {
            return;
        }
        let reverted = host.revert_current_change_list(
            self.settings.do_not_revert_tests,
            &self.settings.do_not_revert_files,
        );
        debug!(test = %test, reverted, "test failed, reverted changes");
        if self.settings.notify_on_revert {
            host.notify_that_changes_were_reverted();
        }
    }

    pub fn on_successful_commit(&mut self) {
        self.tested_modifications = None;
        self.last_passed_test = None;
        self.allow_one_commit = false;
    }

    /// Let the next commit through without a passing test and ask the host to commit.
    pub fn force_one_commit<H: TcrHost>(&mut self, host: &mut H) {
        self.allow_one_commit = true;
        host.commit_without_dialog();
    }

    pub fn on_settings_update(&mut self, settings: TcrSettings) {
        self.settings = settings;
    }

    fn dispatch_passed_test_action<H: TcrHost>(&self, host: &mut H, test: &TestName) {
        let action = self.settings.action_on_passed_test;
        debug!(test = %test, ?action, "test passed");
        match action {
            TcrAction::OpenCommitDialog => host.open_commit_dialog(),
            TcrAction::Commit => host.commit_without_dialog(),
            TcrAction::AmendCommit => {
                if self.can_amend(host, test) {
                    host.amend_commit_without_dialog();
                } else {
                    debug!(test = %test, "amend not possible, falling back to commit dialog");
                    host.open_commit_dialog();
                }
            }
            TcrAction::CommitAndPush => host.commit_without_dialog_and_push(),
        }
    }

    /// Amending is only safe for the same test's lineage on an unshared commit.
    fn can_amend<H: TcrHost>(&self, host: &mut H, test: &TestName) -> bool {
        self.tested_modifications.is_some()
            && self.last_passed_test.as_ref() == Some(test)
            && host.last_commit_exist_only_on_current_branch()
    }
}
