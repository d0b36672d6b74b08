//! One workspace session: both policy engines plus the host that serves them.
//!
//! The session owns the engines and the host, so events are applied one at a
//! time and neither engine can be re-entered while it handles an event.

use tracing::{debug, info};

use crate::core::auto_revert::{AutoRevert, AutoRevertHost};
use crate::core::tcr::{FingerprintSource, Tcr, TcrHost};
use crate::core::types::TestName;
use crate::io::config::Config;

/// Notification relayed by the host into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    TestPassed(TestName),
    TestFailed(TestName),
    /// Manual commit about to happen; the host should cancel it when denied.
    CommitAttempt,
    Committed {
        all_changes: bool,
    },
    ForceCommit,
    SettingsChanged(Config),
    Tick,
    AutoRevertStart,
    AutoRevertStop,
    /// A manual rollback left no uncommitted changes.
    RolledBack,
}

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    CommitChecked { allowed: bool },
}

#[derive(Debug)]
pub struct Session<H> {
    host: H,
    tcr: Tcr,
    auto_revert: AutoRevert,
}

impl<H> Session<H>
where
    H: TcrHost + AutoRevertHost + FingerprintSource,
{
    pub fn new(host: H, config: &Config) -> Self {
        info!(
            tcr_enabled = config.tcr.enabled,
            auto_revert_enabled = config.auto_revert.enabled,
            "session started"
        );
        Self {
            host,
            tcr: Tcr::new(config.tcr.clone()),
            auto_revert: AutoRevert::new(config.auto_revert.to_settings()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tcr(&self) -> &Tcr {
        &self.tcr
    }

    pub fn auto_revert(&self) -> &AutoRevert {
        &self.auto_revert
    }

    pub fn handle(&mut self, event: HostEvent) -> EventOutcome {
        debug!(?event, "handling host event");
        match event {
            HostEvent::TestPassed(test) => {
                let modifications = self.host.current_modifications();
                self.tcr.on_unit_test_succeeded(&mut self.host, modifications, test);
            }
            HostEvent::TestFailed(test) => self.tcr.on_unit_test_failed(&mut self.host, &test),
            HostEvent::CommitAttempt => {
                let modifications = self.host.current_modifications();
                let allowed = self.tcr.on_commit_attempt(&mut self.host, &modifications);
                return EventOutcome::CommitChecked { allowed };
            }
            HostEvent::Committed { all_changes } => {
                self.tcr.on_successful_commit();
                if all_changes {
                    self.auto_revert.on_all_changes_committed(&mut self.host);
                }
            }
            HostEvent::ForceCommit => self.tcr.force_one_commit(&mut self.host),
            HostEvent::SettingsChanged(config) => {
                self.tcr.on_settings_update(config.tcr);
                self.auto_revert
                    .on_settings_update(&mut self.host, config.auto_revert.to_settings());
            }
            HostEvent::Tick => self.auto_revert.on_timer(&mut self.host),
            HostEvent::AutoRevertStart => self.auto_revert.start(&mut self.host),
            HostEvent::AutoRevertStop => self.auto_revert.stop(&mut self.host),
            HostEvent::RolledBack => self.auto_revert.on_all_changes_rolled_back(&mut self.host),
        }
        EventOutcome::Applied
    }
}
