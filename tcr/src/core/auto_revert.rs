//! Idle-timeout policy that reverts work left uncommitted for too long.

use tracing::{debug, info};

use crate::core::types::AutoRevertSettings;

/// Host-side actions the auto-revert engine may request.
pub trait AutoRevertHost {
    /// Revert all uncommitted changes, returning how many units were reverted.
    fn revert_current_change_list(&mut self) -> usize;
    fn notify_that_changes_were_reverted(&mut self);
    fn show_time_till_revert(&mut self, seconds: u32);
    fn show_that_auto_revert_stopped(&mut self);
}

/// Countdown engine for a single workspace.
///
/// Ticks are one second each and are ignored unless the engine is started.
#[derive(Debug, Clone)]
pub struct AutoRevert {
    settings: AutoRevertSettings,
    started: bool,
    remaining_seconds: u32,
}

impl AutoRevert {
    pub fn new(settings: AutoRevertSettings) -> Self {
        Self {
            remaining_seconds: settings.seconds_till_revert,
            settings,
            started: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn settings(&self) -> &AutoRevertSettings {
        &self.settings
    }

    pub fn start<H: AutoRevertHost>(&mut self, host: &mut H) {
        if !self.settings.enabled {
            debug!("auto-revert disabled, ignoring start");
            return;
        }
        self.started = true;
        self.reset_countdown();
        host.show_time_till_revert(self.remaining_seconds);
    }

    pub fn stop<H: AutoRevertHost>(&mut self, host: &mut H) {
        self.started = false;
        host.show_that_auto_revert_stopped();
    }

    /// Advance the countdown by one second.
    pub fn on_timer<H: AutoRevertHost>(&mut self, host: &mut H) {
        if !self.started {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            let reverted = host.revert_current_change_list();
            info!(reverted, "auto-revert timeout reached");
            if self.settings.notify_on_revert {
                host.notify_that_changes_were_reverted();
            }
            self.reset_countdown();
        }
        host.show_time_till_revert(self.remaining_seconds);
    }

    pub fn on_all_changes_committed<H: AutoRevertHost>(&mut self, host: &mut H) {
        if self.started {
            self.reset_countdown();
            host.show_time_till_revert(self.remaining_seconds);
        }
    }

    pub fn on_all_changes_rolled_back<H: AutoRevertHost>(&mut self, host: &mut H) {
        self.on_all_changes_committed(host);
    }

    /// Replace settings; a changed threshold restarts the countdown.
    pub fn on_settings_update<H: AutoRevertHost>(
        &mut self,
        host: &mut H,
        settings: AutoRevertSettings,
    ) {
        let threshold_changed = settings.seconds_till_revert != self.settings.seconds_till_revert;
        self.settings = settings;

        if self.started && !settings.enabled {
            self.stop(host);
            return;
        }
        if threshold_changed {
            debug!(seconds = settings.seconds_till_revert, "auto-revert threshold changed");
            self.reset_countdown();
            if self.started {
                host.show_time_till_revert(self.remaining_seconds);
            }
        }
    }

    fn reset_countdown(&mut self) {
        self.remaining_seconds = self.settings.seconds_till_revert;
    }
}
