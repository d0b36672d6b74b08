//! Workspace configuration stored under `.tcr/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::exemptions::validate_patterns;
use crate::core::types::{AutoRevertSettings, TcrSettings};

/// Workspace configuration (TOML).
///
/// Edited by humans; missing fields fall back to defaults and unknown keys are
/// rejected. Each section is handed to its engine as a whole snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tcr: TcrSettings,
    pub auto_revert: AutoRevertConfig,
}

/// Auto-revert section, with the threshold in whole minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AutoRevertConfig {
    pub enabled: bool,
    pub minutes_till_revert: u32,
    pub notify_on_revert: bool,
}

impl Default for AutoRevertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            minutes_till_revert: 2,
            notify_on_revert: true,
        }
    }
}

impl AutoRevertConfig {
    pub fn to_settings(&self) -> AutoRevertSettings {
        AutoRevertSettings {
            enabled: self.enabled,
            seconds_till_revert: self.minutes_till_revert.saturating_mul(60),
            notify_on_revert: self.notify_on_revert,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.auto_revert.minutes_till_revert == 0 {
            return Err(anyhow!("auto_revert.minutes_till_revert must be > 0"));
        }
        let errors = validate_patterns(&self.tcr.do_not_revert_files);
        if !errors.is_empty() {
            bail!("tcr.do_not_revert_files:\n- {}", errors.join("\n- "));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg = parse_config(&contents).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), tcr_enabled = cfg.tcr.enabled, "config loaded");
    Ok(cfg)
}

/// Parse and validate config text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
