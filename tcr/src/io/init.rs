//! Initialization helpers for `.tcr/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use super::config::{Config, write_config};

/// Canonical paths within `.tcr/` for a workspace root.
#[derive(Debug, Clone)]
pub struct TcrPaths {
    pub root: PathBuf,
    pub tcr_dir: PathBuf,
    pub config_path: PathBuf,
    pub scripts_dir: PathBuf,
    pub example_script_path: PathBuf,
}

impl TcrPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let tcr_dir = root.join(".tcr");
        let scripts_dir = tcr_dir.join("scripts");
        Self {
            root: root.clone(),
            tcr_dir: tcr_dir.clone(),
            config_path: tcr_dir.join("config.toml"),
            example_script_path: scripts_dir.join("example.jsonl"),
            scripts_dir,
        }
    }
}

/// Options for `init_workspace`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing files.
    pub force: bool,
}

/// Create `.tcr/` scaffolding in `root`.
///
/// Fails if `.tcr/` already exists unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<TcrPaths> {
    let paths = TcrPaths::new(root);
    if paths.tcr_dir.exists() && !paths.tcr_dir.is_dir() {
        return Err(anyhow!("tcr init: .tcr exists but is not a directory"));
    }
    if paths.tcr_dir.exists() && !options.force {
        return Err(anyhow!(
            "tcr init: .tcr already exists (use --force to overwrite)"
        ));
    }

    create_dir(&paths.scripts_dir)?;
    write_config(&paths.config_path, &starter_config())?;
    write_file(&paths.example_script_path, EXAMPLE_SCRIPT)?;
    debug!(root = %root.display(), "initialized .tcr");

    Ok(paths)
}

/// Defaults with TCR switched on.
fn starter_config() -> Config {
    let mut cfg = Config::default();
    cfg.tcr.enabled = true;
    cfg
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}

const EXAMPLE_SCRIPT: &str = r#"# One event per line; see `tcr replay --help`.
{"event":"modified","units":{"src/lib.rs":1}}
{"event":"test_failed","test":"adds_numbers"}
{"event":"modified","units":{"src/lib.rs":2}}
{"event":"test_passed","test":"adds_numbers"}
{"event":"commit_attempt"}
{"event":"committed","all_changes":true}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;
    use crate::io::events::load_script;

    #[test]
    fn init_creates_expected_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions { force: false }).expect("init");

        assert!(paths.tcr_dir.is_dir());
        assert!(paths.scripts_dir.is_dir());
        assert!(paths.config_path.is_file());
        assert!(paths.example_script_path.is_file());

        let cfg = load_config(&paths.config_path).expect("load config");
        assert!(cfg.tcr.enabled);
        let script = load_script(&paths.example_script_path).expect("load script");
        assert_eq!(script.len(), 6);
    }

    #[test]
    fn init_without_force_refuses_existing_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        let err = init_workspace(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn init_with_force_restores_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        fs::write(&paths.config_path, "[tcr]\nenabled = false\n").expect("write custom");

        init_workspace(temp.path(), &InitOptions { force: true }).expect("re-init");

        let cfg = load_config(&paths.config_path).expect("load config");
        assert!(cfg.tcr.enabled);
    }
}
