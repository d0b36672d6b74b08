//! Deterministic matching of units that a revert must leave untouched.
//!
//! Patterns are path globs: `*`, `?`, `[...]`/`[!...]` classes and whole-segment
//! `**`, plus `{a,b}` alternatives. `*` never crosses a `/`.

use std::collections::BTreeSet;
use std::path::{Component, Path};
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled `do_not_revert_*` settings.
#[derive(Debug, Clone)]
pub struct RevertExemptions {
    do_not_revert_tests: bool,
    patterns: Vec<Pattern>,
}

impl RevertExemptions {
    pub fn new(do_not_revert_tests: bool, patterns: &BTreeSet<String>) -> Result<Self, String> {
        let mut compiled = Vec::new();
        for pattern in patterns {
            compiled.extend(compile_glob(pattern)?);
        }
        Ok(Self {
            do_not_revert_tests,
            patterns: compiled,
        })
    }

    /// True if `unit` must survive a revert.
    pub fn is_exempt(&self, unit: &str) -> bool {
        if self.do_not_revert_tests && is_test_unit(Path::new(unit)) {
            return true;
        }
        let normalized = normalize(Path::new(unit));
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(&normalized, MATCH_OPTIONS))
    }
}

/// Check that every pattern compiles, collecting one message per bad pattern.
pub fn validate_patterns(patterns: &BTreeSet<String>) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|pattern| compile_glob(pattern).err())
        .collect()
}

/// A unit is a test unit if any parent directory is named `test` or `tests`.
pub fn is_test_unit(path: &Path) -> bool {
    let mut components: Vec<_> = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir | Component::RootDir))
        .collect();
    components.pop();
    components.iter().any(|component| match component {
        Component::Normal(name) => *name == "test" || *name == "tests",
        _ => false,
    })
}

/// Unit path with `.` and root components dropped, joined by `/`.
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// One user pattern becomes one glob per `{a,b}` alternative.
fn compile_glob(pattern: &str) -> Result<Vec<Pattern>, String> {
    let trimmed = pattern.trim().trim_start_matches("./");
    if trimmed.is_empty() {
        return Err(format!("empty pattern '{pattern}'"));
    }
    expand_alternatives(trimmed)
        .iter()
        .map(|expanded| {
            Pattern::new(expanded).map_err(|err| format!("invalid pattern '{pattern}': {err}"))
        })
        .collect()
}

/// Expand `{a,b}` groups, innermost first.
fn expand_alternatives(pattern: &str) -> Vec<String> {
    static GROUP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid alternatives regex"));

    let Some(group) = GROUP_RE.captures(pattern) else {
        return vec![pattern.to_string()];
    };
    let (Some(whole), Some(inner)) = (group.get(0), group.get(1)) else {
        return vec![pattern.to_string()];
    };
    let (prefix, suffix) = (&pattern[..whole.start()], &pattern[whole.end()..]);
    inner
        .as_str()
        .split(',')
        .flat_map(|alternative| expand_alternatives(&format!("{prefix}{alternative}{suffix}")))
        .collect()
}
