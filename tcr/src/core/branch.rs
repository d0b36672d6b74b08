//! Amend-safety witness: is the last commit visible only on the current branch?

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Branch facts for one VCS root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBranches {
    /// Branch checked out in this root.
    pub current: String,
    /// Branches that contain the root's last commit.
    #[serde(default)]
    pub containing: BTreeSet<String>,
}

/// True if no root has its last commit on a branch other than the current one.
///
/// No roots at all counts as `true`.
pub fn last_commit_exists_only_on_current_branch(roots: &[RootBranches]) -> bool {
    roots.iter().all(|root| {
        root.containing
            .iter()
            .all(|branch| branch == &root.current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(current: &str, containing: &[&str]) -> RootBranches {
        RootBranches {
            current: current.to_string(),
            containing: containing.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn no_roots_is_unshared() {
        assert!(last_commit_exists_only_on_current_branch(&[]));
    }

    #[test]
    fn commit_only_on_current_branch() {
        assert!(last_commit_exists_only_on_current_branch(&[root(
            "feature",
            &["feature"]
        )]));
    }

    #[test]
    fn commit_on_other_branch_is_shared() {
        assert!(!last_commit_exists_only_on_current_branch(&[root(
            "feature",
            &["feature", "main"]
        )]));
    }

    #[test]
    fn any_shared_root_makes_it_shared() {
        let roots = vec![root("a", &["a"]), root("b", &["b", "release"])];
        assert!(!last_commit_exists_only_on_current_branch(&roots));
    }
}
