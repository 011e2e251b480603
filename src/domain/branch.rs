/// Branches production tags may be cut from
pub const RELEASE_BRANCHES: &[&str] = &["main", "master"];

/// A checked-out branch and the tagging policy that applies to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
}

impl BranchContext {
    pub fn new(name: impl Into<String>) -> Self {
        BranchContext { name: name.into() }
    }

    /// Whether production tags may be created here
    pub fn is_release_branch(&self) -> bool {
        RELEASE_BRANCHES.contains(&self.name.as_str())
    }

    /// Branches this one may be merged into, in their listed order.
    pub fn merge_targets(&self, branches: &[String]) -> Vec<String> {
        merge_candidates(branches, &self.name)
    }
}

/// Branches other than `current`, in their listed order.
pub fn merge_candidates(branches: &[String], current: &str) -> Vec<String> {
    branches
        .iter()
        .filter(|branch| branch.as_str() != current)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_branches() {
        for name in ["main", "master"] {
            assert!(BranchContext::new(name).is_release_branch(), "{}", name);
        }
    }

    #[test]
    fn test_other_branches_are_not_release() {
        for name in ["develop", "release/1.0", "Main", "main-backup"] {
            assert!(!BranchContext::new(name).is_release_branch(), "{}", name);
        }
    }

    #[test]
    fn test_merge_targets_exclude_current() {
        let branches = vec![
            "develop".to_string(),
            "feature/login".to_string(),
            "main".to_string(),
        ];
        assert_eq!(
            BranchContext::new("feature/login").merge_targets(&branches),
            vec!["develop".to_string(), "main".to_string()]
        );
        assert!(merge_candidates(&["only".to_string()], "only").is_empty());
    }
}
