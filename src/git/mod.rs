//! Git operations abstraction layer
//!
//! Every workflow talks to the working tree through the [GitRunner] trait and
//! never touches it directly. The concrete implementations are:
//!
//! - [repository::SystemGit]: `git2` for queries, the `git` executable for
//!   working-tree mutations and network operations
//! - [mock::MockGit]: an in-memory runner that records calls, for tests
//!
//! ```rust
//! # use git_aio::git::GitRunner;
//! # fn example<G: GitRunner>(git: &G) -> git_aio::Result<()> {
//! let current = git.current_branch()?;
//! if git.is_ancestor("feature/login", &current)? {
//!     println!("already merged");
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockGit;
pub use repository::SystemGit;

use crate::error::Result;

/// Outcome of a merge attempt that may legitimately fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAttempt {
    pub succeeded: bool,
    /// Combined stdout and stderr of the merge command
    pub output: String,
}

/// Version command runner
///
/// ## Error Handling
///
/// Commands that exit non-zero map to [crate::error::GitAioError::Command]
/// carrying the captured output, except [GitRunner::merge_no_commit] which
/// reports failure in its return value so callers can inspect the output.
pub trait GitRunner: Send + Sync {
    /// Whether the runner points at a work tree (not a bare repository)
    fn is_work_tree(&self) -> Result<bool>;

    /// Name of the checked-out branch. Fails on detached HEAD.
    fn current_branch(&self) -> Result<String>;

    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create `branch` tracking `<remote>/<branch>` and check it out
    fn checkout_tracking(&self, remote: &str, branch: &str) -> Result<()>;

    /// Pull the checked-out branch from its upstream
    fn pull(&self) -> Result<()>;

    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// `merge --no-commit --no-ff`; never returns `Err` for a failed merge
    fn merge_no_commit(&self, branch: &str) -> Result<MergeAttempt>;

    /// Real, committing merge
    fn merge_commit(&self, branch: &str, allow_fast_forward: bool) -> Result<()>;

    /// Abort an in-progress merge. Callers treat this as best effort.
    fn abort_merge(&self) -> Result<()>;

    /// Whether a merge (or other sequencer operation) is pending
    fn merge_in_progress(&self) -> Result<bool>;

    /// Whether `ancestor` is reachable from `descendant` (or equal to it)
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    fn list_local_branches(&self) -> Result<Vec<String>>;

    /// Remote branch names with the remote prefix stripped, deduplicated,
    /// excluding the symbolic `HEAD`
    fn list_remote_branches(&self) -> Result<Vec<String>>;

    /// Up to `limit` tags, most recently created first. Returns the
    /// baseline tag alone when the repository has none.
    fn latest_tags(&self, limit: usize) -> Result<Vec<String>>;

    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    fn push_tag(&self, name: &str) -> Result<()>;

    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Whether `branch` exists locally or on any remote
    fn branch_exists(&self, branch: &str) -> Result<bool> {
        if self.list_local_branches()?.iter().any(|b| b == branch) {
            return Ok(true);
        }
        Ok(self.list_remote_branches()?.iter().any(|b| b == branch))
    }

    /// Local branches followed by remote-only branches
    fn list_all_branches(&self) -> Result<Vec<String>> {
        let mut branches = self.list_local_branches()?;
        for remote in self.list_remote_branches()? {
            if !branches.contains(&remote) {
                branches.push(remote);
            }
        }
        Ok(branches)
    }
}

/// Strip the remote name from `origin/feature/x` style names, dropping the
/// symbolic `HEAD` and duplicates while keeping first-seen order.
pub fn normalize_remote_branches<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut branches: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        let Some((_, branch)) = name.split_once('/') else {
            continue;
        };
        if branch.is_empty() || branch == "HEAD" || branch.starts_with("HEAD ") {
            continue;
        }
        if !branches.iter().any(|b| b == branch) {
            branches.push(branch.to_string());
        }
    }
    branches
}
