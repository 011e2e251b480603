use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::error::{GitAioError, Result};
use crate::git::{GitRunner, MergeAttempt};

/// Mock runner for testing without a repository.
///
/// Records every call by operation name (`"checkout develop"`,
/// `"merge_no_commit feature"`, ...) and simulates the pending-merge state so
/// tests can assert the working tree is left as found.
pub struct MockGit {
    work_tree: bool,
    current_branch: Option<String>,
    local_branches: Vec<String>,
    remote_branches: Vec<String>,
    tags: Vec<String>,
    baseline_tag: String,
    ancestors: HashSet<(String, String)>,
    speculative_merge: MergeAttempt,
    remote_url: Option<String>,
    failing: HashSet<&'static str>,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    merge_pending: bool,
    created_tags: Vec<String>,
    pushed_tags: Vec<String>,
}

impl MockGit {
    /// A clean work tree on `main` with no branches or tags
    pub fn new() -> Self {
        MockGit {
            work_tree: true,
            current_branch: Some("main".to_string()),
            local_branches: Vec::new(),
            remote_branches: Vec::new(),
            tags: Vec::new(),
            baseline_tag: "v0.0.0".to_string(),
            ancestors: HashSet::new(),
            speculative_merge: MergeAttempt {
                succeeded: true,
                output: "Automatic merge went well; stopped before committing as requested"
                    .to_string(),
            },
            remote_url: None,
            failing: HashSet::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_work_tree(mut self, work_tree: bool) -> Self {
        self.work_tree = work_tree;
        self
    }

    /// `None` simulates a detached HEAD
    pub fn with_current_branch(mut self, branch: Option<&str>) -> Self {
        self.current_branch = branch.map(str::to_string);
        self
    }

    pub fn with_local_branches(mut self, branches: &[&str]) -> Self {
        self.local_branches = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_remote_branches(mut self, branches: &[&str]) -> Self {
        self.remote_branches = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Tags, most recent first
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_baseline_tag(mut self, tag: &str) -> Self {
        self.baseline_tag = tag.to_string();
        self
    }

    /// Declare `ancestor` reachable from `descendant`
    pub fn with_ancestor(mut self, ancestor: &str, descendant: &str) -> Self {
        self.ancestors
            .insert((ancestor.to_string(), descendant.to_string()));
        self
    }

    /// Result of the next speculative merges
    pub fn with_speculative_merge(mut self, succeeded: bool, output: &str) -> Self {
        self.speculative_merge = MergeAttempt {
            succeeded,
            output: output.to_string(),
        };
        self
    }

    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    /// Start with a merge already pending
    pub fn with_merge_pending(self) -> Self {
        self.state().merge_pending = true;
        self
    }

    /// Make an operation fail, by method name (`"checkout"`, `"pull"`, ...)
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, operation: &'static str, args: &[&str]) -> Result<()> {
        let call = if args.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, args.join(" "))
        };
        self.state().calls.push(call.clone());

        if self.failing.contains(operation) {
            return Err(GitAioError::Command {
                command: call,
                output: format!("fatal: simulated {} failure", operation),
            });
        }
        Ok(())
    }

    /// Every recorded call, in order
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of calls to `operation`
    pub fn call_count(&self, operation: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    pub fn was_called(&self, operation: &str) -> bool {
        self.call_count(operation) > 0
    }

    pub fn is_merge_pending(&self) -> bool {
        self.state().merge_pending
    }

    pub fn created_tags(&self) -> Vec<String> {
        self.state().created_tags.clone()
    }

    pub fn pushed_tags(&self) -> Vec<String> {
        self.state().pushed_tags.clone()
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner for MockGit {
    fn is_work_tree(&self) -> Result<bool> {
        self.record("is_work_tree", &[])?;
        Ok(self.work_tree)
    }

    fn current_branch(&self) -> Result<String> {
        self.record("current_branch", &[])?;
        self.current_branch
            .clone()
            .ok_or_else(|| GitAioError::user_input("HEAD is detached; check out a branch first"))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record("checkout", &[branch])
    }

    fn checkout_tracking(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("checkout_tracking", &[remote, branch])
    }

    fn pull(&self) -> Result<()> {
        self.record("pull", &[])
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("fetch", &[remote, branch])
    }

    fn merge_no_commit(&self, branch: &str) -> Result<MergeAttempt> {
        self.record("merge_no_commit", &[branch])?;
        let attempt = self.speculative_merge.clone();
        // a successful or conflicting merge leaves MERGE_HEAD behind
        if attempt.succeeded || attempt.output.contains("CONFLICT") {
            self.state().merge_pending = true;
        }
        Ok(attempt)
    }

    fn merge_commit(&self, branch: &str, allow_fast_forward: bool) -> Result<()> {
        let mode = if allow_fast_forward { "ff" } else { "no-ff" };
        self.record("merge_commit", &[branch, mode])
    }

    fn abort_merge(&self) -> Result<()> {
        self.record("abort_merge", &[])?;
        let mut state = self.state();
        if !state.merge_pending {
            return Err(GitAioError::Command {
                command: "merge --abort".to_string(),
                output: "fatal: There is no merge to abort (MERGE_HEAD missing).".to_string(),
            });
        }
        state.merge_pending = false;
        Ok(())
    }

    fn merge_in_progress(&self) -> Result<bool> {
        self.record("merge_in_progress", &[])?;
        Ok(self.state().merge_pending)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        self.record("is_ancestor", &[ancestor, descendant])?;
        Ok(ancestor == descendant
            || self
                .ancestors
                .contains(&(ancestor.to_string(), descendant.to_string())))
    }

    fn list_local_branches(&self) -> Result<Vec<String>> {
        self.record("list_local_branches", &[])?;
        Ok(self.local_branches.clone())
    }

    fn list_remote_branches(&self) -> Result<Vec<String>> {
        self.record("list_remote_branches", &[])?;
        Ok(self.remote_branches.clone())
    }

    fn latest_tags(&self, limit: usize) -> Result<Vec<String>> {
        self.record("latest_tags", &[])?;
        if self.tags.is_empty() && limit > 0 {
            return Ok(vec![self.baseline_tag.clone()]);
        }
        Ok(self.tags.iter().take(limit).cloned().collect())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        self.record("tag_exists", &[name])?;
        Ok(self.tags.iter().any(|t| t == name) || self.state().created_tags.iter().any(|t| t == name))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record("create_tag", &[name, message])?;
        self.state().created_tags.push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        self.record("push_tag", &[name])?;
        self.state().pushed_tags.push(name.to_string());
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.record("remote_url", &[remote])?;
        self.remote_url
            .clone()
            .ok_or_else(|| GitAioError::config(format!("git remote '{}' not found", remote)))
    }
}
