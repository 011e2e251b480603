use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, MutexGuard};

use git2::{BranchType, ErrorCode, Repository as Git2Repo, RepositoryState};

use crate::config::Config;
use crate::error::{GitAioError, Result};
use crate::git::{normalize_remote_branches, GitRunner, MergeAttempt};

/// Runner backed by a real repository.
///
/// Queries go through `git2`. Anything that mutates the working tree or talks
/// to a remote shells out to `git`, so users' hooks, credential helpers and
/// merge drivers apply exactly as on the command line.
pub struct SystemGit {
    repo: Mutex<Git2Repo>,
    workdir: PathBuf,
    remote: String,
    baseline_tag: String,
}

impl SystemGit {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            GitAioError::user_input(format!(
                "not a git repository ({}): {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;
        let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(SystemGit {
            repo: Mutex::new(repo),
            workdir,
            remote: "origin".to_string(),
            baseline_tag: "v0.0.0".to_string(),
        })
    }

    /// Discover the repository and apply remote and baseline settings
    pub fn from_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        Ok(Self::open(path)?
            .with_remote(config.remote.clone())
            .with_baseline_tag(config.tag.baseline.clone()))
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_baseline_tag(mut self, tag: impl Into<String>) -> Self {
        self.baseline_tag = tag.into();
        self
    }

    fn repo(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `git` in the work tree and return (success, stdout + stderr).
    fn git(&self, args: &[&str]) -> Result<(bool, String)> {
        tracing::debug!(args = ?args, "running git");
        let output = Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            // conflict markers are matched against untranslated output
            .env("LC_ALL", "C")
            .output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        tracing::trace!(status = ?output.status.code(), output = %combined, "git finished");

        Ok((output.status.success(), combined))
    }

    /// Run `git`, failing with the captured output on a non-zero exit.
    fn run(&self, args: &[&str]) -> Result<String> {
        let (succeeded, output) = self.git(args)?;
        if succeeded {
            Ok(output)
        } else {
            Err(GitAioError::Command {
                command: args.join(" "),
                output: output.trim_end().to_string(),
            })
        }
    }

    fn branch_names(&self, kind: BranchType) -> Result<Vec<String>> {
        let repo = self.repo();
        let mut names = Vec::new();
        for entry in repo.branches(Some(kind))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

impl GitRunner for SystemGit {
    fn is_work_tree(&self) -> Result<bool> {
        Ok(!self.repo().is_bare())
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.repo();
        let result = match repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(str::to_string)
                .ok_or_else(|| GitAioError::user_input("current branch name is not valid UTF-8")),
            Ok(_) => Err(GitAioError::user_input(
                "HEAD is detached; check out a branch first",
            )),
            // fresh repository: HEAD names a branch with no commits yet
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string)
                    .ok_or_else(|| GitAioError::user_input("cannot determine current branch"))
            }
            Err(e) => Err(e.into()),
        };
        result
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    fn checkout_tracking(&self, remote: &str, branch: &str) -> Result<()> {
        let upstream = format!("{}/{}", remote, branch);
        self.run(&["checkout", "-b", branch, "--track", upstream.as_str()])
            .map(|_| ())
    }

    fn pull(&self) -> Result<()> {
        self.run(&["pull"]).map(|_| ())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", remote, branch]).map(|_| ())
    }

    fn merge_no_commit(&self, branch: &str) -> Result<MergeAttempt> {
        let (succeeded, output) = self.git(&["merge", "--no-commit", "--no-ff", branch])?;
        Ok(MergeAttempt { succeeded, output })
    }

    fn merge_commit(&self, branch: &str, allow_fast_forward: bool) -> Result<()> {
        let mut args = vec!["merge", "--no-edit"];
        if !allow_fast_forward {
            args.push("--no-ff");
        }
        args.push(branch);
        self.run(&args).map(|_| ())
    }

    fn abort_merge(&self) -> Result<()> {
        self.run(&["merge", "--abort"]).map(|_| ())
    }

    fn merge_in_progress(&self) -> Result<bool> {
        Ok(self.repo().state() != RepositoryState::Clean)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let repo = self.repo();
        let ancestor = repo.revparse_single(ancestor)?.peel_to_commit()?.id();
        let descendant = repo.revparse_single(descendant)?.peel_to_commit()?.id();
        Ok(ancestor == descendant || repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn list_local_branches(&self) -> Result<Vec<String>> {
        self.branch_names(BranchType::Local)
    }

    fn list_remote_branches(&self) -> Result<Vec<String>> {
        Ok(normalize_remote_branches(
            self.branch_names(BranchType::Remote)?,
        ))
    }

    fn latest_tags(&self, limit: usize) -> Result<Vec<String>> {
        let output = self.run(&["tag", "--sort=-creatordate"])?;
        let tags: Vec<String> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(limit)
            .map(str::to_string)
            .collect();

        if tags.is_empty() && limit > 0 {
            return Ok(vec![self.baseline_tag.clone()]);
        }
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo().find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let repo = self.repo();
        let head = repo.head()?.peel_to_commit()?;
        let signature = repo.signature()?;
        repo.tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        let refspec = format!("refs/tags/{}", name);
        self.run(&["push", self.remote.as_str(), refspec.as_str()]).map(|_| ())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let repo = self.repo();
        let remote_handle = repo.find_remote(remote).map_err(|_| {
            GitAioError::config(format!("git remote '{}' not found", remote))
        })?;
        let url = remote_handle
            .url()
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| GitAioError::config(format!("git remote '{}' has no URL", remote)));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        // tempdirs normally live outside any repository; skip if not
        if Git2Repo::discover(dir.path()).is_ok() {
            return;
        }
        let err = SystemGit::open(dir.path()).err().unwrap();
        assert!(matches!(err, GitAioError::UserInput(_)));
    }

    #[test]
    fn test_unborn_branch_is_current() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        repo.set_head("refs/heads/trunk").unwrap();

        let git = SystemGit::open(dir.path()).unwrap();
        assert_eq!(git.current_branch().unwrap(), "trunk");
        assert!(git.is_work_tree().unwrap());
        assert!(!git.merge_in_progress().unwrap());
        assert!(git.list_local_branches().unwrap().is_empty());
    }

    #[test]
    fn test_remote_url() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        repo.remote("origin", "git@gitlab.example.com:team/app.git")
            .unwrap();

        let git = SystemGit::open(dir.path()).unwrap();
        assert_eq!(
            git.remote_url("origin").unwrap(),
            "git@gitlab.example.com:team/app.git"
        );
        assert!(matches!(
            git.remote_url("upstream"),
            Err(GitAioError::Config(_))
        ));
    }
}
