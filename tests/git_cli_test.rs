//! Drives `SystemGit` against scratch repositories and a real `git` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use git_aio::cli::{run_reverse_merge, run_tag_release, ReverseMergeArgs, TagReleaseArgs};
use git_aio::config::Config;
use git_aio::domain::{BumpLevel, Environment};
use git_aio::git::{GitRunner, SystemGit};
use git_aio::merge_probe::probe_conflicts;
use git_aio::ui::ScriptedPrompter;
use git_aio::GitAioError;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("LC_ALL", "C")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn configure(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
    git(dir, &["config", "pull.rebase", "false"]);
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// Repository on `main` with one commit
fn scratch_repo() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure(dir.path());
    commit_file(dir.path(), "app.txt", "base\n", "initial");
    dir
}

/// Bare remote plus a clone of it on `main`, with `develop` pushed
fn cloned_repo() -> (TempDir, TempDir) {
    let seed = scratch_repo();
    git(seed.path(), &["branch", "develop"]);

    let remote = tempfile::tempdir().unwrap();
    git(
        remote.path(),
        &["clone", "-q", "--bare", seed.path().to_str().unwrap(), "."],
    );

    let work = tempfile::tempdir().unwrap();
    git(
        work.path(),
        &["clone", "-q", remote.path().to_str().unwrap(), "."],
    );
    configure(work.path());
    git(work.path(), &["checkout", "-q", "main"]);
    (remote, work)
}

#[test]
fn test_probe_detects_conflict_and_restores_tree() {
    if !git_available() {
        return;
    }
    let repo = scratch_repo();
    let dir = repo.path();
    git(dir, &["checkout", "-q", "-b", "feature"]);
    commit_file(dir, "app.txt", "feature\n", "feature change");
    git(dir, &["checkout", "-q", "main"]);
    commit_file(dir, "app.txt", "main\n", "main change");

    let system = SystemGit::open(dir).unwrap();
    assert!(probe_conflicts(&system, "feature").unwrap());

    assert!(!system.merge_in_progress().unwrap());
    assert_eq!(fs::read_to_string(dir.join("app.txt")).unwrap(), "main\n");
    assert!(git(dir, &["status", "--porcelain"]).trim().is_empty());
}

#[test]
fn test_probe_clean_merge_leaves_no_trace() {
    if !git_available() {
        return;
    }
    let repo = scratch_repo();
    let dir = repo.path();
    git(dir, &["checkout", "-q", "-b", "feature"]);
    commit_file(dir, "extra.txt", "extra\n", "add extra");
    git(dir, &["checkout", "-q", "main"]);
    commit_file(dir, "app.txt", "main\n", "main change");

    let system = SystemGit::open(dir).unwrap();
    assert!(!probe_conflicts(&system, "feature").unwrap());

    assert!(!system.merge_in_progress().unwrap());
    assert!(!dir.join("extra.txt").exists());
    assert!(git(dir, &["status", "--porcelain"]).trim().is_empty());
}

#[test]
fn test_probe_already_merged_branch() {
    if !git_available() {
        return;
    }
    let repo = scratch_repo();
    let dir = repo.path();
    git(dir, &["branch", "feature"]);
    commit_file(dir, "app.txt", "main\n", "main change");

    let system = SystemGit::open(dir).unwrap();
    assert!(system.is_ancestor("feature", "HEAD").unwrap());
    assert!(!probe_conflicts(&system, "feature").unwrap());
    assert!(!system.merge_in_progress().unwrap());
}

#[test]
fn test_probe_unknown_branch_fails() {
    if !git_available() {
        return;
    }
    let repo = scratch_repo();
    let system = SystemGit::open(repo.path()).unwrap();

    let err = probe_conflicts(&system, "no-such-branch").unwrap_err();
    assert!(matches!(err, GitAioError::ProbeExecution { .. }));
}

#[test]
fn test_branch_listing() {
    if !git_available() {
        return;
    }
    let (_remote, work) = cloned_repo();
    let system = SystemGit::open(work.path()).unwrap();

    assert_eq!(system.current_branch().unwrap(), "main");
    assert_eq!(system.list_local_branches().unwrap(), vec!["main"]);
    let remote = system.list_remote_branches().unwrap();
    assert!(remote.contains(&"develop".to_string()));
    assert!(!remote.iter().any(|b| b == "HEAD"));
    assert!(system.branch_exists("develop").unwrap());
    assert!(!system.branch_exists("hotfix").unwrap());
}

#[test]
fn test_reverse_merge_end_to_end() {
    if !git_available() {
        return;
    }
    let (_remote, work) = cloned_repo();
    let dir = work.path();
    git(dir, &["checkout", "-q", "-b", "feature"]);
    commit_file(dir, "feature.txt", "feature\n", "feature work");

    let system = SystemGit::open(dir).unwrap();
    let args = ReverseMergeArgs {
        target: Some("develop".to_string()),
        remote: "origin".to_string(),
        no_ff: true,
    };
    let outcome = run_reverse_merge(&system, &ScriptedPrompter::default(), &args).unwrap();

    assert_eq!(outcome.target, "develop");
    assert_eq!(system.current_branch().unwrap(), "develop");
    assert!(dir.join("feature.txt").exists());
    assert!(system.is_ancestor("feature", "HEAD").unwrap());
    assert!(!system.merge_in_progress().unwrap());
}

#[test]
fn test_reverse_merge_conflict_leaves_target_clean() {
    if !git_available() {
        return;
    }
    let (_remote, work) = cloned_repo();
    let dir = work.path();
    git(dir, &["checkout", "-q", "develop"]);
    commit_file(dir, "app.txt", "develop\n", "develop change");
    git(dir, &["push", "-q", "origin", "develop"]);
    git(dir, &["checkout", "-q", "-b", "feature", "main"]);
    commit_file(dir, "app.txt", "feature\n", "feature change");

    let system = SystemGit::open(dir).unwrap();
    let args = ReverseMergeArgs {
        target: Some("develop".to_string()),
        remote: "origin".to_string(),
        no_ff: false,
    };
    let err = run_reverse_merge(&system, &ScriptedPrompter::default(), &args).unwrap_err();

    assert!(matches!(err, GitAioError::ConflictDetected { .. }));
    assert_eq!(system.current_branch().unwrap(), "develop");
    assert!(!system.merge_in_progress().unwrap());
    assert_eq!(fs::read_to_string(dir.join("app.txt")).unwrap(), "develop\n");
}

#[test]
fn test_qc_tag_created_and_pushed() {
    if !git_available() {
        return;
    }
    let (remote, work) = cloned_repo();
    let system = SystemGit::open(work.path()).unwrap();

    let outcome = run_tag_release(
        &system,
        &ScriptedPrompter::default(),
        None,
        &Config::default(),
        TagReleaseArgs {
            env: Environment::Qc,
            level: BumpLevel::Patch,
        },
    )
    .unwrap();

    assert_eq!(outcome.previous, "v0.0.0");
    assert_eq!(outcome.tag, "v0.0.1-qc");
    assert!(system.tag_exists("v0.0.1-qc").unwrap());
    assert_eq!(system.latest_tags(1).unwrap(), vec!["v0.0.1-qc"]);
    assert!(git(remote.path(), &["tag"]).contains("v0.0.1-qc"));
}
