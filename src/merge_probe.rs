//! Speculative merge conflict detection.
//!
//! [`probe_conflicts`] answers "would merging `branch` into HEAD conflict?"
//! by starting a non-committing, non-fast-forward merge and aborting it. The
//! abort is owned by a drop guard armed before the merge starts, so the
//! pending merge is discarded on every exit path, including early returns
//! and errors.

use crate::error::{GitAioError, Result};
use crate::git::GitRunner;

/// Substrings git prints when a merge stops on content conflicts.
pub const CONFLICT_MARKERS: &[&str] = &["CONFLICT", "Automatic merge failed"];

/// Whether merge output reports content conflicts
pub fn has_conflict_markers(output: &str) -> bool {
    CONFLICT_MARKERS.iter().any(|marker| output.contains(marker))
}

/// Aborts the speculative merge when dropped. Failures are swallowed: the
/// probe's own result must win.
struct AbortOnDrop<'a, G: GitRunner + ?Sized> {
    git: &'a G,
}

impl<G: GitRunner + ?Sized> Drop for AbortOnDrop<'_, G> {
    fn drop(&mut self) {
        if let Err(e) = self.git.abort_merge() {
            tracing::debug!(error = %e, "ignoring merge abort failure");
        }
    }
}

/// Check whether merging `branch` into the current HEAD would conflict.
///
/// Returns `Ok(true)` on conflicts, `Ok(false)` when the merge would apply
/// cleanly (or `branch` is already merged). Fails with
/// [`GitAioError::ProbeExecution`] when the merge cannot be attempted for any
/// other reason. The merge state of the working tree is unchanged afterwards.
pub fn probe_conflicts<G: GitRunner + ?Sized>(git: &G, branch: &str) -> Result<bool> {
    let probe_error = |output: String| GitAioError::ProbeExecution {
        branch: branch.to_string(),
        output,
    };

    // aborting here would throw away the user's own merge
    if git.merge_in_progress()? {
        return Err(probe_error(
            "a merge is already in progress; finish or abort it first".to_string(),
        ));
    }

    if git
        .is_ancestor(branch, "HEAD")
        .map_err(|e| probe_error(e.to_string()))?
    {
        tracing::info!(branch, "branch already merged into HEAD");
        return Ok(false);
    }

    let _abort = AbortOnDrop { git };
    let attempt = git
        .merge_no_commit(branch)
        .map_err(|e| probe_error(e.to_string()))?;

    if attempt.succeeded {
        tracing::info!(branch, "speculative merge applied cleanly");
        return Ok(false);
    }

    if has_conflict_markers(&attempt.output) {
        tracing::info!(branch, "speculative merge hit conflicts");
        return Ok(true);
    }

    Err(probe_error(attempt.output.trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGit;

    const CONFLICT_OUTPUT: &str = "Auto-merging src/lib.rs\n\
        CONFLICT (content): Merge conflict in src/lib.rs\n\
        Automatic merge failed; fix conflicts and then commit the result.";

    #[test]
    fn test_already_merged_skips_speculative_merge() {
        let git = MockGit::new().with_ancestor("feature", "HEAD");

        assert!(!probe_conflicts(&git, "feature").unwrap());
        assert!(!git.was_called("merge_no_commit"));
        assert!(!git.is_merge_pending());
    }

    #[test]
    fn test_clean_merge_is_aborted() {
        let git = MockGit::new();

        assert!(!probe_conflicts(&git, "feature").unwrap());
        assert_eq!(git.call_count("merge_no_commit"), 1);
        assert_eq!(git.call_count("abort_merge"), 1);
        assert!(!git.is_merge_pending());
    }

    #[test]
    fn test_conflict_detected_and_aborted_once() {
        let git = MockGit::new().with_speculative_merge(false, CONFLICT_OUTPUT);

        assert!(probe_conflicts(&git, "feature").unwrap());
        assert_eq!(git.call_count("abort_merge"), 1);
        assert!(!git.is_merge_pending());
    }

    #[test]
    fn test_automatic_merge_failed_marker_alone() {
        let git = MockGit::new().with_speculative_merge(
            false,
            "Automatic merge failed; fix conflicts and then commit the result.",
        );
        assert!(probe_conflicts(&git, "feature").unwrap());
    }

    #[test]
    fn test_failure_without_markers_is_probe_error() {
        let git = MockGit::new().with_speculative_merge(
            false,
            "error: Your local changes to the following files would be overwritten by merge:\n\tREADME.md",
        );

        let err = probe_conflicts(&git, "feature").unwrap_err();
        match err {
            GitAioError::ProbeExecution { branch, output } => {
                assert_eq!(branch, "feature");
                assert!(output.contains("local changes"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(git.call_count("abort_merge"), 1);
        assert!(!git.is_merge_pending());
    }

    #[test]
    fn test_abort_failure_does_not_mask_result() {
        let git = MockGit::new()
            .with_speculative_merge(false, CONFLICT_OUTPUT)
            .failing("abort_merge");

        assert!(probe_conflicts(&git, "feature").unwrap());
    }

    #[test]
    fn test_merge_command_error_still_aborts() {
        let git = MockGit::new().failing("merge_no_commit");

        let err = probe_conflicts(&git, "feature").unwrap_err();
        assert!(matches!(err, GitAioError::ProbeExecution { .. }));
        assert_eq!(git.call_count("abort_merge"), 1);
    }

    #[test]
    fn test_missing_branch_is_probe_error() {
        let git = MockGit::new().failing("is_ancestor");

        let err = probe_conflicts(&git, "nope").unwrap_err();
        assert!(matches!(err, GitAioError::ProbeExecution { .. }));
        assert!(!git.was_called("merge_no_commit"));
    }

    #[test]
    fn test_pending_merge_is_left_alone() {
        let git = MockGit::new().with_merge_pending();

        let err = probe_conflicts(&git, "feature").unwrap_err();
        assert!(matches!(err, GitAioError::ProbeExecution { .. }));
        assert!(!git.was_called("abort_merge"));
        assert!(git.is_merge_pending());
    }

    #[test]
    fn test_probe_twice_leaves_tree_unchanged() {
        for (succeeded, output) in [(true, ""), (false, CONFLICT_OUTPUT)] {
            let git = MockGit::new().with_speculative_merge(succeeded, output);

            let first = probe_conflicts(&git, "feature").unwrap();
            assert!(!git.is_merge_pending());
            let second = probe_conflicts(&git, "feature").unwrap();
            assert!(!git.is_merge_pending());

            assert_eq!(first, second);
            assert_eq!(git.call_count("abort_merge"), 2);
        }
    }

    #[test]
    fn test_conflict_markers() {
        assert!(has_conflict_markers("CONFLICT (modify/delete): a.txt"));
        assert!(!has_conflict_markers("Already up to date."));
        assert!(!has_conflict_markers("merge: feature - not something we can merge"));
    }
}
