//! Reverse merge: merge the current branch into a target branch.
//!
//! Resolve current -> resolve target -> validate target -> guard same branch
//! -> fetch (best effort) -> checkout -> pull -> probe -> merge. Each step
//! runs at most once and the first failure ends the workflow.

use crate::boundary::BoundaryWarning;
use crate::domain::BranchContext;
use crate::error::{GitAioError, Result, Step, StepContext};
use crate::git::GitRunner;
use crate::merge_probe::probe_conflicts;
use crate::ui::{self, Prompter};

/// Arguments for the reverse-merge workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReverseMergeArgs {
    /// Target branch; prompted for when absent
    pub target: Option<String>,

    /// Remote to fetch the target from
    pub remote: String,

    /// Always create a merge commit
    pub no_ff: bool,
}

/// Result of a successful reverse merge
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseMergeOutcome {
    /// Branch that was merged
    pub merged: String,

    /// Branch merged into, now checked out
    pub target: String,
}

fn select_target<G, P>(git: &G, prompter: &P, current: &str, message: &str) -> Result<String>
where
    G: GitRunner + ?Sized,
    P: Prompter + ?Sized,
{
    let candidates = BranchContext::new(current).merge_targets(&git.list_local_branches()?);
    if candidates.is_empty() {
        return Err(GitAioError::user_input(
            "no other local branches available to merge into",
        ));
    }
    prompter.select(message, &candidates)
}

/// Merge the current branch into the target branch after a conflict probe.
///
/// On success the target branch is left checked out. A detected conflict
/// ends the workflow with [GitAioError::ConflictDetected] before any real
/// merge is attempted, leaving the target branch checked out and clean.
pub fn run_reverse_merge<G, P>(
    git: &G,
    prompter: &P,
    args: &ReverseMergeArgs,
) -> Result<ReverseMergeOutcome>
where
    G: GitRunner + ?Sized,
    P: Prompter + ?Sized,
{
    let current = git.current_branch().at_step(Step::ResolveCurrentBranch)?;
    ui::display_status(&format!("Current branch: {}", current));

    let mut target = match &args.target {
        Some(target) => target.clone(),
        None => select_target(git, prompter, &current, "Select target branch:")
            .at_step(Step::ResolveTargetBranch)?,
    };

    if !git
        .branch_exists(&target)
        .at_step(Step::ValidateTargetExists)?
    {
        ui::display_boundary_warning(&BoundaryWarning::TargetBranchMissing {
            branch: target.clone(),
        });
        target = select_target(
            git,
            prompter,
            &current,
            "Select target branch from available branches:",
        )
        .map_err(|e| match e {
            GitAioError::UserInput(msg) => GitAioError::user_input(format!(
                "branch '{}' does not exist and {}",
                target, msg
            )),
            other => other,
        })
        .at_step(Step::ValidateTargetExists)?;
    }
    ui::display_status(&format!("Target branch: {}", target));

    if target == current {
        return Err(GitAioError::user_input(format!(
            "cannot merge '{}' into itself: already on target branch",
            current
        )));
    }

    tracing::info!(branch = %target, remote = %args.remote, "fetching target");
    ui::display_status(&format!("Fetching branch '{}'...", target));
    if let Err(e) = git.fetch(&args.remote, &target) {
        tracing::warn!(step = %Step::FetchTarget, error = %e, "continuing without fetch");
        ui::display_boundary_warning(&BoundaryWarning::FetchFailed {
            remote: args.remote.clone(),
            branch: target.clone(),
            reason: e.to_string(),
        });
    }

    ui::display_status(&format!("Checking out to branch '{}'...", target));
    git.checkout(&target).at_step(Step::CheckoutTarget)?;

    ui::display_status(&format!("Pulling latest changes for '{}'...", target));
    git.pull().at_step(Step::PullTarget)?;

    ui::display_status("Checking for potential merge conflicts...");
    if probe_conflicts(git, &current).at_step(Step::ProbeConflicts)? {
        ui::display_conflict_instructions(&current, &target);
        return Err(GitAioError::ConflictDetected {
            branch: current,
            target,
        });
    }

    ui::display_status(&format!("Merging '{}' into '{}'...", current, target));
    git.merge_commit(&current, !args.no_ff)
        .at_step(Step::MergeIntoTarget)?;

    ui::display_success(&format!(
        "Successfully merged '{}' into '{}'",
        current, target
    ));
    Ok(ReverseMergeOutcome {
        merged: current,
        target,
    })
}
