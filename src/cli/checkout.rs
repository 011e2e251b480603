//! Interactive branch switch over local and remote branches.

use crate::error::{GitAioError, Result};
use crate::git::GitRunner;
use crate::ui::{self, Prompter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The selected branch was already checked out
    AlreadyOn(String),
    /// Switched to an existing local branch
    Local(String),
    /// Created a local branch tracking the remote one
    Tracking(String),
}

/// Let the user pick any branch and switch to it.
///
/// The current branch is offered first. Remote-only branches are fetched
/// (best effort) and checked out as new tracking branches.
pub fn run_checkout<G, P>(git: &G, prompter: &P, remote: &str) -> Result<CheckoutOutcome>
where
    G: GitRunner + ?Sized,
    P: Prompter + ?Sized,
{
    let current = git.current_branch().ok();
    let mut branches = git.list_all_branches()?;
    if branches.is_empty() {
        return Err(GitAioError::user_input("no branches to check out"));
    }
    if let Some(current) = &current {
        if let Some(pos) = branches.iter().position(|b| b == current) {
            let branch = branches.remove(pos);
            branches.insert(0, branch);
        }
    }

    let selected = prompter.select("Select a branch to checkout:", &branches)?;
    if current.as_deref() == Some(selected.as_str()) {
        ui::display_status(&format!("Already on '{}'", selected));
        return Ok(CheckoutOutcome::AlreadyOn(selected));
    }

    if git.list_local_branches()?.contains(&selected) {
        git.checkout(&selected)?;
        ui::display_success(&format!("Switched to branch '{}'", selected));
        return Ok(CheckoutOutcome::Local(selected));
    }

    if let Err(e) = git.fetch(remote, &selected) {
        tracing::warn!(error = %e, branch = %selected, "fetch before checkout failed");
    }
    git.checkout_tracking(remote, &selected)?;
    ui::display_success(&format!(
        "Switched to new branch '{}' tracking '{}/{}'",
        selected, remote, selected
    ));
    Ok(CheckoutOutcome::Tracking(selected))
}
