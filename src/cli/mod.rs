//! Workflow orchestration behind the subcommands.
//!
//! Each workflow is a straight line of steps against a [GitRunner]; the
//! first failing step ends it. Parsing lives in `main.rs` so the workflows
//! can be driven programmatically and from tests with [crate::git::MockGit].

pub mod checkout;
pub mod rmerge;
pub mod tag_release;

pub use checkout::{run_checkout, CheckoutOutcome};
pub use rmerge::{run_reverse_merge, ReverseMergeArgs, ReverseMergeOutcome};
pub use tag_release::{resolve_environments, run_tag_release, TagReleaseArgs, TagReleaseOutcome};

use crate::domain::RemotePath;
use crate::error::Result;
use crate::git::GitRunner;

/// Host and path parsed from the URL of `remote`
pub fn remote_path<G: GitRunner + ?Sized>(git: &G, remote: &str) -> Result<RemotePath> {
    RemotePath::parse(&git.remote_url(remote)?)
}

/// Project path (`group/project`) derived from the URL of `remote`.
pub fn project_path<G: GitRunner + ?Sized>(git: &G, remote: &str) -> Result<String> {
    Ok(remote_path(git, remote)?.project_path().to_string())
}
