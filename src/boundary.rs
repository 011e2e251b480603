use std::fmt;

/// Non-fatal conditions hit while running a workflow.
/// These are reported to the user and the workflow carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Fetching the target failed; it may exist only locally
    FetchFailed {
        remote: String,
        branch: String,
        reason: String,
    },
    /// Requested target branch exists neither locally nor on the remote
    TargetBranchMissing { branch: String },
    /// Repository has no tags; the configured baseline is used instead
    NoPriorTag { baseline: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::FetchFailed {
                remote,
                branch,
                reason,
            } => {
                let first_line = reason.lines().next().unwrap_or("").trim();
                write!(
                    f,
                    "Failed to fetch '{}' from '{}' ({}), continuing with local data",
                    branch, remote, first_line
                )
            }
            BoundaryWarning::TargetBranchMissing { branch } => {
                write!(f, "Branch '{}' does not exist", branch)
            }
            BoundaryWarning::NoPriorTag { baseline } => {
                write!(f, "No tags found, starting from baseline '{}'", baseline)
            }
        }
    }
}
