use std::fmt;

use thiserror::Error;

/// Named workflow step, attached to failures so the user knows where a
/// multi-step operation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResolveCurrentBranch,
    ResolveTargetBranch,
    ValidateTargetExists,
    FetchTarget,
    CheckoutTarget,
    PullTarget,
    ProbeConflicts,
    MergeIntoTarget,
    ReadLatestTag,
    CreateTag,
    PushTag,
    NotifyRelease,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ResolveCurrentBranch => "resolve current branch",
            Step::ResolveTargetBranch => "resolve target branch",
            Step::ValidateTargetExists => "validate target branch",
            Step::FetchTarget => "fetch target branch",
            Step::CheckoutTarget => "checkout target branch",
            Step::PullTarget => "pull target branch",
            Step::ProbeConflicts => "probe merge conflicts",
            Step::MergeIntoTarget => "merge into target branch",
            Step::ReadLatestTag => "read latest tag",
            Step::CreateTag => "create tag",
            Step::PushTag => "push tag",
            Step::NotifyRelease => "notify release",
        };
        f.write_str(name)
    }
}

/// Unified error type for git-aio operations
#[derive(Error, Debug)]
pub enum GitAioError {
    #[error("{0}")]
    UserInput(String),

    #[error("`git {command}` failed:\n{output}")]
    Command { command: String, output: String },

    #[error(
        "merge conflicts detected: cannot merge '{branch}' into '{target}', please resolve conflicts manually"
    )]
    ConflictDetected { branch: String, target: String },

    #[error("tag '{0}' does not match any supported template")]
    NoMatchingTemplate(String),

    #[error("tag '{tag}' has a malformed {component} component '{value}'")]
    MalformedVersionComponent {
        tag: String,
        component: &'static str,
        value: String,
    },

    #[error("tag '{tag}' cannot be bumped: {component} component would overflow")]
    VersionOverflow {
        tag: String,
        component: &'static str,
    },

    #[error("conflict probe against '{branch}' failed:\n{output}")]
    ProbeExecution { branch: String, output: String },

    #[error("failed to {step}: {source}")]
    StepFailed {
        step: Step,
        #[source]
        source: Box<GitAioError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Release notification failed: {0}")]
    Release(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-aio
pub type Result<T> = std::result::Result<T, GitAioError>;

impl GitAioError {
    pub fn user_input(msg: impl Into<String>) -> Self {
        GitAioError::UserInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        GitAioError::Config(msg.into())
    }

    pub fn release(msg: impl Into<String>) -> Self {
        GitAioError::Release(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        GitAioError::Prompt(msg.into())
    }

    /// Attach the failing workflow step.
    ///
    /// User-input and conflict outcomes pass through untouched: they are
    /// terminal answers rather than step failures.
    pub fn at(self, step: Step) -> Self {
        match self {
            GitAioError::UserInput(_)
            | GitAioError::ConflictDetected { .. }
            | GitAioError::StepFailed { .. } => self,
            other => GitAioError::StepFailed {
                step,
                source: Box::new(other),
            },
        }
    }

    /// The failing step, if this error was raised inside a workflow step.
    pub fn step(&self) -> Option<Step> {
        match self {
            GitAioError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The error with any step wrapper removed.
    pub fn root(&self) -> &GitAioError {
        match self {
            GitAioError::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension for tagging step failures inline with `?`.
pub trait StepContext<T> {
    fn at_step(self, step: Step) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn at_step(self, step: Step) -> Result<T> {
        self.map_err(|e| e.at(step))
    }
}
