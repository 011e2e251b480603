//! Tag release: compute, create and push the next tag for an environment,
//! then register a hosted release for environments that need a ticket.

use crate::boundary::BoundaryWarning;
use crate::cli::project_path;
use crate::config::Config;
use crate::domain::{BranchContext, BumpLevel, Environment, TagEngine};
use crate::error::{GitAioError, Result, Step, StepContext};
use crate::git::GitRunner;
use crate::release::ReleaseNotifier;
use crate::ui::{self, Prompter};

/// Arguments for one tag release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagReleaseArgs {
    pub env: Environment,
    pub level: BumpLevel,
}

/// Result of a tag release
#[derive(Debug, Clone, PartialEq)]
pub struct TagReleaseOutcome {
    /// Latest tag before this release; the baseline when there was none
    pub previous: String,

    /// Newly created and pushed tag
    pub tag: String,

    /// Whether a hosted release was created
    pub released: bool,
}

/// Environments to tag in this run.
///
/// An explicit environment wins. Otherwise the `default_envs` entry for the
/// project behind the configured remote is used, and failing that the user
/// picks one.
pub fn resolve_environments<G, P>(
    git: &G,
    prompter: &P,
    config: &Config,
    explicit: Option<Environment>,
) -> Result<Vec<Environment>>
where
    G: GitRunner + ?Sized,
    P: Prompter + ?Sized,
{
    if let Some(env) = explicit {
        return Ok(vec![env]);
    }

    match project_path(git, &config.remote) {
        Ok(project) => {
            if let Some(envs) = config.default_envs_for(&project) {
                tracing::info!(project = %project, envs = ?envs, "using configured environments");
                return Ok(envs.to_vec());
            }
        }
        Err(e) => tracing::debug!(error = %e, "no project path for default environments"),
    }

    let labels: Vec<String> = Environment::ALL
        .iter()
        .map(|env| env.label().to_string())
        .collect();
    let label = prompter.select("Select an environment:", &labels)?;
    Environment::from_label(&label)
        .map(|env| vec![env])
        .ok_or_else(|| GitAioError::user_input(format!("unknown environment '{}'", label)))
}

/// Create and push the next tag for `args.env`.
///
/// Production tags may only be cut from `main` or `master`. For every
/// environment other than QC a ticket reference is requested after the push
/// and handed to `notifier` as the release description; a missing notifier
/// or a prompter that cannot reach a user is rejected before anything is
/// tagged.
///
/// A push failure leaves the local tag in place and prints the commands to
/// push or discard it by hand.
pub fn run_tag_release<G, P>(
    git: &G,
    prompter: &P,
    notifier: Option<&dyn ReleaseNotifier>,
    config: &Config,
    args: TagReleaseArgs,
) -> Result<TagReleaseOutcome>
where
    G: GitRunner + ?Sized,
    P: Prompter + ?Sized,
{
    let TagReleaseArgs { env, level } = args;

    if !git.is_work_tree()? {
        return Err(GitAioError::user_input("not inside a git work tree"));
    }

    if env.requires_release_branch() {
        let current = git.current_branch()?;
        if !BranchContext::new(current.as_str()).is_release_branch() {
            return Err(GitAioError::user_input(format!(
                "{} tags can only be created from main or master (on '{}')",
                env, current
            )));
        }
    }

    if env.requires_ticket() && notifier.is_none() {
        return Err(GitAioError::config(format!(
            "{} releases need release.api_url and the {} token",
            env, config.release.token_env
        )));
    }

    // the ticket prompt only runs after the push
    if env.requires_ticket() && !prompter.is_interactive() {
        return Err(GitAioError::user_input(format!(
            "{} releases ask for a ticket reference; run from a terminal",
            env
        )));
    }

    let previous = git
        .latest_tags(1)
        .at_step(Step::ReadLatestTag)?
        .into_iter()
        .next()
        .unwrap_or_else(|| config.tag.baseline.clone());
    let has_prior = git.tag_exists(&previous).at_step(Step::ReadLatestTag)?;
    if !has_prior {
        ui::display_boundary_warning(&BoundaryWarning::NoPriorTag {
            baseline: previous.clone(),
        });
    }

    let tag = TagEngine::new()?.next_tag(&previous, level, env)?;
    ui::display_proposed_tag(has_prior.then_some(previous.as_str()), &tag);

    git.create_tag(&tag, &config.tag.message_for(&tag))
        .at_step(Step::CreateTag)?;
    tracing::info!(tag = %tag, "tag created");

    if let Err(e) = git.push_tag(&tag) {
        ui::display_manual_push_instruction(&tag, &config.remote);
        return Err(e.at(Step::PushTag));
    }
    ui::display_success(&format!("Pushed tag {} to {}", tag, config.remote));

    let notifier = match notifier {
        Some(notifier) if env.requires_ticket() => notifier,
        _ => {
            return Ok(TagReleaseOutcome {
                previous,
                tag,
                released: false,
            })
        }
    };

    let project = project_path(git, &config.remote).at_step(Step::NotifyRelease)?;
    let ticket = prompter.input("Enter Jira ticket (required):", true)?;
    notifier
        .create_release(&project, &tag, &ticket)
        .at_step(Step::NotifyRelease)?;
    ui::display_success(&format!("Created release {} for {}", tag, project));

    Ok(TagReleaseOutcome {
        previous,
        tag,
        released: true,
    })
}
