use anyhow::Result;
use clap::{Parser, Subcommand};

use git_aio::cli::{self, ReverseMergeArgs, TagReleaseArgs};
use git_aio::config::{self, Config};
use git_aio::domain::{BumpLevel, Environment};
use git_aio::git::SystemGit;
use git_aio::logging;
use git_aio::release::{GitlabNotifier, ReleaseNotifier};
use git_aio::ui::{self, TerminalPrompter};

#[derive(Parser)]
#[command(
    name = "git-aio",
    version,
    about = "Environment tagging and reverse merges for git repositories"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create and push the next tag for an environment
    Tag {
        /// Environment to tag; configured defaults or a prompt when omitted
        #[arg(value_enum)]
        env: Option<Environment>,

        /// Bump level: b (patch), m (minor), M (major)
        #[arg(short, long, default_value = "b")]
        level: String,
    },

    /// Merge the current branch into a target branch
    Rmerge {
        /// Target branch; prompted for when omitted
        target: Option<String>,

        #[arg(long, help = "Always create a merge commit")]
        no_ff: bool,
    },

    /// Select a local or remote branch and switch to it
    #[command(alias = "ckl")]
    Checkout,

    /// Print the group/project path derived from the remote URL
    #[command(alias = "fname")]
    ProjectName {
        #[arg(long, help = "Print only the last path segment")]
        short: bool,
    },
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let git = SystemGit::from_config(".", &config)?;
    let prompter = TerminalPrompter::new();

    match args.command {
        Command::Tag { env, level } => tag(&git, &prompter, &config, env, &level),
        Command::Rmerge { target, no_ff } => {
            let merge_args = ReverseMergeArgs {
                target,
                remote: config.remote.clone(),
                no_ff: no_ff || config.merge.no_ff,
            };
            cli::run_reverse_merge(&git, &prompter, &merge_args)?;
            Ok(())
        }
        Command::Checkout => {
            cli::run_checkout(&git, &prompter, &config.remote)?;
            Ok(())
        }
        Command::ProjectName { short } => {
            let remote = cli::remote_path(&git, &config.remote)?;
            if short {
                println!("{}", remote.project_name());
            } else {
                println!("{}", remote.project_path());
            }
            Ok(())
        }
    }
}

fn tag(
    git: &SystemGit,
    prompter: &TerminalPrompter,
    config: &Config,
    env: Option<Environment>,
    level: &str,
) -> Result<()> {
    let level = BumpLevel::from_flag(level);
    let envs = cli::resolve_environments(git, prompter, config, env)?;

    let notifier = if envs.iter().any(Environment::requires_ticket) {
        Some(GitlabNotifier::from_config(&config.release)?)
    } else {
        None
    };
    let notifier = notifier.as_ref().map(|n| n as &dyn ReleaseNotifier);

    for env in envs {
        let outcome =
            cli::run_tag_release(git, prompter, notifier, config, TagReleaseArgs { env, level })?;
        println!(
            "\n{} Published tag {} for {}\n",
            console::style("✓").green(),
            outcome.tag,
            env
        );
    }
    Ok(())
}
