use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Environment;
use crate::error::{GitAioError, Result};

const LOCAL_CONFIG: &str = "./git-aio.toml";
const USER_CONFIG: &str = ".git-aio.toml";

/// Represents the complete configuration for git-aio.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Remote used for fetch, pull and tag pushes
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// Project path -> environments tagged when none is given on the command line
    #[serde(default)]
    pub default_envs: HashMap<String, Vec<Environment>>,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_baseline() -> String {
    "v0.0.0".to_string()
}

fn default_tag_message() -> String {
    "Release {tag}".to_string()
}

fn default_token_env() -> String {
    "GITLAB_PRIVATE_TOKEN".to_string()
}

/// Tag generation settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    /// Tag assumed when the repository has none yet
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Annotation message; `{tag}` is replaced with the new tag name
    #[serde(default = "default_tag_message")]
    pub message: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            baseline: default_baseline(),
            message: default_tag_message(),
        }
    }
}

impl TagConfig {
    pub fn message_for(&self, tag: &str) -> String {
        self.message.replace("{tag}", tag)
    }
}

/// Reverse-merge settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MergeConfig {
    /// Always create a merge commit on the target branch
    #[serde(default)]
    pub no_ff: bool,
}

/// Release hosting settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Base of the hosting API, e.g. `https://gitlab.example.com/api/v4`
    #[serde(default)]
    pub api_url: Option<String>,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            api_url: None,
            token_env: default_token_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            tag: TagConfig::default(),
            merge: MergeConfig::default(),
            release: ReleaseConfig::default(),
            default_envs: HashMap::new(),
        }
    }
}

impl Config {
    /// Environments configured for a project, if any
    pub fn default_envs_for(&self, project_path: &str) -> Option<&[Environment]> {
        self.default_envs
            .get(project_path)
            .map(Vec::as_slice)
            .filter(|envs| !envs.is_empty())
    }
}

/// Candidate config file locations, most specific first.
fn config_candidates(config_path: Option<&str>) -> Vec<PathBuf> {
    if let Some(path) = config_path {
        return vec![PathBuf::from(path)];
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(USER_CONFIG));
    }
    candidates
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter (must exist)
/// 2. `git-aio.toml` in current directory
/// 3. `.git-aio.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        if !Path::new(path).exists() {
            return Err(GitAioError::config(format!(
                "config file '{}' does not exist",
                path
            )));
        }
    }

    match config_candidates(config_path)
        .into_iter()
        .find(|path| path.exists())
    {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = fs::read_to_string(&path)?;
            parse_config(&content)
                .map_err(|e| GitAioError::config(format!("{}: {}", path.display(), e)))
        }
        None => Ok(Config::default()),
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| GitAioError::config(e.to_string()))
}
