//! Project path derivation from a git remote URL.
//!
//! Accepts the URL shapes git itself accepts for remotes:
//! - `https://host/group/project.git` (any `scheme://`, optional `user@`)
//! - `git@host:group/project.git` (scp-like)

use regex::Regex;

use crate::error::{GitAioError, Result};

/// Host and repository path of a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    pub host: String,
    /// Path below the host, without leading slash or `.git` suffix
    pub path: String,
}

impl RemotePath {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let invalid = || GitAioError::config(format!("cannot derive project path from remote URL '{}'", url));

        let re = Regex::new(
            r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/|(?:[^@/]+@)?(?P<scp_host>[^/:]+):)(?P<path>.+?)(?:\.git)?/?$",
        )
        .map_err(|e| GitAioError::config(format!("invalid remote URL pattern: {}", e)))?;

        let captures = re.captures(url).ok_or_else(invalid)?;
        let host = captures
            .name("host")
            .or_else(|| captures.name("scp_host"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(invalid)?;
        let path = captures
            .name("path")
            .map(|m| m.as_str().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(invalid)?;

        Ok(RemotePath { host, path })
    }

    /// Full `group/subgroup/project` path, used as the project id
    pub fn project_path(&self) -> &str {
        &self.path
    }

    /// Last path segment
    pub fn project_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
