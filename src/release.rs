//! Release notification on the hosting service.
//!
//! After a non-QC tag is pushed, a release entry is created through the
//! hosting API so deployment tooling picks it up.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::ReleaseConfig;
use crate::error::{GitAioError, Result};

/// Publishes a release for a pushed tag
pub trait ReleaseNotifier {
    fn create_release(&self, project_path: &str, tag: &str, description: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct ReleasePayload<'a> {
    name: &'a str,
    tag_name: &'a str,
    description: &'a str,
}

/// GitLab releases API client.
pub struct GitlabNotifier {
    api_url: String,
    token: String,
    http: Client,
}

impl GitlabNotifier {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GitAioError::release(format!("cannot build HTTP client: {}", e)))?;

        Ok(GitlabNotifier {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    /// Build from config, reading the token from the configured variable.
    pub fn from_config(config: &ReleaseConfig) -> Result<Self> {
        let api_url = config
            .api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| GitAioError::config("release.api_url is not set"))?;

        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| GitAioError::config(format!("{} is not set", config.token_env)))?;

        Self::new(api_url, token)
    }

    /// Releases endpoint for a project path (`group/project`)
    pub fn endpoint(&self, project_path: &str) -> String {
        format!(
            "{}/projects/{}/releases",
            self.api_url,
            project_path.replace('/', "%2F")
        )
    }
}

impl ReleaseNotifier for GitlabNotifier {
    fn create_release(&self, project_path: &str, tag: &str, description: &str) -> Result<()> {
        let url = self.endpoint(project_path);
        tracing::info!(%url, tag, "creating release");

        let response = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&ReleasePayload {
                name: tag,
                tag_name: tag,
                description,
            })
            .send()
            .map_err(|e| GitAioError::release(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%status, %body, "release API returned error");
            return Err(GitAioError::release(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}
