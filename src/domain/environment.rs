use std::fmt;

use serde::{Deserialize, Serialize};

/// Deployment environment a tag is cut for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Environment {
    #[serde(rename = "qc")]
    #[value(name = "qc")]
    Qc,
    #[serde(rename = "stg")]
    #[value(name = "stg")]
    Staging,
    #[serde(rename = "prod")]
    #[value(name = "prod")]
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Qc,
        Environment::Staging,
        Environment::Production,
    ];

    /// Label used in generated tags
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Qc => "qc",
            Environment::Staging => "stg",
            Environment::Production => "prod",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Environment::ALL.into_iter().find(|env| env.label() == label)
    }

    /// Production may only be tagged from a release branch
    pub fn requires_release_branch(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Non-QC tags need a ticket reference and publish a release
    pub fn requires_ticket(&self) -> bool {
        !matches!(self, Environment::Qc)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Environment::Qc.label(), "qc");
        assert_eq!(Environment::Staging.label(), "stg");
        assert_eq!(Environment::Production.label(), "prod");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Environment::from_label("stg"), Some(Environment::Staging));
        assert_eq!(Environment::from_label("staging"), None);
    }

    #[test]
    fn test_conditional_behaviour() {
        assert!(!Environment::Qc.requires_ticket());
        assert!(Environment::Staging.requires_ticket());
        assert!(Environment::Production.requires_ticket());
        assert!(Environment::Production.requires_release_branch());
        assert!(!Environment::Staging.requires_release_branch());
    }
}
