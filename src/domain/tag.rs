//! Tag naming conventions and next-tag generation.
//!
//! A [`TagTemplate`] pairs a matcher pattern with a generator. Templates are
//! tried in priority order and the first match wins; there is no scoring.

use regex::Regex;

use crate::domain::{BumpLevel, Environment, TagComponents};
use crate::error::{GitAioError, Result};

/// A tag naming convention
#[derive(Debug)]
pub struct TagTemplate {
    pub name: &'static str,
    /// Anchored pattern with `major`, `minor` and `patch` named groups
    pub pattern: &'static str,
    pub generate: fn(TagComponents, Environment) -> String,
}

fn env_prefixed(c: TagComponents, env: Environment) -> String {
    format!("{}-v{}", env.label(), c)
}

fn env_suffixed(c: TagComponents, env: Environment) -> String {
    format!("v{}-{}", c, env.label())
}

/// Built-in conventions, highest priority first.
pub const DEFAULT_TEMPLATES: &[TagTemplate] = &[
    // qc-v1.0.0, stg-v1.0.0, prod-v1.0.0
    TagTemplate {
        name: "env-prefixed",
        pattern: r"^([a-zA-Z]+)-v(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)$",
        generate: env_prefixed,
    },
    // v1.0.0, v1.0.0-beta, v1.0.0-rc; the old suffix is replaced by the env label
    TagTemplate {
        name: "env-suffixed",
        pattern: r"^v(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)(-(\w+))?$",
        generate: env_suffixed,
    },
];

struct CompiledTemplate {
    template: &'static TagTemplate,
    regex: Regex,
}

impl CompiledTemplate {
    fn extract(&self, tag: &str) -> Result<TagComponents> {
        let captures = self
            .regex
            .captures(tag)
            .ok_or_else(|| GitAioError::NoMatchingTemplate(tag.to_string()))?;

        let component = |name: &'static str| -> Result<u32> {
            let value = captures.name(name).map(|m| m.as_str()).unwrap_or("");
            value
                .parse::<u32>()
                .map_err(|_| GitAioError::MalformedVersionComponent {
                    tag: tag.to_string(),
                    component: name,
                    value: value.to_string(),
                })
        };

        Ok(TagComponents::new(
            component("major")?,
            component("minor")?,
            component("patch")?,
        ))
    }
}

/// Ordered set of compiled tag templates
pub struct TagEngine {
    templates: Vec<CompiledTemplate>,
}

impl TagEngine {
    /// Engine over the built-in conventions
    pub fn new() -> Result<Self> {
        Self::with_templates(DEFAULT_TEMPLATES)
    }

    /// Engine over a custom ordered template list
    pub fn with_templates(templates: &'static [TagTemplate]) -> Result<Self> {
        let templates = templates
            .iter()
            .map(|template| {
                Regex::new(template.pattern)
                    .map(|regex| CompiledTemplate { template, regex })
                    .map_err(|e| {
                        GitAioError::config(format!(
                            "invalid tag template '{}': {}",
                            template.name, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TagEngine { templates })
    }

    fn find(&self, tag: &str) -> Option<&CompiledTemplate> {
        self.templates.iter().find(|c| c.regex.is_match(tag))
    }

    /// Name of the first template accepting `tag`
    pub fn template_for(&self, tag: &str) -> Option<&'static str> {
        self.find(tag).map(|c| c.template.name)
    }

    /// Decompose `tag` using the first matching template
    pub fn extract(&self, tag: &str) -> Result<TagComponents> {
        self.find(tag)
            .ok_or_else(|| GitAioError::NoMatchingTemplate(tag.to_string()))?
            .extract(tag)
    }

    /// Compute the tag following `current` for the given level and environment.
    pub fn next_tag(&self, current: &str, level: BumpLevel, env: Environment) -> Result<String> {
        let compiled = self
            .find(current)
            .ok_or_else(|| GitAioError::NoMatchingTemplate(current.to_string()))?;

        let components = compiled.extract(current)?;
        let bumped = components
            .bump(level)
            .ok_or_else(|| GitAioError::VersionOverflow {
                tag: current.to_string(),
                component: match level {
                    BumpLevel::Major => "major",
                    BumpLevel::Minor => "minor",
                    BumpLevel::Patch => "patch",
                },
            })?;

        let next = (compiled.template.generate)(bumped, env);
        tracing::debug!(
            template = compiled.template.name,
            current,
            next = %next,
            %level,
            "generated next tag"
        );
        Ok(next)
    }
}

/// Compute the next tag with the built-in conventions.
///
/// ```
/// use git_aio::domain::{generate_next_tag, BumpLevel, Environment};
///
/// let next = generate_next_tag("qc-v1.2.3", BumpLevel::Minor, Environment::Qc).unwrap();
/// assert_eq!(next, "qc-v1.3.0");
/// ```
pub fn generate_next_tag(current: &str, level: BumpLevel, env: Environment) -> Result<String> {
    TagEngine::new()?.next_tag(current, level, env)
}
