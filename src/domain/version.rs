use std::fmt;

/// Numeric components extracted from a matched tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TagComponents {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl TagComponents {
    /// Create new components
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        TagComponents {
            major,
            minor,
            patch,
        }
    }

    /// Bump according to level, resetting lower-order components.
    ///
    /// Returns `None` when the incremented component would overflow.
    pub fn bump(&self, level: BumpLevel) -> Option<Self> {
        let next = match level {
            BumpLevel::Major => TagComponents {
                major: self.major.checked_add(1)?,
                minor: 0,
                patch: 0,
            },
            BumpLevel::Minor => TagComponents {
                major: self.major,
                minor: self.minor.checked_add(1)?,
                patch: 0,
            },
            BumpLevel::Patch => TagComponents {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1)?,
            },
        };
        Some(next)
    }
}

impl fmt::Display for TagComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpLevel {
    #[default]
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    /// Parse the `--level` flag: `b` (bug/patch), `m` (minor), `M` (major).
    ///
    /// Anything else falls back to [`BumpLevel::Patch`].
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "M" => BumpLevel::Major,
            "m" => BumpLevel::Minor,
            "b" => BumpLevel::Patch,
            other => {
                tracing::warn!(level = other, "unrecognized bump level, using patch");
                BumpLevel::Patch
            }
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpLevel::Patch => "patch",
            BumpLevel::Minor => "minor",
            BumpLevel::Major => "major",
        };
        f.write_str(name)
    }
}
