//! Domain logic - pure rules independent of git operations

pub mod branch;
pub mod environment;
pub mod remote_url;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use environment::Environment;
pub use remote_url::RemotePath;
pub use tag::{generate_next_tag, TagEngine, TagTemplate};
pub use version::{BumpLevel, TagComponents};
