//! Repository coordinates.

use std::fmt;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ref used when a request does not name one.
pub const DEFAULT_REF: &str = "refs/heads/main";

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

/// Coordinate of a source repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RepositoryPointer {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Git ref (branch, tag, or commit SHA)
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

impl RepositoryPointer {
    /// Creates a pointer, falling back to [`DEFAULT_REF`] when no ref is given.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        git_ref: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            git_ref: git_ref.unwrap_or_else(default_ref),
        }
    }

    /// The `owner/name` key used for lookups and logging.
    pub fn coordinate(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.git_ref)
    }
}
