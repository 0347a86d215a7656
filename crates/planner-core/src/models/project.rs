//! Repository metadata gathered for planning.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RepositoryPointer;

/// Repository metadata produced by a context provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ProjectContext {
    pub repo_owner: String,
    pub repo_name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// File tree snapshot
    #[serde(default)]
    pub tree_json: Option<Value>,
    /// Dependency manifest summary
    #[serde(default)]
    pub dependency_json: Option<Value>,
    /// Free-form repository summary
    #[serde(default)]
    pub summary_json: Option<Value>,
}

impl ProjectContext {
    /// A context carrying only the pointer's coordinates.
    pub fn for_pointer(pointer: &RepositoryPointer) -> Self {
        Self {
            repo_owner: pointer.owner.clone(),
            repo_name: pointer.name.clone(),
            git_ref: pointer.git_ref.clone(),
            tree_json: None,
            dependency_json: None,
            summary_json: None,
        }
    }

    pub fn coordinate(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}
