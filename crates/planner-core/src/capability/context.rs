//! Fixture-backed context provider.

use std::{borrow::Cow, collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;
use tokio::{sync::OnceCell, task};

use super::ContextProvider;
use crate::{
    error::{ContextResultExt, PlannerError, Result},
    models::{ProjectContext, RepositoryPointer},
};

/// File name of the fixture set, bundled or on disk.
pub const FIXTURE_FILE_NAME: &str = "mock_context.json";

const BUNDLED_FIXTURES: &str = include_str!("../../resources/mock_context.json");

/// Where fixture data is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FixtureSource {
    /// The fixture set compiled into the binary
    #[default]
    Bundled,
    /// A fixture file on disk, read on first use
    File(PathBuf),
}

#[derive(Debug, Default, Deserialize)]
struct FixtureSet {
    #[serde(default)]
    repositories: HashMap<String, FixtureEntry>,
    #[serde(default)]
    default: FixtureEntry,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FixtureEntry {
    #[serde(default)]
    tree_json: Option<Value>,
    #[serde(default)]
    dependency_json: Option<Value>,
    #[serde(default)]
    summary_json: Option<Value>,
}

/// Context provider answering from a JSON fixture set.
///
/// Repositories are looked up by their exact `owner/name` key. Unknown
/// repositories get the fixture set's `default` entry, so a lookup miss is
/// never an error. The returned context always carries the pointer's own
/// coordinates; fixtures only supply the JSON blobs.
///
/// The fixture set is loaded on first use and cached for the life of the
/// provider. Concurrent first callers wait for a single load.
#[derive(Debug)]
pub struct FixtureContextProvider {
    source: FixtureSource,
    fixtures: OnceCell<FixtureSet>,
}

impl FixtureContextProvider {
    pub fn new(source: FixtureSource) -> Self {
        Self {
            source,
            fixtures: OnceCell::new(),
        }
    }

    /// Provider over the fixture set compiled into the binary.
    pub fn bundled() -> Self {
        Self::new(FixtureSource::Bundled)
    }

    /// Provider over a fixture file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FixtureSource::File(path.into()))
    }

    async fn fixtures(&self) -> Result<&FixtureSet> {
        self.fixtures.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<FixtureSet> {
        let text: Cow<'static, str> = match &self.source {
            FixtureSource::Bundled => Cow::Borrowed(BUNDLED_FIXTURES),
            FixtureSource::File(path) => Cow::Owned(read_fixture_file(path.clone()).await?),
        };

        let fixtures: FixtureSet =
            serde_json::from_str(&text).context_backend("Malformed context fixture data")?;

        info!(
            source:? = self.source,
            repositories = fixtures.repositories.len();
            "context_fixtures_loaded"
        );
        Ok(fixtures)
    }
}

async fn read_fixture_file(path: PathBuf) -> Result<String> {
    task::spawn_blocking(move || match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(path:? = path, error:% = e; "fixture_file_missing");
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| FIXTURE_FILE_NAME.to_string());
            Err(PlannerError::context_unavailable(format!(
                "Mock context fixture file not found: {file_name}"
            )))
        }
        Err(e) => Err(PlannerError::FileSystem { path, source: e }),
    })
    .await
    .map_err(|e| PlannerError::Configuration {
        message: format!("Task join error: {e}"),
    })?
}

impl Default for FixtureContextProvider {
    fn default() -> Self {
        Self::bundled()
    }
}

#[async_trait]
impl ContextProvider for FixtureContextProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_context(&self, pointer: &RepositoryPointer) -> Result<ProjectContext> {
        let fixtures = self.fixtures().await?;
        let key = pointer.coordinate();

        let entry = match fixtures.repositories.get(&key) {
            Some(entry) => entry,
            None => {
                debug!(repository:% = key; "using_default_mock_context");
                &fixtures.default
            }
        };

        Ok(ProjectContext {
            tree_json: entry.tree_json.clone(),
            dependency_json: entry.dependency_json.clone(),
            summary_json: entry.summary_json.clone(),
            ..ProjectContext::for_pointer(pointer)
        })
    }
}
