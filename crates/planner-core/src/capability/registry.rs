//! Named production backends and the fallback selection policy.

use std::{collections::HashMap, fmt, sync::Arc};

use log::{info, warn};

use super::{ContextProvider, GenerationEngine, OutputValidator};
use crate::error::Result;

/// Constructor for a named backend.
pub type Factory<T> = Box<dyn Fn() -> Result<Arc<T>> + Send + Sync>;

/// Registry of production backends by name.
///
/// Binaries that link a production backend register it here; the planner
/// builder then asks for the configured name. An unregistered name, or a
/// factory that fails, falls back to the bundled stub.
///
/// ```rust
/// use std::sync::Arc;
///
/// use planner_core::{BackendRegistry, ContextProvider, FixtureContextProvider};
///
/// let mut registry = BackendRegistry::new();
/// registry.register_context_provider("github", || {
///     Ok(Arc::new(FixtureContextProvider::bundled()) as Arc<dyn ContextProvider>)
/// });
///
/// let provider = registry.select_context_provider(Some("github"), || {
///     Arc::new(FixtureContextProvider::bundled())
/// });
/// assert_eq!(provider.name(), "fixture");
/// ```
#[derive(Default)]
pub struct BackendRegistry {
    context_providers: HashMap<String, Factory<dyn ContextProvider>>,
    engines: HashMap<String, Factory<dyn GenerationEngine>>,
    validators: HashMap<String, Factory<dyn OutputValidator>>,
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("context_providers", &self.context_providers.keys())
            .field("engines", &self.engines.keys())
            .field("validators", &self.validators.keys())
            .finish()
    }
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_context_provider<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn ContextProvider>> + Send + Sync + 'static,
    {
        self.context_providers.insert(name.into(), Box::new(factory));
    }

    pub fn register_engine<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn GenerationEngine>> + Send + Sync + 'static,
    {
        self.engines.insert(name.into(), Box::new(factory));
    }

    pub fn register_validator<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn OutputValidator>> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Box::new(factory));
    }

    /// Resolve the context provider, falling back to `fallback` when the
    /// named backend is unavailable.
    pub fn select_context_provider(
        &self,
        name: Option<&str>,
        fallback: impl FnOnce() -> Arc<dyn ContextProvider>,
    ) -> Arc<dyn ContextProvider> {
        select("context_provider", &self.context_providers, name, fallback, |p| {
            p.name().to_string()
        })
    }

    /// Resolve the generation engine, falling back to `fallback` when the
    /// named backend is unavailable.
    pub fn select_engine(
        &self,
        name: Option<&str>,
        fallback: impl FnOnce() -> Arc<dyn GenerationEngine>,
    ) -> Arc<dyn GenerationEngine> {
        select("prompt_engine", &self.engines, name, fallback, |e| {
            e.name().to_string()
        })
    }

    /// Resolve the output validator, falling back to `fallback` when the
    /// named backend is unavailable.
    pub fn select_validator(
        &self,
        name: Option<&str>,
        fallback: impl FnOnce() -> Arc<dyn OutputValidator>,
    ) -> Arc<dyn OutputValidator> {
        select("plan_validator", &self.validators, name, fallback, |v| {
            v.name().to_string()
        })
    }
}

fn select<T: ?Sized>(
    capability: &str,
    factories: &HashMap<String, Factory<T>>,
    name: Option<&str>,
    fallback: impl FnOnce() -> Arc<T>,
    backend_name: impl Fn(&T) -> String,
) -> Arc<T> {
    let reason = match name {
        None => "no backend configured".to_string(),
        Some(name) => match factories.get(name) {
            None => format!("{name} not available"),
            Some(factory) => match factory() {
                Ok(backend) => {
                    info!(capability = capability, backend = name; "{capability}_selected");
                    return backend;
                }
                Err(e) => {
                    warn!(
                        capability = capability,
                        backend = name,
                        error:% = e;
                        "{capability}_init_failed"
                    );
                    format!("{name} failed to initialize: {}", e.message())
                }
            },
        },
    };

    let backend = fallback();
    info!(
        capability = capability,
        backend:% = backend_name(backend.as_ref()),
        reason:% = reason;
        "{capability}_fallback"
    );
    backend
}
