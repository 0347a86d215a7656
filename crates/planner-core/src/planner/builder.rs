//! Builder for creating and configuring Planner instances.

use std::{path::Path, sync::Arc};

use super::Planner;
use crate::capability::{
    BackendRegistry, ContextProvider, FixtureContextProvider, FixtureSource, GenerationEngine,
    OutputValidator, StubGenerationEngine, StubOutputValidator,
};

/// Builder for creating and configuring Planner instances.
///
/// Each capability is resolved once, in [`PlannerBuilder::build`]:
///
/// 1. an implementation injected with `with_context_provider`,
///    `with_engine` or `with_validator` wins outright;
/// 2. otherwise the configured backend name is looked up in the registry;
/// 3. otherwise the bundled stub is used.
#[derive(Default)]
pub struct PlannerBuilder {
    fixture_source: FixtureSource,
    context_backend: Option<String>,
    engine_backend: Option<String>,
    validator_backend: Option<String>,
    registry: BackendRegistry,
    context_provider: Option<Arc<dyn ContextProvider>>,
    engine: Option<Arc<dyn GenerationEngine>>,
    validator: Option<Arc<dyn OutputValidator>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixture file for the fallback context provider.
    ///
    /// If not specified, the fixture set compiled into the crate is used.
    pub fn with_fixture_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.fixture_source = FixtureSource::File(path.as_ref().to_path_buf());
        }
        self
    }

    /// Names the production context provider to look up in the registry.
    pub fn with_context_backend(mut self, name: Option<String>) -> Self {
        self.context_backend = name;
        self
    }

    /// Names the production generation engine to look up in the registry.
    pub fn with_engine_backend(mut self, name: Option<String>) -> Self {
        self.engine_backend = name;
        self
    }

    /// Names the production output validator to look up in the registry.
    pub fn with_validator_backend(mut self, name: Option<String>) -> Self {
        self.validator_backend = name;
        self
    }

    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.context_provider = Some(provider);
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn GenerationEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn OutputValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Builds the configured planner instance.
    ///
    /// Never fails: an unknown or broken backend falls back to its stub.
    /// Fixture data is not read until the first context fetch.
    pub fn build(self) -> Planner {
        let Self {
            fixture_source,
            context_backend,
            engine_backend,
            validator_backend,
            registry,
            context_provider,
            engine,
            validator,
        } = self;

        let context_provider = context_provider.unwrap_or_else(|| {
            registry.select_context_provider(context_backend.as_deref(), || {
                Arc::new(FixtureContextProvider::new(fixture_source))
            })
        });
        let engine = engine.unwrap_or_else(|| {
            registry.select_engine(engine_backend.as_deref(), || {
                Arc::new(StubGenerationEngine::new())
            })
        });
        let validator = validator.unwrap_or_else(|| {
            registry.select_validator(validator_backend.as_deref(), || {
                Arc::new(StubOutputValidator::new())
            })
        });

        Planner::new(context_provider, engine, validator)
    }
}
