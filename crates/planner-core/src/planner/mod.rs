//! The request orchestration pipeline.
//!
//! A [`Planner`] owns one instance of each capability and runs every request
//! through them in strict sequence:
//!
//! ```text
//!              ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐
//! PlanRequest  │ ContextProvider │   │ GenerationEngine │   │ OutputValidator │
//! ───────────▶ │ fetch_context   │──▶│ run              │──▶│ validate        │──▶ PlanOutcome
//!              └────────┬────────┘   └────────┬─────────┘   └────────┬────────┘
//!                       └─────────────────────┴──────────────────────┴──▶ PlanFailure { stage }
//! ```
//!
//! The first failing stage ends the run. Nothing is retried and nothing is
//! kept between requests; the planner itself is immutable once built and can
//! be cloned freely across tasks.
//!
//! ## Submodules
//!
//! - [`builder`]: resolves which capability implementations a planner uses
//! - [`outcome`]: terminal results and the stage error normalization
//! - [`scope`]: per-request log context and the state machine it logs
//!
//! # Usage Examples
//!
//! ```rust
//! use planner_core::PlannerBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build();
//!
//! let response = planner
//!     .handle(br#"{
//!         "repository": {"owner": "test-owner", "name": "test-repo"},
//!         "user_input": {"purpose": "Add user authentication", "vision": "Secure login"}
//!     }"#)
//!     .await;
//!
//! assert_eq!(response.status_code, 200);
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc};

use log::warn;

use crate::{
    capability::{ContextProvider, GenerationEngine, OutputValidator},
    error::Result,
    ids,
    models::{PlanningContext, ProjectContext, RepositoryPointer, ValidatedPayload},
    params::{parse_plan_request, PlanRequest},
    response::ApiResponse,
};

pub mod builder;
pub mod outcome;
pub mod scope;


pub use builder::PlannerBuilder;
pub use outcome::{outward_status, CompletedPlan, PlanFailure, PlanOutcome, Stage, STATUS_COMPLETED};
pub use scope::{PipelineState, RequestScope};

/// Runs planning requests through the capability pipeline.
#[derive(Clone)]
pub struct Planner {
    context_provider: Arc<dyn ContextProvider>,
    engine: Arc<dyn GenerationEngine>,
    validator: Arc<dyn OutputValidator>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("context_provider", &self.context_provider.name())
            .field("engine", &self.engine.name())
            .field("validator", &self.validator.name())
            .finish()
    }
}

impl Planner {
    fn new(
        context_provider: Arc<dyn ContextProvider>,
        engine: Arc<dyn GenerationEngine>,
        validator: Arc<dyn OutputValidator>,
    ) -> Self {
        Self {
            context_provider,
            engine,
            validator,
        }
    }

    pub fn context_provider(&self) -> &dyn ContextProvider {
        self.context_provider.as_ref()
    }

    pub fn engine(&self) -> &dyn GenerationEngine {
        self.engine.as_ref()
    }

    pub fn validator(&self) -> &dyn OutputValidator {
        self.validator.as_ref()
    }

    /// Runs a well-formed request through every stage.
    ///
    /// Never fails: stage errors come back as [`PlanOutcome::Failed`].
    pub async fn plan(&self, request: PlanRequest) -> PlanOutcome {
        let request_id = ids::assign(request.request_id);
        let mut scope = RequestScope::open(request_id, &request.repository, &request.user_input);

        match self.run(&mut scope, request).await {
            Ok(payload) => {
                scope.advance(PipelineState::Completed);
                PlanOutcome::Completed(CompletedPlan::new(request_id, payload))
            }
            Err(failure) => {
                scope.fail(failure.stage, &failure.error);
                PlanOutcome::Failed(failure)
            }
        }
    }

    async fn run(
        &self,
        scope: &mut RequestScope,
        request: PlanRequest,
    ) -> std::result::Result<ValidatedPayload, PlanFailure> {
        let request_id = scope.request_id();

        scope.advance(PipelineState::ContextFetching);
        let primary = self
            .context_provider
            .fetch_context(&request.repository)
            .await
            .map_err(|e| PlanFailure::new(request_id, Stage::Context, e))?;

        let context = PlanningContext::new(request_id, request.user_input, primary);

        scope.advance(PipelineState::Generating);
        let candidate = self
            .engine
            .run(&context)
            .await
            .map_err(|e| PlanFailure::new(request_id, Stage::Engine, e))?;

        scope.advance(PipelineState::Validating);
        self.validator
            .validate(&context, candidate)
            .await
            .map_err(|e| PlanFailure::new(request_id, Stage::Validation, e))
    }

    /// Parses a raw request body, runs it, and assembles the response.
    ///
    /// Malformed bodies are rejected before any capability is called.
    pub async fn handle(&self, body: &[u8]) -> ApiResponse {
        match parse_plan_request(body) {
            Ok(request) => self.plan(request).await.into(),
            Err(rejected) => {
                warn!(
                    request_id:% = rejected.request_id,
                    error:% = rejected.error;
                    "plan_request_rejected"
                );
                rejected.into()
            }
        }
    }

    /// Fetches context for one repository outside of a planning run.
    ///
    /// # Errors
    ///
    /// `PlannerError::ContextUnavailable` or `PlannerError::ContextBackend`.
    pub async fn fetch_context(&self, pointer: &RepositoryPointer) -> Result<ProjectContext> {
        self.context_provider
            .fetch_context(pointer)
            .await
            .map_err(|e| Stage::Context.normalize(e))
    }
}
