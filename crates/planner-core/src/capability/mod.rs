//! Pluggable capabilities the planning pipeline depends on.
//!
//! The pipeline needs three things done for it and implements none of them
//! itself:
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ ContextProvider  │    │ GenerationEngine │    │ OutputValidator  │
//! │ pointer ─▶ repo  │───▶│ context ─▶ plan  │───▶│ plan ─▶ checked  │
//! │ metadata         │    │ candidate        │    │ payload          │
//! └──────────────────┘    └──────────────────┘    └──────────────────┘
//! ```
//!
//! Each capability is a trait with exactly one bundled, deterministic
//! implementation:
//!
//! - [`context::FixtureContextProvider`] answers from a JSON fixture set
//! - [`engine::StubGenerationEngine`] mirrors its input back as a plan
//! - [`validator::StubOutputValidator`] enforces the minimum payload contract
//!
//! Production backends implement the same traits and are plugged in through
//! a [`registry::BackendRegistry`] or injected directly on the
//! [`PlannerBuilder`](crate::PlannerBuilder). Which implementation runs is
//! decided once, when the planner is built; the pipeline only ever sees the
//! trait objects.
//!
//! Backends surface every failure as the stage's error kind: a timeout in a
//! production engine is a `PlannerError::Engine`, a 404 from a code host is
//! a `PlannerError::ContextUnavailable` or `ContextBackend`. The pipeline
//! imposes no deadline of its own.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{CandidatePayload, PlanningContext, ProjectContext, RepositoryPointer, ValidatedPayload},
};

pub mod context;
pub mod engine;
pub mod registry;
pub mod validator;

#[cfg(test)]
mod tests;

pub use context::{FixtureContextProvider, FixtureSource, FIXTURE_FILE_NAME};
pub use engine::{preview_purpose, StubGenerationEngine, PLAN_VERSION, PREVIEW_PURPOSE_CHARS};
pub use registry::{BackendRegistry, Factory};
pub use validator::StubOutputValidator;

/// Fetches project context for a repository.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Backend name reported in selection logs.
    fn name(&self) -> &str;

    /// Fetch project context for the given repository.
    ///
    /// # Errors
    ///
    /// `PlannerError::ContextUnavailable` when the backing data is missing,
    /// `PlannerError::ContextBackend` for any other failure.
    async fn fetch_context(&self, pointer: &RepositoryPointer) -> Result<ProjectContext>;
}

/// Produces a candidate plan from assembled planning context.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Backend name reported in selection logs.
    fn name(&self) -> &str;

    /// Generate a candidate payload.
    ///
    /// # Errors
    ///
    /// `PlannerError::Engine` for every failure, whatever its cause.
    async fn run(&self, context: &PlanningContext) -> Result<CandidatePayload>;
}

/// Checks a candidate payload before it is sent to the client.
#[async_trait]
pub trait OutputValidator: Send + Sync {
    /// Backend name reported in selection logs.
    fn name(&self) -> &str;

    /// Validate a candidate payload, returning it unchanged when it passes.
    ///
    /// # Errors
    ///
    /// `PlannerError::Validation` carrying a machine code per violation.
    async fn validate(
        &self,
        context: &PlanningContext,
        candidate: CandidatePayload,
    ) -> Result<ValidatedPayload>;
}
