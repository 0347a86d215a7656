//! Per-request log context and pipeline state.

use std::fmt;

use log::{info, warn};
use uuid::Uuid;

use super::outcome::Stage;
use crate::{
    error::PlannerError,
    models::{RepositoryPointer, UserInput},
    preview_purpose,
};

/// Where a request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    ContextFetching,
    Generating,
    Validating,
    Completed,
    Failed(Stage),
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed(_))
    }

    fn outcome(self) -> &'static str {
        match self {
            PipelineState::Completed => "completed",
            PipelineState::Failed(_) => "failed",
            _ => "in_progress",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Received => f.write_str("received"),
            PipelineState::ContextFetching => f.write_str("context_fetching"),
            PipelineState::Generating => f.write_str("generating"),
            PipelineState::Validating => f.write_str("validating"),
            PipelineState::Completed => f.write_str("completed"),
            PipelineState::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

/// Log context carried down the pipeline for one request.
///
/// Owns the request's state so every transition is logged with the same
/// request id and repository coordinate.
#[derive(Debug)]
pub struct RequestScope {
    request_id: Uuid,
    repository: String,
    state: PipelineState,
}

impl RequestScope {
    /// Opens a scope in the `Received` state.
    pub fn open(request_id: Uuid, pointer: &RepositoryPointer, user_input: &UserInput) -> Self {
        let scope = Self {
            request_id,
            repository: pointer.coordinate(),
            state: PipelineState::Received,
        };
        info!(
            request_id:% = scope.request_id,
            repository:% = scope.repository,
            git_ref:% = pointer.git_ref,
            purpose:% = preview_purpose(user_input.purpose());
            "plan_request_received"
        );
        scope
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Moves to `next`, logging the transition.
    pub fn advance(&mut self, next: PipelineState) {
        info!(
            request_id:% = self.request_id,
            repository:% = self.repository,
            from:% = self.state,
            to:% = next,
            outcome = next.outcome();
            "pipeline_transition"
        );
        self.state = next;
    }

    /// Moves to `Failed(stage)`, logging the transition and the error.
    pub fn fail(&mut self, stage: Stage, error: &PlannerError) {
        warn!(
            request_id:% = self.request_id,
            repository:% = self.repository,
            from:% = self.state,
            to:% = PipelineState::Failed(stage),
            outcome = "failed",
            stage = stage.as_str(),
            error:% = error;
            "pipeline_transition"
        );
        self.state = PipelineState::Failed(stage);
    }
}
