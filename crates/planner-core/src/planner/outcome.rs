//! Terminal results of a pipeline run.

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::PlannerError,
    ids,
    models::ValidatedPayload,
    response::PLAN_VALIDATION_ERROR,
};

/// Outward status of a run whose engine reported success.
pub const STATUS_COMPLETED: &str = "completed";

const ENGINE_SUCCESS: &str = "success";

/// The fallible steps of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Context,
    Engine,
    Validation,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Context => "context",
            Stage::Engine => "engine",
            Stage::Validation => "validation",
        }
    }

    /// Folds an error raised inside this stage into the stage's own kind.
    ///
    /// Backends should already report their stage's kind; anything else is
    /// rewrapped with its message kept.
    pub fn normalize(self, error: PlannerError) -> PlannerError {
        match (self, error) {
            (Stage::Context, e @ PlannerError::ContextUnavailable { .. })
            | (Stage::Context, e @ PlannerError::ContextBackend { .. })
            | (Stage::Engine, e @ PlannerError::Engine { .. })
            | (Stage::Validation, e @ PlannerError::Validation { .. }) => e,
            (Stage::Context, e) => PlannerError::context_backend(e.message()),
            (Stage::Engine, e) => PlannerError::engine(e.message()),
            (Stage::Validation, e) => {
                PlannerError::validation(PLAN_VALIDATION_ERROR).with_message(e.message())
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run that made it through every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPlan {
    pub request_id: Uuid,
    pub run_id: Uuid,
    /// Outward status, see [`outward_status`]
    pub status: String,
    pub payload: ValidatedPayload,
}

impl CompletedPlan {
    pub fn new(request_id: Uuid, payload: ValidatedPayload) -> Self {
        Self {
            request_id,
            run_id: ids::run_id_for(request_id),
            status: outward_status(payload.get("status")),
            payload,
        }
    }

    /// Whether the payload is delivered with the response.
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Maps the engine's self-reported status to the status clients see.
///
/// `"success"`, a missing status, or a non-string status all read as
/// `"completed"`. Any other string is passed through verbatim.
pub fn outward_status(engine_status: Option<&Value>) -> String {
    match engine_status.and_then(Value::as_str) {
        None | Some(ENGINE_SUCCESS) => STATUS_COMPLETED.to_string(),
        Some(other) => other.to_string(),
    }
}

/// A run that stopped at a stage.
#[derive(Debug)]
pub struct PlanFailure {
    pub request_id: Uuid,
    pub stage: Stage,
    pub error: PlannerError,
}

impl PlanFailure {
    pub fn new(request_id: Uuid, stage: Stage, error: PlannerError) -> Self {
        Self {
            request_id,
            stage,
            error: stage.normalize(error),
        }
    }
}

/// Terminal result of one pipeline run. Produced exactly once per request.
#[derive(Debug)]
pub enum PlanOutcome {
    Completed(CompletedPlan),
    Failed(PlanFailure),
}

impl PlanOutcome {
    pub fn request_id(&self) -> Uuid {
        match self {
            PlanOutcome::Completed(plan) => plan.request_id,
            PlanOutcome::Failed(failure) => failure.request_id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PlanOutcome::Failed(_))
    }
}
