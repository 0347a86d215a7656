//! Wire-level response envelopes and the HTTP status mapping.
//!
//! Every request ends in exactly one of two shapes:
//!
//! ```text
//! success: {"request_id", "run_id", "status", "payload"?}
//! error:   {"error": {"code", "message", "field"?}, "request_id"}
//! ```
//!
//! An error envelope never carries a `run_id`.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::PlannerError,
    models::ValidatedPayload,
    params::RejectedRequest,
    planner::{PlanFailure, PlanOutcome, Stage},
};

/// Malformed request body.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Context stage failure.
pub const CONTEXT_DRIVER_ERROR: &str = "CONTEXT_DRIVER_ERROR";
/// Generation stage failure.
pub const PROMPT_ENGINE_ERROR: &str = "PROMPT_ENGINE_ERROR";
/// Fixture data missing, reported by the debug context route.
pub const FIXTURE_NOT_FOUND: &str = "FIXTURE_NOT_FOUND";
/// Validation stage failure that carried no code of its own.
pub const PLAN_VALIDATION_ERROR: &str = "PLAN_VALIDATION_ERROR";

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessEnvelope {
    pub request_id: Uuid,
    pub run_id: Uuid,
    pub status: String,
    /// Present only when `status` is `"completed"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ValidatedPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// The offending field, when exactly one is at fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Detail for a rejected request body.
    pub fn request_shape(error: &PlannerError) -> Self {
        let detail = Self::new(VALIDATION_ERROR, error.message());
        match error {
            PlannerError::RequestShape { violations } if violations.len() == 1 => {
                detail.with_field(violations[0].field.clone())
            }
            _ => detail,
        }
    }

    /// Detail for a failed pipeline stage.
    pub fn stage(stage: Stage, error: &PlannerError) -> Self {
        let code = match stage {
            Stage::Context => CONTEXT_DRIVER_ERROR,
            Stage::Engine => PROMPT_ENGINE_ERROR,
            Stage::Validation => error.validation_code().unwrap_or(PLAN_VALIDATION_ERROR),
        };
        Self::new(code, error.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
    pub request_id: Uuid,
}

/// Either envelope, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
}

/// An envelope paired with the HTTP status it is sent under.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Envelope,
}

impl ApiResponse {
    pub fn error(status_code: u16, request_id: Uuid, error: ErrorDetail) -> Self {
        Self {
            status_code,
            body: Envelope::Error(ErrorEnvelope { error, request_id }),
        }
    }

    /// Envelope for a transport-level fault, coded `HTTP_<status>`.
    pub fn http_fault(status_code: u16, message: impl Into<String>, request_id: Uuid) -> Self {
        Self::error(
            status_code,
            request_id,
            ErrorDetail::new(format!("HTTP_{status_code}"), message),
        )
    }

    pub fn request_id(&self) -> Uuid {
        match &self.body {
            Envelope::Success(success) => success.request_id,
            Envelope::Error(error) => error.request_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, Envelope::Success(_))
    }

    /// The error detail, for error envelopes.
    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        match &self.body {
            Envelope::Success(_) => None,
            Envelope::Error(error) => Some(&error.error),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

impl From<PlanOutcome> for ApiResponse {
    fn from(outcome: PlanOutcome) -> Self {
        match outcome {
            PlanOutcome::Completed(plan) => {
                let payload = plan.is_completed().then_some(plan.payload);
                Self {
                    status_code: STATUS_OK,
                    body: Envelope::Success(SuccessEnvelope {
                        request_id: plan.request_id,
                        run_id: plan.run_id,
                        status: plan.status,
                        payload,
                    }),
                }
            }
            PlanOutcome::Failed(failure) => failure.into(),
        }
    }
}

impl From<PlanFailure> for ApiResponse {
    fn from(failure: PlanFailure) -> Self {
        Self::error(
            STATUS_INTERNAL_ERROR,
            failure.request_id,
            ErrorDetail::stage(failure.stage, &failure.error),
        )
    }
}

impl From<RejectedRequest> for ApiResponse {
    fn from(rejected: RejectedRequest) -> Self {
        Self::error(
            STATUS_UNPROCESSABLE,
            rejected.request_id,
            ErrorDetail::request_shape(&rejected.error),
        )
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.body).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
