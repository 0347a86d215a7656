//! Minimal structural output validator.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::OutputValidator;
use crate::{
    error::{PlannerError, Result},
    models::{json_type_name, CandidatePayload, PlanningContext, ValidatedPayload},
};

pub const INVALID_PAYLOAD_TYPE: &str = "INVALID_PAYLOAD_TYPE";
pub const MISSING_REQUEST_ID: &str = "MISSING_REQUEST_ID";
pub const INVALID_REQUEST_ID_TYPE: &str = "INVALID_REQUEST_ID_TYPE";
pub const MISSING_PLAN_VERSION: &str = "MISSING_PLAN_VERSION";
pub const INVALID_PLAN_VERSION_TYPE: &str = "INVALID_PLAN_VERSION_TYPE";

/// Validator enforcing the floor every payload must meet.
///
/// Checks, in order, stopping at the first failure:
///
/// 1. the payload is a JSON object
/// 2. `request_id` is present and a string
/// 3. `plan_version` is present and a string
///
/// Any other keys are passed through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubOutputValidator;

impl StubOutputValidator {
    pub fn new() -> Self {
        Self
    }
}

fn require_string(
    fields: &Map<String, Value>,
    key: &str,
    missing_code: &str,
    type_code: &str,
) -> Result<()> {
    match fields.get(key) {
        None => Err(PlannerError::validation(missing_code)
            .with_message(format!("Payload missing required key: {key}"))),
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(PlannerError::validation(type_code).with_message(format!(
            "{key} must be a string, got {}",
            json_type_name(other)
        ))),
    }
}

#[async_trait]
impl OutputValidator for StubOutputValidator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn validate(
        &self,
        _context: &PlanningContext,
        candidate: CandidatePayload,
    ) -> Result<ValidatedPayload> {
        let fields = match candidate.into_inner() {
            Value::Object(fields) => fields,
            other => {
                return Err(PlannerError::validation(INVALID_PAYLOAD_TYPE).with_message(format!(
                    "Expected object payload, got {}",
                    json_type_name(&other)
                )))
            }
        };

        require_string(&fields, "request_id", MISSING_REQUEST_ID, INVALID_REQUEST_ID_TYPE)?;
        require_string(
            &fields,
            "plan_version",
            MISSING_PLAN_VERSION,
            INVALID_PLAN_VERSION_TYPE,
        )?;

        Ok(ValidatedPayload::new(fields))
    }
}
