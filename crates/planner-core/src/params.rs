//! Inbound request parameters and their shape checks.
//!
//! Transports hand the raw request body to [`parse_plan_request`]. Parsing
//! walks the JSON by hand instead of relying on `serde` so that every field
//! violation is reported at once, not just the first one, and so that a
//! rejected body still yields a request id the client can correlate.
//!
//! ```text
//! raw bytes ──▶ serde_json::Value ──▶ shape checks ──▶ PlanRequest
//!                                          │
//!                                          └──▶ RejectedRequest { request_id, error }
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    error::{PlannerError, RequestShapeBuilder, Result},
    ids,
    models::{
        json_type_name,
        user_input::{check_entry, check_text},
        RepositoryPointer, UserInput,
    },
};

const USER_INPUT_KEYS: [&str; 5] = ["purpose", "vision", "must", "dont", "nice"];

/// Parameters for a planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PlanRequest {
    /// Repository to plan against
    pub repository: RepositoryPointer,
    /// The planning brief
    pub user_input: UserInput,
    /// Client-provided request ID for idempotency and tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// A body that failed shape checks, with the id to report it under.
#[derive(Debug)]
pub struct RejectedRequest {
    pub request_id: Uuid,
    pub error: PlannerError,
}

/// Parses a raw plan request body.
///
/// # Errors
///
/// Returns a [`RejectedRequest`] carrying a `PlannerError::RequestShape`
/// with every violation found, and a request id salvaged from the body
/// when possible.
pub fn parse_plan_request(body: &[u8]) -> std::result::Result<PlanRequest, RejectedRequest> {
    let raw: Value = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) => {
            return Err(RejectedRequest {
                request_id: ids::salvage(None),
                error: PlannerError::invalid_field("body", format!("invalid JSON: {e}")),
            })
        }
    };

    PlanRequest::from_json(&raw).map_err(|error| RejectedRequest {
        request_id: ids::salvage(Some(&raw)),
        error,
    })
}

/// Parses a raw repository pointer body, as used by the debug context route.
///
/// # Errors
///
/// Returns `PlannerError::RequestShape` listing every violation.
pub fn parse_repository_pointer(body: &[u8]) -> Result<RepositoryPointer> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| PlannerError::invalid_field("body", format!("invalid JSON: {e}")))?;

    let mut violations = RequestShapeBuilder::new();
    let pointer = pointer_from_json(&raw, None, &mut violations);
    match pointer {
        Some(pointer) if violations.is_empty() => Ok(pointer),
        _ => Err(violations.into_error()),
    }
}

impl PlanRequest {
    /// Checks a decoded JSON body and builds the request.
    ///
    /// Unknown top-level keys are ignored; unknown `user_input` keys are not.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::RequestShape` listing every violation.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let mut violations = RequestShapeBuilder::new();

        let Some(body) = raw.as_object() else {
            violations.push(
                "body",
                format!("expected a JSON object, got {}", json_type_name(raw)),
            );
            return Err(violations.into_error());
        };

        let repository = match body.get("repository") {
            Some(value) => pointer_from_json(value, Some("repository"), &mut violations),
            None => {
                violations.push("repository", "field required");
                None
            }
        };

        let user_input = match body.get("user_input") {
            Some(value) => user_input_from_json(value, &mut violations),
            None => {
                violations.push("user_input", "field required");
                None
            }
        };

        let request_id = match body.get("request_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => match Uuid::parse_str(s) {
                Ok(id) => Some(id),
                Err(e) => {
                    violations.push("request_id", format!("invalid UUID: {e}"));
                    None
                }
            },
            Some(other) => {
                violations.push(
                    "request_id",
                    format!("expected a UUID string, got {}", json_type_name(other)),
                );
                None
            }
        };

        match (repository, user_input) {
            (Some(repository), Some(user_input)) if violations.is_empty() => Ok(Self {
                repository,
                user_input,
                request_id,
            }),
            _ => Err(violations.into_error()),
        }
    }
}

fn path(prefix: Option<&str>, field: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{field}"),
        None => field.to_string(),
    }
}

fn expect_object<'a>(
    value: &'a Value,
    field: &str,
    violations: &mut RequestShapeBuilder,
) -> Option<&'a Map<String, Value>> {
    let object = value.as_object();
    if object.is_none() {
        violations.push(
            field,
            format!("expected an object, got {}", json_type_name(value)),
        );
    }
    object
}

/// A required, non-blank string field.
fn required_text(
    object: &Map<String, Value>,
    field: String,
    key: &str,
    violations: &mut RequestShapeBuilder,
) -> Option<String> {
    match object.get(key) {
        None => {
            violations.push(field, "field required");
            None
        }
        Some(Value::String(s)) => match check_text(&field, s) {
            Some(violation) => {
                violations.extend([violation]);
                None
            }
            None => Some(s.clone()),
        },
        Some(other) => {
            violations.push(
                field,
                format!("expected a string, got {}", json_type_name(other)),
            );
            None
        }
    }
}

fn pointer_from_json(
    value: &Value,
    prefix: Option<&str>,
    violations: &mut RequestShapeBuilder,
) -> Option<RepositoryPointer> {
    let object = expect_object(value, prefix.unwrap_or("body"), violations)?;

    let owner = required_text(object, path(prefix, "owner"), "owner", violations);
    let name = required_text(object, path(prefix, "name"), "name", violations);
    // A blank ref means the default branch.
    let git_ref = match object.get("ref") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.trim().is_empty() => Some(None),
        Some(Value::String(_)) => {
            required_text(object, path(prefix, "ref"), "ref", violations).map(Some)
        }
        Some(other) => {
            violations.push(
                path(prefix, "ref"),
                format!("expected a string, got {}", json_type_name(other)),
            );
            None
        }
    };

    Some(RepositoryPointer::new(owner?, name?, git_ref?))
}

fn string_list(
    object: &Map<String, Value>,
    key: &str,
    violations: &mut RequestShapeBuilder,
) -> Option<Vec<String>> {
    let field = format!("user_input.{key}");
    let items = match object.get(key) {
        None => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            violations.push(
                field,
                format!("expected a list of strings, got {}", json_type_name(other)),
            );
            return None;
        }
    };

    let mut list = Vec::with_capacity(items.len());
    let mut clean = true;
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{field}[{index}]");
        match item {
            Value::String(s) => match check_entry(&item_path, s) {
                Some(violation) => {
                    violations.extend([violation]);
                    clean = false;
                }
                None => list.push(s.clone()),
            },
            other => {
                violations.push(
                    item_path,
                    format!("expected a string, got {}", json_type_name(other)),
                );
                clean = false;
            }
        }
    }
    clean.then_some(list)
}

fn user_input_from_json(value: &Value, violations: &mut RequestShapeBuilder) -> Option<UserInput> {
    let object = expect_object(value, "user_input", violations)?;

    for key in object.keys() {
        if !USER_INPUT_KEYS.contains(&key.as_str()) {
            violations.push(format!("user_input.{key}"), "extra fields not permitted");
        }
    }

    let purpose = required_text(object, "user_input.purpose".to_string(), "purpose", violations);
    let vision = required_text(object, "user_input.vision".to_string(), "vision", violations);
    let must = string_list(object, "must", violations);
    let dont = string_list(object, "dont", violations);
    let nice = string_list(object, "nice", violations);

    // Every check UserInput::new repeats has already passed here.
    UserInput::new(purpose?, vision?, must?, dont?, nice?).ok()
}
