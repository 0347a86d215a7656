//! Engine output before and after validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw, unchecked output of a generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidatePayload(pub Value);

impl CandidatePayload {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for CandidatePayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A payload that passed output validation and may be sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedPayload(Map<String, Value>);

impl ValidatedPayload {
    /// Wraps an object that an [`OutputValidator`](crate::OutputValidator)
    /// has accepted.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The engine's self-reported status, when it is a string.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// JSON type name used in validation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
