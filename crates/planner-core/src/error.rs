//! Error types for the planner library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single problem found while checking the shape of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `user_input.must[1]`
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Client-supplied data failed structural or semantic checks
    #[error("Invalid request: {}", join_violations(.violations))]
    RequestShape { violations: Vec<FieldViolation> },
    /// The backing data for project context could not be located
    #[error("Context unavailable: {message}")]
    ContextUnavailable { message: String },
    /// Any other failure while fetching project context
    #[error("Context backend error: {message}")]
    ContextBackend { message: String },
    /// Any failure inside the generation engine
    #[error("Prompt engine error: {message}")]
    Engine { message: String },
    /// The candidate payload broke the output contract
    #[error("Plan validation failed [{code}]: {message}")]
    Validation { code: String, message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builder for creating output validation errors.
pub struct ValidationErrorBuilder {
    code: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a machine code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Build the error with the given human message.
    pub fn with_message(self, message: impl Into<String>) -> PlannerError {
        PlannerError::Validation {
            code: self.code,
            message: message.into(),
        }
    }
}

/// Builder for creating request shape errors one field at a time.
#[derive(Debug, Default)]
pub struct RequestShapeBuilder {
    violations: Vec<FieldViolation>,
}

impl RequestShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field.
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, reason));
    }

    /// Merge violations gathered elsewhere.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = FieldViolation>) {
        self.violations.extend(violations);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `Ok(value)` when nothing was recorded, the collected error
    /// otherwise.
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.violations.is_empty() {
            Ok(value)
        } else {
            Err(PlannerError::RequestShape {
                violations: self.violations,
            })
        }
    }

    pub fn into_error(self) -> PlannerError {
        PlannerError::RequestShape {
            violations: self.violations,
        }
    }
}

impl PlannerError {
    /// Creates a builder for output validation errors.
    pub fn validation(code: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(code)
    }

    /// Creates a request shape error for a single field.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlannerError::RequestShape {
            violations: vec![FieldViolation::new(field, reason)],
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        PlannerError::Engine {
            message: message.into(),
        }
    }

    pub fn context_backend(message: impl Into<String>) -> Self {
        PlannerError::ContextBackend {
            message: message.into(),
        }
    }

    pub fn context_unavailable(message: impl Into<String>) -> Self {
        PlannerError::ContextUnavailable {
            message: message.into(),
        }
    }

    /// Machine code carried by validation failures.
    pub fn validation_code(&self) -> Option<&str> {
        match self {
            PlannerError::Validation { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Human message without the variant prefix added by `Display`.
    pub fn message(&self) -> String {
        match self {
            PlannerError::RequestShape { violations } => join_violations(violations),
            PlannerError::ContextUnavailable { message }
            | PlannerError::ContextBackend { message }
            | PlannerError::Engine { message }
            | PlannerError::Validation { message, .. }
            | PlannerError::Configuration { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Extension trait mapping foreign errors into context-stage errors.
pub trait ContextResultExt<T> {
    /// Map any error into `PlannerError::ContextBackend` with a message.
    fn context_backend(self, message: &str) -> Result<T>;
}

/// Extension trait mapping foreign errors into engine-stage errors.
pub trait EngineResultExt<T> {
    /// Map any error into `PlannerError::Engine` with a message.
    fn engine_context(self, message: &str) -> Result<T>;
}

impl<T, E> ContextResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context_backend(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::ContextBackend {
            message: format!("{message}: {e}"),
        })
    }
}

impl<T, E> EngineResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn engine_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::Engine {
            message: format!("{message}: {e}"),
        })
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;
