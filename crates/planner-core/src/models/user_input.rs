//! The planning brief supplied by the client.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{FieldViolation, RequestShapeBuilder, Result};

/// The planning brief.
///
/// Instances only exist in a valid state: `purpose` and `vision` are
/// non-blank, and no entry of `must`, `dont` or `nice` is empty or
/// whitespace-only. Values are stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserInputFields")]
pub struct UserInput {
    purpose: String,
    vision: String,
    must: Vec<String>,
    dont: Vec<String>,
    nice: Vec<String>,
}

/// Unchecked wire form of [`UserInput`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UserInputFields {
    /// What the plan should accomplish
    pub purpose: String,
    /// What the finished result looks like
    pub vision: String,
    /// Hard requirements
    #[serde(default)]
    pub must: Vec<String>,
    /// Things to avoid
    #[serde(default)]
    pub dont: Vec<String>,
    /// Optional extras
    #[serde(default)]
    pub nice: Vec<String>,
}

impl UserInput {
    /// Builds a brief, rejecting it if any constraint fails.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::RequestShape` listing every violated field.
    pub fn new(
        purpose: impl Into<String>,
        vision: impl Into<String>,
        must: Vec<String>,
        dont: Vec<String>,
        nice: Vec<String>,
    ) -> Result<Self> {
        let input = Self {
            purpose: purpose.into(),
            vision: vision.into(),
            must,
            dont,
            nice,
        };

        let mut violations = RequestShapeBuilder::new();
        violations.extend(input.violations("user_input"));
        violations.finish(input)
    }

    /// Constraint violations, with field paths rooted at `prefix`.
    fn violations(&self, prefix: &str) -> Vec<FieldViolation> {
        let mut found = Vec::new();
        for (field, value) in [("purpose", &self.purpose), ("vision", &self.vision)] {
            found.extend(check_text(&format!("{prefix}.{field}"), value));
        }
        for (field, items) in [("must", &self.must), ("dont", &self.dont), ("nice", &self.nice)] {
            for (index, item) in items.iter().enumerate() {
                found.extend(check_entry(&format!("{prefix}.{field}[{index}]"), item));
            }
        }
        found
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn vision(&self) -> &str {
        &self.vision
    }

    pub fn must(&self) -> &[String] {
        &self.must
    }

    pub fn dont(&self) -> &[String] {
        &self.dont
    }

    pub fn nice(&self) -> &[String] {
        &self.nice
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check for a free-text field such as `purpose`.
pub(crate) fn check_text(path: &str, value: &str) -> Option<FieldViolation> {
    is_blank(value).then(|| FieldViolation::new(path, "must not be empty or whitespace"))
}

/// Check for one entry of `must`, `dont` or `nice`.
pub(crate) fn check_entry(path: &str, value: &str) -> Option<FieldViolation> {
    is_blank(value)
        .then(|| FieldViolation::new(path, "list entries must not be empty or whitespace"))
}

impl TryFrom<UserInputFields> for UserInput {
    type Error = crate::PlannerError;

    fn try_from(fields: UserInputFields) -> Result<Self> {
        Self::new(
            fields.purpose,
            fields.vision,
            fields.must,
            fields.dont,
            fields.nice,
        )
    }
}

#[cfg(feature = "schema")]
impl JsonSchema for UserInput {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        UserInputFields::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        UserInputFields::json_schema(g)
    }
}
