//! Deterministic stub generation engine.

use async_trait::async_trait;
use log::info;
use serde_json::{json, Value};

use super::GenerationEngine;
use crate::{
    error::Result,
    models::{CandidatePayload, PlanningContext},
};

/// Plan schema version reported by the stub engine.
pub const PLAN_VERSION: &str = "af/1.1-stub";

/// How many characters of `purpose` previews show before truncating.
pub const PREVIEW_PURPOSE_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Shortens `purpose` to [`PREVIEW_PURPOSE_CHARS`] characters, appending an
/// ellipsis when anything was cut.
///
/// ```rust
/// use planner_core::preview_purpose;
///
/// assert_eq!(preview_purpose("short"), "short");
/// assert_eq!(preview_purpose(&"x".repeat(60)), format!("{}...", "x".repeat(50)));
/// ```
pub fn preview_purpose(purpose: &str) -> String {
    match purpose.char_indices().nth(PREVIEW_PURPOSE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &purpose[..cut]),
        None => purpose.to_string(),
    }
}

/// Generation engine that mirrors its input back as a plan payload.
///
/// No network or model calls are made. Output depends only on the planning
/// context, so identical contexts yield identical payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubGenerationEngine;

impl StubGenerationEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationEngine for StubGenerationEngine {
    fn name(&self) -> &str {
        "stub"
    }

    async fn run(&self, context: &PlanningContext) -> Result<CandidatePayload> {
        let request_id = context.request_id().to_string();
        let primary = context.primary();
        let repository = primary.coordinate();

        info!(request_id:% = request_id, repository:% = repository; "stub_prompt_engine_run");

        let user_input = context.user_input();
        let prompt_preview = format!(
            "[STUB] Planning request for {repository}: {}",
            preview_purpose(user_input.purpose())
        );

        let projects: Vec<Value> = context
            .projects()
            .iter()
            .map(|p| {
                json!({
                    "repo_owner": p.repo_owner,
                    "repo_name": p.repo_name,
                    "ref": p.git_ref,
                    "tree_json": p.tree_json,
                    "dependency_json": p.dependency_json,
                    "summary_json": p.summary_json,
                })
            })
            .collect();

        Ok(CandidatePayload(json!({
            "request_id": request_id,
            "plan_version": PLAN_VERSION,
            "repository": {
                "owner": primary.repo_owner,
                "name": primary.repo_name,
                "ref": primary.git_ref,
            },
            "user_input": {
                "purpose": user_input.purpose(),
                "vision": user_input.vision(),
                "must": user_input.must(),
                "dont": user_input.dont(),
                "nice": user_input.nice(),
            },
            "context": projects,
            "status": "success",
            "prompt_preview": prompt_preview,
        })))
    }
}
