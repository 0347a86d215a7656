use std::path::PathBuf;

use planner_core::{Planner, PlannerBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Helper function to create a planner reading fixtures from a temp file
pub fn create_test_planner(fixtures: &Value) -> (TempDir, PathBuf, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let fixture_path = temp_dir.path().join("mock_context.json");
    std::fs::write(&fixture_path, fixtures.to_string()).expect("Failed to write fixtures");
    let planner = PlannerBuilder::new()
        .with_fixture_path(Some(&fixture_path))
        .build();
    (temp_dir, fixture_path, planner)
}

/// Request body for a repository with a valid brief
pub fn plan_body(owner: &str, name: &str) -> Value {
    json!({
        "repository": {"owner": owner, "name": name},
        "user_input": {
            "purpose": "Add user authentication",
            "vision": "Users can sign in with their company account",
            "must": ["Use OAuth2"],
            "dont": ["Store plaintext passwords"],
            "nice": []
        }
    })
}
