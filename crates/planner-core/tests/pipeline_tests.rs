mod common;

use common::{create_test_planner, plan_body};
use planner_core::{FixtureContextProvider, PlannerBuilder, RepositoryPointer};
use serde_json::{json, Value};
use tokio::task::JoinSet;

#[tokio::test]
async fn test_fixture_file_drives_plan_context() {
    let (_temp_dir, _path, planner) = create_test_planner(&json!({
        "repositories": {
            "acme/widgets": {
                "tree_json": {"paths": ["src/lib.rs"]},
                "summary_json": {"description": "Widget library"}
            }
        },
        "default": {}
    }));

    let body = serde_json::to_vec(&plan_body("acme", "widgets")).unwrap();
    let response = planner.handle(&body).await;
    let envelope = response.to_json();

    assert_eq!(response.status_code, 200);
    let context = &envelope["payload"]["context"][0];
    assert_eq!(context["repo_owner"], "acme");
    assert_eq!(context["tree_json"], json!({"paths": ["src/lib.rs"]}));
    assert_eq!(context["dependency_json"], Value::Null);
    assert_eq!(
        envelope["payload"]["prompt_preview"],
        "[STUB] Planning request for acme/widgets: Add user authentication"
    );
}

#[tokio::test]
async fn test_unlisted_repository_uses_default_entry() {
    let (_temp_dir, _path, planner) = create_test_planner(&json!({
        "repositories": {},
        "default": {"summary_json": {"description": "generic"}}
    }));

    let context = planner
        .fetch_context(&RepositoryPointer::new(
            "nobody",
            "nothing",
            Some("refs/tags/v1".to_string()),
        ))
        .await
        .expect("Failed to fetch context");

    assert_eq!(context.repo_owner, "nobody");
    assert_eq!(context.git_ref, "refs/tags/v1");
    assert_eq!(context.summary_json, Some(json!({"description": "generic"})));
}

#[tokio::test]
async fn test_fixture_removed_after_first_request() {
    let (_temp_dir, path, planner) = create_test_planner(&json!({"default": {}}));
    let body = serde_json::to_vec(&plan_body("acme", "widgets")).unwrap();

    assert_eq!(planner.handle(&body).await.status_code, 200);
    std::fs::remove_file(&path).expect("Failed to remove fixtures");
    assert_eq!(planner.handle(&body).await.status_code, 200);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_planner() {
    let planner = PlannerBuilder::new().build();
    let mut tasks = JoinSet::new();

    for _ in 0..16 {
        let planner = planner.clone();
        tasks.spawn(async move {
            let body = serde_json::to_vec(&plan_body("test-owner", "test-repo")).unwrap();
            planner.handle(&body).await
        });
    }

    let mut ids = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let response = joined.expect("Task panicked");
        assert_eq!(response.status_code, 200);
        ids.push(response.request_id());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn test_shape_errors_are_reported_together() {
    let planner = PlannerBuilder::new().build();
    let body = json!({
        "repository": {"owner": "", "name": 7},
        "user_input": {"purpose": "   ", "vision": "ok", "extra": true}
    });

    let response = planner.handle(&serde_json::to_vec(&body).unwrap()).await;
    let detail = response.error_detail().expect("Expected an error envelope");

    assert_eq!(response.status_code, 422);
    assert_eq!(detail.code, "VALIDATION_ERROR");
    assert!(detail.field.is_none());
    for field in [
        "repository.owner",
        "repository.name",
        "user_input.purpose",
        "user_input.extra",
    ] {
        assert!(detail.message.contains(field), "{field} missing from {}", detail.message);
    }
}

#[tokio::test]
async fn test_injected_provider_overrides_fixture_path() {
    let planner = PlannerBuilder::new()
        .with_fixture_path(Some("/nonexistent/mock_context.json"))
        .with_context_provider(std::sync::Arc::new(FixtureContextProvider::bundled()))
        .build();

    let body = serde_json::to_vec(&plan_body("test-owner", "test-repo")).unwrap();
    assert_eq!(planner.handle(&body).await.status_code, 200);
}
