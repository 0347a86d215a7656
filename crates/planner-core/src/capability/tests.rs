//! Tests for the bundled capabilities and backend selection.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinSet;
use uuid::Uuid;

use super::{validator::*, *};
use crate::{
    error::PlannerError,
    models::{CandidatePayload, PlanningContext, ProjectContext, RepositoryPointer, UserInput},
};

fn test_pointer(name: &str, git_ref: Option<&str>) -> RepositoryPointer {
    RepositoryPointer::new("test-owner", name, git_ref.map(str::to_string))
}

fn test_brief(purpose: &str) -> UserInput {
    UserInput::new(
        purpose,
        "Secure login flow",
        vec!["Use OAuth2".to_string()],
        vec!["Store plaintext passwords".to_string()],
        vec![],
    )
    .expect("Failed to build user input")
}

fn test_context(purpose: &str) -> PlanningContext {
    let pointer = test_pointer("test-repo", None);
    PlanningContext::new(
        Uuid::new_v4(),
        test_brief(purpose),
        ProjectContext::for_pointer(&pointer),
    )
}

async fn validate(payload: Value) -> crate::error::Result<crate::models::ValidatedPayload> {
    StubOutputValidator::new()
        .validate(&test_context("Add user authentication"), CandidatePayload(payload))
        .await
}

mod context_tests {
    use super::*;

    #[tokio::test]
    async fn test_known_repository_uses_fixture_entry() {
        let provider = FixtureContextProvider::bundled();
        let context = provider
            .fetch_context(&test_pointer("test-repo", None))
            .await
            .expect("Failed to fetch context");

        assert_eq!(context.repo_owner, "test-owner");
        assert_eq!(context.repo_name, "test-repo");
        assert_eq!(context.git_ref, "refs/heads/main");
        assert_eq!(context.dependency_json.as_ref().unwrap()["manager"], "pip");
        assert!(context.tree_json.is_some());
        assert!(context.summary_json.is_some());
    }

    #[tokio::test]
    async fn test_unknown_repository_falls_back_to_default() {
        let provider = FixtureContextProvider::bundled();
        let pointer = RepositoryPointer::new("someone-else", "unlisted", None);
        let context = provider
            .fetch_context(&pointer)
            .await
            .expect("Unknown repository should not be an error");

        assert_eq!(context.repo_owner, "someone-else");
        assert_eq!(context.repo_name, "unlisted");
        assert_eq!(context.git_ref, "refs/heads/main");
        assert_eq!(context.tree_json, Some(json!({"paths": ["README.md"]})));
    }

    #[tokio::test]
    async fn test_explicit_ref_is_echoed() {
        let provider = FixtureContextProvider::bundled();
        let context = provider
            .fetch_context(&test_pointer("test-repo", Some("refs/heads/feature-x")))
            .await
            .unwrap();

        assert_eq!(context.git_ref, "refs/heads/feature-x");
    }

    #[tokio::test]
    async fn test_repeated_fetches_are_identical() {
        let provider = FixtureContextProvider::bundled();
        let pointer = test_pointer("test-repo", None);

        let first = provider.fetch_context(&pointer).await.unwrap();
        let second = provider.fetch_context(&pointer).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_fixture_file_is_context_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let provider = FixtureContextProvider::from_path(temp_dir.path().join(FIXTURE_FILE_NAME));

        let err = provider
            .fetch_context(&test_pointer("test-repo", None))
            .await
            .unwrap_err();

        assert!(matches!(err, PlannerError::ContextUnavailable { .. }));
        assert!(err.message().contains("mock_context.json"));
    }

    #[tokio::test]
    async fn test_malformed_fixture_file_is_backend_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FIXTURE_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let provider = FixtureContextProvider::from_path(&path);
        let err = provider
            .fetch_context(&test_pointer("test-repo", None))
            .await
            .unwrap_err();

        assert!(matches!(err, PlannerError::ContextBackend { .. }));
    }

    #[tokio::test]
    async fn test_fixture_file_is_read_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FIXTURE_FILE_NAME);
        std::fs::write(
            &path,
            json!({
                "repositories": {
                    "test-owner/test-repo": {"summary_json": {"description": "from disk"}}
                },
                "default": {}
            })
            .to_string(),
        )
        .unwrap();

        let provider = FixtureContextProvider::from_path(&path);
        let pointer = test_pointer("test-repo", None);
        let first = provider.fetch_context(&pointer).await.unwrap();

        // Served from the cache once loaded
        std::fs::remove_file(&path).unwrap();
        let second = provider.fetch_context(&pointer).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.summary_json, Some(json!({"description": "from disk"})));
        assert_eq!(second.tree_json, None);
    }

    #[tokio::test]
    async fn test_concurrent_first_fetches_agree() {
        let provider = Arc::new(FixtureContextProvider::bundled());
        let mut tasks = JoinSet::new();
        for _ in 0..8 {
            let provider = Arc::clone(&provider);
            tasks.spawn(async move {
                provider
                    .fetch_context(&test_pointer("test-repo", None))
                    .await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            results.push(joined.unwrap().unwrap());
        }

        assert_eq!(results.len(), 8);
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }
}

mod engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_output_shape() {
        let context = test_context("Add user authentication");
        let payload = StubGenerationEngine::new().run(&context).await.unwrap().into_inner();

        assert_eq!(payload["request_id"], context.request_id().to_string());
        assert_eq!(payload["plan_version"], PLAN_VERSION);
        assert_eq!(payload["status"], "success");
        assert_eq!(
            payload["repository"],
            json!({"owner": "test-owner", "name": "test-repo", "ref": "refs/heads/main"})
        );
        assert_eq!(payload["user_input"]["must"], json!(["Use OAuth2"]));
        assert_eq!(payload["user_input"]["nice"], json!([]));
        assert_eq!(payload["context"].as_array().unwrap().len(), 1);
        assert_eq!(
            payload["prompt_preview"],
            "[STUB] Planning request for test-owner/test-repo: Add user authentication"
        );
    }

    #[tokio::test]
    async fn test_preview_truncates_long_purpose() {
        let purpose = "a".repeat(80);
        let payload = StubGenerationEngine::new()
            .run(&test_context(&purpose))
            .await
            .unwrap()
            .into_inner();

        let preview = payload["prompt_preview"].as_str().unwrap();
        assert!(preview.ends_with(&format!("{}...", "a".repeat(50))));
        // The full purpose is still mirrored
        assert_eq!(payload["user_input"]["purpose"], purpose);
    }

    #[test]
    fn test_preview_purpose_is_char_safe() {
        let purpose = "é".repeat(51);
        assert_eq!(preview_purpose(&purpose), format!("{}...", "é".repeat(50)));
        assert_eq!(preview_purpose(&"é".repeat(50)), "é".repeat(50));
    }

    #[tokio::test]
    async fn test_only_primary_project_drives_repository() {
        let secondary = ProjectContext::for_pointer(&RepositoryPointer::new("lib-owner", "lib", None));
        let context = test_context("Add user authentication").with_project(secondary);

        let payload = StubGenerationEngine::new().run(&context).await.unwrap().into_inner();

        assert_eq!(payload["repository"]["owner"], "test-owner");
        let mirrored = payload["context"].as_array().unwrap();
        assert_eq!(mirrored.len(), 2);
        assert_eq!(mirrored[1]["repo_owner"], "lib-owner");
    }

    #[tokio::test]
    async fn test_identical_contexts_give_identical_payloads() {
        let context = test_context("Add user authentication");
        let engine = StubGenerationEngine::new();

        let first = engine.run(&context).await.unwrap();
        let second = engine.run(&context).await.unwrap();
        assert_eq!(first, second);
    }
}

mod validator_tests {
    use super::*;

    fn assert_code(result: crate::error::Result<crate::models::ValidatedPayload>, code: &str) {
        let err = result.unwrap_err();
        assert_eq!(err.validation_code(), Some(code), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_accepts_minimal_payload_unchanged() {
        let payload = json!({
            "request_id": "abc",
            "plan_version": "1",
            "extra": {"nested": [1, 2, 3]},
        });
        let validated = validate(payload.clone()).await.unwrap();

        assert_eq!(Value::Object(validated.into_inner()), payload);
    }

    #[tokio::test]
    async fn test_rejects_non_object() {
        let err = validate(json!(["not", "an", "object"])).await.unwrap_err();
        assert_eq!(err.validation_code(), Some(INVALID_PAYLOAD_TYPE));
        assert_eq!(err.message(), "Expected object payload, got array");
    }

    #[tokio::test]
    async fn test_missing_request_id() {
        assert_code(validate(json!({"plan_version": "1"})).await, MISSING_REQUEST_ID);
    }

    #[tokio::test]
    async fn test_request_id_checked_before_plan_version() {
        assert_code(validate(json!({})).await, MISSING_REQUEST_ID);
    }

    #[tokio::test]
    async fn test_request_id_type_checked_before_plan_version() {
        let err = validate(json!({"request_id": 12})).await.unwrap_err();
        assert_eq!(err.validation_code(), Some(INVALID_REQUEST_ID_TYPE));
        assert_eq!(err.message(), "request_id must be a string, got number");
    }

    #[tokio::test]
    async fn test_missing_plan_version() {
        let err = validate(json!({"request_id": "abc"})).await.unwrap_err();
        assert_eq!(err.validation_code(), Some(MISSING_PLAN_VERSION));
        assert_eq!(err.message(), "Payload missing required key: plan_version");
    }

    #[tokio::test]
    async fn test_plan_version_type() {
        assert_code(
            validate(json!({"request_id": "abc", "plan_version": null})).await,
            INVALID_PLAN_VERSION_TYPE,
        );
    }

    #[tokio::test]
    async fn test_stub_engine_output_passes() {
        let context = test_context("Add user authentication");
        let candidate = StubGenerationEngine::new().run(&context).await.unwrap();
        let validated = StubOutputValidator::new()
            .validate(&context, candidate)
            .await
            .unwrap();

        assert_eq!(validated.status(), Some("success"));
    }
}

mod registry_tests {
    use super::*;

    fn fallback_provider() -> Arc<dyn ContextProvider> {
        Arc::new(FixtureContextProvider::bundled())
    }

    struct NamedEngine(&'static str);

    #[async_trait::async_trait]
    impl GenerationEngine for NamedEngine {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, _context: &PlanningContext) -> crate::error::Result<CandidatePayload> {
            Ok(CandidatePayload(json!({})))
        }
    }

    #[test]
    fn test_no_name_uses_fallback() {
        let registry = BackendRegistry::new();
        let provider = registry.select_context_provider(None, fallback_provider);
        assert_eq!(provider.name(), "fixture");
    }

    #[test]
    fn test_unknown_name_uses_fallback() {
        let registry = BackendRegistry::new();
        let engine = registry.select_engine(Some("openai"), || Arc::new(StubGenerationEngine::new()));
        assert_eq!(engine.name(), "stub");
    }

    #[test]
    fn test_registered_backend_is_selected() {
        let mut registry = BackendRegistry::new();
        registry.register_engine("llm", || Ok(Arc::new(NamedEngine("llm")) as Arc<dyn GenerationEngine>));

        let engine = registry.select_engine(Some("llm"), || Arc::new(StubGenerationEngine::new()));
        assert_eq!(engine.name(), "llm");
    }

    #[test]
    fn test_failing_factory_uses_fallback() {
        let mut registry = BackendRegistry::new();
        registry.register_validator("strict", || {
            Err(PlannerError::Configuration {
                message: "missing schema".to_string(),
            })
        });

        let validator =
            registry.select_validator(Some("strict"), || Arc::new(StubOutputValidator::new()));
        assert_eq!(validator.name(), "stub");
    }

    #[test]
    fn test_debug_lists_registered_names() {
        let mut registry = BackendRegistry::new();
        registry.register_context_provider("github", || Ok(fallback_provider()));

        let rendered = format!("{registry:?}");
        assert!(rendered.contains("github"));
    }
}
