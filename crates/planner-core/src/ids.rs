//! Identifier policy for request tracking.
//!
//! Every request carries a request id from the moment it is accepted until
//! the response is written. Clients may supply their own id (an idempotency
//! hook for retries); otherwise one is minted here. The synchronous pipeline
//! has no separate run-id space: the run id mirrors the request id.

use serde_json::Value;
use uuid::Uuid;

/// Echo a client-supplied id verbatim, or mint a fresh random one.
pub fn assign(client_provided: Option<Uuid>) -> Uuid {
    client_provided.unwrap_or_else(Uuid::new_v4)
}

/// Run id for a completed synchronous run.
pub fn run_id_for(request_id: Uuid) -> Uuid {
    request_id
}

/// Best-effort request id for a body that never reached [`assign`].
///
/// Reuses a syntactically valid `request_id` string from the raw JSON body
/// when one is present, otherwise mints a new id.
pub fn salvage(raw: Option<&Value>) -> Uuid {
    let client_provided = raw
        .and_then(|body| body.get("request_id"))
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok());
    assign(client_provided)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CLIENT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_assign_echoes_client_id() {
        let id = Uuid::parse_str(CLIENT_ID).unwrap();
        assert_eq!(assign(Some(id)), id);
    }

    #[test]
    fn test_assign_mints_distinct_ids() {
        let a = assign(None);
        let b = assign(None);
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn test_run_id_mirrors_request_id() {
        let id = assign(None);
        assert_eq!(run_id_for(id), id);
    }

    #[test]
    fn test_salvage_reuses_valid_id() {
        let body = json!({ "request_id": CLIENT_ID, "user_input": {} });
        assert_eq!(salvage(Some(&body)).to_string(), CLIENT_ID);
    }

    #[test]
    fn test_salvage_mints_for_garbage() {
        let body = json!({ "request_id": "not-a-uuid" });
        assert_ne!(salvage(Some(&body)).to_string(), "not-a-uuid");

        let body = json!({ "request_id": 42 });
        assert_eq!(salvage(Some(&body)).get_version_num(), 4);

        assert_eq!(salvage(None).get_version_num(), 4);
    }
}
