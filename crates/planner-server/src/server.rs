//! HTTP transport for the planner.
//!
//! ```text
//! GET  /health, /healthz   liveness
//! POST /v1/plan            run a planning request
//! POST /v1/debug/context   fetch project context (bearer token required)
//! ```
//!
//! Handlers only move bytes and headers in and out; every decision about
//! the response body is made by `planner_core`. Unknown routes and wrong
//! methods still answer with an error envelope.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info, warn};
use planner_core::{
    authorize_debug, ids, parse_authorization, parse_repository_pointer,
    response::{CONTEXT_DRIVER_ERROR, FIXTURE_NOT_FOUND, STATUS_INTERNAL_ERROR, STATUS_UNPROCESSABLE},
    ApiResponse, ErrorDetail, Planner, PlannerError,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;


/// Service name reported by the health routes.
pub const SERVICE_NAME: &str = "planner-service";

#[derive(Clone)]
struct AppState {
    planner: Planner,
    debug_token: Arc<str>,
}

/// Builds the application router.
pub fn router(planner: Planner, debug_token: &str) -> Router {
    let state = AppState {
        planner,
        debug_token: Arc::from(debug_token),
    };

    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/healthz", get(health).fallback(method_not_allowed))
        .route("/v1/plan", post(create_plan).fallback(method_not_allowed))
        .route(
            "/v1/debug/context",
            post(debug_context).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}

/// Serves the API on `bind` until SIGINT or SIGTERM.
pub async fn serve(planner: Planner, bind: SocketAddr, debug_token: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let local_addr = listener.local_addr().context("Failed to read bound address")?;

    info!(address:% = local_addr, planner:? = planner; "planner_server_listening");

    axum::serve(listener, router(planner, debug_token))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("planner_server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error:% = e; "sigint_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error:% = e; "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("Received SIGINT, shutting down gracefully..."),
        () = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}

fn envelope(response: ApiResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Error envelope for a body the transport refused to buffer.
fn body_rejected(rejection: BytesRejection, request_id: Uuid) -> Response {
    let status = rejection.status().as_u16();
    warn!(request_id:% = request_id, status = status, error:% = rejection; "request_body_rejected");

    envelope(ApiResponse::http_fault(status, rejection.body_text(), request_id))
}

async fn create_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let auth = parse_authorization(authorization(&headers));
    debug!(user_id:% = auth.user_id, has_token = auth.token.is_some(); "plan_request_auth");

    match body {
        Ok(body) => envelope(state.planner.handle(&body).await),
        Err(rejection) => body_rejected(rejection, ids::assign(None)),
    }
}

async fn debug_context(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = ids::assign(None);

    if let Err(rejection) = authorize_debug(authorization(&headers), &state.debug_token) {
        return envelope(ApiResponse::http_fault(
            rejection.status_code,
            rejection.message,
            request_id,
        ));
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection, request_id),
    };

    let pointer = match parse_repository_pointer(&body) {
        Ok(pointer) => pointer,
        Err(e) => {
            return envelope(ApiResponse::error(
                STATUS_UNPROCESSABLE,
                request_id,
                ErrorDetail::request_shape(&e),
            ))
        }
    };

    match state.planner.fetch_context(&pointer).await {
        Ok(context) => (StatusCode::OK, Json(context)).into_response(),
        Err(e) => {
            error!(
                request_id:% = request_id,
                repository:% = pointer.coordinate(),
                error:% = e;
                "debug_context_failed"
            );
            let code = match &e {
                PlannerError::ContextUnavailable { .. } => FIXTURE_NOT_FOUND,
                _ => CONTEXT_DRIVER_ERROR,
            };
            envelope(ApiResponse::error(
                STATUS_INTERNAL_ERROR,
                request_id,
                ErrorDetail::new(code, e.message()),
            ))
        }
    }
}

async fn not_found() -> Response {
    envelope(ApiResponse::http_fault(
        StatusCode::NOT_FOUND.as_u16(),
        "Not Found",
        ids::assign(None),
    ))
}

async fn method_not_allowed() -> Response {
    envelope(ApiResponse::http_fault(
        StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        "Method Not Allowed",
        ids::assign(None),
    ))
}
