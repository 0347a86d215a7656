//! Core library for the planner service.
//!
//! This crate implements the request orchestration pipeline behind the
//! planning front door: a structured "plan this repository" request is
//! checked, enriched with repository context, handed to a generation engine,
//! validated, and answered with a single tracked envelope.
//!
//! # Pipeline Architecture
//!
//! ```text
//! raw body ─▶ params ─▶ ids ─▶ Planner ─────────────────────────────▶ response
//!                              │  ContextProvider ─▶ GenerationEngine │
//!                              │  ─▶ OutputValidator                  │
//!                              └──────────────────────────────────────┘
//! ```
//!
//! - **Request shape** ([`params`]): parses and checks the inbound body,
//!   reporting every bad field at once
//! - **Identifiers** ([`ids`]): assigns or echoes the request id
//! - **Capabilities** ([`capability`]): the three pluggable steps, each with
//!   a deterministic bundled implementation
//! - **Orchestration** ([`planner`]): sequences the steps and turns stage
//!   failures into typed outcomes
//! - **Envelopes** ([`response`]): maps outcomes to the wire format and HTTP
//!   status
//!
//! The crate has no transport of its own. Hosts pass raw bytes to
//! [`Planner::handle`] and write back the [`ApiResponse`] they get.
//!
//! # Quick Start
//!
//! ```rust
//! use planner_core::PlannerBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_fixture_path(None::<&str>)
//!     .build();
//!
//! let response = planner
//!     .handle(br#"{
//!         "repository": {"owner": "test-owner", "name": "test-repo"},
//!         "user_input": {
//!             "purpose": "Add user authentication",
//!             "vision": "Secure login flow",
//!             "must": ["Use OAuth2"]
//!         }
//!     }"#)
//!     .await;
//!
//! println!("{}", response);
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod capability;
pub mod error;
pub mod ids;
pub mod models;
pub mod params;
pub mod planner;
pub mod response;

// Re-export commonly used types
pub use auth::{authorize_debug, parse_authorization, AuthContext, AuthRejection};
pub use capability::{
    preview_purpose, BackendRegistry, ContextProvider, FixtureContextProvider, FixtureSource,
    GenerationEngine, OutputValidator, StubGenerationEngine, StubOutputValidator,
};
pub use error::{ContextResultExt, EngineResultExt, FieldViolation, PlannerError, Result};
pub use models::{
    CandidatePayload, PlanningContext, ProjectContext, RepositoryPointer, UserInput,
    ValidatedPayload,
};
pub use params::{parse_plan_request, parse_repository_pointer, PlanRequest, RejectedRequest};
pub use planner::{PlanFailure, PlanOutcome, Planner, PlannerBuilder, Stage};
pub use response::{ApiResponse, Envelope, ErrorDetail};
