//! Data models for planning requests.
//!
//! The models follow the lifecycle of a single request:
//!
//! ```text
//! RepositoryPointer ──▶ ProjectContext ─┐
//!                                       ├──▶ PlanningContext ──▶ CandidatePayload ──▶ ValidatedPayload
//! UserInput ────────────────────────────┘
//! ```
//!
//! Everything here is immutable once built. [`UserInput`] and
//! [`PlanningContext`] keep their fields private so their invariants
//! (non-blank brief, at least one project) cannot be broken after
//! construction.
//!
//! # Examples
//!
//! ```rust
//! use planner_core::models::{PlanningContext, ProjectContext, RepositoryPointer, UserInput};
//! use uuid::Uuid;
//!
//! let pointer = RepositoryPointer::new("test-owner", "test-repo", None);
//! assert_eq!(pointer.git_ref, "refs/heads/main");
//!
//! let brief = UserInput::new(
//!     "Add user authentication",
//!     "Secure login flow",
//!     vec!["Use OAuth2".to_string()],
//!     vec![],
//!     vec![],
//! )?;
//!
//! let ctx = PlanningContext::new(Uuid::new_v4(), brief, ProjectContext::for_pointer(&pointer));
//! assert_eq!(ctx.primary().repo_owner, "test-owner");
//! # Ok::<(), planner_core::PlannerError>(())
//! ```

pub mod payload;
pub mod planning;
pub mod project;
pub mod repository;
pub mod user_input;


pub use payload::{json_type_name, CandidatePayload, ValidatedPayload};
pub use planning::PlanningContext;
pub use project::ProjectContext;
pub use repository::{RepositoryPointer, DEFAULT_REF};
pub use user_input::{UserInput, UserInputFields};
