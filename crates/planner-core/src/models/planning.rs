//! The input bundle handed to a generation engine.

use uuid::Uuid;

use super::{ProjectContext, UserInput};

/// Full input for one generation run.
///
/// Always holds at least one project; the first is the primary repository.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningContext {
    request_id: Uuid,
    user_input: UserInput,
    projects: Vec<ProjectContext>,
}

impl PlanningContext {
    /// Creates a context around the primary project.
    pub fn new(request_id: Uuid, user_input: UserInput, primary: ProjectContext) -> Self {
        Self {
            request_id,
            user_input,
            projects: vec![primary],
        }
    }

    /// Appends a secondary project after the ones already present.
    pub fn with_project(mut self, project: ProjectContext) -> Self {
        self.projects.push(project);
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn user_input(&self) -> &UserInput {
        &self.user_input
    }

    /// Projects in request order.
    pub fn projects(&self) -> &[ProjectContext] {
        &self.projects
    }

    pub fn primary(&self) -> &ProjectContext {
        // Non-empty by construction.
        &self.projects[0]
    }
}
