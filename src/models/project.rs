use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::task::Task;

/// Input structure for creating or updating a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "Project description is required"))]
    pub description: String,
}

impl ProjectInput {
    /// Trims every field; whitespace-only values then fail validation.
    pub fn normalized(mut self) -> Self {
        self.project_name = self.project_name.trim().to_string();
        self.client_name = self.client_name.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

/// Represents a project as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub client_name: String,
    pub description: String,
    /// The user who created the project and may edit it, manage its tasks and its team.
    pub manager_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, manager_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_name: input.project_name,
            client_name: input.client_name,
            description: input.description,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_manager(&self, user_id: Uuid) -> bool {
        self.manager_id == user_id
    }
}

/// A project with its tasks and the ids of its team members.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
    pub team: Vec<Uuid>,
}
