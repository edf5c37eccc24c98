use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::note::NoteWithAuthor;
use super::user::UserSummary;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is blocked or paused.
    OnHold,
    /// Task is currently being worked on.
    InProgress,
    /// Task is done and waiting for review.
    UnderReview,
    /// Task is completed.
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::OnHold,
        TaskStatus::InProgress,
        TaskStatus::UnderReview,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::OnHold => "onHold",
            TaskStatus::InProgress => "inProgress",
            TaskStatus::UnderReview => "underReview",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Input structure for creating or updating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "Task name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Task description is required"))]
    pub description: String,
}

impl TaskInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

/// Body of `POST .../tasks/{task_id}/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusInput {
    pub status: TaskStatus,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A fresh task in the given project; every task starts out `pending`.
    pub fn new(input: TaskInput, project_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: input.name,
            description: input.description,
            status: TaskStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One entry of a task's status history: who moved it to which status.
///
/// `user` is `None` once the account that made the change is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: i64,
    pub status: TaskStatus,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

/// Flat row shape of a status change joined with its user.
#[derive(Debug, FromRow)]
pub(crate) struct StatusChangeRow {
    pub id: i64,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl From<StatusChangeRow> for StatusChange {
    fn from(row: StatusChangeRow) -> Self {
        let user = match (row.user_id, row.user_name, row.user_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Self {
            id: row.id,
            status: row.status,
            user,
            created_at: row.created_at,
        }
    }
}

/// A task together with its status history and its notes.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub completed_by: Vec<StatusChange>,
    pub notes: Vec<NoteWithAuthor>,
}
