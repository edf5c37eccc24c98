use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NoteInput {
    #[validate(length(min = 1, message = "Note content is required"))]
    pub content: String,
}

impl NoteInput {
    pub fn normalized(mut self) -> Self {
        self.content = self.content.trim().to_string();
        self
    }
}

/// A note left on a task by one of the project's users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub task_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(input: NoteInput, task_id: Uuid, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: input.content,
            created_by,
            task_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Note as embedded in a task detail, with its author resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteWithAuthor {
    pub id: Uuid,
    pub content: String,
    pub created_by: UserSummary,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct NoteWithAuthorRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
}

impl From<NoteWithAuthorRow> for NoteWithAuthor {
    fn from(row: NoteWithAuthorRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            created_by: UserSummary {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            created_at: row.created_at,
        }
    }
}
