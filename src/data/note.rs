use sqlx::PgPool;
use uuid::Uuid;

use crate::models::note::NoteWithAuthorRow;
use crate::models::{Note, NoteWithAuthor};

const NOTE_COLUMNS: &str = "id, content, created_by, task_id, created_at, updated_at";

pub struct NoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NoteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, note: &Note) -> Result<Note, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO notes (id, content, created_by, task_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note.id)
        .bind(&note.content)
        .bind(note.created_by)
        .bind(note.task_id)
        .bind(note.created_at)
        .bind(note.updated_at)
        .fetch_one(self.pool)
        .await
    }

    pub async fn list_by_task(&self, task_id: Uuid) -> Result<Vec<Note>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE task_id = $1 ORDER BY created_at ASC"
        ))
        .bind(task_id)
        .fetch_all(self.pool)
        .await
    }

    pub async fn list_with_authors(&self, task_id: Uuid) -> Result<Vec<NoteWithAuthor>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NoteWithAuthorRow>(
            "SELECT n.id, n.content, n.created_at,
                    u.id AS author_id, u.name AS author_name, u.email AS author_email
             FROM notes n
             JOIN users u ON u.id = n.created_by
             WHERE n.task_id = $1
             ORDER BY n.created_at ASC",
        )
        .bind(task_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(NoteWithAuthor::from).collect())
    }

    /// Finds a note only if it is attached to `task_id`.
    pub async fn find_in_task(&self, id: Uuid, task_id: Uuid) -> Result<Option<Note>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND task_id = $2"
        ))
        .bind(id)
        .bind(task_id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
