use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::StatusChangeRow;
use crate::models::{StatusChange, Task, TaskDetail, TaskInput, TaskStatus};

use super::NoteRepository;

const TASK_COLUMNS: &str = "id, project_id, name, description, status, created_at, updated_at";

pub struct TaskRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: &Task) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, project_id, name, description, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at ASC"
        ))
        .bind(project_id)
        .fetch_all(self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, input: &TaskInput) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(id)
        .fetch_one(self.pool)
        .await
    }

    /// Sets the task status and appends the change to its history.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        user_id: Uuid,
    ) -> Result<Task, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO task_status_changes (task_id, user_id, status) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(user_id)
            .bind(status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Deletes the task after removing every note attached to it.
    ///
    /// Returns the number of notes removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let notes = sqlx::query("DELETE FROM notes WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        log::debug!("deleted task {} and {} notes", id, notes);
        Ok(notes)
    }

    /// Status history of the task, oldest first.
    pub async fn status_history(&self, task_id: Uuid) -> Result<Vec<StatusChange>, sqlx::Error> {
        let rows = sqlx::query_as::<_, StatusChangeRow>(
            "SELECT c.id, c.status, c.created_at,
                    u.id AS user_id, u.name AS user_name, u.email AS user_email
             FROM task_status_changes c
             LEFT JOIN users u ON u.id = c.user_id
             WHERE c.task_id = $1
             ORDER BY c.id ASC",
        )
        .bind(task_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(StatusChange::from).collect())
    }

    pub async fn detail(&self, task: Task) -> Result<TaskDetail, sqlx::Error> {
        let completed_by = self.status_history(task.id).await?;
        let notes = NoteRepository::new(self.pool).list_with_authors(task.id).await?;
        Ok(TaskDetail {
            task,
            completed_by,
            notes,
        })
    }
}
