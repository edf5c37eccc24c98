use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Project, ProjectDetail, ProjectInput};

use super::{TaskRepository, TeamRepository};

const PROJECT_COLUMNS: &str =
    "id, project_name, client_name, description, manager_id, created_at, updated_at";

pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, project: &Project) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (id, project_name, client_name, description, manager_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(&project.project_name)
        .bind(&project.client_name)
        .bind(&project.description)
        .bind(project.manager_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    /// Projects the user manages or belongs to, oldest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p
             WHERE p.manager_id = $1
                OR EXISTS (
                    SELECT 1 FROM project_members m
                    WHERE m.project_id = p.id AND m.user_id = $1
                )
             ORDER BY p.created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, input: &ProjectInput) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects
             SET project_name = $1, client_name = $2, description = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&input.project_name)
        .bind(&input.client_name)
        .bind(&input.description)
        .bind(id)
        .fetch_one(self.pool)
        .await
    }

    /// Deletes the project together with its tasks and their notes.
    ///
    /// Team memberships and status history go through `ON DELETE CASCADE`.
    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let notes = sqlx::query(
            "DELETE FROM notes WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let tasks = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        log::info!("deleted project {} with {} tasks and {} notes", id, tasks, notes);
        Ok(())
    }

    pub async fn detail(&self, project: Project) -> Result<ProjectDetail, sqlx::Error> {
        let tasks = TaskRepository::new(self.pool).list_by_project(project.id).await?;
        let team = TeamRepository::new(self.pool).member_ids(project.id).await?;
        Ok(ProjectDetail {
            project,
            tasks,
            team,
        })
    }
}
