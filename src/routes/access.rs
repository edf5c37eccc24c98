//! Lookups shared by the project-scoped routes.
//!
//! Every route under `/projects/{project_id}` resolves the project first and
//! checks that the caller is its manager or a team member; task routes then
//! resolve the task and make sure it belongs to that project.

use sqlx::PgPool;
use uuid::Uuid;

use crate::data::{ProjectRepository, TaskRepository, TeamRepository};
use crate::error::AppError;
use crate::models::{Project, Task, User};

/// Loads a project the user is allowed to see.
///
/// Projects the user has no part in are reported as missing.
pub async fn member_project(
    pool: &PgPool,
    project_id: Uuid,
    user: &User,
) -> Result<Project, AppError> {
    let project = ProjectRepository::new(pool)
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if project.is_manager(user.id) || TeamRepository::new(pool).is_member(project.id, user.id).await? {
        Ok(project)
    } else {
        log::warn!("user {} denied access to project {}", user.id, project.id);
        Err(AppError::NotFound("Project not found".into()))
    }
}

/// Only the project manager may change the project, its tasks or its team.
pub fn require_manager(project: &Project, user: &User) -> Result<(), AppError> {
    if project.is_manager(user.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Invalid action".into()))
    }
}

/// Loads a task and checks it belongs to `project`.
pub async fn project_task(pool: &PgPool, project: &Project, task_id: Uuid) -> Result<Task, AppError> {
    let task = TaskRepository::new(pool)
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.project_id != project.id {
        return Err(AppError::BadRequest("Invalid action".into()));
    }
    Ok(task)
}
