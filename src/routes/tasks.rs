use crate::{
    auth::CurrentUser,
    data::TaskRepository,
    error::AppError,
    models::{StatusInput, Task, TaskInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::access::{member_project, project_task, require_manager};
use super::message;

/// Creates a task in the project. Only the project manager may do this.
///
/// ## Request Body:
/// - `name`: required.
/// - `description`: required.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with status `pending`.
/// - `403 Forbidden`: the user is not the project manager.
/// - `404 Not Found`: the project does not exist or the user has no part in it.
/// - `422 Unprocessable Entity`: a field is empty.
#[post("/{project_id}/tasks")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    require_manager(&project, &current)?;

    let input = payload.into_inner().normalized();
    input.validate()?;

    let task = TaskRepository::new(&pool)
        .create(&Task::new(input, project.id))
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists the tasks of a project, oldest first.
#[get("/{project_id}/tasks")]
pub async fn get_project_tasks(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    let tasks = TaskRepository::new(&pool).list_by_project(project.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Returns a task with its status history and notes.
///
/// ## Responses:
/// - `200 OK`: a `TaskDetail`.
/// - `400 Bad Request`: the task belongs to another project.
/// - `404 Not Found`: the project or the task does not exist.
#[get("/{project_id}/tasks/{task_id}")]
pub async fn get_task_by_id(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;

    let detail = TaskRepository::new(&pool).detail(task).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[put("/{project_id}/tasks/{task_id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;
    require_manager(&project, &current)?;

    let input = payload.into_inner().normalized();
    input.validate()?;

    let updated = TaskRepository::new(&pool).update(task.id, &input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task together with its notes.
#[delete("/{project_id}/tasks/{task_id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;
    require_manager(&project, &current)?;

    TaskRepository::new(&pool).delete(task.id).await?;
    Ok(HttpResponse::Ok().json(message("Task deleted successfully")))
}

/// Moves a task to another status and records who did it.
///
/// Any member of the project may change a task's status.
#[post("/{project_id}/tasks/{task_id}/status")]
pub async fn update_status(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<StatusInput>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;

    let updated = TaskRepository::new(&pool)
        .update_status(task.id, payload.status, current.id)
        .await?;

    log::debug!(
        "task {} moved to {} by {}",
        updated.id,
        updated.status.as_str(),
        current.id
    );
    Ok(HttpResponse::Ok().json(updated))
}
