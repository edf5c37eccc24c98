use crate::{
    auth::CurrentUser,
    data::ProjectRepository,
    error::AppError,
    models::{Project, ProjectInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::access::{member_project, require_manager};
use super::message;

/// Creates a project managed by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Project`.
/// - `422 Unprocessable Entity`: a field is empty.
#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    payload: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let input = payload.into_inner().normalized();
    input.validate()?;

    let project = Project::new(input, current.id);
    let created = ProjectRepository::new(&pool).create(&project).await?;

    log::info!("project {} created by {}", created.id, current.id);
    Ok(HttpResponse::Created().json(created))
}

/// Lists the projects the user manages or is a team member of.
#[get("")]
pub async fn get_all_projects(
    pool: web::Data<PgPool>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let projects = ProjectRepository::new(&pool).list_for_user(current.id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Returns a project with its tasks and team.
///
/// ## Responses:
/// - `200 OK`: a `ProjectDetail`.
/// - `404 Not Found`: the project does not exist or the user has no part in it.
#[get("/{project_id}")]
pub async fn get_project_by_id(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    let detail = ProjectRepository::new(&pool).detail(project).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[put("/{project_id}")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let input = payload.into_inner().normalized();
    input.validate()?;

    let project = member_project(&pool, path.into_inner(), &current).await?;
    require_manager(&project, &current)?;

    let updated = ProjectRepository::new(&pool).update(project.id, &input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a project with all of its tasks and notes.
#[delete("/{project_id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    require_manager(&project, &current)?;

    ProjectRepository::new(&pool).delete(project.id).await?;
    Ok(HttpResponse::Ok().json(message("Project deleted")))
}
