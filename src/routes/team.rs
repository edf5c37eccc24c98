use crate::{
    auth::{CurrentUser, EmailRequest},
    data::{TeamRepository, UserRepository},
    error::AppError,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::access::{member_project, require_manager};
use super::message;

/// Body of `POST /projects/{project_id}/team`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub id: Uuid,
}

/// Looks up a user by email so the manager can add them to the team.
#[post("/{project_id}/team/find")]
pub async fn find_member_by_email(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;
    member_project(&pool, path.into_inner(), &current).await?;

    let user = UserRepository::new(&pool)
        .find_summary_by_email(&data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/{project_id}/team")]
pub async fn get_project_team(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    let members = TeamRepository::new(&pool).members(project.id).await?;
    Ok(HttpResponse::Ok().json(members))
}

#[post("/{project_id}/team")]
pub async fn add_member_by_id(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<AddMemberRequest>,
) -> Result<impl Responder, AppError> {
    let project = member_project(&pool, path.into_inner(), &current).await?;
    require_manager(&project, &current)?;

    let user = UserRepository::new(&pool)
        .find_by_id(payload.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if project.is_manager(user.id) {
        return Err(AppError::BadRequest(
            "The project manager is already part of the project".into(),
        ));
    }

    if !TeamRepository::new(&pool).add(project.id, user.id).await? {
        return Err(AppError::Conflict("User is already part of the project".into()));
    }

    log::info!("user {} added to project {}", user.id, project.id);
    Ok(HttpResponse::Ok().json(message("User added successfully")))
}

#[delete("/{project_id}/team/{user_id}")]
pub async fn remove_member_by_id(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, user_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    require_manager(&project, &current)?;

    if !TeamRepository::new(&pool).remove(project.id, user_id).await? {
        return Err(AppError::Conflict("User is not part of the project".into()));
    }

    log::info!("user {} removed from project {}", user_id, project.id);
    Ok(HttpResponse::Ok().json(message("User removed successfully")))
}
