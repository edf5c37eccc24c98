use crate::{
    auth::CurrentUser,
    data::NoteRepository,
    error::AppError,
    models::{Note, NoteInput},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::access::{member_project, project_task};
use super::message;

#[post("/{project_id}/tasks/{task_id}/notes")]
pub async fn create_note(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<NoteInput>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;

    let input = payload.into_inner().normalized();
    input.validate()?;

    let note = NoteRepository::new(&pool)
        .create(&Note::new(input, task.id, current.id))
        .await?;
    Ok(HttpResponse::Created().json(note))
}

#[get("/{project_id}/tasks/{task_id}/notes")]
pub async fn get_task_notes(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;

    let notes = NoteRepository::new(&pool).list_by_task(task.id).await?;
    Ok(HttpResponse::Ok().json(notes))
}

/// Deletes a note. Only its author may do so.
#[delete("/{project_id}/tasks/{task_id}/notes/{note_id}")]
pub async fn delete_note(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id, note_id) = path.into_inner();
    let project = member_project(&pool, project_id, &current).await?;
    let task = project_task(&pool, &project, task_id).await?;

    let notes = NoteRepository::new(&pool);
    let note = notes
        .find_in_task(note_id, task.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".into()))?;

    if note.created_by != current.id {
        return Err(AppError::Forbidden("Invalid action".into()));
    }

    notes.delete(note.id).await?;
    Ok(HttpResponse::Ok().json(message("Note deleted")))
}
