pub mod access;
pub mod auth;
pub mod health;
pub mod notes;
pub mod projects;
pub mod tasks;
pub mod team;

use actix_web::web;
use serde_json::{json, Value};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Body used by every endpoint that only reports an outcome.
pub fn message(msg: &str) -> Value {
    json!({ "message": msg })
}

/// Malformed or incomplete JSON bodies become `400` with the serde message.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| AppError::BadRequest("Invalid ID".into()).into())
}

/// Routes mounted under `/auth`.
pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(auth::create_account)
        .service(auth::confirm_account)
        .service(auth::login)
        .service(auth::request_confirmation_code)
        .service(auth::forgot_password)
        .service(auth::validate_token)
        .service(auth::update_password_with_token)
        .service(auth::get_user)
        .service(auth::update_profile)
        .service(auth::update_current_user_password)
        .service(auth::check_password);
}

/// Routes mounted under `/projects`. Every one of them needs a bearer token.
pub fn projects_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(projects::create_project)
        .service(projects::get_all_projects)
        .service(projects::get_project_by_id)
        .service(projects::update_project)
        .service(projects::delete_project)
        .service(tasks::create_task)
        .service(tasks::get_project_tasks)
        .service(tasks::get_task_by_id)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(tasks::update_status)
        .service(team::find_member_by_email)
        .service(team::get_project_team)
        .service(team::add_member_by_id)
        .service(team::remove_member_by_id)
        .service(notes::create_note)
        .service(notes::get_task_notes)
        .service(notes::delete_note);
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").configure(auth_config))
        .service(
            web::scope("/projects")
                .wrap(AuthMiddleware)
                .configure(projects_config),
        );
}
