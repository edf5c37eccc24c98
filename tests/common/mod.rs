#![allow(dead_code)]

use actix_web::{http::header, test};
use dotenv::dotenv;
use regex::Regex;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uptask::{Config, Mailer};
use uuid::Uuid;

pub const PASSWORD: &str = "Password123!";

/// Connects to `DATABASE_URL` and runs the migrations.
///
/// Returns `None` when no database is configured so the calling test can skip.
pub async fn test_pool() -> Option<PgPool> {
    dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

pub fn test_config() -> Config {
    Config {
        database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
        server_port: 0,
        server_host: "127.0.0.1".into(),
        jwt_secret: "integration_test_secret".into(),
        frontend_url: "http://localhost:5173".into(),
        mail_from: "UpTask <admin@uptask.com>".into(),
        mail: None,
    }
}

pub fn test_mailer() -> Mailer {
    Mailer::outbox("UpTask <admin@uptask.com>").expect("valid sender")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

/// The most recent code mailed to `email`.
pub fn last_code_for(mailer: &Mailer, email: &str) -> String {
    let code = Regex::new(r"code (\d{6})").unwrap();
    mailer
        .sent()
        .iter()
        .rev()
        .filter(|m| m.to == email)
        .find_map(|m| code.captures(&m.text).map(|c| c[1].to_string()))
        .unwrap_or_else(|| panic!("no code mailed to {}", email))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Builds the full application the way `main.rs` does, minus CORS.
#[macro_export]
macro_rules! test_app {
    ($pool:expr, $config:expr, $mailer:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($config.clone()))
                .app_data(actix_web::web::Data::new($mailer.clone()))
                .wrap(actix_web::middleware::NormalizePath::trim())
                .wrap(actix_web::middleware::Logger::default())
                .service(uptask::routes::health::health)
                .service(actix_web::web::scope("/api").configure(uptask::routes::config)),
        )
        .await
    };
}

/// Creates an account, confirms it with the mailed code and logs in.
///
/// Returns the user id and the session token.
pub async fn register_confirmed_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    mailer: &Mailer,
    name: &str,
    email: &str,
) -> (Uuid, String) {
    let req = test::TestRequest::post()
        .uri("/api/auth/create-account")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "password_confirmation": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/confirm-account")
        .set_json(json!({ "token": last_code_for(mailer, email) }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let user_id = body["user_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("user_id in login response");
    let token = body["token"].as_str().expect("token in login response").to_string();
    (user_id, token)
}

pub async fn cleanup_users(pool: &PgPool, emails: &[&str]) {
    for email in emails {
        let _ = sqlx::query(
            "DELETE FROM notes WHERE created_by IN (SELECT id FROM users WHERE email = $1)",
        )
        .bind(email)
        .execute(pool)
        .await;
        let _ = sqlx::query(
            "DELETE FROM notes WHERE task_id IN (SELECT t.id FROM tasks t JOIN projects p ON p.id = t.project_id \
             JOIN users u ON u.id = p.manager_id WHERE u.email = $1)",
        )
        .bind(email)
        .execute(pool)
        .await;
        let _ = sqlx::query(
            "DELETE FROM tasks WHERE project_id IN (SELECT p.id FROM projects p JOIN users u ON u.id = p.manager_id WHERE u.email = $1)",
        )
        .bind(email)
        .execute(pool)
        .await;
        let _ = sqlx::query(
            "DELETE FROM projects WHERE manager_id IN (SELECT id FROM users WHERE email = $1)",
        )
        .bind(email)
        .execute(pool)
        .await;
        let _ = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await;
    }
}
