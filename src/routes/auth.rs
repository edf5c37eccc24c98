use crate::{
    auth::{
        ensure_password, generate_code, generate_token, hash_password, AuthMiddleware, AuthResponse,
        CheckPasswordRequest, CreateAccountRequest, CurrentUser, EmailRequest, LoginRequest,
        NewPasswordRequest, TokenPath, TokenRequest, UpdateCurrentPasswordRequest,
        UpdateProfileRequest,
    },
    config::Config,
    data::{TokenRepository, UserRepository},
    email::{AuthEmail, EmailRecipient, Mailer},
    error::AppError,
    models::{User, UserSummary},
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use super::message;

/// Emails `code` to `user` as an account confirmation.
async fn send_confirmation(
    config: &Config,
    mailer: &Mailer,
    user: &User,
    code: &str,
) -> Result<(), AppError> {
    AuthEmail::send_confirmation_email(
        mailer,
        &config.frontend_url,
        &EmailRecipient {
            email: &user.email,
            name: &user.name,
            token: code,
        },
    )
    .await
}

/// Issues a new one-time code for `user` and emails it as an account confirmation.
async fn send_confirmation_code(
    pool: &PgPool,
    config: &Config,
    mailer: &Mailer,
    user: &User,
) -> Result<(), AppError> {
    let token = TokenRepository::new(pool).issue(user.id).await?;
    send_confirmation(config, mailer, user, &token.token).await
}

/// Register a new account
///
/// The account starts unconfirmed; a six-digit code is emailed to the user.
/// The account and its code are only committed once the email went out.
#[post("/create-account")]
pub async fn create_account(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    payload: web::Json<CreateAccountRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let users = UserRepository::new(&pool);
    if users.find_by_email(&data.email).await?.is_some() {
        return Err(AppError::Conflict("User is already registered".into()));
    }

    let password_hash = hash_password(&data.password)?;
    let mut tx = pool.begin().await?;
    let user = UserRepository::insert(&mut *tx, &data.name, &data.email, &password_hash).await?;
    let token = TokenRepository::issue_on(&mut *tx, user.id, generate_code).await?;
    send_confirmation(&config, &mailer, &user, &token.token).await?;
    tx.commit().await?;

    log::info!("account created for {}", user.email);
    Ok(HttpResponse::Created().json(message(
        "Account created, check your email to confirm it",
    )))
}

#[post("/confirm-account")]
pub async fn confirm_account(
    pool: web::Data<PgPool>,
    payload: web::Json<TokenRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let tokens = TokenRepository::new(&pool);
    let token = tokens
        .find_valid(&data.token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

    UserRepository::new(&pool).confirm(token.user_id).await?;
    tokens.delete(token.id).await?;

    log::info!("account {} confirmed", token.user_id);
    Ok(HttpResponse::Ok().json(message("Account confirmed successfully")))
}

/// Login user
///
/// Unconfirmed accounts are sent a fresh confirmation code instead of a session token.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let user = UserRepository::new(&pool)
        .find_by_email(&data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !user.confirmed {
        send_confirmation_code(&pool, &config, &mailer, &user).await?;
        return Err(AppError::Forbidden(
            "Account not confirmed, we have sent a confirmation email".into(),
        ));
    }

    ensure_password(&user, &data.password, "Incorrect password")?;

    let token = generate_token(user.id, &config.jwt_secret)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

#[post("/request-code")]
pub async fn request_confirmation_code(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    payload: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let user = UserRepository::new(&pool)
        .find_by_email(&data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User is not registered".into()))?;

    if user.confirmed {
        return Err(AppError::Forbidden("User is already confirmed".into()));
    }

    send_confirmation_code(&pool, &config, &mailer, &user).await?;
    Ok(HttpResponse::Ok().json(message("A new code has been sent to your email")))
}

#[post("/forgot-password")]
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    payload: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let user = UserRepository::new(&pool)
        .find_by_email(&data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User is not registered".into()))?;

    let token = TokenRepository::new(&pool).issue(user.id).await?;
    AuthEmail::send_password_reset_token(
        &mailer,
        &config.frontend_url,
        &EmailRecipient {
            email: &user.email,
            name: &user.name,
            token: &token.token,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(message("Check your email for instructions")))
}

#[post("/validate-token")]
pub async fn validate_token(
    pool: web::Data<PgPool>,
    payload: web::Json<TokenRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    TokenRepository::new(&pool)
        .find_valid(&data.token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

    Ok(HttpResponse::Ok().json(message("Valid token, set your new password")))
}

/// Sets a new password using a code from the reset email. The code is consumed.
#[post("/update-password/{token}")]
pub async fn update_password_with_token(
    pool: web::Data<PgPool>,
    path: web::Path<TokenPath>,
    payload: web::Json<NewPasswordRequest>,
) -> Result<impl Responder, AppError> {
    path.validate()?;
    payload.validate()?;

    let tokens = TokenRepository::new(&pool);
    let token = tokens
        .find_valid(&path.token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

    let password_hash = hash_password(&payload.password)?;
    UserRepository::new(&pool)
        .update_password(token.user_id, &password_hash)
        .await?;
    tokens.delete(token.id).await?;

    Ok(HttpResponse::Ok().json(message("Password updated successfully")))
}

#[get("/user", wrap = "AuthMiddleware")]
pub async fn get_user(current: CurrentUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(UserSummary::from(&*current)))
}

#[put("/profile", wrap = "AuthMiddleware")]
pub async fn update_profile(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let data = payload.into_inner().normalized();
    data.validate()?;

    let users = UserRepository::new(&pool);
    if users.email_taken_by_other(&data.email, current.id).await? {
        return Err(AppError::Conflict("That email is already registered".into()));
    }

    users.update_profile(current.id, &data.name, &data.email).await?;
    Ok(HttpResponse::Ok().json(message("Profile updated successfully")))
}

#[post("/update-password", wrap = "AuthMiddleware")]
pub async fn update_current_user_password(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    payload: web::Json<UpdateCurrentPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    ensure_password(&current, &payload.current_password, "Current password is incorrect")?;

    let password_hash = hash_password(&payload.password)?;
    UserRepository::new(&pool)
        .update_password(current.id, &password_hash)
        .await?;

    Ok(HttpResponse::Ok().json(message("Password updated successfully")))
}

#[post("/check-password", wrap = "AuthMiddleware")]
pub async fn check_password(
    current: CurrentUser,
    payload: web::Json<CheckPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    ensure_password(&current, &payload.password, "Incorrect password")?;
    Ok(HttpResponse::Ok().json(message("Correct password")))
}
