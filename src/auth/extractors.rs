use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::Claims;
use crate::data::UserRepository;
use crate::error::AppError;
use crate::models::User;

/// The authenticated user behind the request.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the JWT
/// and stores its claims in the request extensions. The extractor then loads
/// the account from the database, so a token whose user has been removed is
/// rejected with `401 Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move { load_user(claims, pool).await.map_err(ActixError::from) })
    }
}

async fn load_user(
    claims: Option<Claims>,
    pool: Option<web::Data<PgPool>>,
) -> Result<CurrentUser, AppError> {
    let claims = claims.ok_or_else(|| {
        AppError::Unauthorized(
            "Claims not found in request. Ensure AuthMiddleware is active.".to_string(),
        )
    })?;
    let pool = pool
        .ok_or_else(|| AppError::InternalServerError("Database pool not registered".to_string()))?;

    match UserRepository::new(pool.get_ref()).find_by_id(claims.sub).await? {
        Some(user) => Ok(CurrentUser(user)),
        None => {
            log::warn!("token for unknown user {}", claims.sub);
            Err(AppError::Unauthorized("Invalid token".to_string()))
        }
    }
}
