use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{User, UserSummary};

const USER_COLUMNS: &str = "id, name, email, password_hash, confirmed, created_at, updated_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new, unconfirmed account.
    ///
    /// Takes any executor so sign-up can run it inside a transaction.
    pub async fn insert<'e, E>(
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, confirmed)
             VALUES ($1, $2, $3, $4, FALSE)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn find_summary_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>("SELECT id, name, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool)
            .await
    }

    /// True when `email` belongs to an account other than `user_id`.
    pub async fn email_taken_by_other(
        &self,
        email: &str,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (taken,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn confirm(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET confirmed = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, email = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_one(self.pool)
        .await
    }
}
