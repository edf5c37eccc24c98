use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::generate_code;
use crate::models::Token;

/// Draws before giving up on finding a code no live token uses.
const MAX_CODE_ATTEMPTS: usize = 16;

pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issues a fresh one-time code for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> Result<Token, sqlx::Error> {
        self.issue_with(user_id, generate_code).await
    }

    /// Like [`issue`](Self::issue), drawing candidate codes from `next_code`.
    pub async fn issue_with<F>(&self, user_id: Uuid, next_code: F) -> Result<Token, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        let mut conn = self.pool.acquire().await?;
        Self::issue_on(&mut conn, user_id, next_code).await
    }

    /// Issues a code on an existing connection or transaction.
    ///
    /// Expired codes of every user are purged first. A code is never handed
    /// out while another live token carries it, since lookups go by code alone.
    pub async fn issue_on<F>(
        conn: &mut PgConnection,
        user_id: Uuid,
        mut next_code: F,
    ) -> Result<Token, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        let cutoff = Token::valid_since(Utc::now());
        let purged = sqlx::query("DELETE FROM tokens WHERE created_at <= $1")
            .bind(cutoff)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        if purged > 0 {
            log::debug!("purged {} expired tokens", purged);
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = next_code();
            let (taken,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM tokens WHERE token = $1 AND created_at > $2)",
            )
            .bind(&code)
            .bind(cutoff)
            .fetch_one(&mut *conn)
            .await?;
            if taken {
                log::debug!("one-time code collision, drawing again");
                continue;
            }

            let token = Token::new(code, user_id);
            return sqlx::query_as::<_, Token>(
                "INSERT INTO tokens (id, token, user_id, created_at)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, token, user_id, created_at",
            )
            .bind(token.id)
            .bind(&token.token)
            .bind(token.user_id)
            .bind(token.created_at)
            .fetch_one(&mut *conn)
            .await;
        }

        Err(sqlx::Error::Protocol(format!(
            "no unused one-time code after {} attempts",
            MAX_CODE_ATTEMPTS
        )))
    }

    /// Looks up an unexpired code. Expired rows are treated as absent.
    pub async fn find_valid(&self, code: &str) -> Result<Option<Token>, sqlx::Error> {
        sqlx::query_as::<_, Token>(
            "SELECT id, token, user_id, created_at FROM tokens
             WHERE token = $1 AND created_at > $2
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(code)
        .bind(Token::valid_since(Utc::now()))
        .fetch_optional(self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
