use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Minutes a one-time code stays usable after it is issued.
pub const TOKEN_TTL_MINUTES: i64 = 10;

/// One-time code sent by email for account confirmation or password reset.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(token: String, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn ttl() -> Duration {
        Duration::minutes(TOKEN_TTL_MINUTES)
    }

    /// Tokens created at or before this instant are expired at `now`.
    pub fn valid_since(now: DateTime<Utc>) -> DateTime<Utc> {
        now - Self::ttl()
    }
}
