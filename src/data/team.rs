use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserSummary;

/// Membership of users in project teams.
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn members(&self, project_id: Uuid) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.name, u.email FROM project_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = $1
             ORDER BY m.added_at ASC",
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await
    }

    pub async fn member_ids(&self, project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (Uuid,)>(
            "SELECT user_id FROM project_members WHERE project_id = $1 ORDER BY added_at ASC",
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let (member,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(member)
    }

    /// Adds the user to the team. Returns `false` if they were already a member.
    pub async fn add(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes the user from the team. Returns `false` if they were not a member.
    pub async fn remove(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}
