//! SQLite follower repository implementation.

use snapvote_core::repository::follower::FollowerRepository;
use snapvote_types::error::RepositoryError;
use snapvote_types::id::UserId;
use snapvote_types::user::UserSummary;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::query_error;

pub struct SqliteFollowerRepository {
    pool: DatabasePool,
}

impl SqliteFollowerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, user_id: &UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(sql)
            .bind(user_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count)
    }
}

impl FollowerRepository for SqliteFollowerRepository {
    async fn follow(&self, follower: &UserId, followed: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO followers (id, follower_id, followed_id) VALUES (?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(follower.to_string())
        .bind(followed.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM followers WHERE follower_id = ? AND followed_id = ?")
            .bind(follower.to_string())
            .bind(followed.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM followers WHERE follower_id = ? AND followed_id = ?")
                .bind(follower.to_string())
                .bind(followed.to_string())
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(query_error)?;

        Ok(row.is_some())
    }

    async fn followers(&self, user_id: &UserId) -> Result<Vec<UserSummary>, RepositoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT u.id, u.username FROM followers f JOIN users u ON u.id = f.follower_id
             WHERE f.followed_id = ? ORDER BY u.username ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.into_iter()
            .map(|(id, username)| {
                let id = id
                    .parse::<UserId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
                Ok(UserSummary { id, username })
            })
            .collect()
    }

    async fn follower_count(&self, user_id: &UserId) -> Result<i64, RepositoryError> {
        self.count("SELECT COUNT(*) FROM followers WHERE followed_id = ?", user_id)
            .await
    }

    async fn following_count(&self, user_id: &UserId) -> Result<i64, RepositoryError> {
        self.count("SELECT COUNT(*) FROM followers WHERE follower_id = ?", user_id)
            .await
    }
}
