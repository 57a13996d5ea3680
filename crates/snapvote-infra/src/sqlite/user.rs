//! SQLite user repository implementation.

use snapvote_core::repository::user::UserRepository;
use snapvote_types::error::RepositoryError;
use snapvote_types::id::UserId;
use snapvote_types::user::User;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, query_error};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    is_superuser: bool,
    is_verified: bool,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_superuser: row.try_get("is_superuser")?,
            is_verified: row.try_get("is_verified")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = self
            .id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        Ok(User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            is_superuser: self.is_superuser,
            is_verified: self.is_verified,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn conflict_for(e: &sqlx::Error, user: &User) -> RepositoryError {
    let message = match e {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        _ => String::new(),
    };
    if message.contains("users.username") {
        RepositoryError::Conflict(format!("username '{}' already exists", user.username))
    } else {
        RepositoryError::Conflict(format!("email '{}' already exists", user.email))
    }
}

impl SqliteUserRepository {
    async fn fetch_user(&self, sql: &str, binds: &[&str]) -> Result<Option<User>, RepositoryError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = query
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let user_row = UserRow::from_row(&row).map_err(query_error)?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_superuser, is_verified, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_superuser)
        .bind(user.is_verified)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(e) if is_unique_violation(&e) => Err(conflict_for(&e, user)),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE id = ?", &[&id.to_string()])
            .await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE username = ?", &[username])
            .await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE email = ?", &[email])
            .await
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user(
            "SELECT * FROM users WHERE email = ? OR username = ? LIMIT 1",
            &[login, login],
        )
        .await
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            let user_row = UserRow::from_row(row).map_err(query_error)?;
            users.push(user_row.into_user()?);
        }
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, is_superuser = ?, is_verified = ?
             WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_superuser)
        .bind(user.is_verified)
        .bind(user.id.to_string())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(RepositoryError::NotFound),
            Ok(_) => Ok(user.clone()),
            Err(e) if is_unique_violation(&e) => Err(conflict_for(&e, user)),
            Err(e) => Err(query_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{make_user, test_pool};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("artist1");
        repo.create(&user).await.unwrap();

        let by_id = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "artist1");
        assert_eq!(by_id.password_hash, user.password_hash);

        let by_name = repo.get_by_username("artist1").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_email = repo.get_by_email("artist1@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_matches_either_field() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("artist2");
        repo.create(&user).await.unwrap();

        assert!(repo.get_by_login("artist2").await.unwrap().is_some());
        assert!(repo.get_by_login("artist2@example.com").await.unwrap().is_some());
        assert!(repo.get_by_login("artist3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&make_user("dup")).await.unwrap();

        let mut other = make_user("dup");
        other.email = "other@example.com".to_string();
        match repo.create(&other).await {
            Err(RepositoryError::Conflict(msg)) => assert!(msg.contains("username")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&make_user("first")).await.unwrap();

        let mut other = make_user("second");
        other.email = "first@example.com".to_string();
        match repo.create(&other).await {
            Err(RepositoryError::Conflict(msg)) => assert!(msg.contains("email")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_and_list() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let mut user = make_user("mover");
        user.is_verified = false;
        repo.create(&user).await.unwrap();
        repo.create(&make_user("stayer")).await.unwrap();

        user.is_verified = true;
        user.email = "moved@example.com".to_string();
        repo.update(&user).await.unwrap();

        let found = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert!(found.is_verified);
        assert_eq!(found.email, "moved@example.com");

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "mover");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let result = repo.update(&make_user("ghost")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
