//! SQLite comment repository implementation.

use snapvote_core::repository::comment::CommentRepository;
use snapvote_types::comment::Comment;
use snapvote_types::error::RepositoryError;
use snapvote_types::id::{CommentId, ImageId, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

const COMMENT_SELECT: &str = "SELECT c.id, c.content, c.timestamp, c.user_id, c.image_id, u.username
     FROM comments c JOIN users u ON u.id = c.user_id";

pub struct SqliteCommentRepository {
    pool: DatabasePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let user_id: String = row.try_get("user_id").map_err(query_error)?;
    let image_id: String = row.try_get("image_id").map_err(query_error)?;
    let timestamp: String = row.try_get("timestamp").map_err(query_error)?;

    Ok(Comment {
        id: id
            .parse::<CommentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid comment id: {e}")))?,
        content: row.try_get("content").map_err(query_error)?,
        timestamp: parse_datetime(&timestamp)?,
        user_id: user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?,
        image_id: image_id
            .parse::<ImageId>()
            .map_err(|e| RepositoryError::Query(format!("invalid image id: {e}")))?,
        username: row.try_get("username").map_err(query_error)?,
    })
}

impl CommentRepository for SqliteCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment, RepositoryError> {
        sqlx::query(
            "INSERT INTO comments (id, content, timestamp, user_id, image_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(&comment.content)
        .bind(format_datetime(&comment.timestamp))
        .bind(comment.user_id.to_string())
        .bind(comment.image_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(comment.clone())
    }

    async fn get_by_id(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(row_to_comment).transpose()
    }

    async fn list_for_image(&self, image_id: &ImageId) -> Result<Vec<Comment>, RepositoryError> {
        let sql =
            format!("{COMMENT_SELECT} WHERE c.image_id = ? ORDER BY c.timestamp DESC, c.id DESC");
        let rows = sqlx::query(&sql)
            .bind(image_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn delete(&self, id: &CommentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{insert_image, insert_user, make_image, make_user, test_pool};
    use chrono::{Duration, Utc};

    fn make_comment(
        author: &snapvote_types::user::User,
        image_id: ImageId,
        content: &str,
    ) -> Comment {
        Comment {
            id: CommentId::new(),
            content: content.to_string(),
            timestamp: Utc::now(),
            user_id: author.id,
            image_id,
            username: author.username.clone(),
        }
    }

    #[tokio::test]
    async fn test_list_newest_first_with_usernames() {
        let pool = test_pool().await;
        let author = make_user("critic");
        insert_user(&pool, &author).await;
        let image = make_image(&author, "subject");
        insert_image(&pool, &image).await;
        let repo = SqliteCommentRepository::new(pool);

        let mut first = make_comment(&author, image.id, "first");
        first.timestamp = Utc::now() - Duration::minutes(1);
        let second = make_comment(&author, image.id, "second");
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let comments = repo.list_for_image(&image.id).await.unwrap();
        let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);
        assert!(comments.iter().all(|c| c.username == "critic"));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let pool = test_pool().await;
        let author = make_user("writer");
        insert_user(&pool, &author).await;
        let image = make_image(&author, "canvas");
        insert_image(&pool, &image).await;
        let repo = SqliteCommentRepository::new(pool);

        let comment = make_comment(&author, image.id, "nice");
        repo.create(&comment).await.unwrap();
        assert!(repo.get_by_id(&comment.id).await.unwrap().is_some());

        repo.delete(&comment.id).await.unwrap();
        assert!(repo.get_by_id(&comment.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&comment.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
