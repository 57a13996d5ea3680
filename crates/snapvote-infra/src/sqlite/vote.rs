//! SQLite vote repository implementation.
//!
//! Every vote change and the recount of `images.vote_count` share one writer
//! transaction, so the cached count always equals upvotes minus downvotes.

use std::collections::HashMap;

use snapvote_core::repository::vote::VoteRepository;
use snapvote_types::error::RepositoryError;
use snapvote_types::id::{ImageId, UserId};
use snapvote_types::vote::{VoteChange, VoteTally, VoteType, resolve_vote};
use uuid::Uuid;

use super::pool::DatabasePool;
use super::query_error;

pub struct SqliteVoteRepository {
    pool: DatabasePool,
}

impl SqliteVoteRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_vote(s: &str) -> Result<VoteType, RepositoryError> {
    s.parse().map_err(|e: String| RepositoryError::Query(e))
}

impl VoteRepository for SqliteVoteRepository {
    async fn apply_vote(
        &self,
        user_id: &UserId,
        image_id: &ImageId,
        requested: VoteType,
    ) -> Result<VoteTally, RepositoryError> {
        let user = user_id.to_string();
        let image = image_id.to_string();
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM images WHERE id = ?")
            .bind(&image)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error)?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT vote_type FROM votes WHERE user_id = ? AND image_id = ?")
                .bind(&user)
                .bind(&image)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;
        let existing = existing.map(|(v,)| parse_vote(&v)).transpose()?;

        let change = resolve_vote(existing, requested);
        match change {
            VoteChange::Insert(vote) => {
                sqlx::query(
                    "INSERT INTO votes (id, user_id, image_id, vote_type) VALUES (?, ?, ?, ?)",
                )
                .bind(Uuid::now_v7().to_string())
                .bind(&user)
                .bind(&image)
                .bind(vote.to_string())
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
            }
            VoteChange::Switch(vote) => {
                sqlx::query("UPDATE votes SET vote_type = ? WHERE user_id = ? AND image_id = ?")
                    .bind(vote.to_string())
                    .bind(&user)
                    .bind(&image)
                    .execute(&mut *tx)
                    .await
                    .map_err(query_error)?;
            }
            VoteChange::Remove => {
                sqlx::query("DELETE FROM votes WHERE user_id = ? AND image_id = ?")
                    .bind(&user)
                    .bind(&image)
                    .execute(&mut *tx)
                    .await
                    .map_err(query_error)?;
            }
        }

        let (vote_count,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(CASE vote_type WHEN 'upvote' THEN 1 ELSE -1 END), 0)
             FROM votes WHERE image_id = ?",
        )
        .bind(&image)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        sqlx::query("UPDATE images SET vote_count = ? WHERE id = ?")
            .bind(vote_count)
            .bind(&image)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        Ok(VoteTally {
            image_id: *image_id,
            vote_count,
            user_vote: change.resulting_vote(),
        })
    }

    async fn votes_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<HashMap<ImageId, VoteType>, RepositoryError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT image_id, vote_type FROM votes WHERE user_id = ?")
                .bind(user_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_error)?;

        let mut votes = HashMap::with_capacity(rows.len());
        for (image_id, vote_type) in rows {
            let image_id = image_id
                .parse::<ImageId>()
                .map_err(|e| RepositoryError::Query(format!("invalid image id: {e}")))?;
            votes.insert(image_id, parse_vote(&vote_type)?);
        }
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::image::SqliteImageRepository;
    use crate::sqlite::test_support::{insert_image, insert_user, make_image, make_user, test_pool};
    use snapvote_core::repository::image::ImageRepository;

    #[tokio::test]
    async fn test_vote_toggle_cycle() {
        let pool = test_pool().await;
        let owner = make_user("owner");
        let voter = make_user("voter");
        insert_user(&pool, &owner).await;
        insert_user(&pool, &voter).await;
        let image = make_image(&owner, "votable");
        insert_image(&pool, &image).await;
        let repo = SqliteVoteRepository::new(pool.clone());
        let images = SqliteImageRepository::new(pool);

        let tally = repo.apply_vote(&voter.id, &image.id, VoteType::Upvote).await.unwrap();
        assert_eq!(tally.vote_count, 1);
        assert_eq!(tally.user_vote, Some(VoteType::Upvote));

        let tally = repo.apply_vote(&voter.id, &image.id, VoteType::Downvote).await.unwrap();
        assert_eq!(tally.vote_count, -1);
        assert_eq!(tally.user_vote, Some(VoteType::Downvote));

        let tally = repo.apply_vote(&voter.id, &image.id, VoteType::Downvote).await.unwrap();
        assert_eq!(tally.vote_count, 0);
        assert_eq!(tally.user_vote, None);

        let stored = images.get_by_id(&image.id).await.unwrap().unwrap();
        assert_eq!(stored.vote_count, 0);
    }

    #[tokio::test]
    async fn test_count_sums_all_voters() {
        let pool = test_pool().await;
        let owner = make_user("owner");
        insert_user(&pool, &owner).await;
        let image = make_image(&owner, "crowd");
        insert_image(&pool, &image).await;
        let repo = SqliteVoteRepository::new(pool.clone());

        let mut last = None;
        for (name, vote) in [
            ("v1", VoteType::Upvote),
            ("v2", VoteType::Upvote),
            ("v3", VoteType::Downvote),
        ] {
            let voter = make_user(name);
            insert_user(&pool, &voter).await;
            last = Some(repo.apply_vote(&voter.id, &image.id, vote).await.unwrap());
        }
        assert_eq!(last.unwrap().vote_count, 1);

        let votes = repo.votes_by_user(&owner.id).await.unwrap();
        assert!(votes.is_empty());
    }

    #[tokio::test]
    async fn test_votes_by_user_and_missing_image() {
        let pool = test_pool().await;
        let owner = make_user("owner");
        insert_user(&pool, &owner).await;
        let image = make_image(&owner, "mine");
        insert_image(&pool, &image).await;
        let repo = SqliteVoteRepository::new(pool);

        repo.apply_vote(&owner.id, &image.id, VoteType::Downvote).await.unwrap();
        let votes = repo.votes_by_user(&owner.id).await.unwrap();
        assert_eq!(votes.get(&image.id), Some(&VoteType::Downvote));

        let missing = repo.apply_vote(&owner.id, &ImageId::new(), VoteType::Upvote).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound)));
    }
}
