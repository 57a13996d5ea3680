//! SQLite image repository implementation.
//!
//! Metadata queries join the uploader's username and never select the
//! `image_data` column; the payload is read only by `get_data`.

use chrono::{DateTime, Utc};
use snapvote_core::repository::image::{ImageFilter, ImageRepository};
use snapvote_types::error::RepositoryError;
use snapvote_types::id::{ImageId, UserId};
use snapvote_types::image::{Category, Image, ModerationStatus};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, query_error};

const IMAGE_COLUMNS: &str = "i.id, i.name, i.upload_date, i.moderation_status, i.category, \
     i.is_archived, i.artist_archived, i.unique_number, i.vote_count, i.last_reset_date, \
     i.last_reset_reason, i.user_id, u.username";

pub struct SqliteImageRepository {
    pool: DatabasePool,
}

impl SqliteImageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Image.
struct ImageRow {
    id: String,
    name: String,
    upload_date: String,
    moderation_status: String,
    category: String,
    is_archived: bool,
    artist_archived: bool,
    unique_number: Option<String>,
    vote_count: i64,
    last_reset_date: Option<String>,
    last_reset_reason: Option<String>,
    user_id: String,
    username: String,
}

impl ImageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            upload_date: row.try_get("upload_date")?,
            moderation_status: row.try_get("moderation_status")?,
            category: row.try_get("category")?,
            is_archived: row.try_get("is_archived")?,
            artist_archived: row.try_get("artist_archived")?,
            unique_number: row.try_get("unique_number")?,
            vote_count: row.try_get("vote_count")?,
            last_reset_date: row.try_get("last_reset_date")?,
            last_reset_reason: row.try_get("last_reset_reason")?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
        })
    }

    fn into_image(self) -> Result<Image, RepositoryError> {
        let id = self
            .id
            .parse::<ImageId>()
            .map_err(|e| RepositoryError::Query(format!("invalid image id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let moderation_status: ModerationStatus = self
            .moderation_status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let category: Category = self
            .category
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let last_reset_date = self
            .last_reset_date
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(Image {
            id,
            name: self.name,
            upload_date: parse_datetime(&self.upload_date)?,
            moderation_status,
            category,
            is_archived: self.is_archived,
            artist_archived: self.artist_archived,
            unique_number: self.unique_number,
            vote_count: self.vote_count,
            last_reset_date,
            last_reset_reason: self.last_reset_reason,
            user_id,
            username: self.username,
        })
    }
}

fn rows_to_images(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Image>, RepositoryError> {
    let mut images = Vec::with_capacity(rows.len());
    for row in rows {
        let image_row = ImageRow::from_row(row).map_err(query_error)?;
        images.push(image_row.into_image()?);
    }
    Ok(images)
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}

impl ImageRepository for SqliteImageRepository {
    async fn create(&self, image: &Image, data: &[u8]) -> Result<Image, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO images (id, name, image_data, upload_date, moderation_status, category, is_archived, artist_archived, unique_number, vote_count, last_reset_date, last_reset_reason, user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(image.id.to_string())
        .bind(&image.name)
        .bind(data)
        .bind(format_datetime(&image.upload_date))
        .bind(image.moderation_status.to_string())
        .bind(image.category.to_string())
        .bind(image.is_archived)
        .bind(image.artist_archived)
        .bind(&image.unique_number)
        .bind(image.vote_count)
        .bind(image.last_reset_date.as_ref().map(format_datetime))
        .bind(&image.last_reset_reason)
        .bind(image.user_id.to_string())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(image.clone()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Conflict(format!(
                "image {} already exists",
                image.id
            ))),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &ImageId) -> Result<Option<Image>, RepositoryError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images i JOIN users u ON u.id = i.user_id WHERE i.id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let image_row = ImageRow::from_row(&row).map_err(query_error)?;
                Ok(Some(image_row.into_image()?))
            }
            None => Ok(None),
        }
    }

    async fn get_data(&self, id: &ImageId) -> Result<Option<Vec<u8>>, RepositoryError> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT image_data FROM images WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        Ok(row.map(|(data,)| data))
    }

    async fn list(&self, filter: ImageFilter) -> Result<Vec<Image>, RepositoryError> {
        let mut sql =
            format!("SELECT {IMAGE_COLUMNS} FROM images i JOIN users u ON u.id = i.user_id");
        let mut conditions: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref statuses) = filter.statuses {
            if statuses.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; statuses.len()].join(", ");
            conditions.push(format!("i.moderation_status IN ({placeholders})"));
            binds.extend(statuses.iter().map(ToString::to_string));
        }
        if let Some(category) = filter.category {
            conditions.push("i.category = ?".to_string());
            binds.push(category.to_string());
        }
        if let Some(archived) = filter.is_archived {
            conditions.push(format!("i.is_archived = {}", flag(archived)));
        }
        if let Some(archived) = filter.artist_archived {
            conditions.push(format!("i.artist_archived = {}", flag(archived)));
        }
        if let Some(user_id) = filter.user_id {
            conditions.push("i.user_id = ?".to_string());
            binds.push(user_id.to_string());
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY i.upload_date DESC, i.id DESC");

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows_to_images(&rows)
    }

    async fn update_with<T, F>(
        &self,
        id: &ImageId,
        change: F,
    ) -> Result<Option<(Image, T)>, RepositoryError>
    where
        F: FnOnce(&mut Image) -> T + Send,
        T: Send,
    {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images i JOIN users u ON u.id = i.user_id WHERE i.id = ?"
        );
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut image = ImageRow::from_row(&row).map_err(query_error)?.into_image()?;
        let result = change(&mut image);

        let written = sqlx::query(
            "UPDATE images SET moderation_status = ?, category = ?, is_archived = ?, artist_archived = ?, unique_number = ?
             WHERE id = ?",
        )
        .bind(image.moderation_status.to_string())
        .bind(image.category.to_string())
        .bind(image.is_archived)
        .bind(image.artist_archived)
        .bind(&image.unique_number)
        .bind(image.id.to_string())
        .execute(&mut *tx)
        .await;

        match written {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(RepositoryError::Conflict(format!(
                    "unique number {} already assigned",
                    image.unique_number.as_deref().unwrap_or_default()
                )));
            }
            Err(e) => return Err(query_error(e)),
        }

        tx.commit().await.map_err(query_error)?;
        Ok(Some((image, result)))
    }

    async fn most_upvoted_approved(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Image>, RepositoryError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images i JOIN users u ON u.id = i.user_id
             WHERE i.user_id = ? AND i.moderation_status = 'approved'
             ORDER BY i.vote_count DESC, i.upload_date ASC LIMIT 1"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        Ok(rows_to_images(&rows)?.into_iter().next())
    }

    async fn reset_votes(
        &self,
        id: &ImageId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("DELETE FROM votes WHERE image_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        let result = sqlx::query(
            "UPDATE images SET vote_count = 0, last_reset_date = ?, last_reset_reason = ? WHERE id = ?",
        )
        .bind(format_datetime(&at))
        .bind(reason)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{insert_user, make_image, make_user, test_pool};
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_get_and_data() {
        let pool = test_pool().await;
        let owner = make_user("painter");
        insert_user(&pool, &owner).await;
        let repo = SqliteImageRepository::new(pool);

        let image = make_image(&owner, "Sunset");
        repo.create(&image, &[1, 2, 3]).await.unwrap();

        let found = repo.get_by_id(&image.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Sunset");
        assert_eq!(found.username, "painter");
        assert_eq!(found.moderation_status, ModerationStatus::Unmoderated);

        let data = repo.get_data(&image.id).await.unwrap().unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert!(repo.get_data(&ImageId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let pool = test_pool().await;
        let owner = make_user("lister");
        let other = make_user("other");
        insert_user(&pool, &owner).await;
        insert_user(&pool, &other).await;
        let repo = SqliteImageRepository::new(pool);

        let base = Utc::now();
        let mut old = make_image(&owner, "old");
        old.upload_date = base - Duration::minutes(10);
        old.moderation_status = ModerationStatus::Approved;
        old.category = Category::Art;

        let mut pending = make_image(&owner, "pending");
        pending.upload_date = base - Duration::minutes(5);
        pending.moderation_status = ModerationStatus::Pending;

        let mut archived = make_image(&other, "archived");
        archived.upload_date = base;
        archived.is_archived = true;
        archived.artist_archived = true;

        for image in [&old, &pending, &archived] {
            repo.create(image, &[0]).await.unwrap();
        }

        let all = repo.list(ImageFilter::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["archived", "pending", "old"]);

        let dashboard = repo
            .list(ImageFilter {
                statuses: Some(vec![ModerationStatus::Pending, ModerationStatus::Approved]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(dashboard.len(), 2);

        let art = repo
            .list(ImageFilter {
                category: Some(Category::Art),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(art.len(), 1);
        assert_eq!(art[0].name, "old");

        let superuser_archived = repo
            .list(ImageFilter {
                is_archived: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(superuser_archived.len(), 1);

        let owner_active = repo
            .list(ImageFilter {
                user_id: Some(owner.id),
                artist_archived: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(owner_active.len(), 2);
    }

    #[tokio::test]
    async fn test_unique_number_collision_is_conflict() {
        let pool = test_pool().await;
        let owner = make_user("numbered");
        insert_user(&pool, &owner).await;
        let repo = SqliteImageRepository::new(pool);

        let first = make_image(&owner, "first");
        let second = make_image(&owner, "second");
        repo.create(&first, &[0]).await.unwrap();
        repo.create(&second, &[0]).await.unwrap();

        let approve = |image: &mut Image| {
            image.moderation_status = ModerationStatus::Approved;
            image.unique_number = Some("1234567890".to_string());
        };
        repo.update_with(&first.id, approve).await.unwrap().unwrap();
        assert!(matches!(
            repo.update_with(&second.id, approve).await,
            Err(RepositoryError::Conflict(_))
        ));

        // Rolled back: the second image is untouched
        let second = repo.get_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(second.moderation_status, ModerationStatus::Unmoderated);
        assert!(second.unique_number.is_none());

        assert!(repo.update_with(&ImageId::new(), approve).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_updates_see_each_other() {
        let pool = test_pool().await;
        let owner = make_user("contended");
        insert_user(&pool, &owner).await;
        let repo = SqliteImageRepository::new(pool);

        let image = make_image(&owner, "contended");
        repo.create(&image, &[0]).await.unwrap();

        let approve = |image: &mut Image| {
            image.moderation_status = ModerationStatus::Approved;
        };
        let archive = |image: &mut Image| {
            image.artist_archived = !image.artist_archived;
        };
        let (approved, archived) = tokio::join!(
            repo.update_with(&image.id, approve),
            repo.update_with(&image.id, archive),
        );
        approved.unwrap().unwrap();
        archived.unwrap().unwrap();

        let found = repo.get_by_id(&image.id).await.unwrap().unwrap();
        assert_eq!(found.moderation_status, ModerationStatus::Approved);
        assert!(found.artist_archived);
    }

    #[tokio::test]
    async fn test_most_upvoted_approved_ignores_unapproved() {
        let pool = test_pool().await;
        let owner = make_user("popular");
        insert_user(&pool, &owner).await;
        let repo = SqliteImageRepository::new(pool.clone());

        let mut approved = make_image(&owner, "approved");
        approved.moderation_status = ModerationStatus::Approved;
        approved.vote_count = 2;
        let mut pending = make_image(&owner, "pending");
        pending.moderation_status = ModerationStatus::Pending;
        pending.vote_count = 10;
        repo.create(&approved, &[0]).await.unwrap();
        repo.create(&pending, &[0]).await.unwrap();

        let best = repo.most_upvoted_approved(&owner.id).await.unwrap().unwrap();
        assert_eq!(best.name, "approved");

        let nobody = make_user("nobody");
        insert_user(&pool, &nobody).await;
        assert!(repo.most_upvoted_approved(&nobody.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_votes_records_reason() {
        let pool = test_pool().await;
        let owner = make_user("resettable");
        insert_user(&pool, &owner).await;
        let repo = SqliteImageRepository::new(pool);

        let mut image = make_image(&owner, "hot");
        image.vote_count = 7;
        repo.create(&image, &[0]).await.unwrap();

        let at = Utc::now();
        repo.reset_votes(&image.id, "vote brigading", at).await.unwrap();

        let found = repo.get_by_id(&image.id).await.unwrap().unwrap();
        assert_eq!(found.vote_count, 0);
        assert_eq!(found.last_reset_reason.as_deref(), Some("vote brigading"));
        assert!(found.last_reset_date.is_some());

        assert!(matches!(
            repo.reset_votes(&ImageId::new(), "x", at).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
