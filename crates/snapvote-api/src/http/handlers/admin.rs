//! Superuser views and moderation actions.
//!
//! Role checks happen in the image service; these handlers only resolve the
//! caller and translate form fields.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use snapvote_types::image::{Category, Image};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::CategoryQuery;
use crate::http::handlers::image_id;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ModerateBody {
    pub status: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetVotesBody {
    #[serde(default)]
    pub reason: String,
}

fn listing(images: Vec<Image>, query: &CategoryQuery) -> Value {
    json!({
        "images": images,
        "category": query.category.as_deref().unwrap_or("all"),
        "categories": Category::ALL.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
    })
}

/// GET /api/v1/admin/dashboard - pending and approved images.
pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let images = state
        .image_service
        .dashboard(&current.user, query.filter()?)
        .await?;

    Ok(timer
        .finish(listing(images, &query))
        .with_link("edit", "/api/v1/admin/images")
        .with_link("archived", "/api/v1/admin/archived"))
}

/// GET /api/v1/admin/images - every image, for moderation.
pub async fn edit_images(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let images = state
        .image_service
        .edit_images(&current.user, query.filter()?)
        .await?;
    Ok(timer.finish(listing(images, &query)))
}

/// GET /api/v1/admin/archived
pub async fn archived_images(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let images = state
        .image_service
        .archived_images(&current.user, query.filter()?)
        .await?;
    Ok(timer.finish(listing(images, &query)))
}

/// POST /api/v1/admin/images/{id}/moderate
pub async fn moderate(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ModerateBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    // Superuser check precedes id parsing so non-admins always see 403
    current.require_superuser()?;
    let id = image_id(&id)?;
    let (image, outcome) = state
        .image_service
        .moderate(&current.user, &id, &body.status, &body.category)
        .await?;

    Ok(timer.finish(json!({
        "image": image,
        "outcome": outcome,
        "message": "Image status and category updated successfully!",
    })))
}

/// POST /api/v1/admin/images/{id}/archive
pub async fn toggle_archive(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    current.require_superuser()?;
    let id = image_id(&id)?;
    let image = state.image_service.toggle_archive(&current.user, &id).await?;

    let message = if image.is_archived {
        "Image archived successfully!"
    } else {
        "Image unarchived successfully!"
    };
    Ok(timer.finish(json!({ "image": image, "message": message })))
}

/// POST /api/v1/admin/images/{id}/reset-votes
pub async fn reset_votes(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ResetVotesBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    current.require_superuser()?;
    let id = image_id(&id)?;
    let image = state
        .image_service
        .reset_votes(&current.user, &id, &body.reason)
        .await?;

    Ok(timer.finish(json!({
        "image": image,
        "message": "Votes have been reset successfully!",
    })))
}
