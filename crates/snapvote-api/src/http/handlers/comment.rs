//! Comments on approved images.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use snapvote_types::comment::Comment;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::{comment_id, image_id};
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: String,
}

/// GET /api/v1/images/{id}/comments - newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = image_id(&id)?;
    let (image, comments) = state.social_service.comments(&id).await?;

    let self_link = format!("/api/v1/images/{}/comments", image.id);
    Ok(timer
        .finish(json!({ "image": image, "comments": comments }))
        .with_link("self", &self_link))
}

/// POST /api/v1/images/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, ApiResponse<Comment>), AppError> {
    let timer = RequestTimer::start();
    let id = image_id(&id)?;
    let comment = state
        .social_service
        .add_comment(&current.user, &id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, timer.finish(comment)))
}

/// DELETE /api/v1/comments/{id} - superusers only.
pub async fn delete_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = comment_id(&id)?;
    let comment = state
        .social_service
        .delete_comment(&current.user, &id)
        .await?;

    Ok(timer.finish(json!({
        "deleted": comment.id,
        "image_id": comment.image_id,
        "message": "Comment deleted successfully.",
    })))
}
