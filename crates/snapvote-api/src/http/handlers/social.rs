//! Profiles and follow relations.

use axum::extract::{Path, State};
use serde_json::{Value, json};

use snapvote_types::follow::Profile;

use crate::http::error::AppError;
use crate::http::extractors::auth::{CurrentUser, OptionalUser};
use crate::http::handlers::user_id;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// GET /api/v1/profile - the caller's own profile.
pub async fn own_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<ApiResponse<Profile>, AppError> {
    let timer = RequestTimer::start();
    let profile = state
        .social_service
        .profile(&current.user.id, Some(&current.user))
        .await?;
    Ok(timer.finish(profile).with_link("account", "/api/v1/account"))
}

/// GET /api/v1/profile/{user_id}
pub async fn public_profile(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Profile>, AppError> {
    let timer = RequestTimer::start();
    let id = user_id(&id)?;
    let profile = state.social_service.profile(&id, viewer.as_ref()).await?;

    let self_link = format!("/api/v1/profile/{id}");
    let follow_link = format!("/api/v1/users/{id}/follow");
    Ok(timer
        .finish(profile)
        .with_link("self", &self_link)
        .with_link("follow", &follow_link))
}

/// POST /api/v1/users/{id}/follow
pub async fn follow(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = user_id(&id)?;
    let (target, created) = state.social_service.follow(&current.user, &id).await?;

    let message = if created {
        format!("You are now following {}.", target.username)
    } else {
        format!("You are already following {}.", target.username)
    };
    Ok(timer.finish(json!({
        "following": target.id,
        "created": created,
        "message": message,
    })))
}

/// POST /api/v1/users/{id}/unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = user_id(&id)?;
    let (target, removed) = state.social_service.unfollow(&current.user, &id).await?;

    Ok(timer.finish(json!({
        "unfollowed": target.id,
        "removed": removed,
        "message": format!("You have unfollowed {}.", target.username),
    })))
}
