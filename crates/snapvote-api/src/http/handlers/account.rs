//! The signed-in user's own account: details, email/password changes, and
//! their images.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use snapvote_types::image::Image;
use snapvote_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::ScopeQuery;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangeEmailBody {
    pub new_email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/account
pub async fn get_account(current: CurrentUser) -> ApiResponse<User> {
    RequestTimer::start()
        .finish(current.user)
        .with_link("self", "/api/v1/account")
        .with_link("images", "/api/v1/account/images")
        .with_link("profile", "/api/v1/profile")
}

/// POST /api/v1/account/email
pub async fn change_email(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ChangeEmailBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let email_sent = state
        .account_service
        .change_email(&current.user, &body.new_email)
        .await?;

    let message = if email_sent {
        "A verification link has been sent to your new email address."
    } else {
        "The verification email could not be sent. Please try again later."
    };
    Ok(timer.finish(json!({ "email_sent": email_sent, "message": message })))
}

/// GET /api/v1/account/email/verify/{token}
pub async fn verify_new_email(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(token): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let user = state
        .account_service
        .verify_new_email(&current.user, &token)
        .await?;

    Ok(timer.finish(json!({
        "user": user,
        "message": "Your email has been updated successfully!",
    })))
}

/// POST /api/v1/account/password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ChangePasswordBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    state
        .account_service
        .change_password(&current.user, &body.current_password, &body.new_password)
        .await?;

    Ok(timer.finish(json!({ "message": "Your password has been updated!" })))
}

/// GET /api/v1/account/images?scope=active|moderated|archived
pub async fn my_images(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ScopeQuery>,
) -> Result<ApiResponse<Vec<Image>>, AppError> {
    let timer = RequestTimer::start();
    let scope = query.scope()?;
    let images = state
        .image_service
        .owner_images(&current.user.id, scope)
        .await?;

    Ok(timer.finish(images).with_link("upload", "/api/v1/images"))
}
