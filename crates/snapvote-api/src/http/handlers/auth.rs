//! Registration, email verification, login/logout, and password reset.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use snapvote_types::user::{LoginRequest, RegisterRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub password: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<Value>), AppError> {
    let timer = RequestTimer::start();

    let outcome = state.account_service.register(body).await?;
    let message = if outcome.email_sent {
        "Registration successful! Check your email to verify your account."
    } else {
        "Registration successful, but the verification email could not be sent."
    };

    let resp = timer
        .finish(json!({
            "user": outcome.user,
            "email_sent": outcome.email_sent,
            "message": message,
        }))
        .with_link("login", "/api/v1/auth/login");

    Ok((StatusCode::CREATED, resp))
}

/// GET /api/v1/auth/verify-email/{token}
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let user = state.account_service.verify_email(&token).await?;

    Ok(timer
        .finish(json!({
            "user": user,
            "message": "Your email has been verified! You can now log in.",
        }))
        .with_link("login", "/api/v1/auth/login"))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let outcome = state.account_service.login(body).await?;
    let redirect = outcome.redirect();

    let next = if redirect == "superuser_dashboard" {
        "/api/v1/admin/dashboard"
    } else {
        "/api/v1/account"
    };

    Ok(timer
        .finish(json!({
            "token": outcome.token,
            "expires_at": outcome.expires_at,
            "user": outcome.user,
            "redirect": redirect,
            "message": "Login successful!",
        }))
        .with_link("next", next))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    state.account_service.logout(&current.session.id).await?;
    tracing::info!(user_id = %current.user.id, "logged out");

    Ok(timer.finish(json!({ "message": "You have been logged out." })))
}

/// POST /api/v1/auth/reset-password-request
pub async fn reset_password_request(
    State(state): State<AppState>,
    Json(body): Json<ResetRequestBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let email_sent = state
        .account_service
        .request_password_reset(&body.email)
        .await?;

    let message = if email_sent {
        "A password reset link has been sent to your email."
    } else {
        "The password reset email could not be sent. Please try again later."
    };
    Ok(timer.finish(json!({ "email_sent": email_sent, "message": message })))
}

/// POST /api/v1/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    state
        .account_service
        .reset_password(&token, &body.password)
        .await?;

    Ok(timer
        .finish(json!({ "message": "Your password has been updated! You can now log in." }))
        .with_link("login", "/api/v1/auth/login"))
}
