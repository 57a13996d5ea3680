//! Session authentication extractors.
//!
//! Reads the session token from `Authorization: Bearer <token>` and resolves
//! it through the account service, which compares SHA-256 hashes against
//! the `sessions` table and rejects expired sessions.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use snapvote_types::error::AccountError;
use snapvote_types::session::Session;
use snapvote_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated caller. Extracting this validates the bearer token.
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl CurrentUser {
    /// Reject callers that are not superusers with "Access Denied!".
    pub fn require_superuser(&self) -> Result<&User, AppError> {
        if self.user.is_superuser {
            Ok(&self.user)
        } else {
            Err(AppError::Forbidden("Access Denied!".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Unauthorized(
                "Please log in to access this page. Provide 'Authorization: Bearer <token>'."
                    .to_string(),
            )
        })?;

        let (user, session) = state
            .account_service
            .authenticate(&token)
            .await
            .map_err(|e| match e {
                AccountError::InvalidSession => AppError::Unauthorized(
                    "Session expired or invalid. Please log in again.".to_string(),
                ),
                other => AppError::Account(other),
            })?;

        Ok(CurrentUser { user, session })
    }
}

/// Caller that may or may not be logged in.
///
/// A missing header yields `None`; a present but invalid token is still
/// rejected so clients notice stale sessions.
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if bearer_token(parts)?.is_none() {
            return Ok(OptionalUser(None));
        }
        let current = CurrentUser::from_request_parts(parts, state).await?;
        Ok(OptionalUser(Some(current.user)))
    }
}

/// Extract the bearer token, if an `Authorization` header is present.
fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Unauthorized(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}
