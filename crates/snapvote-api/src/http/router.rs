//! Axum router configuration with middleware.
//!
//! All JSON routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS, tracing, upload body limit.

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Largest accepted request body (multipart uploads included).
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Authentication
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/verify-email/{token}", get(handlers::auth::verify_email))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/auth/reset-password-request",
            post(handlers::auth::reset_password_request),
        )
        .route(
            "/auth/reset-password/{token}",
            post(handlers::auth::reset_password),
        )
        // Own account
        .route("/account", get(handlers::account::get_account))
        .route("/account/email", post(handlers::account::change_email))
        .route(
            "/account/email/verify/{token}",
            get(handlers::account::verify_new_email),
        )
        .route("/account/password", post(handlers::account::change_password))
        .route("/account/images", get(handlers::account::my_images))
        // Images
        .route(
            "/images",
            get(handlers::image::view_all_images).post(handlers::image::upload_image),
        )
        .route("/images/guest", get(handlers::image::guest_view))
        .route("/images/{id}", get(handlers::image::image_data))
        .route("/images/{id}/qr", get(handlers::image::qr_code))
        .route("/images/{id}/vote/{vote_type}", post(handlers::image::vote))
        .route(
            "/images/{id}/request-moderation",
            post(handlers::image::request_moderation),
        )
        .route(
            "/images/{id}/artist-archive",
            post(handlers::image::toggle_artist_archive),
        )
        // Comments
        .route(
            "/images/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::add_comment),
        )
        .route("/comments/{id}", delete(handlers::comment::delete_comment))
        // Superuser
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route("/admin/images", get(handlers::admin::edit_images))
        .route("/admin/archived", get(handlers::admin::archived_images))
        .route("/admin/images/{id}/moderate", post(handlers::admin::moderate))
        .route("/admin/images/{id}/archive", post(handlers::admin::toggle_archive))
        .route(
            "/admin/images/{id}/reset-votes",
            post(handlers::admin::reset_votes),
        )
        // Profiles and follows
        .route("/profile", get(handlers::social::own_profile))
        .route("/profile/{user_id}", get(handlers::social::public_profile))
        .route("/users/{id}/follow", post(handlers::social::follow))
        .route("/users/{id}/unfollow", post(handlers::social::unfollow));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness plus a database round-trip.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match state.db_pool.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "health check database ping failed");
            "unavailable"
        }
    };

    Json(serde_json::json!({
        "status": "ok",
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
