//! Image upload, galleries, raw PNG/QR payloads, voting, and owner actions.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Value, json};

use snapvote_types::image::Image;
use snapvote_types::vote::VoteTally;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::CategoryQuery;
use crate::http::handlers::image_id;
use crate::http::response::{ApiResponse, RequestTimer, png};
use crate::state::AppState;

/// Multipart upload fields after reading the body.
#[derive(Debug, Default)]
struct UploadForm {
    name: Option<String>,
    filename: Option<String>,
    bytes: Option<Vec<u8>>,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                form.name = Some(text);
            }
            Some("image") => {
                form.filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                form.bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/images (multipart: `name`, `image`)
pub async fn upload_image(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<Value>), AppError> {
    let timer = RequestTimer::start();
    let form = read_upload(multipart).await?;

    let name = form.name.unwrap_or_default();
    let (Some(filename), Some(bytes)) = (form.filename, form.bytes) else {
        return Err(AppError::Validation("No file selected.".to_string()));
    };
    if filename.is_empty() || bytes.is_empty() {
        return Err(AppError::Validation("No file selected.".to_string()));
    }

    let image = state
        .image_service
        .upload(&current.user, &name, &filename, &bytes)
        .await?;

    let self_link = format!("/api/v1/images/{}", image.id);
    let resp = timer
        .finish(json!({
            "image": image,
            "message": "Image uploaded successfully!",
        }))
        .with_link("self", &self_link)
        .with_link("request_moderation", &format!("{self_link}/request-moderation"));

    Ok((StatusCode::CREATED, resp))
}

/// GET /api/v1/images - every image plus the caller's votes.
pub async fn view_all_images(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let category = query.filter()?;
    let listing = state.image_service.view_all(&current.user, category).await?;

    Ok(timer
        .finish(json!({
            "images": listing.images,
            "user_votes": listing.user_votes,
            "category": query.category.as_deref().unwrap_or("all"),
        }))
        .with_link("self", "/api/v1/images"))
}

/// GET /api/v1/images/guest - approved images, no login required.
pub async fn guest_view(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Vec<Image>>, AppError> {
    let timer = RequestTimer::start();
    let images = state.image_service.guest_view(query.filter()?).await?;
    Ok(timer.finish(images).with_link("self", "/api/v1/images/guest"))
}

/// GET /api/v1/images/{id} - stored PNG bytes.
pub async fn image_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = image_id(&id)?;
    let bytes = state.image_service.image_data(&id).await?;
    Ok(png(bytes))
}

/// GET /api/v1/images/{id}/qr - QR code PNG for an approved image.
pub async fn qr_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = image_id(&id)?;
    let bytes = state.image_service.qr_code(&id).await?;
    Ok(png(bytes))
}

/// POST /api/v1/images/{id}/vote/{vote_type}
pub async fn vote(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((id, vote_type)): Path<(String, String)>,
) -> Result<ApiResponse<VoteTally>, AppError> {
    let timer = RequestTimer::start();
    let id = image_id(&id)?;
    let tally = state.image_service.vote(&current.user, &id, &vote_type).await?;
    Ok(timer.finish(tally))
}

/// POST /api/v1/images/{id}/request-moderation
pub async fn request_moderation(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = image_id(&id)?;
    let (image, requested) = state
        .image_service
        .request_moderation(&current.user, &id)
        .await?;

    let message = if requested {
        "Moderation requested successfully!"
    } else {
        "This image has already been submitted for moderation."
    };
    Ok(timer.finish(json!({
        "image": image,
        "requested": requested,
        "message": message,
    })))
}

/// POST /api/v1/images/{id}/artist-archive
pub async fn toggle_artist_archive(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    let timer = RequestTimer::start();
    let id = image_id(&id)?;
    let image = state
        .image_service
        .toggle_artist_archive(&current.user, &id)
        .await?;

    let message = if image.artist_archived {
        "Image archived."
    } else {
        "Image restored from archive."
    };
    Ok(timer.finish(json!({ "image": image, "message": message })))
}
