//! Reverse share handlers: invite creation and guest upload.

use axum::Json;
use axum::extract::{Multipart, State};
use bytes::Bytes;

use inbound_core::error::AppError;
use inbound_service::{GuestUpload, UploadReceipt};

use crate::dto::request::InviteRequest;
use crate::dto::response::{ApiResponse, InviteResponse};
use crate::error::ApiError;
use crate::extractors::{GuestUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// POST /api/reverse-shares/invite
///
/// The feature flag and the caller are checked before the body, so a
/// disabled feature answers the same whatever was posted.
pub async fn create_invite(
    State(state): State<AppState>,
    MaybeAuthUser(owner): MaybeAuthUser,
    body: Result<ValidatedJson<InviteRequest>, ApiError>,
) -> Result<Json<ApiResponse<InviteResponse>>, ApiError> {
    if !state.invite_service.reverse_shares_allowed().await {
        return Err(AppError::feature_disabled("Reverse shares are not allowed").into());
    }
    if owner.is_none() {
        return Err(AppError::unauthorized("Unauthorized").into());
    }
    let ValidatedJson(req) = body?;

    let invite = state
        .invite_service
        .create_invite(owner.as_ref(), req.into())
        .await?;

    Ok(Json(ApiResponse::ok(InviteResponse { invite })))
}

/// POST /api/reverse-shares/uploads
pub async fn upload(
    State(state): State<AppState>,
    guest: GuestUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadReceipt>>, ApiError> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        file = Some((file_name, data));
    }

    let (file_name, data) = file.ok_or_else(|| {
        AppError::validation("Validation failed").with_details(serde_json::json!({
            FILE_FIELD: ["The file field is required."]
        }))
    })?;

    let receipt = state
        .upload_service
        .accept(guest.guest_id, guest.invite_id, GuestUpload { file_name, data })
        .await?;

    Ok(Json(ApiResponse::ok(receipt)))
}
