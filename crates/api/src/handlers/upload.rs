//! Handler for the asset library upload endpoint.
//!
//! Multipart fields `file`, `type`, and `userId` are all required. The
//! upload validation utilities are the mandatory pre-check before the
//! upload capability is invoked: declared MIME type for images, and the
//! per-category size ceiling for everything.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use brandkit_core::capability::{UploadFile, UploadedAsset};
use brandkit_core::types::UserId;
use brandkit_core::upload::{is_valid_file_size, is_valid_image_file};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Upload category for images; other categories use the generic ceiling.
const CATEGORY_IMAGE: &str = "image";

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub asset: UploadedAsset,
    pub message: &'static str,
}

/// POST /api/asset-library/upload
///
/// Accepts multipart form data with `file`, `type`, and `userId` fields;
/// responds 400 if any is missing or invalid, 200 with
/// `{success, asset, message}` on success.
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file: Option<UploadFile> = None;
    let mut category: Option<String> = None;
    let mut user_id: Option<UserId> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file field: {e}")))?
                    .to_vec();
                file = Some(UploadFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            Some("type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read type field: {e}")))?;
                category = Some(value);
            }
            Some("userId") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read userId field: {e}"))
                })?;
                let parsed = value
                    .parse()
                    .map_err(|_| AppError::BadRequest("userId must be a valid UUID".to_string()))?;
                user_id = Some(parsed);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;
    let category =
        category.ok_or_else(|| AppError::BadRequest("Missing type field".to_string()))?;
    let user_id =
        user_id.ok_or_else(|| AppError::BadRequest("Missing userId field".to_string()))?;

    // Required pre-checks before the capability is invoked.
    let size_limit = if category == CATEGORY_IMAGE {
        if !is_valid_image_file(&file.content_type) {
            return Err(AppError::BadRequest(format!(
                "Unsupported image type '{}'",
                file.content_type
            )));
        }
        state.config.max_image_upload_bytes
    } else {
        state.config.max_file_upload_bytes
    };

    if !is_valid_file_size(file.bytes.len() as u64, size_limit) {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {size_limit}-byte limit for type '{category}'"
        )));
    }

    let asset = state.uploader.store(&file, &category, user_id).await?;

    tracing::info!(
        asset_id = %asset.id,
        %user_id,
        category = %category,
        "Asset uploaded",
    );

    Ok(Json(UploadResponse {
        success: true,
        asset,
        message: "File uploaded successfully",
    }))
}
