// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotation endpoint handlers

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::request::{read_image_upload, ImageUpload};
use super::response::{attachment_headers, AnnotateResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::service::EncodedAnnotation;

/// POST /api/image/annotate - Annotate an uploaded X-ray
///
/// # Request
/// Multipart form with an `image` file field. The identifier used for the
/// table lookup is the file name without its extension.
///
/// # Response
/// - `image`: Base64-encoded annotated image (JPEG unless configured otherwise)
/// - `report`: Distinct labels drawn on the image
///
/// # Errors
/// - 400 Bad Request: no image field, or the bytes are not a decodable image
/// - 413 Payload Too Large: image exceeds the configured upload cap
/// - 500 Internal Server Error: encoding failed
pub async fn annotate_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnnotateResponse>, ApiError> {
    let upload = read_image_upload(multipart).await?;
    let annotation = run_pipeline(&state, upload).await?;
    Ok(Json(AnnotateResponse::from(&annotation)))
}

/// POST /api/image/annotate/file - Annotate and return the image itself
///
/// Same input as [`annotate_handler`]. The body is the encoded image; the
/// report travels as a JSON array in the `x-annotation-report` header.
pub async fn annotate_file_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_image_upload(multipart).await?;
    let annotation = run_pipeline(&state, upload).await?;
    let headers = attachment_headers(&annotation)?;
    Ok((headers, annotation.bytes).into_response())
}

async fn run_pipeline(state: &AppState, upload: ImageUpload) -> Result<EncodedAnnotation, ApiError> {
    let pipeline = state.pipeline.clone();
    upload.validate(pipeline.max_upload_bytes())?;
    debug!(
        "Annotation request for '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    // Decode, draw and encode are CPU-bound
    let result = tokio::task::spawn_blocking(move || {
        pipeline.annotate_upload(&upload.bytes, &upload.file_name)
    })
    .await
    .map_err(|e| ApiError::InternalError(e.to_string()))?;

    result.map_err(|e| {
        warn!("Annotation failed: {}", e);
        ApiError::from(e)
    })
}
