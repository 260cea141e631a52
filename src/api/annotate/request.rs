// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction

use axum_extra::extract::Multipart;
use tracing::debug;

use crate::api::errors::ApiError;

/// Form field carrying the X-ray image
pub const IMAGE_FIELD: &str = "image";

/// Raw uploaded image with its client-side file name
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Reject uploads the pipeline should never see
    pub fn validate(&self, max_bytes: usize) -> Result<(), ApiError> {
        // A nameless part has no identifier and would match every table row
        if self.bytes.is_empty() || self.file_name.trim().is_empty() {
            return Err(ApiError::MissingImage);
        }
        if self.bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge {
                size: self.bytes.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }
}

/// Pull the `image` field out of a multipart form; other fields are ignored
pub async fn read_image_upload(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        return Ok(ImageUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::MissingImage)
}
