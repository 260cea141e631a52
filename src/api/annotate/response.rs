// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotation response shapes

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::service::EncodedAnnotation;
use crate::vision::encode_base64;

/// Header carrying the label report on the file response
pub const REPORT_HEADER: &str = "x-annotation-report";

/// Inline response: annotated image as base64 plus the label report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateResponse {
    /// Base64-encoded annotated image
    pub image: String,
    /// Distinct labels drawn on the image
    pub report: Vec<String>,
}

impl From<&EncodedAnnotation> for AnnotateResponse {
    fn from(annotation: &EncodedAnnotation) -> Self {
        Self {
            image: encode_base64(&annotation.bytes),
            report: annotation.report.clone(),
        }
    }
}

/// Headers for the file response: content type, attachment name, report
pub fn attachment_headers(annotation: &EncodedAnnotation) -> Result<HeaderMap, ApiError> {
    let report = serde_json::to_string(&annotation.report)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    let disposition = format!(
        "attachment; filename=\"{}_annotated.{}\"",
        annotation.identifier.replace('"', ""),
        annotation.format.extension()
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(annotation.format.mime_type()),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|e| ApiError::InternalError(e.to_string()))?,
    );
    headers.insert(
        HeaderName::from_static(REPORT_HEADER),
        HeaderValue::from_str(&report).map_err(|e| ApiError::InternalError(e.to_string()))?,
    );
    Ok(headers)
}
