// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotation API endpoint module
//!
//! Provides POST /api/image/annotate (inline JSON) and
//! POST /api/image/annotate/file (image body, report header).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{annotate_file_handler, annotate_handler};
pub use request::{read_image_upload, ImageUpload, IMAGE_FIELD};
pub use response::{AnnotateResponse, REPORT_HEADER};
