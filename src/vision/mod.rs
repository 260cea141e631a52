// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image I/O at the service boundary
//!
//! Uploads are decoded to RGB rasters for the annotation pipeline and
//! annotated rasters are encoded back to JPEG or PNG for transport.

pub mod image_utils;

pub use image_utils::{
    decode_rgb_image, encode_base64, encode_image, ImageError, OutputFormat,
    DEFAULT_MAX_IMAGE_BYTES,
};
