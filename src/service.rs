// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-upload annotation pipeline shared by the HTTP and CLI front ends

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::annotation::{find_label_font, AnnotationRenderer, AnnotationResult, LabelColorMap};
use crate::config::AnnotatorConfig;
use crate::detection::{DetectionResolver, DetectionTable};
use crate::vision::{decode_rgb_image, encode_image, ImageError, OutputFormat, DEFAULT_MAX_IMAGE_BYTES};

/// Image identifier for an uploaded file: its base name without extension
pub fn identifier_from_filename(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Annotated upload, encoded and ready to send
#[derive(Debug, Clone)]
pub struct EncodedAnnotation {
    pub identifier: String,
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Distinct labels, sorted
    pub report: Vec<String>,
    pub detection_count: usize,
}

/// Resolver + renderer pair with the boundary encoding settings
#[derive(Debug, Clone)]
pub struct AnnotationPipeline {
    resolver: DetectionResolver,
    renderer: AnnotationRenderer,
    output_format: OutputFormat,
    max_upload_bytes: usize,
}

impl AnnotationPipeline {
    pub fn new(resolver: DetectionResolver, renderer: AnnotationRenderer) -> Self {
        Self {
            resolver,
            renderer,
            output_format: OutputFormat::default(),
            max_upload_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Build from configuration around an already loaded table
    pub fn from_config(config: &AnnotatorConfig, table: Arc<DetectionTable>) -> Self {
        let resolver = DetectionResolver::with_strategy(table, config.match_strategy);

        let mut renderer = AnnotationRenderer::new(LabelColorMap::default());
        match find_label_font(config.font_path.as_deref()) {
            Ok(font) => renderer = renderer.with_font(font, config.font_size),
            Err(e) => warn!("{}, annotations will have boxes only", e),
        }

        Self::new(resolver, renderer)
            .with_output_format(config.output_format)
            .with_max_upload_bytes(config.max_upload_bytes)
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_bytes: usize) -> Self {
        self.max_upload_bytes = max_bytes;
        self
    }

    pub fn resolver(&self) -> &DetectionResolver {
        &self.resolver
    }

    pub fn renderer(&self) -> &AnnotationRenderer {
        &self.renderer
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Resolve and draw detections for a decoded image
    pub fn process(&self, image: RgbImage, identifier: &str) -> AnnotationResult {
        let detections = self.resolver.resolve(identifier, image.height());
        self.renderer.annotate(image, &detections)
    }

    /// Decode, annotate and re-encode one uploaded file
    pub fn annotate_upload(&self, bytes: &[u8], file_name: &str) -> Result<EncodedAnnotation, ImageError> {
        self.annotate_bytes(bytes, identifier_from_filename(file_name))
    }

    /// Decode, annotate and re-encode image bytes under a given identifier
    pub fn annotate_bytes(
        &self,
        bytes: &[u8],
        identifier: impl Into<String>,
    ) -> Result<EncodedAnnotation, ImageError> {
        let started = Instant::now();
        let identifier = identifier.into();
        let image = decode_rgb_image(bytes, self.max_upload_bytes)?;
        debug!(
            "Decoded image '{}': {}x{}",
            identifier,
            image.width(),
            image.height()
        );

        let detections = self.resolver.resolve(&identifier, image.height());
        let result = self.renderer.annotate(image, &detections);
        let encoded = encode_image(&result.image, self.output_format)?;

        info!(
            "Annotated '{}': {} detections, {} labels, {}ms",
            identifier,
            detections.len(),
            result.report.len(),
            started.elapsed().as_millis()
        );

        Ok(EncodedAnnotation {
            identifier,
            bytes: encoded,
            format: self.output_format,
            report: result.report.into_iter().collect(),
            detection_count: detections.len(),
        })
    }
}
