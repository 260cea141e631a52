// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod annotation;
pub mod api;
pub mod cli;
pub mod config;
pub mod detection;
pub mod service;
pub mod version;
pub mod vision;

// Re-export the pipeline building blocks
pub use annotation::{AnnotationRenderer, AnnotationResult, LabelColorMap};
pub use config::{AnnotatorConfig, ConfigError};
pub use detection::{Detection, DetectionResolver, DetectionTable, MatchStrategy, TableRow};
pub use service::{identifier_from_filename, AnnotationPipeline, EncodedAnnotation};
