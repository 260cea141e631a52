// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotation rendering: colored outlines and label text on X-ray images

pub mod colors;
pub mod font;
pub mod renderer;

pub use colors::{LabelColorMap, DEFAULT_COLOR, KNOWN_LABEL_COLORS};
pub use font::{bundled_font, find_label_font, find_label_font_in, load_font_file, FontError};
pub use renderer::{build_report, AnnotationRenderer, AnnotationResult, STROKE_WIDTH};
