// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Box and label rendering onto RGB images

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use super::colors::LabelColorMap;
use crate::detection::Detection;

/// Outline thickness in pixels, growing inward from the box edge
pub const STROKE_WIDTH: u32 = 3;

/// Default label text height in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Label text offset from the box's top-left corner
const LABEL_OFFSET_X: i32 = 5;
const LABEL_OFFSET_Y: i32 = -10;

/// Annotated image plus the distinct labels drawn on it
#[derive(Debug, Clone)]
pub struct AnnotationResult {
    pub image: RgbImage,
    pub report: BTreeSet<String>,
}

/// Distinct labels across `detections`
pub fn build_report(detections: &[Detection]) -> BTreeSet<String> {
    detections.iter().map(|d| d.label.clone()).collect()
}

/// Draws detections in per-label colors
#[derive(Clone)]
pub struct AnnotationRenderer {
    colors: LabelColorMap,
    font: Option<Arc<FontVec>>,
    font_scale: PxScale,
    stroke_width: u32,
}

impl fmt::Debug for AnnotationRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationRenderer")
            .field("colors", &self.colors)
            .field("has_font", &self.font.is_some())
            .field("font_scale", &self.font_scale)
            .field("stroke_width", &self.stroke_width)
            .finish()
    }
}

impl Default for AnnotationRenderer {
    fn default() -> Self {
        Self::new(LabelColorMap::default())
    }
}

impl AnnotationRenderer {
    /// Renderer without a font: boxes only
    pub fn new(colors: LabelColorMap) -> Self {
        Self {
            colors,
            font: None,
            font_scale: PxScale::from(DEFAULT_FONT_SIZE),
            stroke_width: STROKE_WIDTH,
        }
    }

    pub fn with_font(mut self, font: FontVec, size: f32) -> Self {
        self.font = Some(Arc::new(font));
        self.font_scale = PxScale::from(size);
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn colors(&self) -> &LabelColorMap {
        &self.colors
    }

    /// Draw every detection onto `image` and return it with the label report
    pub fn annotate(&self, mut image: RgbImage, detections: &[Detection]) -> AnnotationResult {
        self.draw_detections(&mut image, detections);
        AnnotationResult {
            image,
            report: build_report(detections),
        }
    }

    /// In-place drawing, in list order. Boxes are not validated: inverted
    /// corners are drawn between the same two points, off-image parts clip.
    pub fn draw_detections(&self, image: &mut RgbImage, detections: &[Detection]) {
        for det in detections {
            let color = self.colors.color_for(&det.label);
            let (x1, y1) = det.bottom_right();
            draw_box(image, (det.x, det.y), (x1, y1), color, self.stroke_width);

            if let Some(font) = &self.font {
                draw_text_mut(
                    image,
                    color,
                    det.x.saturating_add(LABEL_OFFSET_X),
                    det.y.saturating_add(LABEL_OFFSET_Y),
                    self.font_scale,
                    &**font,
                    &det.label,
                );
            }
        }
    }
}

/// Outline between two inclusive corners, `stroke` pixels thick
fn draw_box(image: &mut RgbImage, p0: (i32, i32), p1: (i32, i32), color: Rgb<u8>, stroke: u32) {
    let (width, height) = image.dimensions();
    let margin = stroke as i64;

    // Pull far-away edges in to just past the border so they stay off-image
    let clamp_x = |v: i32| (v as i64).clamp(-margin, width as i64 + margin);
    let clamp_y = |v: i32| (v as i64).clamp(-margin, height as i64 + margin);

    let (left, right) = (clamp_x(p0.0.min(p1.0)), clamp_x(p0.0.max(p1.0)));
    let (top, bottom) = (clamp_y(p0.1.min(p1.1)), clamp_y(p0.1.max(p1.1)));

    for inset in 0..margin {
        let (l, t) = (left + inset, top + inset);
        let (r, b) = (right - inset, bottom - inset);
        if l > r || t > b {
            break;
        }
        let rect = Rect::at(l as i32, t as i32).of_size((r - l + 1) as u32, (b - t + 1) as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}
