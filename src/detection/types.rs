// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection record shared by the resolver and the renderer

use serde::{Deserialize, Serialize};

/// A labeled bounding box for one image (top-left corner + size)
///
/// Width and height are signed: inverted source coordinates
/// (`xmax < xmin`) produce negative sizes and are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Detection {
    /// Build a detection from corner coordinates
    pub fn from_corners(label: impl Into<String>, xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            label: label.into(),
            x: xmin,
            y: ymin,
            width: xmax.saturating_sub(xmin),
            height: ymax.saturating_sub(ymin),
        }
    }

    /// Opposite corner of the box
    pub fn bottom_right(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}
