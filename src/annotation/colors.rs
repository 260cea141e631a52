// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-label drawing colors

use std::collections::HashMap;

use image::Rgb;

/// Color for labels outside the known set
pub const DEFAULT_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Canonical disease labels and their outline/text colors
pub const KNOWN_LABEL_COLORS: &[(&str, [u8; 3])] = &[
    ("Aortic enlargement", [255, 0, 0]),
    ("Cardiomegaly", [0, 0, 255]),
    ("Pleural thickening", [0, 128, 0]),
    ("Pulmonary fibrosis", [255, 165, 0]),
    ("Covid-19", [255, 242, 0]),
    ("Pneumonia", [0, 255, 255]),
];

/// Label -> RGB lookup with a gray fallback
#[derive(Debug, Clone)]
pub struct LabelColorMap {
    colors: HashMap<String, Rgb<u8>>,
    fallback: Rgb<u8>,
}

impl LabelColorMap {
    /// Exact (case-sensitive) lookup, gray when unknown
    pub fn color_for(&self, label: &str) -> Rgb<u8> {
        self.colors.get(label).copied().unwrap_or(self.fallback)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.colors.contains_key(label)
    }

    pub fn with_color(mut self, label: impl Into<String>, color: Rgb<u8>) -> Self {
        self.colors.insert(label.into(), color);
        self
    }

    pub fn fallback(&self) -> Rgb<u8> {
        self.fallback
    }
}

impl Default for LabelColorMap {
    fn default() -> Self {
        Self {
            colors: KNOWN_LABEL_COLORS
                .iter()
                .map(|(label, rgb)| (label.to_string(), Rgb(*rgb)))
                .collect(),
            fallback: DEFAULT_COLOR,
        }
    }
}
