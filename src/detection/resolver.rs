// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Identifier -> detections lookup with keyword fallback

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::table::{DetectionTable, TableRow};
use super::types::Detection;

/// Disease keywords scanned, in order, when the table has no match
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "Aortic",
    "enlargement",
    "Cardiomegaly",
    "Pleural",
    "thickening",
    "Pulmonary",
    "fibrosis",
    "Covid",
    "Pneumonia",
];

/// Placeholder box geometry, relative to half the image height
const FALLBACK_OFFSET_X: i32 = 50;
const FALLBACK_OFFSET_Y: i32 = 100;
const FALLBACK_WIDTH: i32 = 100;
const FALLBACK_HEIGHT: i32 = 150;

/// Map a fallback keyword to its canonical disease label
pub fn canonical_label(keyword: &str) -> &str {
    match keyword {
        "Aortic" | "enlargement" => "Aortic enlargement",
        "Pleural" | "thickening" => "Pleural thickening",
        "Pulmonary" | "fibrosis" => "Pulmonary fibrosis",
        "Covid" => "Covid-19",
        other => other,
    }
}

/// How an image identifier is compared with the table's identifier column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Column contains the identifier (case-sensitive)
    #[default]
    Substring,
    /// Column equals the identifier
    Exact,
    /// Extension-stripped, trimmed, case-folded values are equal
    Normalized,
}

impl MatchStrategy {
    pub fn matches(&self, cell: &str, identifier: &str) -> bool {
        match self {
            MatchStrategy::Substring => cell.contains(identifier),
            MatchStrategy::Exact => cell == identifier,
            MatchStrategy::Normalized => normalize(cell) == normalize(identifier),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Substring => "substring",
            MatchStrategy::Exact => "exact",
            MatchStrategy::Normalized => "normalized",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" | "contains" => Ok(MatchStrategy::Substring),
            "exact" => Ok(MatchStrategy::Exact),
            "normalized" | "normalised" => Ok(MatchStrategy::Normalized),
            other => Err(format!(
                "unknown match strategy '{}', expected substring, exact or normalized",
                other
            )),
        }
    }
}

fn normalize(value: &str) -> String {
    let value = value.trim();
    let stem = match value.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => value,
    };
    stem.trim().to_lowercase()
}

/// Resolves detections for an image from an injected, read-only table
#[derive(Debug, Clone)]
pub struct DetectionResolver {
    table: Arc<DetectionTable>,
    strategy: MatchStrategy,
}

impl DetectionResolver {
    pub fn new(table: Arc<DetectionTable>) -> Self {
        Self::with_strategy(table, MatchStrategy::default())
    }

    pub fn with_strategy(table: Arc<DetectionTable>, strategy: MatchStrategy) -> Self {
        Self { table, strategy }
    }

    pub fn table(&self) -> &DetectionTable {
        &self.table
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Detections for `identifier`: table rows first, keyword placeholders
    /// only when no row matches. Never fails; a miss is an empty list.
    pub fn resolve(&self, identifier: &str, image_height: u32) -> Vec<Detection> {
        let detections = self.lookup(identifier);
        if !detections.is_empty() {
            debug!(
                "Resolved {} table detections for '{}'",
                detections.len(),
                identifier
            );
            return detections;
        }

        let placeholders = fallback_detections(identifier, image_height);
        debug!(
            "No table match for '{}', {} fallback placeholders",
            identifier,
            placeholders.len()
        );
        placeholders
    }

    /// Table rows whose identifier matches, in table order
    pub fn lookup(&self, identifier: &str) -> Vec<Detection> {
        self.table
            .rows()
            .iter()
            .filter(|row| {
                row.identifier
                    .as_deref()
                    .map(|cell| self.strategy.matches(cell, identifier))
                    .unwrap_or(false)
            })
            .map(detection_from_row)
            .collect()
    }
}

fn detection_from_row(row: &TableRow) -> Detection {
    Detection::from_corners(row.label.trim(), row.xmin, row.ymin, row.xmax, row.ymax)
}

/// One placeholder per keyword found (case-insensitively) in `identifier`
pub fn fallback_detections(identifier: &str, image_height: u32) -> Vec<Detection> {
    let haystack = identifier.to_lowercase();
    let half_height = (image_height / 2) as i32;

    FALLBACK_KEYWORDS
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .map(|keyword| Detection {
            label: canonical_label(keyword).to_string(),
            x: half_height + FALLBACK_OFFSET_X,
            y: half_height + FALLBACK_OFFSET_Y,
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
        })
        .collect()
}
