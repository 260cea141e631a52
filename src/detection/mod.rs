// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection lookup for uploaded X-ray images
//!
//! This module provides:
//! - The read-only ground-truth table, loaded once from a spreadsheet or CSV
//! - The resolver that turns an image identifier into labeled boxes,
//!   falling back to keyword placeholders when the table has no match

pub mod resolver;
pub mod table;
pub mod types;

pub use resolver::{DetectionResolver, MatchStrategy, FALLBACK_KEYWORDS};
pub use table::{DetectionTable, TableError, TableRow};
pub use types::Detection;
