// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label font loading

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Well-known locations tried when no font path is configured
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font compiled into the binary, used when nothing on disk loads
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data in {0}")]
    Invalid(PathBuf),

    #[error("Bundled label font is invalid")]
    Bundled,
}

/// Load a TrueType/OpenType font from disk
pub fn load_font_file(path: &Path) -> Result<FontVec, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(bytes).map_err(|_| FontError::Invalid(path.to_path_buf()))
}

/// Parse the font shipped inside the binary
pub fn bundled_font() -> Result<FontVec, FontError> {
    FontVec::try_from_vec(BUNDLED_FONT.to_vec()).map_err(|_| FontError::Bundled)
}

/// Configured font first, then the system candidates, then the bundled font
pub fn find_label_font(configured: Option<&Path>) -> Result<FontVec, FontError> {
    find_label_font_in(configured, SYSTEM_FONT_PATHS)
}

/// [`find_label_font`] over an explicit candidate list
pub fn find_label_font_in(
    configured: Option<&Path>,
    candidates: &[&str],
) -> Result<FontVec, FontError> {
    if let Some(path) = configured {
        match load_font_file(path) {
            Ok(font) => {
                info!("Loaded label font from {}", path.display());
                return Ok(font);
            }
            Err(e) => warn!("{}, trying system fonts", e),
        }
    }

    for candidate in candidates {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load_font_file(path) {
            Ok(font) => {
                info!("Loaded label font from {}", path.display());
                return Ok(font);
            }
            Err(e) => debug!("Skipping font candidate: {}", e),
        }
    }

    info!("No system font found, using bundled label font");
    bundled_font()
}
