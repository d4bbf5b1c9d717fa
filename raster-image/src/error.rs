//! Error types for the raster image core.
//!
//! Only data errors live here. Caller bugs (lock-use violations, out-of-bounds
//! addressing, locking a render target) panic instead of returning an error.

use raster_common::Vec2;
use std::io;
use thiserror::Error;

/// Recoverable failures surfaced by image operations.
#[derive(Debug, Error)]
pub enum ImageError {
    /// A palette index has no colour in the palette used for conversion.
    #[error(
        "Palette index {index} at ({}, {}) is out of range for a palette of {palette_len} colours",
        .position.x,
        .position.y
    )]
    PaletteIndexOutOfRange {
        index: u8,
        position: Vec2,
        palette_len: usize,
    },

    /// Conversion was attempted with a palette holding no colours.
    #[error("Palette has no colours")]
    EmptyPalette,

    /// The loader could not produce an image for a descriptor.
    #[error("Failed to load image '{descriptor}': {source}")]
    Load {
        descriptor: String,
        #[source]
        source: anyhow::Error,
    },

    /// A chain of lazy images did not reach a real image within the depth limit.
    #[error("Lazy image '{descriptor}' did not resolve within {max_depth} steps")]
    ResolveDepthExceeded { descriptor: String, max_depth: u32 },

    /// The renderer backend failed to build its cached representation.
    #[error("Backend upload failed: {0}")]
    Backend(#[source] anyhow::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML for [`crate::Config`].
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ImageError {
    /// Returns true if this error means an image could not be obtained at all.
    ///
    /// Callers use this to tell a missing image apart from one that exists but
    /// holds bad data.
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::ResolveDepthExceeded { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_error_categorization() {
        let load = ImageError::Load {
            descriptor: "PCK:xcom3/ufodata/city.pck:xcom3/ufodata/city.tab:7".to_string(),
            source: anyhow!("no such file"),
        };
        assert!(load.is_load_failure());
        assert!(ImageError::ResolveDepthExceeded {
            descriptor: "a".to_string(),
            max_depth: 8
        }
        .is_load_failure());

        assert!(!ImageError::EmptyPalette.is_load_failure());
        assert!(!ImageError::Config("bad".to_string()).is_load_failure());
    }

    #[test]
    fn test_error_display() {
        let err = ImageError::PaletteIndexOutOfRange {
            index: 200,
            position: Vec2::new(3, 1),
            palette_len: 16,
        };
        assert_eq!(
            err.to_string(),
            "Palette index 200 at (3, 1) is out of range for a palette of 16 colours"
        );

        let err = ImageError::Load {
            descriptor: "RAW:missing".to_string(),
            source: anyhow!("not found"),
        };
        assert_eq!(err.to_string(), "Failed to load image 'RAW:missing': not found");
    }
}
