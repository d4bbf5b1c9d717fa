//! Configuration for the image core.
//!
//! Settings are read from TOML. Every section and field is optional:
//!
//! ```toml
//! [palette]
//! out_of_range = "clamp"
//!
//! [lazy]
//! max_resolve_depth = 4
//!
//! [loader]
//! cache_images = true
//! ```

use crate::error::{ImageError, Result};
use crate::palette::OutOfRangePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete image core configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Palette conversion settings.
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Lazy image resolution settings.
    #[serde(default)]
    pub lazy: LazyConfig,
    /// Loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Palette conversion configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Handling of indices the palette has no colour for, applied by
    /// [`crate::PaletteImage::to_rgb_image_with_config`].
    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
}

/// Lazy image configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LazyConfig {
    /// Maximum number of lazy images followed before giving up.
    #[serde(default = "default_max_resolve_depth")]
    pub max_resolve_depth: u32,
}

pub(crate) fn default_max_resolve_depth() -> u32 {
    8
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            max_resolve_depth: default_max_resolve_depth(),
        }
    }
}

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Keep loaded images so each descriptor maps to one stable image.
    #[serde(default = "default_true")]
    pub cache_images: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_images: default_true(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ConfigParse`] for malformed TOML and
    /// [`ImageError::Config`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded image config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.lazy.max_resolve_depth == 0 {
            return Err(ImageError::Config(
                "Lazy max_resolve_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the out-of-range palette index policy.
    #[must_use]
    pub fn out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.config.palette.out_of_range = policy;
        self
    }

    /// Sets the lazy resolution depth limit.
    #[must_use]
    pub fn max_resolve_depth(mut self, depth: u32) -> Self {
        self.config.lazy.max_resolve_depth = depth;
        self
    }

    /// Enables or disables loader memoization.
    #[must_use]
    pub fn cache_images(mut self, enabled: bool) -> Self {
        self.config.loader.cache_images = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.palette.out_of_range, OutOfRangePolicy::Reject);
        assert_eq!(config.lazy.max_resolve_depth, 8);
        assert!(config.loader.cache_images);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .out_of_range(OutOfRangePolicy::Clamp)
            .max_resolve_depth(2)
            .cache_images(false)
            .build()
            .unwrap();

        assert_eq!(config.palette.out_of_range, OutOfRangePolicy::Clamp);
        assert_eq!(config.lazy.max_resolve_depth, 2);
        assert!(!config.loader.cache_images);
    }

    #[test]
    fn test_config_validation_zero_depth() {
        let result = Config::builder().max_resolve_depth(0).build();
        assert!(matches!(result, Err(ImageError::Config(_))));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml_str("[palette]\nout_of_range = \"clamp\"\n").unwrap();
        assert_eq!(config.palette.out_of_range, OutOfRangePolicy::Clamp);
        assert_eq!(config.lazy, LazyConfig::default());
        assert_eq!(config.loader, LoaderConfig::default());
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        let result = Config::from_toml_str("[palette]\nout_of_range = \"wrap\"\n");
        assert!(matches!(result, Err(ImageError::ConfigParse(_))));
    }

    #[test]
    fn test_from_toml_validates() {
        let result = Config::from_toml_str("[lazy]\nmax_resolve_depth = 0\n");
        assert!(matches!(result, Err(ImageError::Config(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loader]\ncache_images = false").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.loader.cache_images);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/raster-image.toml");
        assert!(matches!(result, Err(ImageError::Io(_))));
    }
}
