//! Deferred images resolved through a loader on first use.

use crate::config::default_max_resolve_depth;
use crate::error::{ImageError, Result};
use crate::image::{Image, ImageCommon, ImageCore};
use crate::loader::ImageLoader;
use once_cell::sync::OnceCell;
use raster_common::Vec2;
use std::fmt;
use std::sync::Arc;

/// An image that stands in for another until it is first needed.
///
/// The lazy image's own size is zero and means nothing; ask for the
/// [`real_image`](Self::real_image) or use [`Image::resolve`].
pub struct LazyImage {
    core: ImageCore,
    descriptor: String,
    loader: Arc<dyn ImageLoader>,
    real: OnceCell<Image>,
    max_resolve_depth: u32,
}

impl LazyImage {
    pub fn new(descriptor: impl Into<String>, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            core: ImageCore::new(Vec2::ZERO),
            descriptor: descriptor.into(),
            loader,
            real: OnceCell::new(),
            max_resolve_depth: default_max_resolve_depth(),
        }
    }

    /// Limits how many lazy images [`Image::resolve`] follows from this one.
    #[must_use]
    pub fn with_max_resolve_depth(mut self, depth: u32) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn max_resolve_depth(&self) -> u32 {
        self.max_resolve_depth
    }

    pub fn is_resolved(&self) -> bool {
        self.real.get().is_some()
    }

    /// The underlying image, loading it on the first call.
    ///
    /// Once loaded, every call returns the same image. A failed load is not
    /// remembered; the next call asks the loader again.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Load`] if the loader fails.
    pub fn real_image(&self) -> Result<Image> {
        self.real
            .get_or_try_init(|| {
                tracing::debug!("Resolving lazy image '{}'", self.descriptor);
                self.loader
                    .load(&self.descriptor)
                    .map_err(|source| ImageError::Load {
                        descriptor: self.descriptor.clone(),
                        source,
                    })
            })
            .cloned()
    }
}

impl ImageCommon for LazyImage {
    fn core(&self) -> &ImageCore {
        &self.core
    }
}

impl fmt::Debug for LazyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyImage")
            .field("descriptor", &self.descriptor)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
