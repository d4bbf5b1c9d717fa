//! Loading images from descriptor strings.
//!
//! A descriptor is an opaque string naming an image source, for example
//! `"PCK:xcom3/ufodata/city.pck:xcom3/ufodata/city.tab:42"`. This crate never
//! parses descriptors; it hands them to an [`ImageLoader`] supplied by the
//! application.
//!
//! [`CachingLoader`] wraps any loader so that each descriptor yields one
//! stable image, which is what [`LazyImage`] relies on.

use crate::config::Config;
use crate::image::Image;
use crate::lazy::LazyImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Produces an image for a descriptor.
///
/// Errors are the loader's own (missing file, bad table entry, ...) and are
/// wrapped into [`crate::ImageError::Load`] by callers in this crate.
pub trait ImageLoader: Send + Sync {
    fn load(&self, descriptor: &str) -> anyhow::Result<Image>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> anyhow::Result<Image> + Send + Sync,
{
    fn load(&self, descriptor: &str) -> anyhow::Result<Image> {
        self(descriptor)
    }
}

/// Boxes a closure as a shareable loader.
pub fn loader_fn<F>(f: F) -> Arc<dyn ImageLoader>
where
    F: Fn(&str) -> anyhow::Result<Image> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Memoizing loader: the first successful load of a descriptor is kept and
/// returned for every later request.
pub struct CachingLoader<L> {
    inner: L,
    cache: Mutex<HashMap<String, Image>>,
    enabled: bool,
    max_resolve_depth: u32,
}

impl<L: ImageLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self::with_config(inner, &Config::default())
    }

    /// Applies `[loader] cache_images` and `[lazy] max_resolve_depth`.
    pub fn with_config(inner: L, config: &Config) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            enabled: config.loader.cache_images,
            max_resolve_depth: config.lazy.max_resolve_depth,
        }
    }

    /// Number of descriptors currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Forgets every cached image. Images already handed out stay alive.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// A lazy image for `descriptor` that resolves through this loader.
    pub fn lazy(self: &Arc<Self>, descriptor: impl Into<String>) -> LazyImage
    where
        L: 'static,
    {
        let loader: Arc<dyn ImageLoader> = self.clone();
        LazyImage::new(descriptor, loader).with_max_resolve_depth(self.max_resolve_depth)
    }
}

impl<L: ImageLoader> ImageLoader for CachingLoader<L> {
    fn load(&self, descriptor: &str) -> anyhow::Result<Image> {
        if !self.enabled {
            return self.inner.load(descriptor);
        }

        if let Some(image) = self.cache.lock().get(descriptor) {
            tracing::debug!("Image cache hit for '{}'", descriptor);
            return Ok(image.clone());
        }

        // The cache lock is not held while loading; the inner loader may
        // itself go through this loader for nested descriptors.
        let image = self.inner.load(descriptor)?;
        let mut cache = self.cache.lock();
        let stored = cache.entry(descriptor.to_string()).or_insert(image);
        tracing::debug!("Cached image for '{}'", descriptor);
        Ok(stored.clone())
    }
}
