//! Ordered groups of related images.
//!
//! An [`ImageSet`] holds the frames of an animation or the tiles of a sheet.
//! The set owns its members; each member keeps only a weak link back, so
//! dropping the set never touches images that are still referenced elsewhere
//! and an image outliving its set simply reports no owner.

use crate::backend::{release_handle, RendererImageData};
use crate::image::{Image, ImageCommon};
use parking_lot::{Mutex, RwLock};
use raster_common::Vec2;
use std::fmt;
use std::sync::Arc;

/// An ordered collection of images sharing a bounding size and one backend
/// cache handle.
pub struct ImageSet {
    images: RwLock<Vec<Image>>,
    max_size: Mutex<Vec2>,
    renderer_data: Mutex<Option<Arc<dyn RendererImageData>>>,
    uploaded_generations: Mutex<Option<Vec<u64>>>,
}

impl ImageSet {
    /// Creates an empty set. Whoever fills it keeps `max_size` consistent, or
    /// calls [`recalculate_max_size`](Self::recalculate_max_size).
    pub fn new(max_size: Vec2) -> Arc<Self> {
        Arc::new(Self {
            images: RwLock::new(Vec::new()),
            max_size: Mutex::new(max_size),
            renderer_data: Mutex::new(None),
            uploaded_generations: Mutex::new(None),
        })
    }

    /// Appends `image` and records this set as its owner. Returns its index.
    ///
    /// An image pushed into a second set reports only the most recent one.
    pub fn push(self: &Arc<Self>, image: Image) -> usize {
        let mut images = self.images.write();
        let index = images.len();
        image.core().set_membership(Arc::downgrade(self), index);
        images.push(image);
        index
    }

    pub fn get(&self, index: usize) -> Option<Image> {
        self.images.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }

    /// Snapshot of the members in order.
    pub fn images(&self) -> Vec<Image> {
        self.images.read().clone()
    }

    pub fn max_size(&self) -> Vec2 {
        *self.max_size.lock()
    }

    pub fn set_max_size(&self, max_size: Vec2) {
        *self.max_size.lock() = max_size;
    }

    /// Sets `max_size` to the bounding size of all members and returns it.
    ///
    /// Unresolved lazy members have no meaningful size and are skipped.
    pub fn recalculate_max_size(&self) -> Vec2 {
        let max_size = self
            .images
            .read()
            .iter()
            .filter_map(|image| match image {
                Image::Lazy(lazy) if !lazy.is_resolved() => None,
                Image::Lazy(lazy) => lazy.real_image().ok().map(|real| real.size()),
                other => Some(other.size()),
            })
            .fold(Vec2::ZERO, Vec2::max);
        self.set_max_size(max_size);
        max_size
    }

    /// Backend cache handle for the whole set.
    pub fn renderer_data(&self) -> Option<Arc<dyn RendererImageData>> {
        self.renderer_data.lock().clone()
    }

    /// Stores a new set-wide backend handle, releasing the one it replaces.
    pub fn set_renderer_data(&self, data: Option<Arc<dyn RendererImageData>>) {
        let old = std::mem::replace(&mut *self.renderer_data.lock(), data.clone());
        release_handle(old, data.as_ref());
    }

    /// True unless the set-wide handle was built from exactly these member
    /// generations.
    pub(crate) fn is_stale(&self, generations: &[u64]) -> bool {
        self.renderer_data.lock().is_none()
            || self.uploaded_generations.lock().as_deref() != Some(generations)
    }

    pub(crate) fn record_upload(&self, generations: Vec<u64>) {
        *self.uploaded_generations.lock() = Some(generations);
    }
}

impl Drop for ImageSet {
    fn drop(&mut self) {
        if let Some(handle) = self.renderer_data.get_mut().take() {
            tracing::trace!("Releasing backend data for image set of {} images", self.images.get_mut().len());
            handle.release();
        }
    }
}

impl fmt::Debug for ImageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSet")
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .finish()
    }
}
