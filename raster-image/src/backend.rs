//! Hooks for the renderer that caches image data on the GPU or elsewhere.
//!
//! The core never talks to a graphics API. It keeps an opaque handle per
//! image (and per set), flags staleness through the dirty bit and a change
//! generation, and tells the handle when it is no longer needed. [`sync_image`] and [`sync_image_set`]
//! implement the usual "upload if stale" step on top of that.

use crate::error::{ImageError, Result};
use crate::image::{Image, ImageCommon};
use crate::image_set::ImageSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Backend-owned data cached against an image or set.
pub trait RendererImageData: Send + Sync + Debug {
    /// Called once when the owning image or set drops the handle.
    fn release(&self) {}
}

/// A renderer able to turn CPU-side pixels into its own representation.
pub trait RendererBackend {
    /// Uploads one palette or RGB image.
    fn upload(&self, image: &Image) -> anyhow::Result<Arc<dyn RendererImageData>>;

    /// Uploads every member of `set` as a single object, e.g. a texture array.
    fn upload_set(&self, set: &ImageSet) -> anyhow::Result<Arc<dyn RendererImageData>>;
}

/// Releases `old` unless it is the very handle being stored in its place.
pub(crate) fn release_handle(
    old: Option<Arc<dyn RendererImageData>>,
    new: Option<&Arc<dyn RendererImageData>>,
) {
    let Some(old) = old else {
        return;
    };
    let same = new.is_some_and(|new| {
        std::ptr::eq(Arc::as_ptr(&old) as *const (), Arc::as_ptr(new) as *const ())
    });
    if !same {
        old.release();
    }
}

/// Uploads `image` if it is dirty or has never been uploaded.
///
/// Lazy images are resolved first and the handle is stored on the real
/// image. Render-target surfaces live on the backend already and are skipped.
/// Returns whether an upload happened.
///
/// # Errors
///
/// Returns the resolution error for a lazy image that fails to load, or
/// [`ImageError::Backend`] if the upload fails. The dirty flag is left set
/// on failure.
pub fn sync_image(backend: &dyn RendererBackend, image: &Image) -> Result<bool> {
    let image = image.resolve()?;
    if matches!(image, Image::Surface(_)) {
        return Ok(false);
    }
    if !image.is_dirty() && image.renderer_data().is_some() {
        return Ok(false);
    }

    tracing::debug!("Uploading {} image of size {}", image.kind(), image.size());
    let handle = backend.upload(&image).map_err(ImageError::Backend)?;
    image.set_renderer_data(Some(handle));
    image.clear_dirty();
    Ok(true)
}

/// Uploads `set` as a whole if any member changed since the set was last
/// uploaded, or the set has no handle.
///
/// Lazy members are resolved first and tracked through their real image.
/// Staleness is judged by each member's [`generation`](ImageCommon::generation),
/// so an image synced on its own with [`sync_image`] still triggers a set
/// upload, and member dirty flags are left for `sync_image` to handle.
/// Returns whether an upload happened.
///
/// # Errors
///
/// Returns the resolution error for a lazy member that fails to load, or
/// [`ImageError::Backend`] if the upload fails.
pub fn sync_image_set(backend: &dyn RendererBackend, set: &ImageSet) -> Result<bool> {
    let members = set
        .images()
        .iter()
        .map(Image::resolve)
        .collect::<Result<Vec<_>>>()?;
    let generations: Vec<u64> = members.iter().map(|image| image.generation()).collect();
    if !set.is_stale(&generations) {
        return Ok(false);
    }

    tracing::debug!("Uploading image set of {} images", members.len());
    let handle = backend.upload_set(set).map_err(ImageError::Backend)?;
    set.set_renderer_data(Some(handle));
    set.record_upload(generations);
    Ok(true)
}
