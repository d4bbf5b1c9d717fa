//! The image object model.
//!
//! Every image variant embeds an [`ImageCore`] holding the state the renderer
//! cares about: size, content bounds, the dirty flag, the backend cache handle
//! and membership in an [`ImageSet`]. The [`ImageCommon`] trait exposes that
//! state uniformly, and [`Image`] is the closed set of variants handed around
//! by loaders, image sets and the backend.
//!
//! Images never expose pixels directly. Raster variants ([`PaletteImage`],
//! [`RgbImage`]) are read and written through lock guards; a [`Surface`] has no
//! CPU-side pixels at all.

use crate::backend::{release_handle, RendererImageData};
use crate::error::{ImageError, Result};
use crate::image_set::ImageSet;
use crate::lazy::LazyImage;
use crate::lock::{LockUse, PaletteImageLock, RgbImageLock};
use crate::palette_image::PaletteImage;
use crate::rgb_image::RgbImage;
use parking_lot::Mutex;
use raster_common::{Rect, Vec2};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Non-owning link from an image back to the set that holds it.
struct SetMembership {
    set: Weak<ImageSet>,
    index: usize,
}

/// State shared by every image variant.
pub struct ImageCore {
    size: Vec2,
    dirty: AtomicBool,
    generation: AtomicU64,
    bounds: Mutex<Rect>,
    renderer_data: Mutex<Option<Arc<dyn RendererImageData>>>,
    membership: Mutex<Option<SetMembership>>,
}

impl ImageCore {
    /// New core for an image of `size`.
    ///
    /// Bounds start as the whole image and the image starts dirty, since no
    /// backend copy exists yet.
    pub(crate) fn new(size: Vec2) -> Self {
        Self {
            size,
            dirty: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            bounds: Mutex::new(Rect::from_size(size)),
            renderer_data: Mutex::new(None),
            membership: Mutex::new(None),
        }
    }

    pub(crate) fn set_membership(&self, set: Weak<ImageSet>, index: usize) {
        *self.membership.lock() = Some(SetMembership { set, index });
    }
}

impl Drop for ImageCore {
    fn drop(&mut self) {
        if let Some(handle) = self.renderer_data.get_mut().take() {
            tracing::trace!("Releasing backend data for {} image", self.size);
            handle.release();
        }
    }
}

impl fmt::Debug for ImageCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCore")
            .field("size", &self.size)
            .field("dirty", &self.dirty.load(Ordering::Acquire))
            .field("generation", &self.generation.load(Ordering::Acquire))
            .field("bounds", &*self.bounds.lock())
            .field("has_renderer_data", &self.renderer_data.lock().is_some())
            .finish()
    }
}

/// Capabilities shared by all image variants.
///
/// Implementors only provide [`core`](Self::core); everything else is derived.
pub trait ImageCommon {
    /// The shared image state.
    fn core(&self) -> &ImageCore;

    /// Width and height in pixels. Fixed at construction.
    fn size(&self) -> Vec2 {
        self.core().size
    }

    /// Sub-rectangle holding non-empty content.
    fn bounds(&self) -> Rect {
        *self.core().bounds.lock()
    }

    /// Replaces the content bounds.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` does not fit inside the image.
    fn set_bounds(&self, bounds: Rect) {
        let size = self.size();
        assert!(
            Rect::from_size(size).contains_rect(&bounds),
            "bounds {bounds} do not fit inside a {size} image"
        );
        *self.core().bounds.lock() = bounds;
    }

    /// True when CPU-side pixels changed since the backend last synchronized.
    fn is_dirty(&self) -> bool {
        self.core().dirty.load(Ordering::Acquire)
    }

    /// Flags the pixels as changed for every backend copy of this image.
    fn mark_dirty(&self) {
        let core = self.core();
        core.generation.fetch_add(1, Ordering::AcqRel);
        core.dirty.store(true, Ordering::Release);
    }

    /// Change counter bumped by every [`mark_dirty`](Self::mark_dirty).
    ///
    /// Unlike the dirty flag it is never reset, so several backend copies
    /// (the image's own handle, a set-wide handle) can each tell whether they
    /// are stale.
    fn generation(&self) -> u64 {
        self.core().generation.load(Ordering::Acquire)
    }

    /// Called by the backend once its cached copy matches the pixels.
    fn clear_dirty(&self) {
        self.core().dirty.store(false, Ordering::Release);
    }

    /// Backend cache handle, if the backend created one.
    fn renderer_data(&self) -> Option<Arc<dyn RendererImageData>> {
        self.core().renderer_data.lock().clone()
    }

    /// Stores a new backend handle, releasing the one it replaces.
    fn set_renderer_data(&self, data: Option<Arc<dyn RendererImageData>>) {
        let old = std::mem::replace(&mut *self.core().renderer_data.lock(), data.clone());
        release_handle(old, data.as_ref());
    }

    /// The set holding this image and its slot, while that set is alive.
    fn owning_set(&self) -> Option<(Arc<ImageSet>, usize)> {
        let membership = self.core().membership.lock();
        let membership = membership.as_ref()?;
        membership.set.upgrade().map(|set| (set, membership.index))
    }

    fn index_in_set(&self) -> Option<usize> {
        self.owning_set().map(|(_, index)| index)
    }
}

/// A render target. Only the backend draws into it; CPU locking is refused.
#[derive(Debug)]
pub struct Surface {
    core: ImageCore,
}

impl Surface {
    pub fn new(size: Vec2) -> Self {
        Self {
            core: ImageCore::new(size),
        }
    }
}

impl ImageCommon for Surface {
    fn core(&self) -> &ImageCore {
        &self.core
    }
}

/// Which variant an [`Image`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Surface,
    Palette,
    Rgb,
    Lazy,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface => write!(f, "surface"),
            Self::Palette => write!(f, "palette"),
            Self::Rgb => write!(f, "RGB"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

/// A shared handle to any image variant.
///
/// Cloning an `Image` clones the handle, not the pixels.
#[derive(Debug, Clone)]
pub enum Image {
    Surface(Arc<Surface>),
    Palette(Arc<PaletteImage>),
    Rgb(Arc<RgbImage>),
    Lazy(Arc<LazyImage>),
}

impl Image {
    pub fn kind(&self) -> ImageKind {
        match self {
            Self::Surface(_) => ImageKind::Surface,
            Self::Palette(_) => ImageKind::Palette,
            Self::Rgb(_) => ImageKind::Rgb,
            Self::Lazy(_) => ImageKind::Lazy,
        }
    }

    /// True when both handles point at the same image.
    pub fn ptr_eq(&self, other: &Image) -> bool {
        match (self, other) {
            (Self::Surface(a), Self::Surface(b)) => Arc::ptr_eq(a, b),
            (Self::Palette(a), Self::Palette(b)) => Arc::ptr_eq(a, b),
            (Self::Rgb(a), Self::Rgb(b)) => Arc::ptr_eq(a, b),
            (Self::Lazy(a), Self::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_palette(&self) -> Option<&Arc<PaletteImage>> {
        match self {
            Self::Palette(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&Arc<RgbImage>> {
        match self {
            Self::Rgb(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_lazy(&self) -> Option<&Arc<LazyImage>> {
        match self {
            Self::Lazy(image) => Some(image),
            _ => None,
        }
    }

    /// Locks a palette image.
    ///
    /// # Panics
    ///
    /// Panics if this is a surface or any other non-palette variant, or if the
    /// image is already locked.
    pub fn lock_palette(&self, usage: LockUse) -> PaletteImageLock<'_> {
        match self {
            Self::Palette(image) => image.lock(usage),
            other => panic!("{}", other.lock_refusal(ImageKind::Palette)),
        }
    }

    /// Locks an RGB image.
    ///
    /// # Panics
    ///
    /// Panics if this is a surface or any other non-RGB variant, or if the
    /// image is already locked.
    pub fn lock_rgb(&self, usage: LockUse) -> RgbImageLock<'_> {
        match self {
            Self::Rgb(image) => image.lock(usage),
            other => panic!("{}", other.lock_refusal(ImageKind::Rgb)),
        }
    }

    fn lock_refusal(&self, wanted: ImageKind) -> String {
        match self.kind() {
            ImageKind::Surface => "render target surfaces cannot be locked".to_string(),
            ImageKind::Lazy => format!("lazy images must be resolved before taking a {wanted} lock"),
            actual => format!("cannot take a {wanted} lock on a {actual} image"),
        }
    }

    /// Follows lazy images until a real image is reached.
    ///
    /// Non-lazy images resolve to themselves. The depth limit is taken from the
    /// first lazy image in the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Load`] if a loader fails and
    /// [`ImageError::ResolveDepthExceeded`] if the chain is too long or cyclic.
    pub fn resolve(&self) -> Result<Image> {
        let Self::Lazy(first) = self else {
            return Ok(self.clone());
        };
        let max_depth = first.max_resolve_depth();
        let mut current = self.clone();
        for _ in 0..max_depth {
            match current {
                Self::Lazy(lazy) => current = lazy.real_image()?,
                real => return Ok(real),
            }
        }
        match current {
            Self::Lazy(_) => Err(ImageError::ResolveDepthExceeded {
                descriptor: first.descriptor().to_string(),
                max_depth,
            }),
            real => Ok(real),
        }
    }
}

impl ImageCommon for Image {
    fn core(&self) -> &ImageCore {
        match self {
            Self::Surface(image) => image.core(),
            Self::Palette(image) => image.core(),
            Self::Rgb(image) => image.core(),
            Self::Lazy(image) => image.core(),
        }
    }
}

impl From<Surface> for Image {
    fn from(image: Surface) -> Self {
        Self::Surface(Arc::new(image))
    }
}

impl From<PaletteImage> for Image {
    fn from(image: PaletteImage) -> Self {
        Self::Palette(Arc::new(image))
    }
}

impl From<RgbImage> for Image {
    fn from(image: RgbImage) -> Self {
        Self::Rgb(Arc::new(image))
    }
}

impl From<LazyImage> for Image {
    fn from(image: LazyImage) -> Self {
        Self::Lazy(Arc::new(image))
    }
}

impl From<Arc<PaletteImage>> for Image {
    fn from(image: Arc<PaletteImage>) -> Self {
        Self::Palette(image)
    }
}

impl From<Arc<RgbImage>> for Image {
    fn from(image: Arc<RgbImage>) -> Self {
        Self::Rgb(image)
    }
}
