//! Scoped pixel access for raster images.
//!
//! An [`ImageLock`] is the only way to read or write the pixels of a
//! [`PaletteImage`] or [`RgbImage`]. It is opened with a declared [`LockUse`]
//! and every access is checked against it:
//!
//! - [`get`](ImageLock::get) requires [`LockUse::Read`] or [`LockUse::ReadWrite`]
//! - [`set`](ImageLock::set) requires [`LockUse::Write`] or [`LockUse::ReadWrite`]
//! - positions must lie inside the image on both axes
//!
//! Violations are caller bugs and panic. Dropping a lock that could write
//! marks the image dirty so the backend re-uploads it.
//!
//! # Exclusivity
//!
//! Only one lock may be outstanding per image. Acquisition never waits: a
//! second lock while the first is alive panics with "image is already locked".
//! This catches logical misuse within one caller; it is not a scheduler, and
//! callers sharing an image across threads must still take turns.
//!
//! # Example
//!
//! ```
//! use raster_common::Vec2;
//! use raster_image::{ImageCommon, LockUse, PaletteImage};
//!
//! let image = PaletteImage::new(Vec2::new(4, 4), 0);
//! image.clear_dirty();
//!
//! {
//!     let mut lock = image.lock(LockUse::Write);
//!     lock.set(Vec2::new(1, 1), 7);
//! } // dropped here: image is now dirty
//! assert!(image.is_dirty());
//!
//! let lock = image.lock(LockUse::Read);
//! assert_eq!(lock.get(Vec2::new(1, 1)), 7);
//! ```

use crate::image::ImageCommon;
use crate::palette_image::PaletteImage;
use crate::rgb_image::RgbImage;
use parking_lot::MutexGuard;
use raster_common::Vec2;
use std::fmt;

pub(crate) use sealed::Sealed;

/// Declared intent of a lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockUse {
    Read,
    #[default]
    Write,
    ReadWrite,
}

impl LockUse {
    pub const fn can_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub const fn can_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

mod sealed {
    use parking_lot::Mutex;
    use std::fmt;

    pub trait Sealed {
        /// One pixel: a palette index or an RGBA colour.
        type Pixel: Copy + PartialEq + fmt::Debug;

        /// Row-major pixel storage, `size.x * size.y` entries.
        fn storage(&self) -> &Mutex<Vec<Self::Pixel>>;
    }
}

/// A raster image variant with CPU-addressable pixel storage.
///
/// Implemented only by [`PaletteImage`] and [`RgbImage`]; their storage is
/// reachable solely through an [`ImageLock`].
pub trait RasterImage: ImageCommon + Sealed {}

impl<T: ImageCommon + Sealed> RasterImage for T {}

/// Exclusive, use-checked access to the pixels of one raster image.
///
/// Not `Clone`; the lock is released when the guard is dropped.
pub struct ImageLock<'a, I: RasterImage> {
    image: &'a I,
    pixels: MutexGuard<'a, Vec<I::Pixel>>,
    usage: LockUse,
}

/// Lock over a [`PaletteImage`]; pixels are `u8` indices.
pub type PaletteImageLock<'a> = ImageLock<'a, PaletteImage>;

/// Lock over an [`RgbImage`]; pixels are [`raster_common::Colour`]s.
pub type RgbImageLock<'a> = ImageLock<'a, RgbImage>;

impl<'a, I: RasterImage> ImageLock<'a, I> {
    /// Locks `image` for `usage`.
    ///
    /// # Panics
    ///
    /// Panics if another lock on the same image is still alive.
    pub fn new(image: &'a I, usage: LockUse) -> Self {
        let Some(pixels) = image.storage().try_lock() else {
            panic!("image is already locked ({} image)", image.size());
        };
        tracing::trace!("Locked {} image for {:?}", image.size(), usage);
        Self {
            image,
            pixels,
            usage,
        }
    }

    pub fn usage(&self) -> LockUse {
        self.usage
    }

    /// Size of the locked image.
    pub fn size(&self) -> Vec2 {
        self.image.size()
    }

    /// Reads the pixel at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the lock does not permit reading or `pos` is outside the image.
    pub fn get(&self, pos: Vec2) -> I::Pixel {
        assert!(
            self.usage.can_read(),
            "lock opened for {:?} does not permit reading",
            self.usage
        );
        self.pixels[self.offset(pos)]
    }

    /// Writes the pixel at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the lock does not permit writing or `pos` is outside the image.
    pub fn set(&mut self, pos: Vec2, value: I::Pixel) {
        assert!(
            self.usage.can_write(),
            "lock opened for {:?} does not permit writing",
            self.usage
        );
        let offset = self.offset(pos);
        self.pixels[offset] = value;
    }

    /// Writes `value` to every pixel.
    ///
    /// # Panics
    ///
    /// Panics if the lock does not permit writing.
    pub fn fill(&mut self, value: I::Pixel) {
        self.data_mut().fill(value);
    }

    /// Whole pixel buffer, row-major with a stride equal to the width.
    ///
    /// Intended for the renderer backend, which reads pixels wholesale.
    ///
    /// # Panics
    ///
    /// Panics if the lock does not permit reading.
    pub fn data(&self) -> &[I::Pixel] {
        assert!(
            self.usage.can_read(),
            "lock opened for {:?} does not permit reading",
            self.usage
        );
        &self.pixels
    }

    /// Mutable pixel buffer, row-major with a stride equal to the width.
    ///
    /// # Panics
    ///
    /// Panics if the lock does not permit writing.
    pub fn data_mut(&mut self) -> &mut [I::Pixel] {
        assert!(
            self.usage.can_write(),
            "lock opened for {:?} does not permit writing",
            self.usage
        );
        &mut self.pixels
    }

    /// Buffer offset of `pos`, checked per axis.
    fn offset(&self, pos: Vec2) -> usize {
        let size = self.image.size();
        assert!(
            pos.is_within(size),
            "pixel position ({}, {}) is outside a {} image",
            pos.x,
            pos.y,
            size
        );
        pos.y as usize * size.x as usize + pos.x as usize
    }
}

impl<I: RasterImage> Drop for ImageLock<'_, I> {
    fn drop(&mut self) {
        if self.usage.can_write() {
            self.image.mark_dirty();
        }
        tracing::trace!("Released {:?} lock on {} image", self.usage, self.image.size());
    }
}

impl<I: RasterImage> fmt::Debug for ImageLock<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLock")
            .field("size", &self.image.size())
            .field("usage", &self.usage)
            .finish()
    }
}
