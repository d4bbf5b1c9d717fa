//! Direct-colour RGBA images.

use crate::blit::{blit, content_bounds};
use crate::image::{ImageCommon, ImageCore};
use crate::lock::{LockUse, RgbImageLock, Sealed};
use parking_lot::Mutex;
use raster_common::{Colour, Rect, Vec2};
use std::fmt;

/// An RGBA raster image with an explicit alpha channel.
pub struct RgbImage {
    core: ImageCore,
    pixels: Mutex<Vec<Colour>>,
}

impl RgbImage {
    /// Creates an image of `size` with every pixel set to `initial`.
    pub fn new(size: Vec2, initial: Colour) -> Self {
        Self::from_pixels(size, vec![initial; size.area()])
    }

    /// Creates a fully transparent image.
    pub fn blank(size: Vec2) -> Self {
        Self::new(size, Colour::TRANSPARENT)
    }

    /// Wraps existing row-major pixels.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len()` is not `size.x * size.y`.
    pub fn from_pixels(size: Vec2, pixels: Vec<Colour>) -> Self {
        assert_eq!(
            pixels.len(),
            size.area(),
            "pixel count {} does not match a {} image",
            pixels.len(),
            size
        );
        Self {
            core: ImageCore::new(size),
            pixels: Mutex::new(pixels),
        }
    }

    /// Locks the image for pixel access. See [`crate::ImageLock`].
    pub fn lock(&self, usage: LockUse) -> RgbImageLock<'_> {
        RgbImageLock::new(self, usage)
    }

    /// Copies whole RGBA pixels, alpha included, from `src` into `dst`.
    ///
    /// Same clipping as [`crate::PaletteImage::blit`]: a straight overwrite
    /// with no alpha compositing.
    ///
    /// # Panics
    ///
    /// Panics if either image is currently locked.
    pub fn blit(src: &RgbImage, dst: &RgbImage, src_offset: Vec2, dst_offset: Vec2) {
        blit(src, dst, src_offset, dst_offset);
    }

    /// Recomputes and stores the bounds of all pixels with non-zero alpha.
    pub fn calculate_bounds(&self) -> Rect {
        let bounds = {
            let lock = self.lock(LockUse::Read);
            content_bounds(lock.data(), self.size(), |colour| !colour.is_transparent())
        };
        self.set_bounds(bounds);
        bounds
    }

    /// Pixels as tightly packed `R, G, B, A` bytes, row by row.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let lock = self.lock(LockUse::Read);
        lock.data().iter().flat_map(|c| c.to_array()).collect()
    }

    /// Copies the pixels into an [`image::RgbaImage`], e.g. for debug dumps.
    #[cfg(feature = "export")]
    pub fn to_image_buffer(&self) -> image::RgbaImage {
        let lock = self.lock(LockUse::Read);
        let size = self.size();
        image::RgbaImage::from_fn(size.x, size.y, |x, y| {
            image::Rgba(lock.get(Vec2::new(x, y)).to_array())
        })
    }
}

impl ImageCommon for RgbImage {
    fn core(&self) -> &ImageCore {
        &self.core
    }
}

impl Sealed for RgbImage {
    type Pixel = Colour;

    fn storage(&self) -> &Mutex<Vec<Colour>> {
        &self.pixels
    }
}

impl fmt::Debug for RgbImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RgbImage").field("core", &self.core).finish()
    }
}
