//! Palette-indexed images.
//!
//! A [`PaletteImage`] stores one byte per pixel, an index into a [`Palette`].
//! Large tile and sprite sets are kept in this form and only expanded to RGBA
//! with [`PaletteImage::to_rgb_image`] when needed.
//!
//! # Example
//!
//! ```
//! use raster_common::{Colour, Rect, Vec2};
//! use raster_image::{ImageCommon, LockUse, Palette, PaletteImage};
//!
//! let image = PaletteImage::new(Vec2::new(4, 4), 0);
//! image.lock(LockUse::Write).set(Vec2::new(1, 1), 1);
//! assert_eq!(image.calculate_bounds(), Rect::new(1, 1, 1, 1));
//!
//! let palette = Palette::new(vec![Colour::TRANSPARENT, Colour::rgb(255, 0, 0)]);
//! let rgb = image.to_rgb_image(&palette).unwrap();
//! assert_eq!(rgb.size(), Vec2::new(4, 4));
//! ```

use crate::blit::{blit, content_bounds};
use crate::config::Config;
use crate::error::{ImageError, Result};
use crate::image::{ImageCommon, ImageCore};
use crate::lock::{LockUse, PaletteImageLock, Sealed};
use crate::palette::{OutOfRangePolicy, Palette};
use crate::rgb_image::RgbImage;
use parking_lot::Mutex;
use raster_common::{Rect, Vec2};
use std::fmt;

/// An indexed raster image, one palette index per pixel.
pub struct PaletteImage {
    core: ImageCore,
    indices: Mutex<Vec<u8>>,
}

impl PaletteImage {
    /// Creates an image of `size` with every pixel set to `initial_index`.
    pub fn new(size: Vec2, initial_index: u8) -> Self {
        Self {
            core: ImageCore::new(size),
            indices: Mutex::new(vec![initial_index; size.area()]),
        }
    }

    /// Creates an image of `size` filled with index 0.
    pub fn blank(size: Vec2) -> Self {
        Self::new(size, 0)
    }

    /// Locks the image for pixel access. See [`crate::ImageLock`].
    pub fn lock(&self, usage: LockUse) -> PaletteImageLock<'_> {
        PaletteImageLock::new(self, usage)
    }

    /// Expands every index through `palette`, rejecting out-of-range indices.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PaletteIndexOutOfRange`] for the first index the
    /// palette has no colour for, or [`ImageError::EmptyPalette`].
    pub fn to_rgb_image(&self, palette: &Palette) -> Result<RgbImage> {
        self.to_rgb_image_with(palette, OutOfRangePolicy::Reject)
    }

    /// Expands every index through `palette` with the `[palette] out_of_range`
    /// policy from `config`.
    ///
    /// # Errors
    ///
    /// Same as [`PaletteImage::to_rgb_image_with`].
    pub fn to_rgb_image_with_config(&self, palette: &Palette, config: &Config) -> Result<RgbImage> {
        self.to_rgb_image_with(palette, config.palette.out_of_range)
    }

    /// Expands every index through `palette` using `policy` for misses.
    ///
    /// The source is read-locked for the duration of the conversion.
    ///
    /// # Errors
    ///
    /// [`ImageError::EmptyPalette`] if the palette has no colours, otherwise
    /// [`ImageError::PaletteIndexOutOfRange`] under [`OutOfRangePolicy::Reject`].
    pub fn to_rgb_image_with(&self, palette: &Palette, policy: OutOfRangePolicy) -> Result<RgbImage> {
        if palette.is_empty() {
            return Err(ImageError::EmptyPalette);
        }

        let size = self.size();
        let width = size.x as usize;
        let lock = self.lock(LockUse::Read);
        let mut clamped = 0usize;
        let mut pixels = Vec::with_capacity(size.area());

        for (offset, &index) in lock.data().iter().enumerate() {
            if palette.get(index).is_none() {
                if policy == OutOfRangePolicy::Reject {
                    return Err(ImageError::PaletteIndexOutOfRange {
                        index,
                        position: Vec2::new((offset % width) as u32, (offset / width) as u32),
                        palette_len: palette.len(),
                    });
                }
                clamped += 1;
            }
            // Non-empty palette: clamp always finds a colour.
            pixels.extend(palette.lookup(index, policy));
        }

        if clamped > 0 {
            tracing::warn!(
                "Clamped {} out-of-range indices converting {} image with a {}-colour palette",
                clamped,
                size,
                palette.len()
            );
        }

        Ok(RgbImage::from_pixels(size, pixels))
    }

    /// Copies indices from `src` at `src_offset` into `dst` at `dst_offset`.
    ///
    /// Clipped to both images; a zero-area overlap does nothing. Index 0 is
    /// copied like any other value. `src` and `dst` may be the same image.
    ///
    /// # Panics
    ///
    /// Panics if either image is currently locked.
    pub fn blit(src: &PaletteImage, dst: &PaletteImage, src_offset: Vec2, dst_offset: Vec2) {
        blit(src, dst, src_offset, dst_offset);
    }

    /// Recomputes and stores the bounds of all non-zero indices.
    ///
    /// An all-zero image gets [`Rect::EMPTY`].
    pub fn calculate_bounds(&self) -> Rect {
        let bounds = {
            let lock = self.lock(LockUse::Read);
            content_bounds(lock.data(), self.size(), |&index| index != 0)
        };
        self.set_bounds(bounds);
        bounds
    }
}

impl ImageCommon for PaletteImage {
    fn core(&self) -> &ImageCore {
        &self.core
    }
}

impl Sealed for PaletteImage {
    type Pixel = u8;

    fn storage(&self) -> &Mutex<Vec<u8>> {
        &self.indices
    }
}

impl fmt::Debug for PaletteImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteImage").field("core", &self.core).finish()
    }
}
