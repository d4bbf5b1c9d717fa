//! In-memory raster images for a sprite-based 2D renderer.
//!
//! This crate provides the image model shared by game logic, asset loading
//! and the renderer backend:
//!
//! - [`PaletteImage`]: 8-bit indices into an external [`Palette`].
//! - [`RgbImage`]: RGBA pixels with alpha.
//! - [`Surface`]: a render target whose pixels live on the backend.
//! - [`LazyImage`]: a placeholder loaded through an [`ImageLoader`] on use.
//! - [`ImageSet`]: ordered frames with a shared maximum size.
//!
//! Pixels are only reachable through an [`ImageLock`]. Releasing a lock that
//! could write marks the image dirty so the backend knows to re-upload it
//! (see [`sync_image`]).

#![forbid(unsafe_code)]

pub mod backend;
mod blit;
pub mod config;
pub mod error;
pub mod image;
pub mod image_set;
pub mod lazy;
pub mod loader;
pub mod lock;
pub mod palette;
pub mod palette_image;
pub mod rgb_image;

pub use backend::{sync_image, sync_image_set, RendererBackend, RendererImageData};
pub use config::{Config, ConfigBuilder, LazyConfig, LoaderConfig, PaletteConfig};
pub use error::{ImageError, Result};
pub use image::{Image, ImageCommon, ImageCore, ImageKind, Surface};
pub use image_set::ImageSet;
pub use lazy::LazyImage;
pub use loader::{loader_fn, CachingLoader, ImageLoader};
pub use lock::{ImageLock, LockUse, PaletteImageLock, RasterImage, RgbImageLock};
pub use palette::{OutOfRangePolicy, Palette};
pub use palette_image::PaletteImage;
pub use rgb_image::RgbImage;

pub use raster_common::{Colour, Rect, Vec2};
