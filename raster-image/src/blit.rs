//! Clipped rectangular copies and content-bounds scans over raster storage.
//!
//! Both pixel formats share these algorithms; [`PaletteImage::blit`] and
//! [`RgbImage::blit`] are thin wrappers.
//!
//! [`PaletteImage::blit`]: crate::PaletteImage::blit
//! [`RgbImage::blit`]: crate::RgbImage::blit

use crate::image::ImageCommon;
use crate::lock::{ImageLock, LockUse, RasterImage};
use raster_common::{Rect, Vec2};
use std::ptr;

/// Size of the region copied by a blit: the overlap of what remains of the
/// source past `src_offset` and of the destination past `dst_offset`.
pub(crate) fn blit_extent(src_size: Vec2, dst_size: Vec2, src_offset: Vec2, dst_offset: Vec2) -> Vec2 {
    src_size
        .saturating_sub(src_offset)
        .min(dst_size.saturating_sub(dst_offset))
}

/// Copies pixels from `src` at `src_offset` into `dst` at `dst_offset`.
///
/// The copy is a straight overwrite clipped to both images. A zero-area
/// overlap is a no-op and takes no locks. `src` and `dst` may be the same
/// image, in which case overlapping regions are handled like a memmove.
///
/// # Panics
///
/// Panics if either image is already locked.
pub(crate) fn blit<I: RasterImage>(src: &I, dst: &I, src_offset: Vec2, dst_offset: Vec2) {
    let extent = blit_extent(src.size(), dst.size(), src_offset, dst_offset);
    if extent.x == 0 || extent.y == 0 {
        tracing::trace!(
            "Blit from {} to {} has no overlap, skipping",
            src.size(),
            dst.size()
        );
        return;
    }

    tracing::trace!(
        "Blit {} region from ({}, {}) to ({}, {})",
        extent,
        src_offset.x,
        src_offset.y,
        dst_offset.x,
        dst_offset.y
    );

    if ptr::eq(src, dst) {
        let mut lock = ImageLock::new(dst, LockUse::ReadWrite);
        copy_within(lock.data_mut(), dst.size().x as usize, extent, src_offset, dst_offset);
        return;
    }

    let src_lock = ImageLock::new(src, LockUse::Read);
    let mut dst_lock = ImageLock::new(dst, LockUse::Write);
    let src_stride = src.size().x as usize;
    let dst_stride = dst.size().x as usize;
    let width = extent.x as usize;

    let src_pixels = src_lock.data();
    let dst_pixels = dst_lock.data_mut();
    for row in 0..extent.y as usize {
        let src_start = (src_offset.y as usize + row) * src_stride + src_offset.x as usize;
        let dst_start = (dst_offset.y as usize + row) * dst_stride + dst_offset.x as usize;
        dst_pixels[dst_start..dst_start + width]
            .copy_from_slice(&src_pixels[src_start..src_start + width]);
    }
}

/// Row copy inside one buffer, choosing the row order so that no source row
/// is overwritten before it has been copied.
fn copy_within<P: Copy>(pixels: &mut [P], stride: usize, extent: Vec2, src_offset: Vec2, dst_offset: Vec2) {
    let width = extent.x as usize;
    let copy_row = |pixels: &mut [P], row: usize| {
        let src_start = (src_offset.y as usize + row) * stride + src_offset.x as usize;
        let dst_start = (dst_offset.y as usize + row) * stride + dst_offset.x as usize;
        pixels.copy_within(src_start..src_start + width, dst_start);
    };

    if dst_offset.y > src_offset.y {
        // Moving down: copy from bottom to top.
        for row in (0..extent.y as usize).rev() {
            copy_row(pixels, row);
        }
    } else {
        for row in 0..extent.y as usize {
            copy_row(pixels, row);
        }
    }
}

/// Minimal rectangle enclosing every pixel for which `is_content` holds.
///
/// Returns [`Rect::EMPTY`] when no pixel qualifies.
pub(crate) fn content_bounds<P>(pixels: &[P], size: Vec2, is_content: impl Fn(&P) -> bool) -> Rect {
    let width = size.x as usize;
    if width == 0 {
        return Rect::EMPTY;
    }

    let mut min = Vec2::new(u32::MAX, u32::MAX);
    let mut max = Vec2::ZERO;
    let mut found = false;

    for (y, row) in pixels.chunks_exact(width).enumerate() {
        let Some(first) = row.iter().position(&is_content) else {
            continue;
        };
        // A row with a first content pixel always has a last one.
        let last = row.iter().rposition(&is_content).unwrap_or(first);
        let y = y as u32;
        min = Vec2::new(min.x.min(first as u32), min.y.min(y));
        max = Vec2::new(max.x.max(last as u32), max.y.max(y));
        found = true;
    }

    if !found {
        return Rect::EMPTY;
    }
    Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1)
}
