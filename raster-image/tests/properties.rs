//! Property tests for pixel access, blitting and bounds.

use proptest::prelude::*;
use raster_image::{Colour, ImageCommon, LockUse, Palette, PaletteImage, Rect, RgbImage, Vec2};

fn size() -> impl Strategy<Value = Vec2> {
    (1u32..12, 1u32..12).prop_map(|(x, y)| Vec2::new(x, y))
}

/// A size together with a position inside it.
fn size_and_pos() -> impl Strategy<Value = (Vec2, Vec2)> {
    size().prop_flat_map(|size| (Just(size), (0..size.x, 0..size.y).prop_map(|(x, y)| Vec2::new(x, y))))
}

/// Fills `image` so that every pixel has a distinct, non-zero index.
fn numbered(size: Vec2, start: u8) -> PaletteImage {
    let image = PaletteImage::blank(size);
    {
        let mut lock = image.lock(LockUse::Write);
        for (i, index) in lock.data_mut().iter_mut().enumerate() {
            *index = start.wrapping_add(i as u8) | 1;
        }
    }
    image
}

proptest! {
    #[test]
    fn test_write_then_read((size, pos) in size_and_pos(), value in any::<u8>()) {
        let image = PaletteImage::blank(size);
        image.lock(LockUse::Write).set(pos, value);
        prop_assert_eq!(image.lock(LockUse::Read).get(pos), value);
    }

    #[test]
    fn test_rgb_write_then_read((size, pos) in size_and_pos(), rgba in any::<[u8; 4]>()) {
        let image = RgbImage::blank(size);
        image.lock(LockUse::ReadWrite).set(pos, Colour::from(rgba));
        prop_assert_eq!(image.lock(LockUse::Read).get(pos), Colour::from(rgba));
    }

    #[test]
    fn test_blit_copies_overlap_only(
        src_size in size(),
        dst_size in size(),
        src_offset in (0u32..14, 0u32..14),
        dst_offset in (0u32..14, 0u32..14),
    ) {
        let src = numbered(src_size, 0);
        let dst = PaletteImage::blank(dst_size);
        let src_offset = Vec2::from(src_offset);
        let dst_offset = Vec2::from(dst_offset);

        PaletteImage::blit(&src, &dst, src_offset, dst_offset);

        let src_lock = src.lock(LockUse::Read);
        let dst_lock = dst.lock(LockUse::Read);
        let extent = src_size
            .saturating_sub(src_offset)
            .min(dst_size.saturating_sub(dst_offset));
        for y in 0..dst_size.y {
            for x in 0..dst_size.x {
                let pos = Vec2::new(x, y);
                let inside = x >= dst_offset.x
                    && y >= dst_offset.y
                    && x - dst_offset.x < extent.x
                    && y - dst_offset.y < extent.y;
                let expected = if inside {
                    src_lock.get(Vec2::new(x - dst_offset.x + src_offset.x, y - dst_offset.y + src_offset.y))
                } else {
                    0
                };
                prop_assert_eq!(dst_lock.get(pos), expected);
            }
        }
    }

    #[test]
    fn test_zero_overlap_blit_is_noop(dst_size in size(), fill in 1u8..=255) {
        let src = numbered(Vec2::new(4, 4), 3);
        let dst = PaletteImage::new(dst_size, fill);
        dst.clear_dirty();

        // Destination offset past the right edge leaves nothing to copy.
        PaletteImage::blit(&src, &dst, Vec2::ZERO, Vec2::new(dst_size.x, 0));

        prop_assert!(!dst.is_dirty());
        prop_assert!(dst.lock(LockUse::Read).data().iter().all(|&i| i == fill));
    }

    #[test]
    fn test_uniform_conversion(size in size(), index in 0u8..16) {
        let palette: Palette = (0u8..16).map(|i| Colour::rgb(i, 255 - i, i / 2)).collect();
        let rgb = PaletteImage::new(size, index).to_rgb_image(&palette).unwrap();
        let expected = palette.get(index).unwrap();
        prop_assert!(rgb.lock(LockUse::Read).data().iter().all(|&c| c == expected));
    }

    #[test]
    fn test_single_pixel_bounds((size, pos) in size_and_pos(), value in 1u8..=255) {
        let image = PaletteImage::blank(size);
        prop_assert_eq!(image.calculate_bounds(), Rect::EMPTY);

        image.lock(LockUse::Write).set(pos, value);
        prop_assert_eq!(image.calculate_bounds(), Rect::new(pos.x, pos.y, 1, 1));
    }

    #[test]
    fn test_dirty_follows_lock_use(size in size()) {
        let image = PaletteImage::blank(size);
        image.clear_dirty();
        drop(image.lock(LockUse::Read));
        prop_assert!(!image.is_dirty());
        drop(image.lock(LockUse::ReadWrite));
        prop_assert!(image.is_dirty());
    }
}
