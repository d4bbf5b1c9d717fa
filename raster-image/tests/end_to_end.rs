//! End-to-end tests for raster-image: palette images through locking,
//! bounds, conversion, sets and lazy loading.

mod common;

use pretty_assertions::assert_eq;
use raster_image::{
    CachingLoader, Colour, Config, Image, ImageCommon, ImageError, ImageSet, LockUse,
    OutOfRangePolicy, Palette, PaletteImage, Rect, RgbImage, Vec2,
};
use std::sync::Arc;

const RED: Colour = Colour::rgb(255, 0, 0);

#[test]
fn test_single_pixel_palette_image_to_rgb() {
    common::init_tracing();

    let image = PaletteImage::new(Vec2::new(4, 4), 0);
    {
        let mut lock = image.lock(LockUse::Write);
        lock.set(Vec2::new(1, 1), 7);
    }
    assert!(image.is_dirty());
    assert_eq!(image.calculate_bounds(), Rect::new(1, 1, 1, 1));
    assert_eq!(image.bounds(), Rect::new(1, 1, 1, 1));

    let mut colours = vec![Colour::rgb(10, 20, 30); 8];
    colours[7] = RED;
    let palette = Palette::new(colours);

    let rgb = image.to_rgb_image(&palette).unwrap();
    assert_eq!(rgb.size(), Vec2::new(4, 4));
    let lock = rgb.lock(LockUse::Read);
    for y in 0..4 {
        for x in 0..4 {
            let expected = if (x, y) == (1, 1) { RED } else { Colour::rgb(10, 20, 30) };
            assert_eq!(lock.get(Vec2::new(x, y)), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_conversion_policy_from_config() {
    common::init_tracing();

    let config = Config::from_toml_str("[palette]\nout_of_range = \"clamp\"\n").unwrap();
    let image = PaletteImage::new(Vec2::new(2, 1), 15);
    let palette = Palette::new(vec![Colour::BLACK, Colour::WHITE]);

    assert!(matches!(
        image.to_rgb_image(&palette),
        Err(ImageError::PaletteIndexOutOfRange { index: 15, .. })
    ));

    let rgb = image.to_rgb_image_with_config(&palette, &config).unwrap();
    assert_eq!(config.palette.out_of_range, OutOfRangePolicy::Clamp);
    assert_eq!(rgb.lock(LockUse::Read).data(), &[Colour::WHITE, Colour::WHITE]);
}

#[test]
fn test_sprite_sheet_from_atlas() {
    common::init_tracing();

    // Two 2x2 frames side by side in one atlas.
    let atlas = PaletteImage::blank(Vec2::new(4, 2));
    {
        let mut lock = atlas.lock(LockUse::Write);
        lock.set(Vec2::new(0, 0), 1);
        lock.set(Vec2::new(3, 1), 2);
    }

    let set = ImageSet::new(Vec2::new(2, 2));
    for frame in 0..2 {
        let image = PaletteImage::blank(Vec2::new(2, 2));
        PaletteImage::blit(&atlas, &image, Vec2::new(frame * 2, 0), Vec2::ZERO);
        image.calculate_bounds();
        set.push(Image::from(image));
    }

    assert_eq!(set.len(), 2);
    assert_eq!(set.recalculate_max_size(), Vec2::new(2, 2));

    let first = set.get(0).unwrap();
    let second = set.get(1).unwrap();
    assert_eq!(first.bounds(), Rect::new(0, 0, 1, 1));
    assert_eq!(second.bounds(), Rect::new(1, 1, 1, 1));
    assert_eq!(second.lock_palette(LockUse::Read).get(Vec2::new(1, 1)), 2);
    assert_eq!(second.index_in_set(), Some(1));

    drop(set);
    assert!(first.owning_set().is_none());
}

#[test]
fn test_lazy_images_share_loaded_data() {
    common::init_tracing();

    let loader = Arc::new(CachingLoader::new(|descriptor: &str| -> anyhow::Result<Image> {
        let index: u8 = descriptor.rsplit(':').next().unwrap_or("0").parse()?;
        Ok(Image::from(PaletteImage::new(Vec2::new(3, 3), index)))
    }));

    let a = Image::from(loader.lazy("PCK:xcom3/ufodata/city.pck:xcom3/ufodata/city.tab:4"));
    let b = Image::from(loader.lazy("PCK:xcom3/ufodata/city.pck:xcom3/ufodata/city.tab:4"));
    let bad = Image::from(loader.lazy("PCK:xcom3/ufodata/city.pck:xcom3/ufodata/city.tab:x"));

    let real_a = a.resolve().unwrap();
    let real_b = b.resolve().unwrap();
    assert!(real_a.ptr_eq(&real_b));
    assert_eq!(real_a.lock_palette(LockUse::Read).get(Vec2::new(2, 2)), 4);

    let err = bad.resolve().unwrap_err();
    assert!(err.is_load_failure());
}

#[test]
fn test_rgb_overlay_keeps_untouched_pixels() {
    common::init_tracing();

    let palette = common::grey_palette();
    let background = PaletteImage::new(Vec2::new(3, 3), 5)
        .to_rgb_image(&palette)
        .unwrap();
    let marker = RgbImage::new(Vec2::new(1, 1), RED);

    RgbImage::blit(&marker, &background, Vec2::ZERO, Vec2::new(2, 2));

    let lock = background.lock(LockUse::Read);
    assert_eq!(lock.get(Vec2::new(2, 2)), RED);
    assert_eq!(lock.get(Vec2::new(0, 0)), Colour::rgb(85, 85, 85));
    assert_eq!(
        lock.data().iter().filter(|&&c| c == RED).count(),
        1
    );
}
