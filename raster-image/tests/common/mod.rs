//! Shared helpers for integration tests.

use raster_image::{Colour, Palette};

/// Installs a test subscriber once; `RUST_LOG=raster_image=trace` shows lock
/// and upload activity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A 16-colour greyscale ramp, index 0 fully transparent.
#[allow(dead_code)]
pub fn grey_palette() -> Palette {
    (0u8..16)
        .map(|i| {
            if i == 0 {
                Colour::TRANSPARENT
            } else {
                Colour::rgb(i * 17, i * 17, i * 17)
            }
        })
        .collect()
}
