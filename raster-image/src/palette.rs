//! Palettes for indexed images.
//!
//! A [`Palette`] maps a `u8` index to a [`Colour`]. Palettes with fewer than
//! 256 entries are common, so lookups can miss; what happens on a miss during
//! conversion is decided by an [`OutOfRangePolicy`].
//!
//! # Example
//!
//! ```
//! use raster_common::Colour;
//! use raster_image::Palette;
//!
//! let palette: Palette = [Colour::TRANSPARENT, Colour::rgb(255, 0, 0)].into_iter().collect();
//! assert_eq!(palette.len(), 2);
//! assert_eq!(palette.get(1), Some(Colour::rgb(255, 0, 0)));
//! assert_eq!(palette.get(2), None);
//! ```

use raster_common::Colour;
use serde::{Deserialize, Serialize};

/// What to do with a palette index that has no colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Fail the conversion with [`crate::ImageError::PaletteIndexOutOfRange`].
    #[default]
    Reject,
    /// Use the last colour of the palette.
    Clamp,
}

/// An ordered table of colours addressed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// Number of colours in the palette.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Colour at `index`, if the palette has one.
    pub fn get(&self, index: u8) -> Option<Colour> {
        self.colours.get(index as usize).copied()
    }

    /// Colour at `index` resolved through `policy`.
    ///
    /// Returns `None` only when the index misses under [`OutOfRangePolicy::Reject`]
    /// or the palette is empty.
    pub fn lookup(&self, index: u8, policy: OutOfRangePolicy) -> Option<Colour> {
        match (self.get(index), policy) {
            (Some(colour), _) => Some(colour),
            (None, OutOfRangePolicy::Clamp) => self.colours.last().copied(),
            (None, OutOfRangePolicy::Reject) => None,
        }
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }
}

impl FromIterator<Colour> for Palette {
    fn from_iter<T: IntoIterator<Item = Colour>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_colour() -> Palette {
        Palette::new(vec![Colour::BLACK, Colour::WHITE])
    }

    #[test]
    fn test_get() {
        let p = two_colour();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get(0), Some(Colour::BLACK));
        assert_eq!(p.get(1), Some(Colour::WHITE));
        assert_eq!(p.get(2), None);
    }

    #[test]
    fn test_lookup_policies() {
        let p = two_colour();
        assert_eq!(p.lookup(9, OutOfRangePolicy::Reject), None);
        assert_eq!(p.lookup(9, OutOfRangePolicy::Clamp), Some(Colour::WHITE));
        assert_eq!(p.lookup(0, OutOfRangePolicy::Reject), Some(Colour::BLACK));
    }

    #[test]
    fn test_empty_palette_clamp_misses() {
        let p = Palette::default();
        assert!(p.is_empty());
        assert_eq!(p.lookup(0, OutOfRangePolicy::Clamp), None);
    }

    #[test]
    fn test_policy_default_is_reject() {
        assert_eq!(OutOfRangePolicy::default(), OutOfRangePolicy::Reject);
    }
}
