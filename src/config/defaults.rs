//! Default parameter values.

use super::kinds::{BorderPolicy, FilterKind};
use crate::image::{Point, Size};

pub const DEFAULT_FILTER: FilterKind = FilterKind::Box;
pub const DEFAULT_BORDER: BorderPolicy = BorderPolicy::Replicate;

pub const DEFAULT_MASK_SIZE: Size = Size::new(5, 5);
pub const DEFAULT_SOURCE_OFFSET: Point = Point::new(0, 0);

/// Per-channel noise variance for the Wiener filter.
pub const DEFAULT_NOISE: [f32; 3] = [0.5, 0.47, 0.53];

/// Largest accepted mask side.
pub const MAX_MASK_SIDE: usize = 1024;

/// Sample image used when no input is given.
pub const SAMPLE_IMAGE: &str = "Lena.png";

/// Centre of the mask (integer division).
pub const fn default_anchor(mask: Size) -> Point {
    Point::new(mask.width / 2, mask.height / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_5x5() {
        assert_eq!(default_anchor(DEFAULT_MASK_SIZE), Point::new(2, 2));
    }

    #[test]
    fn test_default_anchor_uneven_mask() {
        assert_eq!(default_anchor(Size::new(4, 7)), Point::new(2, 3));
    }
}
