// ============================================================
// Layer 3 — Image Shapes
// ============================================================
// Plain shape bookkeeping for images and pyramids.
// Everything the network does to a shape can be predicted
// here without building a single tensor.
//
// Layout convention (same as Burn's conv2d):
//   [batch, channels, height, width]
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of colour channels every pyramid level carries (RGB).
pub const IMAGE_CHANNELS: usize = 3;

/// The 4D shape of an image batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub batch:    usize,
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl ImageShape {
    pub fn new(batch: usize, channels: usize, height: usize, width: usize) -> Self {
        Self { batch, channels, height, width }
    }

    /// An RGB image batch.
    pub fn rgb(batch: usize, height: usize, width: usize) -> Self {
        Self::new(batch, IMAGE_CHANNELS, height, width)
    }

    pub fn dims(&self) -> [usize; 4] {
        [self.batch, self.channels, self.height, self.width]
    }

    /// Same batch and channels, spatial size divided by `factor`.
    pub fn downscaled(&self, factor: usize) -> Self {
        Self { height: self.height / factor, width: self.width / factor, ..*self }
    }

    /// Same batch and channels, spatial size multiplied by `factor`.
    pub fn upscaled(&self, factor: usize) -> Self {
        Self { height: self.height * factor, width: self.width * factor, ..*self }
    }
}

impl From<[usize; 4]> for ImageShape {
    fn from([batch, channels, height, width]: [usize; 4]) -> Self {
        Self { batch, channels, height, width }
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.batch, self.channels, self.height, self.width)
    }
}

/// Shapes of a pyramid whose finest level is `finest`, coarsest first.
///
/// Each level halves the height and width of the next finer one, so the
/// finest spatial size must be divisible by `2^(n_levels - 1)`.
pub fn pyramid_shapes(finest: ImageShape, n_levels: usize) -> Result<Vec<ImageShape>> {
    ensure!(n_levels > 0, "a pyramid needs at least one level");
    ensure!(
        n_levels <= usize::BITS as usize,
        "{n_levels} pyramid levels is more than any image can hold"
    );

    let factor = 1usize << (n_levels - 1);
    ensure!(
        finest.height % factor == 0 && finest.width % factor == 0,
        "image size {}x{} is not divisible by {} ({} pyramid levels)",
        finest.height,
        finest.width,
        factor,
        n_levels,
    );
    ensure!(
        finest.height >= factor && finest.width >= factor,
        "image size {}x{} is too small for {} pyramid levels",
        finest.height,
        finest.width,
        n_levels,
    );

    Ok((0..n_levels)
        .rev()
        .map(|level| finest.downscaled(1 << level))
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_shapes_coarsest_first() {
        let shapes = pyramid_shapes(ImageShape::rgb(2, 64, 32), 3).unwrap();
        assert_eq!(
            shapes,
            vec![
                ImageShape::rgb(2, 16, 8),
                ImageShape::rgb(2, 32, 16),
                ImageShape::rgb(2, 64, 32),
            ]
        );
    }

    #[test]
    fn test_single_level_pyramid_is_the_image() {
        let finest = ImageShape::rgb(1, 7, 5);
        assert_eq!(pyramid_shapes(finest, 1).unwrap(), vec![finest]);
    }

    #[test]
    fn test_indivisible_size_rejected() {
        // 30 / 4 is not a whole number
        assert!(pyramid_shapes(ImageShape::rgb(1, 30, 32), 3).is_err());
        assert!(pyramid_shapes(ImageShape::rgb(1, 32, 32), 0).is_err());
    }

    #[test]
    fn test_display_and_dims() {
        let shape = ImageShape::rgb(4, 16, 8);
        assert_eq!(shape.to_string(), "[4, 3, 16, 8]");
        assert_eq!(ImageShape::from(shape.dims()), shape);
        assert_eq!(shape.upscaled(2).downscaled(2), shape);
    }
}
