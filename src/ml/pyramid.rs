// ============================================================
// Layer 5 — Image Pyramid
// ============================================================
// A pyramid is the same image batch at several resolutions,
// coarsest level first:
//
//   level 0:  [B, 3, H/4, W/4]
//   level 1:  [B, 3, H/2, W/2]
//   level 2:  [B, 3, H,   W  ]
//
// Construction validates the shape rules once so the generator
// can rely on them. Tensors are cheap reference-counted
// handles, so cloning a level never copies pixel data.
//
// Reference: Burn Book §3 (Tensors)
//            Nah et al. (2017) Deep Multi-scale CNN for
//            Dynamic Scene Deblurring

use anyhow::{ensure, Result};
use burn::{nn::pool::AvgPool2dConfig, prelude::*};

use crate::domain::shape::{pyramid_shapes, ImageShape, IMAGE_CHANNELS};
use crate::ml::blocks::PYRAMID_FACTOR;

#[derive(Debug, Clone)]
pub struct Pyramid<B: Backend> {
    levels: Vec<Tensor<B, 4>>,
}

impl<B: Backend> Pyramid<B> {
    /// Wrap existing levels, coarsest first.
    ///
    /// Every level must be an RGB batch of the same size, and each level
    /// must be exactly twice as tall and wide as the one before it.
    pub fn new(levels: Vec<Tensor<B, 4>>) -> Result<Self> {
        ensure!(!levels.is_empty(), "a pyramid needs at least one level");

        let shapes: Vec<ImageShape> = levels.iter().map(|l| l.dims().into()).collect();
        for (index, shape) in shapes.iter().enumerate() {
            ensure!(
                shape.channels == IMAGE_CHANNELS,
                "pyramid level {index} has shape {shape}, expected {IMAGE_CHANNELS} channels"
            );
        }
        for (index, pair) in shapes.windows(2).enumerate() {
            let (coarse, fine) = (pair[0], pair[1]);
            ensure!(
                coarse.upscaled(PYRAMID_FACTOR) == fine,
                "pyramid level {} has shape {}, expected {} (twice level {})",
                index + 1,
                fine,
                coarse.upscaled(PYRAMID_FACTOR),
                index,
            );
        }

        Ok(Self { levels })
    }

    /// Build `n_levels` levels from the finest image by repeated 2x2 average pooling.
    pub fn from_image(image: Tensor<B, 4>, n_levels: usize) -> Result<Self> {
        let finest = ImageShape::from(image.dims());
        ensure!(
            finest.channels == IMAGE_CHANNELS,
            "image has shape {finest}, expected {IMAGE_CHANNELS} channels"
        );
        pyramid_shapes(finest, n_levels)?;

        let pool = AvgPool2dConfig::new([PYRAMID_FACTOR, PYRAMID_FACTOR])
            .with_strides([PYRAMID_FACTOR, PYRAMID_FACTOR])
            .init();

        let mut levels = Vec::with_capacity(n_levels);
        let mut current = image;
        for _ in 1..n_levels {
            let coarser = pool.forward(current.clone());
            levels.push(current);
            current = coarser;
        }
        levels.push(current);
        levels.reverse();

        tracing::debug!("Built {}-level pyramid from {}", n_levels, finest);
        Ok(Self { levels })
    }

    /// Levels produced by the generator already satisfy the shape rules.
    pub(crate) fn from_levels_unchecked(levels: Vec<Tensor<B, 4>>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[Tensor<B, 4>] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<Tensor<B, 4>> {
        self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn coarsest(&self) -> &Tensor<B, 4> {
        &self.levels[0]
    }

    pub fn finest(&self) -> &Tensor<B, 4> {
        &self.levels[self.levels.len() - 1]
    }

    pub fn shapes(&self) -> Vec<ImageShape> {
        self.levels.iter().map(|l| l.dims().into()).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray;

    #[test]
    fn test_from_image_builds_coarsest_first() {
        let device  = Default::default();
        let image   = Tensor::<TB, 4>::ones([2, 3, 16, 8], &device);
        let pyramid = Pyramid::from_image(image, 3).unwrap();

        assert_eq!(pyramid.len(), 3);
        assert_eq!(
            pyramid.shapes(),
            vec![
                ImageShape::rgb(2, 4, 2),
                ImageShape::rgb(2, 8, 4),
                ImageShape::rgb(2, 16, 8),
            ]
        );
        assert_eq!(pyramid.coarsest().dims(), [2, 3, 4, 2]);
        assert_eq!(pyramid.finest().dims(), [2, 3, 16, 8]);
    }

    #[test]
    fn test_from_image_averages_blocks() {
        let device = Default::default();
        // One 2x2 block: 0, 1, 2, 3 → mean 1.5
        let channel = Tensor::<TB, 1, Int>::arange(0..4, &device)
            .float()
            .reshape([1, 1, 2, 2]);
        let image = Tensor::cat(vec![channel.clone(), channel.clone(), channel], 1);

        let pyramid = Pyramid::from_image(image, 2).unwrap();
        let coarse  = pyramid.coarsest().clone().into_data().to_vec::<f32>().unwrap();
        assert_eq!(coarse, vec![1.5, 1.5, 1.5]);
    }

    #[test]
    fn test_from_image_rejects_indivisible_size() {
        let device = Default::default();
        let image  = Tensor::<TB, 4>::zeros([1, 3, 10, 8], &device);
        assert!(Pyramid::from_image(image, 3).is_err());
    }

    #[test]
    fn test_new_validates_levels() {
        let device = Default::default();
        let coarse = Tensor::<TB, 4>::zeros([1, 3, 4, 4], &device);
        let fine   = Tensor::<TB, 4>::zeros([1, 3, 8, 8], &device);
        let wrong  = Tensor::<TB, 4>::zeros([1, 3, 12, 12], &device);
        let gray   = Tensor::<TB, 4>::zeros([1, 1, 4, 4], &device);
        let other_batch = Tensor::<TB, 4>::zeros([2, 3, 8, 8], &device);

        assert!(Pyramid::new(vec![coarse.clone(), fine]).is_ok());
        assert!(Pyramid::new(vec![coarse.clone(), wrong]).is_err());
        assert!(Pyramid::new(vec![coarse, other_batch]).is_err());
        assert!(Pyramid::new(vec![gray]).is_err());
        assert!(Pyramid::<TB>::new(vec![]).is_err());
    }
}
