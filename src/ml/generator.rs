// ============================================================
// Layer 5 — Multi-scale Generator
// ============================================================
// Coarse-to-fine image restoration over a pyramid:
//
//   level 0 ──► ScaleBody(3→3) ──► out 0
//                                    │ Upscaler (×2)
//                                    ▼
//   level 1 ──► cat ──► ScaleBody(6→3) ──► out 1
//                                            │ Upscaler (×2)
//                                            ▼
//   level 2 ──► cat ──► ScaleBody(6→3) ──► out 2
//
// Pixels are centred by subtracting a fixed bias of 127 before
// the network and restored by adding it back afterwards.
// The caller's pyramid is never modified; centring produces
// new tensors.
//
// Reference: Nah et al. (2017) Deep Multi-scale CNN for
//            Dynamic Scene Deblurring

use burn::prelude::*;

use crate::domain::shape::IMAGE_CHANNELS;
use crate::ml::blocks::{ScaleBody, ScaleBodyConfig, Upscaler, UpscalerConfig, PYRAMID_FACTOR};
use crate::ml::gan::ModelSummary;
use crate::ml::pyramid::Pyramid;

/// Mean-centring offset for 8-bit pixel values.
pub const PIXEL_BIAS: f64 = 127.0;

/// Hyperparameters of the multi-scale generator.
#[derive(Config, Debug)]
pub struct GeneratorConfig {
    /// Residual blocks inside each scale body
    #[config(default = 19)]
    pub n_resblocks: usize,
    /// Feature channels inside each scale body
    #[config(default = 64)]
    pub n_feats:     usize,
    /// Square kernel size of every convolution (odd)
    #[config(default = 5)]
    pub kernel_size: usize,
    /// Pyramid levels the generator expects
    #[config(default = 3)]
    pub n_scales:    usize,
}

impl GeneratorConfig {
    /// Build one scale body per level and one upscaler between each pair
    /// of consecutive levels.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Generator<B> {
        // Scale 0 sees the image alone
        let scales = (0..self.n_scales)
            .map(|level| {
                // Finer levels also see the upsampled coarser output
                let in_channels = if level == 0 { IMAGE_CHANNELS } else { 2 * IMAGE_CHANNELS };
                ScaleBodyConfig::new(
                    in_channels,
                    IMAGE_CHANNELS,
                    self.n_feats,
                    self.kernel_size,
                    self.n_resblocks,
                )
                .init(device)
            })
            .collect();

        // n_scales - 1 upscalers, each 3 → 3·f² channels then pixel shuffle
        let upscalers = (1..self.n_scales)
            .map(|_| {
                UpscalerConfig::new(self.kernel_size)
                    .with_factor(PYRAMID_FACTOR)
                    .init(device)
            })
            .collect();

        Generator { scales, upscalers }
    }

    /// Reject hyperparameters that cannot build a working generator.
    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.n_scales >= 1, "generator needs at least one scale");
        anyhow::ensure!(self.n_feats >= 1, "generator n_feats must be positive");
        anyhow::ensure!(
            self.kernel_size % 2 == 1,
            "generator kernel size must be odd to keep image size, got {}",
            self.kernel_size
        );
        Ok(())
    }
}

#[derive(Module, Debug)]
pub struct Generator<B: Backend> {
    /// One refinement body per pyramid level, coarsest first
    pub scales:    Vec<ScaleBody<B>>,
    /// `upscalers[i]` lifts the output of level i to level i + 1
    pub upscalers: Vec<Upscaler<B>>,
}

impl<B: Backend> Generator<B> {
    /// Refine every level of `input`, returning a pyramid of the same shapes.
    ///
    /// Panics if `input` does not have exactly one level per scale.
    pub fn forward(&self, input: &Pyramid<B>) -> Pyramid<B> {
        assert_eq!(
            input.len(),
            self.scales.len(),
            "generator has {} scales but the pyramid has {} levels",
            self.scales.len(),
            input.len(),
        );

        // Centre copies of the levels; the caller's tensors stay untouched
        let centred = input.levels().iter().map(|level| level.clone().sub_scalar(PIXEL_BIAS));

        let mut outputs: Vec<Tensor<B, 4>> = Vec::with_capacity(self.scales.len());
        for (scale, level) in self.scales.iter().zip(centred) {
            // Current level first, then the upscaled coarser output
            let x = match outputs.last() {
                None => level,
                Some(previous) => {
                    let upscaled = self.upscalers[outputs.len() - 1].forward(previous.clone());
                    Tensor::cat(vec![level, upscaled], 1)
                }
            };
            outputs.push(scale.forward(x));
        }

        // Output shapes equal input shapes, so the pyramid is already valid
        Pyramid::from_levels_unchecked(
            outputs
                .into_iter()
                .map(|level| level.add_scalar(PIXEL_BIAS))
                .collect(),
        )
    }

    /// Number of pyramid levels `forward` expects.
    pub fn n_scales(&self) -> usize {
        self.scales.len()
    }

    /// Parameter count and number of convolutions (scale bodies + upscalers).
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name:        "generator",
            params:      self.num_params(),
            conv_layers: self.scales.iter().map(ScaleBody::conv_count).sum::<usize>()
                + self.upscalers.len(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TB = NdArray;

    fn tiny_config() -> GeneratorConfig {
        GeneratorConfig::new()
            .with_n_resblocks(1)
            .with_n_feats(4)
            .with_kernel_size(3)
    }

    fn random_pyramid(batch: usize, height: usize, width: usize, levels: usize) -> Pyramid<TB> {
        let device = Default::default();
        let image  = Tensor::<TB, 4>::random(
            [batch, 3, height, width],
            Distribution::Uniform(0.0, 255.0),
            &device,
        );
        Pyramid::from_image(image, levels).unwrap()
    }

    #[test]
    fn test_defaults_match_reference_model() {
        let cfg = GeneratorConfig::new();
        assert_eq!(
            (cfg.n_resblocks, cfg.n_feats, cfg.kernel_size, cfg.n_scales),
            (19, 64, 5, 3)
        );
    }

    #[test]
    fn test_structure() {
        let device = Default::default();
        let model  = tiny_config().init::<TB>(&device);

        assert_eq!(model.n_scales(), 3);
        assert_eq!(model.upscalers.len(), 2);
        assert_eq!(model.scales[0].first_conv.weight.dims(), [4, 3, 3, 3]);
        assert_eq!(model.scales[1].first_conv.weight.dims(), [4, 6, 3, 3]);
        assert_eq!(model.upscalers[0].conv.weight.dims(), [12, 3, 3, 3]);

        // 3 bodies × (2 + 2 × 1) convs + 2 upscaler convs
        assert_eq!(model.summary().conv_layers, 14);
    }

    #[test]
    fn test_output_pyramid_matches_input_shapes() {
        let device  = Default::default();
        let model   = tiny_config().init::<TB>(&device);
        let input   = random_pyramid(2, 16, 24, 3);
        let output  = model.forward(&input);

        assert_eq!(output.len(), input.len());
        assert_eq!(output.shapes(), input.shapes());
    }

    #[test]
    fn test_single_scale_generator() {
        let device = Default::default();
        let model  = tiny_config().with_n_scales(1).init::<TB>(&device);
        assert!(model.upscalers.is_empty());

        let input  = random_pyramid(1, 5, 7, 1);
        let output = model.forward(&input);
        assert_eq!(output.shapes(), input.shapes());
    }

    #[test]
    fn test_input_pyramid_is_not_modified() {
        let device = Default::default();
        let model  = tiny_config().with_n_scales(2).init::<TB>(&device);
        let input  = random_pyramid(1, 8, 8, 2);
        let before: Vec<Vec<f32>> = input
            .levels()
            .iter()
            .map(|l| l.clone().into_data().to_vec::<f32>().unwrap())
            .collect();

        let _ = model.forward(&input);

        for (level, original) in input.levels().iter().zip(before) {
            assert_eq!(level.clone().into_data().to_vec::<f32>().unwrap(), original);
        }
    }

    #[test]
    fn test_bias_round_trip() {
        let device = Default::default();
        let x = Tensor::<TB, 4>::random([1, 3, 4, 4], Distribution::Uniform(0.0, 255.0), &device);
        let restored = x.clone().sub_scalar(PIXEL_BIAS).add_scalar(PIXEL_BIAS);

        let diff: f32 = (restored - x).abs().max().into_scalar().elem();
        assert!(diff < 1e-4, "max diff {diff}");
    }

    #[test]
    fn test_coarsest_output_is_body_of_centred_input() {
        let device = Default::default();
        let model  = tiny_config().with_n_scales(2).init::<TB>(&device);
        let input  = random_pyramid(1, 8, 8, 2);

        let expected = model.scales[0]
            .forward(input.coarsest().clone().sub_scalar(PIXEL_BIAS))
            .add_scalar(PIXEL_BIAS);
        let output = model.forward(&input);

        let diff: f32 = (output.coarsest().clone() - expected).abs().max().into_scalar().elem();
        assert!(diff < 1e-3, "max diff {diff}");
    }

    #[test]
    fn test_finer_level_sees_image_then_upscaled_output() {
        let device = Default::default();
        let model  = tiny_config().with_n_scales(2).init::<TB>(&device);
        let input  = random_pyramid(1, 8, 8, 2);

        // Level 0 by hand, then [current image, upscaled level 0] into scale 1
        let coarse = model.scales[0].forward(input.coarsest().clone().sub_scalar(PIXEL_BIAS));
        let x = Tensor::cat(
            vec![
                input.finest().clone().sub_scalar(PIXEL_BIAS),
                model.upscalers[0].forward(coarse),
            ],
            1,
        );
        let expected = model.scales[1].forward(x).add_scalar(PIXEL_BIAS);
        let output   = model.forward(&input);

        let diff: f32 = (output.finest().clone() - expected).abs().max().into_scalar().elem();
        assert!(diff < 1e-3, "max diff {diff}");
    }

    #[test]
    #[should_panic(expected = "generator has 3 scales")]
    fn test_level_count_mismatch_panics() {
        let device = Default::default();
        let model  = tiny_config().init::<TB>(&device);
        let _ = model.forward(&random_pyramid(1, 8, 8, 2));
    }

    #[test]
    fn test_check_rejects_bad_config() {
        assert!(GeneratorConfig::new().check().is_ok());
        assert!(GeneratorConfig::new().with_kernel_size(4).check().is_err());
        assert!(GeneratorConfig::new().with_n_scales(0).check().is_err());
        assert!(GeneratorConfig::new().with_n_feats(0).check().is_err());
    }
}
