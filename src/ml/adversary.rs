// ============================================================
// Layer 5 — Adversary (PatchGAN critic)
// ============================================================
// A plain stack of bias-free strided convolutions with
// LeakyReLU(0.2) in between, built from the stage table in
// domain/layout.rs. The result is a [batch, 1, H', W'] map
// of real/fake scores, one per receptive-field patch, rather
// than a single score per image.
//
// Reference: Isola et al. (2017) Image-to-Image Translation
//            with Conditional Adversarial Networks

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        LeakyRelu, LeakyReluConfig, PaddingConfig2d,
    },
    prelude::*,
};

use crate::domain::layout::{adversary_body_stages, adversary_head_stage, ConvStage};
use crate::ml::gan::ModelSummary;

#[derive(Config, Debug)]
pub struct AdversaryConfig {
    #[config(default = 64)]
    pub n_feats:        usize,
    #[config(default = 5)]
    pub kernel_size:    usize,
    #[config(default = 0.2)]
    pub negative_slope: f64,
}

impl AdversaryConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Adversary<B> {
        let body = adversary_body_stages(self.n_feats, self.kernel_size);
        let head = adversary_head_stage(self.n_feats);

        Adversary {
            convs:      body.iter().map(|stage| stage_conv(stage, device)).collect(),
            head:       stage_conv(&head, device),
            activation: LeakyReluConfig::new()
                .with_negative_slope(self.negative_slope)
                .init(),
        }
    }

    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.n_feats >= 2 && self.n_feats % 2 == 0,
            "adversary n_feats must be even and at least 2, got {}",
            self.n_feats
        );
        anyhow::ensure!(
            self.kernel_size % 2 == 1,
            "adversary kernel size must be odd, got {}",
            self.kernel_size
        );
        anyhow::ensure!(
            self.negative_slope.is_finite(),
            "adversary negative slope must be finite"
        );
        Ok(())
    }
}

fn stage_conv<B: Backend>(stage: &ConvStage, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new(
        [stage.in_channels, stage.out_channels],
        [stage.kernel, stage.kernel],
    )
    .with_stride([stage.stride, stage.stride])
    .with_padding(PaddingConfig2d::Explicit(stage.padding, stage.padding))
    .with_bias(false)
    .init(device)
}

#[derive(Module, Debug)]
pub struct Adversary<B: Backend> {
    /// Downsampling stages, each followed by the activation
    pub convs:      Vec<Conv2d<B>>,
    /// 1x1 projection to a single score channel
    pub head:       Conv2d<B>,
    pub activation: LeakyRelu,
}

impl<B: Backend> Adversary<B> {
    /// image: [batch, 3, H, W] → scores: [batch, 1, H', W']
    pub fn forward(&self, image: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = image;
        for conv in &self.convs {
            x = self.activation.forward(conv.forward(x));
        }
        self.head.forward(x)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name:        "adversary",
            params:      self.num_params(),
            conv_layers: self.convs.len() + 1,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        layout::{adversary_output_shape, adversary_stages},
        shape::ImageShape,
    };
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TB = NdArray;

    #[test]
    fn test_no_conv_has_bias() {
        let device = Default::default();
        let model  = AdversaryConfig::new().with_n_feats(4).init::<TB>(&device);

        assert_eq!(model.convs.len(), 10);
        assert!(model.convs.iter().all(|c| c.bias.is_none()));
        assert!(model.head.bias.is_none());
        assert_eq!(model.head.weight.dims(), [1, 32, 1, 1]);
    }

    #[test]
    fn test_param_count_follows_stage_table() {
        let device = Default::default();
        let cfg    = AdversaryConfig::new().with_n_feats(4).with_kernel_size(3);
        let model  = cfg.init::<TB>(&device);

        let expected: usize = adversary_stages(4, 3)
            .iter()
            .map(|s| s.in_channels * s.out_channels * s.kernel * s.kernel)
            .sum();
        assert_eq!(model.summary().params, expected);
        assert_eq!(model.summary().conv_layers, 11);
    }

    #[test]
    fn test_score_map_shape_matches_layout() {
        let device = Default::default();
        let model  = AdversaryConfig::new()
            .with_n_feats(2)
            .with_kernel_size(3)
            .init::<TB>(&device);

        for (height, width) in [(256, 256), (512, 256), (300, 260)] {
            let image = Tensor::<TB, 4>::random(
                [2, 3, height, width],
                Distribution::Uniform(0.0, 255.0),
                &device,
            );
            let scores   = model.forward(image);
            let expected = adversary_output_shape(ImageShape::rgb(2, height, width), 2, 3).unwrap();

            assert_eq!(scores.dims()[1], 1);
            assert_eq!(ImageShape::from(scores.dims()), expected);
        }
    }

    #[test]
    fn test_check_rejects_bad_config() {
        assert!(AdversaryConfig::new().check().is_ok());
        assert!(AdversaryConfig::new().with_n_feats(3).check().is_err());
        assert!(AdversaryConfig::new().with_n_feats(0).check().is_err());
        assert!(AdversaryConfig::new().with_kernel_size(2).check().is_err());
    }
}
