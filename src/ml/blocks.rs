// ============================================================
// Layer 5 — Building Blocks
// ============================================================
// The small modules the generator is assembled from:
//
//   ResBlock   — conv → ReLU → conv, plus identity shortcut
//   ScaleBody  — conv(in → n_feats), N × ResBlock,
//                conv(n_feats → out)
//   Upscaler   — conv(3 → 12) then pixel shuffle ×2
//
// All convolutions here use "same" padding (kernel / 2) so the
// spatial size never changes inside a block. Only the
// Upscaler changes resolution, through the pixel shuffle.
//
// Reference: Burn Book §3 (Building Blocks)
//            He et al. (2016) Deep Residual Learning
//            Shi et al. (2016) Sub-Pixel Convolutional Networks

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::domain::shape::IMAGE_CHANNELS;

/// Upscaling factor between two adjacent pyramid levels.
pub const PYRAMID_FACTOR: usize = 2;

/// A stride-1 convolution that keeps height and width for odd kernels.
pub(crate) fn same_conv<B: Backend>(
    channels:    [usize; 2],
    kernel_size: usize,
    device:      &B::Device,
) -> Conv2d<B> {
    let padding = kernel_size / 2;
    Conv2dConfig::new(channels, [kernel_size, kernel_size])
        .with_padding(PaddingConfig2d::Explicit(padding, padding))
        .init(device)
}

// ─── ResBlock ─────────────────────────────────────────────────────────────────

/// Configuration for a single residual block.
#[derive(Config, Debug)]
pub struct ResBlockConfig {
    /// Channels in and out of the block
    pub n_feats:     usize,
    pub kernel_size: usize,
}

impl ResBlockConfig {
    /// Build both convolutions with bias and "same" padding.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ResBlock<B> {
        let channels = [self.n_feats, self.n_feats];
        ResBlock {
            conv1: same_conv(channels, self.kernel_size, device),
            conv2: same_conv(channels, self.kernel_size, device),
        }
    }
}

/// conv → ReLU → conv with an identity shortcut. No normalisation.
#[derive(Module, Debug)]
pub struct ResBlock<B: Backend> {
    pub conv1: Conv2d<B>,
    pub conv2: Conv2d<B>,
}

impl<B: Backend> ResBlock<B> {
    /// x: [batch, n_feats, H, W] → [batch, n_feats, H, W]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let y = self.conv2.forward(relu(self.conv1.forward(x.clone())));
        // Shortcut: shapes match because both convs keep size and channels
        y + x
    }
}

// ─── ScaleBody ────────────────────────────────────────────────────────────────

/// Configuration for the network of one pyramid level.
#[derive(Config, Debug)]
pub struct ScaleBodyConfig {
    /// 3 at the coarsest level, 6 at finer levels
    pub in_channels:  usize,
    pub out_channels: usize,
    pub n_feats:      usize,
    pub kernel_size:  usize,
    /// May be 0, leaving just the two outer convolutions
    pub n_resblocks:  usize,
}

impl ScaleBodyConfig {
    /// Build the entry conv, `n_resblocks` residual blocks and the exit conv.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ScaleBody<B> {
        let first_conv = same_conv([self.in_channels, self.n_feats], self.kernel_size, device);
        let resblocks  = (0..self.n_resblocks)
            .map(|_| ResBlockConfig::new(self.n_feats, self.kernel_size).init(device))
            .collect();
        let last_conv  = same_conv([self.n_feats, self.out_channels], self.kernel_size, device);
        ScaleBody { first_conv, resblocks, last_conv }
    }
}

/// Refinement network of one pyramid level.
#[derive(Module, Debug)]
pub struct ScaleBody<B: Backend> {
    pub first_conv: Conv2d<B>,
    pub resblocks:  Vec<ResBlock<B>>,
    pub last_conv:  Conv2d<B>,
}

impl<B: Backend> ScaleBody<B> {
    /// x: [batch, in_channels, H, W] → [batch, out_channels, H, W]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        // Lift to feature space, refine, project back
        let mut x = self.first_conv.forward(x);
        for block in &self.resblocks {
            x = block.forward(x);
        }
        self.last_conv.forward(x)
    }

    /// Convolutions in this body, counting both convs of every ResBlock.
    pub fn conv_count(&self) -> usize {
        2 + 2 * self.resblocks.len()
    }
}

// ─── Upscaler ─────────────────────────────────────────────────────────────────

/// Configuration for the learned upsampler between pyramid levels.
#[derive(Config, Debug)]
pub struct UpscalerConfig {
    pub kernel_size: usize,
    /// Spatial scale factor; the conv widens to 3·factor² channels
    #[config(default = 2)]
    pub factor:      usize,
}

impl UpscalerConfig {
    /// Build the channel-expanding convolution.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Upscaler<B> {
        let expanded = IMAGE_CHANNELS * self.factor * self.factor;
        Upscaler {
            conv:   same_conv([IMAGE_CHANNELS, expanded], self.kernel_size, device),
            factor: self.factor,
        }
    }
}

/// Learned upsampling of an RGB image by `factor`.
#[derive(Module, Debug)]
pub struct Upscaler<B: Backend> {
    pub conv:   Conv2d<B>,
    /// Plain constant, not a parameter
    pub factor: usize,
}

impl<B: Backend> Upscaler<B> {
    /// x: [batch, 3, H, W] → [batch, 3, H*factor, W*factor]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        pixel_shuffle(self.conv.forward(x), self.factor)
    }
}

/// Rearranges channel depth into space:
///   [B, C*r*r, H, W] → [B, C, H*r, W*r]
/// with out[b, c, h*r + i, w*r + j] = in[b, c*r*r + i*r + j, h, w].
///
/// Panics when the channel count is not divisible by r².
pub fn pixel_shuffle<B: Backend>(x: Tensor<B, 4>, factor: usize) -> Tensor<B, 4> {
    let [batch, channels, height, width] = x.dims();
    let factor_sq = factor * factor;
    assert_eq!(
        channels % factor_sq,
        0,
        "pixel shuffle: {channels} channels are not divisible by {factor}²"
    );
    let out_channels = channels / factor_sq;

    // [B, C, r, r, H, W] → [B, C, H, r, W, r]
    x.reshape([batch, out_channels, factor, factor, height, width])
        .permute([0, 1, 4, 2, 5, 3])
        .reshape([batch, out_channels, height * factor, width * factor])
}
