// ============================================================
// Layer 3 — Adversary Layout
// ============================================================
// The adversary is a fixed stack of strided convolutions.
// Its topology is written down once, here, as a table of
// ConvStage descriptors:
//
//   - Layer 5 (ml/adversary.rs) builds Burn Conv2d modules
//     from this table
//   - the shape helpers below walk the same table to predict
//     the score map size without running the network
//
// Channel widths grow from n_feats/2 to n_feats*8 while the
// spatial size shrinks by the stride sequence 2, 2, 4, 4, 4
// (a total factor of 256). A final 1x1 conv maps to a single
// score channel: one real/fake score per image patch.
//
// Reference: Isola et al. (2017) Image-to-Image Translation
//            with Conditional Adversarial Networks (PatchGAN)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::shape::{ImageShape, IMAGE_CHANNELS};

/// Kernel size of the last downsampling convolution.
pub const FINAL_DOWNSAMPLE_KERNEL: usize = 4;

/// One convolution in a fixed sequential stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvStage {
    pub in_channels:  usize,
    pub out_channels: usize,
    pub kernel:       usize,
    pub stride:       usize,
    pub padding:      usize,
    /// Followed by a LeakyReLU
    pub activated:    bool,
}

impl ConvStage {
    fn padded(in_channels: usize, out_channels: usize, kernel: usize, stride: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel,
            stride,
            padding: (kernel.saturating_sub(1)) / 2,
            activated: true,
        }
    }

    /// Output length along one spatial axis:
    ///   floor((len + 2*padding - kernel) / stride) + 1
    ///
    /// `None` when the padded input is shorter than the kernel.
    pub fn output_len(&self, len: usize) -> Option<usize> {
        let padded = len + 2 * self.padding;
        if padded < self.kernel || self.stride == 0 {
            return None;
        }
        Some((padded - self.kernel) / self.stride + 1)
    }
}

/// The adversary's downsampling stages, each followed by a LeakyReLU.
pub fn adversary_body_stages(n_feats: usize, kernel_size: usize) -> Vec<ConvStage> {
    let half = n_feats / 2;
    let k    = kernel_size;

    vec![
        ConvStage::padded(IMAGE_CHANNELS, half,        k, 1),
        ConvStage::padded(half,           half,        k, 2),
        ConvStage::padded(half,           n_feats,     k, 1),
        ConvStage::padded(n_feats,        n_feats,     k, 2),
        ConvStage::padded(n_feats,        n_feats * 2, k, 1),
        ConvStage::padded(n_feats * 2,    n_feats * 2, k, 4),
        ConvStage::padded(n_feats * 2,    n_feats * 4, k, 1),
        ConvStage::padded(n_feats * 4,    n_feats * 4, k, 4),
        ConvStage::padded(n_feats * 4,    n_feats * 8, k, 1),
        ConvStage {
            in_channels:  n_feats * 8,
            out_channels: n_feats * 8,
            kernel:       FINAL_DOWNSAMPLE_KERNEL,
            stride:       FINAL_DOWNSAMPLE_KERNEL,
            padding:      0,
            activated:    true,
        },
    ]
}

/// The 1x1 score head, no activation.
pub fn adversary_head_stage(n_feats: usize) -> ConvStage {
    ConvStage {
        in_channels:  n_feats * 8,
        out_channels: 1,
        kernel:       1,
        stride:       1,
        padding:      0,
        activated:    false,
    }
}

/// All adversary stages, input to output.
pub fn adversary_stages(n_feats: usize, kernel_size: usize) -> Vec<ConvStage> {
    let mut stages = adversary_body_stages(n_feats, kernel_size);
    stages.push(adversary_head_stage(n_feats));
    stages
}

/// Shape of the score map the adversary produces for `input`.
pub fn adversary_output_shape(
    input:       ImageShape,
    n_feats:     usize,
    kernel_size: usize,
) -> Result<ImageShape> {
    let mut shape = input;

    for (index, stage) in adversary_stages(n_feats, kernel_size).iter().enumerate() {
        let (Some(height), Some(width)) = (stage.output_len(shape.height), stage.output_len(shape.width))
        else {
            bail!(
                "input {} is too small for the adversary: stage {} ({}x{} kernel, stride {}) \
                 receives {}x{}",
                input,
                index + 1,
                stage.kernel,
                stage.kernel,
                stage.stride,
                shape.height,
                shape.width,
            );
        };
        shape = ImageShape::new(shape.batch, stage.out_channels, height, width);
    }

    Ok(shape)
}

/// Total spatial reduction of the adversary (product of all strides).
pub fn adversary_total_stride(n_feats: usize, kernel_size: usize) -> usize {
    adversary_stages(n_feats, kernel_size)
        .iter()
        .map(|s| s.stride)
        .product()
}
