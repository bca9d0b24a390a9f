// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `init`, `summary`, `probe`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::domain::shape::ImageShape;
use crate::ml::{adversary::AdversaryConfig, gan::GanConfig, generator::GeneratorConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build fresh models and save them as a checkpoint
    Init(InitArgs),

    /// Print parameter counts and predicted tensor shapes
    Summary(SummaryArgs),

    /// Run both networks once on a synthetic image
    Probe(ProbeArgs),
}

/// Tensor backend the models run on
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendChoice {
    /// CPU through ndarray
    #[default]
    Ndarray,
    /// GPU through WebGPU
    Wgpu,
}

/// Network hyperparameters shared by all commands.
/// `probe` only uses them together with `--fresh`; otherwise the
/// checkpoint's own config wins.
#[derive(Args, Debug, Clone)]
pub struct ArchArgs {
    /// Residual blocks in every generator scale body
    #[arg(long, default_value_t = 19)]
    pub n_resblocks: usize,

    /// Feature width inside the generator scale bodies
    #[arg(long, default_value_t = 64)]
    pub n_feats: usize,

    /// Generator convolution kernel size (odd)
    #[arg(long, default_value_t = 5)]
    pub kernel_size: usize,

    /// Pyramid levels the generator works on
    #[arg(long, default_value_t = 3)]
    pub n_scales: usize,

    /// Adversary base width; channels grow from n/2 to 8n
    #[arg(long, default_value_t = 64)]
    pub adv_n_feats: usize,

    /// Adversary convolution kernel size (odd)
    #[arg(long, default_value_t = 5)]
    pub adv_kernel_size: usize,
}

/// Convert CLI ArchArgs into the model-layer GanConfig.
/// The model layer never sees clap types.
impl From<ArchArgs> for GanConfig {
    fn from(a: ArchArgs) -> Self {
        GanConfig::new(
            GeneratorConfig::new()
                .with_n_resblocks(a.n_resblocks)
                .with_n_feats(a.n_feats)
                .with_kernel_size(a.kernel_size)
                .with_n_scales(a.n_scales),
            AdversaryConfig::new()
                .with_n_feats(a.adv_n_feats)
                .with_kernel_size(a.adv_kernel_size),
        )
    }
}

/// Size of the finest pyramid level.
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    #[arg(long, default_value_t = 1)]
    pub batch: usize,

    #[arg(long, default_value_t = 256)]
    pub height: usize,

    #[arg(long, default_value_t = 256)]
    pub width: usize,
}

impl From<ImageArgs> for ImageShape {
    fn from(a: ImageArgs) -> Self {
        ImageShape::rgb(a.batch, a.height, a.width)
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub arch: ArchArgs,

    /// Directory to write the config and weights to
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub arch: ArchArgs,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub arch: ArchArgs,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Checkpoint directory written by `init`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Ignore the checkpoint and build fresh models from the architecture flags
    #[arg(long)]
    pub fresh: bool,

    /// Seed of the synthetic input image
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
