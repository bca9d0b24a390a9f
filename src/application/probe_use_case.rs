// ============================================================
// Layer 2 — ProbeUseCase
// ============================================================
// Runs both networks once on a synthetic image to confirm that
// a configuration (or a saved checkpoint) is usable:
//
//   Step 1: Load models from a checkpoint or build fresh ones
//   Step 2: Predict pyramid and score-map shapes (Layer 3)
//   Step 3: Synthesise a seeded random image, build its pyramid
//   Step 4: Generator over the pyramid
//   Step 5: Adversary over the finest generated level
//   Step 6: Compare measured shapes against the predictions
//
// The image is uniform noise in 0..=255, the pixel range the
// generator's bias centring expects.

use anyhow::{ensure, Result};
use burn::{prelude::*, tensor::TensorData};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::{
    layout::adversary_output_shape,
    shape::{pyramid_shapes, ImageShape},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    adversary::Adversary,
    gan::{GanConfig, ModelSummary},
    generator::Generator,
    pyramid::Pyramid,
};

/// Where the probed models come from.
pub enum ModelSource {
    /// A directory written by `init`
    Checkpoint(PathBuf),
    /// Freshly initialised weights
    Fresh(GanConfig),
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Hyperparameters the models were built from
    pub config:               GanConfig,
    pub generator:            ModelSummary,
    pub adversary:            ModelSummary,
    pub input_shapes:         Vec<ImageShape>,
    pub output_shapes:        Vec<ImageShape>,
    pub score_shape:          ImageShape,
    pub expected_score_shape: ImageShape,
    pub score_mean:           f32,
    pub score_min:            f32,
    pub score_max:            f32,
}

pub struct ProbeUseCase {
    source: ModelSource,
    image:  ImageShape,
    seed:   u64,
}

impl ProbeUseCase {
    pub fn new(source: ModelSource, image: ImageShape, seed: u64) -> Self {
        Self { source, image, seed }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ProbeReport> {
        // ── Step 1: Models ───────────────────────────────────────────────────
        let (cfg, generator, adversary) = self.load_models::<B>(device)?;

        // ── Step 2: Predicted shapes ─────────────────────────────────────────
        let expected_pyramid = pyramid_shapes(self.image, cfg.generator.n_scales)?;
        let expected_score_shape = adversary_output_shape(
            self.image,
            cfg.adversary.n_feats,
            cfg.adversary.kernel_size,
        )?;

        // ── Step 3: Synthetic input ──────────────────────────────────────────
        let image = synthetic_image::<B>(self.image, self.seed, device);
        let input = Pyramid::from_image(image, cfg.generator.n_scales)?;
        tracing::info!("Probing with a {}-level pyramid, finest {}", input.len(), self.image);

        // ── Steps 4–5: Forward passes ────────────────────────────────────────
        let output = generator.forward(&input);
        let scores = adversary.forward(output.finest().clone());

        // ── Step 6: Cross-check ──────────────────────────────────────────────
        let output_shapes = output.shapes();
        ensure!(
            output_shapes == expected_pyramid,
            "generator produced {:?}, expected {:?}",
            output_shapes,
            expected_pyramid,
        );
        let score_shape = ImageShape::from(scores.dims());
        ensure!(
            score_shape == expected_score_shape,
            "adversary produced {score_shape}, expected {expected_score_shape}"
        );

        let score_mean: f32 = scores.clone().mean().into_scalar().elem();
        let score_min:  f32 = scores.clone().min().into_scalar().elem();
        let score_max:  f32 = scores.max().into_scalar().elem();
        tracing::debug!("Scores: mean={:.4} min={:.4} max={:.4}", score_mean, score_min, score_max);

        Ok(ProbeReport {
            config: cfg,
            generator: generator.summary(),
            adversary: adversary.summary(),
            input_shapes: input.shapes(),
            output_shapes,
            score_shape,
            expected_score_shape,
            score_mean,
            score_min,
            score_max,
        })
    }

    fn load_models<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<(GanConfig, Generator<B>, Adversary<B>)> {
        match &self.source {
            ModelSource::Checkpoint(dir) => {
                let ckpt = CheckpointManager::new(dir);
                let cfg  = ckpt.load_config()?;
                cfg.check()?;
                Ok((cfg, ckpt.load_generator(device)?, ckpt.load_adversary(device)?))
            }
            ModelSource::Fresh(cfg) => {
                cfg.check()?;
                Ok((cfg.clone(), cfg.init_generator(device), cfg.init_adversary(device)))
            }
        }
    }
}

/// Uniform noise in 0..=255 with the given shape, reproducible from `seed`.
fn synthetic_image<B: Backend>(shape: ImageShape, seed: u64, device: &B::Device) -> Tensor<B, 4> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len     = shape.batch * shape.channels * shape.height * shape.width;
    let values: Vec<f32> = (0..len).map(|_| rng.gen_range(0.0..=255.0)).collect();

    Tensor::from_data(TensorData::new(values, shape.dims()), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init_use_case::InitUseCase;
    use crate::ml::{adversary::AdversaryConfig, generator::GeneratorConfig, CpuBackend};

    fn tiny_config() -> GanConfig {
        GanConfig::new(
            GeneratorConfig::new()
                .with_n_resblocks(1)
                .with_n_feats(4)
                .with_kernel_size(3)
                .with_n_scales(3),
            AdversaryConfig::new().with_n_feats(2).with_kernel_size(3),
        )
    }

    #[test]
    fn test_probe_fresh_models() {
        let report = ProbeUseCase::new(
            ModelSource::Fresh(tiny_config()),
            ImageShape::rgb(1, 256, 256),
            7,
        )
        .execute::<CpuBackend>(&Default::default())
        .unwrap();

        assert_eq!(report.input_shapes, report.output_shapes);
        assert_eq!(report.output_shapes[0], ImageShape::rgb(1, 64, 64));
        assert_eq!(report.score_shape, ImageShape::new(1, 1, 1, 1));
        assert_eq!(report.score_mean, report.score_min);
        assert_eq!(report.score_min, report.score_max);
    }

    #[test]
    fn test_probe_checkpoint_written_by_init() {
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();

        let summaries = InitUseCase::new(tiny_config(), dir.path())
            .execute::<CpuBackend>(&device)
            .unwrap();
        assert_eq!(summaries.len(), 2);

        let report = ProbeUseCase::new(
            ModelSource::Checkpoint(dir.path().to_path_buf()),
            ImageShape::rgb(2, 256, 512),
            1,
        )
        .execute::<CpuBackend>(&device)
        .unwrap();

        assert!(report.config.differences(&tiny_config()).is_empty());
        assert_eq!(report.generator, summaries[0]);
        assert_eq!(report.adversary, summaries[1]);
        assert_eq!(report.score_shape, ImageShape::new(2, 1, 1, 2));
        assert!(report.score_min <= report.score_mean && report.score_mean <= report.score_max);
    }

    #[test]
    fn test_synthetic_image_is_seeded() {
        let device = Default::default();
        let shape  = ImageShape::rgb(1, 4, 4);
        let a = synthetic_image::<CpuBackend>(shape, 3, &device).into_data().to_vec::<f32>().unwrap();
        let b = synthetic_image::<CpuBackend>(shape, 3, &device).into_data().to_vec::<f32>().unwrap();
        let c = synthetic_image::<CpuBackend>(shape, 4, &device).into_data().to_vec::<f32>().unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_indivisible_image_is_rejected() {
        let result = ProbeUseCase::new(
            ModelSource::Fresh(tiny_config()),
            ImageShape::rgb(1, 258, 256),
            0,
        )
        .execute::<CpuBackend>(&Default::default());
        assert!(result.is_err());
    }
}
