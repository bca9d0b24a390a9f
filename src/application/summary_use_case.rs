// ============================================================
// Layer 2 — SummaryUseCase
// ============================================================
// Describes an architecture without running it: parameter
// counts from freshly built modules, plus the pyramid and
// score-map shapes predicted by the domain layer for a
// given finest image size.

use anyhow::Result;
use burn::prelude::*;
use serde::Serialize;

use crate::domain::{
    layout::adversary_output_shape,
    shape::{pyramid_shapes, ImageShape},
};
use crate::ml::gan::{GanConfig, ModelSummary};

#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureReport {
    pub config:    GanConfig,
    pub generator: ModelSummary,
    pub adversary: ModelSummary,
    /// Generator input/output shapes, coarsest first
    pub pyramid:   Vec<ImageShape>,
    /// Adversary output for the finest level
    pub score_map: ImageShape,
}

pub struct SummaryUseCase {
    config: GanConfig,
    image:  ImageShape,
}

impl SummaryUseCase {
    pub fn new(config: GanConfig, image: ImageShape) -> Self {
        Self { config, image }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ArchitectureReport> {
        let cfg = &self.config;
        cfg.check()?;

        let pyramid   = pyramid_shapes(self.image, cfg.generator.n_scales)?;
        let score_map = adversary_output_shape(
            self.image,
            cfg.adversary.n_feats,
            cfg.adversary.kernel_size,
        )?;

        let generator = cfg.init_generator::<B>(device).summary();
        let adversary = cfg.init_adversary::<B>(device).summary();
        tracing::debug!("Generator {:?}, adversary {:?}", generator, adversary);

        Ok(ArchitectureReport {
            config: cfg.clone(),
            generator,
            adversary,
            pyramid,
            score_map,
        })
    }
}
