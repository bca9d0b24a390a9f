// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Builds a fresh generator/adversary pair and writes it out as
// a checkpoint:
//
//   Step 1: Check hyperparameters   (Layer 5 - ml)
//   Step 2: Build both networks     (Layer 5 - ml)
//   Step 3: Save config + weights   (Layer 6 - infra)

use anyhow::Result;
use burn::prelude::*;
use std::path::PathBuf;

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::gan::{GanConfig, ModelSummary};

pub struct InitUseCase {
    config:         GanConfig,
    checkpoint_dir: PathBuf,
}

impl InitUseCase {
    pub fn new(config: GanConfig, checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self { config, checkpoint_dir: checkpoint_dir.into() }
    }

    /// Returns the summaries of the saved generator and adversary.
    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<Vec<ModelSummary>> {
        self.config.check()?;

        let generator = self.config.init_generator::<B>(device);
        let adversary = self.config.init_adversary::<B>(device);
        tracing::info!(
            "Built generator ({} scales) and adversary (n_feats={})",
            generator.n_scales(),
            self.config.adversary.n_feats,
        );

        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        ckpt.save_config(&self.config)?;
        ckpt.save_generator(&generator)?;
        ckpt.save_adversary(&adversary)?;
        tracing::info!("Checkpoint written to '{}'", ckpt.dir().display());

        Ok(vec![generator.summary(), adversary.summary()])
    }
}
