// ============================================================
// Layer 5 — GAN Configuration
// ============================================================
// Bundles the generator and adversary hyperparameters so the
// pair can be built, checked, and saved as a single JSON file.

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::Serialize;

use crate::ml::adversary::{Adversary, AdversaryConfig};
use crate::ml::generator::{Generator, GeneratorConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct GanConfig {
    pub generator: GeneratorConfig,
    pub adversary: AdversaryConfig,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self::new(GeneratorConfig::new(), AdversaryConfig::new())
    }
}

impl GanConfig {
    /// Reject hyperparameters the networks cannot be built with.
    pub fn check(&self) -> Result<()> {
        self.generator.check().context("invalid generator config")?;
        self.adversary.check().context("invalid adversary config")?;
        Ok(())
    }

    /// Names of the hyperparameters that differ from `other`, each as
    /// `name: self -> other`. Empty when both build the same networks.
    pub fn differences(&self, other: &GanConfig) -> Vec<String> {
        let (g, og) = (&self.generator, &other.generator);
        let (a, oa) = (&self.adversary, &other.adversary);
        let fields = [
            ("n_resblocks",     g.n_resblocks, og.n_resblocks),
            ("n_feats",         g.n_feats,     og.n_feats),
            ("kernel_size",     g.kernel_size, og.kernel_size),
            ("n_scales",        g.n_scales,    og.n_scales),
            ("adv_n_feats",     a.n_feats,     oa.n_feats),
            ("adv_kernel_size", a.kernel_size, oa.kernel_size),
        ];

        let mut diffs: Vec<String> = fields
            .iter()
            .filter(|(_, mine, theirs)| mine != theirs)
            .map(|(name, mine, theirs)| format!("{name}: {mine} -> {theirs}"))
            .collect();
        if a.negative_slope != oa.negative_slope {
            diffs.push(format!("negative_slope: {} -> {}", a.negative_slope, oa.negative_slope));
        }
        diffs
    }

    /// Build a generator with fresh weights.
    pub fn init_generator<B: Backend>(&self, device: &B::Device) -> Generator<B> {
        self.generator.init(device)
    }

    /// Build an adversary with fresh weights.
    pub fn init_adversary<B: Backend>(&self, device: &B::Device) -> Adversary<B> {
        self.adversary.init(device)
    }
}

/// Size figures of a built model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name:        &'static str,
    pub params:      usize,
    pub conv_layers: usize,
}
