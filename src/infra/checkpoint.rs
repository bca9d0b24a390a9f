// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved:
//   1. gan_config.json   — generator + adversary hyperparameters
//   2. generator.mpk.gz  — generator weights
//   3. adversary.mpk.gz  — adversary weights
//
// Loading always rebuilds the module from gan_config.json
// first and then restores the weights into it, so weights can
// only land in the architecture they were saved from.
//
// Burn's CompactRecorder:
//   - Serialises module records to MessagePack
//   - Stores floats at half precision and gzips the result
//
// File layout:
//   checkpoints/
//     gan_config.json
//     generator.mpk.gz
//     adversary.mpk.gz
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{fs, path::PathBuf};

use crate::ml::adversary::Adversary;
use crate::ml::gan::GanConfig;
use crate::ml::generator::Generator;

const CONFIG_FILE: &str = "gan_config.json";
// The recorder appends its own extension (.mpk.gz)
const GENERATOR_FILE: &str = "generator";
const ADVERSARY_FILE: &str = "adversary";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Use `dir` for checkpoint files. Nothing is created until a save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the checkpoint files.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Create the checkpoint directory if it does not exist yet.
    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", self.dir.display())
        })
    }

    /// Write the hyperparameters as pretty JSON.
    pub fn save_config(&self, cfg: &GanConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved GAN config to '{}'", path.display());
        Ok(())
    }

    /// Read the hyperparameters saved by `save_config`.
    /// Errors name the file when it is missing or malformed.
    pub fn load_config(&self) -> Result<GanConfig> {
        let path = self.dir.join(CONFIG_FILE);

        // Step 1: Read the raw JSON

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Run 'init' to create a checkpoint first.",
                path.display()
            )
        })?;

        // Step 2: Parse it back into a GanConfig
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Record the generator weights to `generator.mpk.gz`.
    /// The config is saved separately with `save_config`.
    pub fn save_generator<B: Backend>(&self, model: &Generator<B>) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(GENERATOR_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save generator to '{}'", path.display()))?;

        tracing::debug!("Saved generator weights to '{}'", path.display());
        Ok(())
    }

    /// Record the adversary weights to `adversary.mpk.gz`.
    pub fn save_adversary<B: Backend>(&self, model: &Adversary<B>) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(ADVERSARY_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save adversary to '{}'", path.display()))?;

        tracing::debug!("Saved adversary weights to '{}'", path.display());
        Ok(())
    }

    /// Rebuild the generator from the saved config and restore its weights.
    pub fn load_generator<B: Backend>(&self, device: &B::Device) -> Result<Generator<B>> {
        // Step 1: Rebuild the architecture from gan_config.json
        let model = self.load_config()?.init_generator::<B>(device);
        let path  = self.dir.join(GENERATOR_FILE);

        // Step 2: Read the record and move it into the module
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load generator from '{}'", path.display()))?;

        tracing::info!("Loaded generator weights from '{}'", path.display());
        Ok(model.load_record(record))
    }

    /// Rebuild the adversary from the saved config and restore its weights.
    pub fn load_adversary<B: Backend>(&self, device: &B::Device) -> Result<Adversary<B>> {
        // Step 1: Rebuild the architecture from gan_config.json
        let model = self.load_config()?.init_adversary::<B>(device);
        let path  = self.dir.join(ADVERSARY_FILE);

        // Step 2: Read the record and move it into the module
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load adversary from '{}'", path.display()))?;

        tracing::info!("Loaded adversary weights from '{}'", path.display());
        Ok(model.load_record(record))
    }
}
