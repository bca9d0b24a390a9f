// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All model work is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `init`    — build fresh models and save a checkpoint
//   2. `summary` — parameter counts and predicted shapes
//   3. `probe`   — one forward pass on a synthetic image
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::prelude::Backend;
use clap::Parser;
use commands::{BackendChoice, Commands, InitArgs, ProbeArgs, SummaryArgs};

use crate::application::{
    init_use_case::InitUseCase,
    probe_use_case::{ModelSource, ProbeReport, ProbeUseCase},
    summary_use_case::{ArchitectureReport, SummaryUseCase},
};
use crate::ml::{gan::GanConfig, CpuBackend, GpuBackend};

#[derive(Parser, Debug)]
#[command(
    name = "pyramid-gan",
    version,
    about = "Build, inspect, and probe a multi-scale pyramid generator and its PatchGAN adversary."
)]
pub struct Cli {
    /// Tensor backend to run on
    #[arg(long, value_enum, global = true, default_value_t = BackendChoice::Ndarray)]
    pub backend: BackendChoice,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Pick the backend, then dispatch to the subcommand.
    pub fn run(self) -> Result<()> {
        match self.backend {
            BackendChoice::Ndarray => self.run_on::<CpuBackend>(&Default::default()),
            BackendChoice::Wgpu    => self.run_on::<GpuBackend>(&Default::default()),
        }
    }

    fn run_on<B: Backend>(self, device: &B::Device) -> Result<()> {
        tracing::info!("Using {:?} backend, device {:?}", self.backend, device);
        match self.command {
            Commands::Init(args)    => run_init::<B>(args, device),
            Commands::Summary(args) => run_summary::<B>(args, device),
            Commands::Probe(args)   => run_probe::<B>(args, device),
        }
    }
}

fn run_init<B: Backend>(args: InitArgs, device: &B::Device) -> Result<()> {
    let use_case  = InitUseCase::new(args.arch.into(), &args.checkpoint_dir);
    let summaries = use_case.execute::<B>(device)?;

    for s in &summaries {
        println!("{:<10} {:>12} params  {:>3} conv layers", s.name, s.params, s.conv_layers);
    }
    println!("Checkpoint saved to '{}'.", args.checkpoint_dir);
    Ok(())
}

fn run_summary<B: Backend>(args: SummaryArgs, device: &B::Device) -> Result<()> {
    let report = SummaryUseCase::new(args.arch.into(), args.image.into()).execute::<B>(device)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_architecture(&report);
    }
    Ok(())
}

fn run_probe<B: Backend>(args: ProbeArgs, device: &B::Device) -> Result<()> {
    let requested: GanConfig = args.arch.into();
    let source = if args.fresh {
        ModelSource::Fresh(requested.clone())
    } else {
        ModelSource::Checkpoint(args.checkpoint_dir.clone().into())
    };
    let report = ProbeUseCase::new(source, args.image.into(), args.seed).execute::<B>(device)?;

    // Architecture flags only take effect with --fresh
    if !args.fresh {
        let ignored = requested.differences(&report.config);
        if !ignored.is_empty() {
            tracing::warn!(
                "Architecture flags ignored without --fresh; checkpoint '{}' differs (flag -> saved): {}",
                args.checkpoint_dir,
                ignored.join(", ")
            );
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_probe(&report);
    }
    Ok(())
}

fn print_architecture(report: &ArchitectureReport) {
    let g = &report.config.generator;
    let a = &report.config.adversary;
    println!(
        "Generator: {} scales, {} resblocks, n_feats={}, kernel={}",
        g.n_scales, g.n_resblocks, g.n_feats, g.kernel_size
    );
    println!("  {} params, {} conv layers", report.generator.params, report.generator.conv_layers);
    for (level, shape) in report.pyramid.iter().enumerate() {
        println!("  level {level}: {shape}");
    }
    println!("Adversary: n_feats={}, kernel={}", a.n_feats, a.kernel_size);
    println!("  {} params, {} conv layers", report.adversary.params, report.adversary.conv_layers);
    println!("  score map: {}", report.score_map);
}

fn print_probe(report: &ProbeReport) {
    println!("Generator ({} params)", report.generator.params);
    for (level, (input, output)) in report
        .input_shapes
        .iter()
        .zip(&report.output_shapes)
        .enumerate()
    {
        println!("  level {level}: {input} -> {output}");
    }
    println!("Adversary ({} params)", report.adversary.params);
    println!(
        "  score map {} (expected {})",
        report.score_shape, report.expected_score_shape
    );
    println!(
        "  scores: mean={:.4} min={:.4} max={:.4}",
        report.score_mean, report.score_min, report.score_max
    );
}
