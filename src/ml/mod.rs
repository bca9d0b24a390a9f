// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn module definitions.
// Layers 2 and 6 build, run, and persist these modules but
// never assemble layers themselves.
//
// What's in this layer:
//
//   blocks.rs    — ResBlock, ScaleBody, Upscaler, pixel shuffle
//   generator.rs — the multi-scale pyramid generator
//   adversary.rs — the PatchGAN critic
//   pyramid.rs   — validated image pyramids
//   gan.rs       — combined config and model summaries
//
// Every module is generic over `B: Backend`; the CLI picks
// one of the two backends below at runtime.
//
// Reference: Burn Book §3 (Building Blocks)

/// Residual blocks, scale bodies, and learned upsampling
pub mod blocks;

/// Coarse-to-fine generator
pub mod generator;

/// Patch-based discriminator
pub mod adversary;

/// Image pyramids (coarsest level first)
pub mod pyramid;

/// GanConfig and ModelSummary
pub mod gan;

/// CPU backend, also used by the unit tests
pub type CpuBackend = burn::backend::NdArray;

/// GPU backend through WebGPU
pub type GpuBackend = burn::backend::Wgpu;
