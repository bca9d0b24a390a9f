//! Multi-scale pyramid generator and PatchGAN adversary, built on Burn.
//!
//! The crate is split into layers:
//!
//!   - `cli`         — Layer 1, argument parsing and printing
//!   - `application` — Layer 2, one use case per command
//!   - `domain`      — Layer 3, backend-free shape arithmetic
//!   - `ml`          — Layer 5, the Burn modules
//!   - `infra`       — Layer 6, checkpoints on disk
//!
//! Training code can use the modules in [`ml`] directly:
//!
//! ```no_run
//! use burn::prelude::*;
//! use pyramid_gan::ml::{gan::GanConfig, pyramid::Pyramid, CpuBackend};
//!
//! let device = Default::default();
//! let cfg    = GanConfig::default();
//! let generator = cfg.init_generator::<CpuBackend>(&device);
//!
//! let image   = Tensor::<CpuBackend, 4>::zeros([1, 3, 256, 256], &device);
//! let pyramid = Pyramid::from_image(image, cfg.generator.n_scales).unwrap();
//! let restored = generator.forward(&pyramid);
//! assert_eq!(restored.shapes(), pyramid.shapes());
//! ```

#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ml;
