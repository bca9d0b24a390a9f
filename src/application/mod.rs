// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal per
// CLI command.
//
// Rules for this layer:
//   - No layer assembly or tensor math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 6)
//
// Every use case is generic over the Burn backend so the CLI
// can choose CPU or GPU at runtime.

/// Build fresh models and write a checkpoint
pub mod init_use_case;

/// Parameter counts and predicted shapes
pub mod summary_use_case;

/// One forward pass on a synthetic image
pub mod probe_use_case;
