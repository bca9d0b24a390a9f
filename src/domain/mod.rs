// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and functions describing what the
// networks do to image shapes.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and arithmetic
//
// Both the CLI (`summary`) and the model builders in Layer 5
// read from here, so a shape printed by `summary` is the shape
// the network really produces.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Image and pyramid shapes
pub mod shape;

/// The adversary's fixed convolution table and its shape arithmetic
pub mod layout;
