// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs — Saving and loading model weights
//                   One directory per snapshot: weights,
//                   architecture JSON, and a pointer file
//                   that marks the directory as complete.
//
//   metrics.rs    — Step report logging
//                   Appends every platform report to a CSV
//                   for later plotting.
//
//   platform.rs   — Local stand-in for the hosting platform
//                   Receives reports, stores snapshots per
//                   step, finds the latest one on resume.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Step report CSV logger
pub mod metrics;

/// Local implementation of the platform binding
pub mod platform;
