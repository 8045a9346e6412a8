// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the numerical core and its collaborators:
//
//   TextEncoder  — turns raw review text into index grids.
//                  HangulEncoder (Layer 4) is the bundled one.
//
//   ModelSession — the trained model as the platform sees it:
//                  save / load / infer as plain methods on an
//                  object, instead of closures over local state.
//
//   Platform     — the hosting side: receives step reports and
//                  decides where session snapshots go.
//                  LocalPlatform (Layer 6) writes to disk.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Trait Objects)

use anyhow::Result;
use std::path::Path;

use crate::domain::report::StepReport;
use crate::domain::review::{EncodedText, GridShape};

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// Any component that can encode raw review text into the grids the model reads.
pub trait TextEncoder {
    /// Shape every encoded review is padded/truncated to
    fn shape(&self) -> GridShape;

    /// Encode one review. Must be deterministic: the same text always
    /// produces the same grids, in training and at inference.
    fn encode(&self, text: &str) -> EncodedText;
}

// ─── ModelSession ─────────────────────────────────────────────────────────────
/// The operations the hosting platform binds to.
pub trait ModelSession {
    /// Write a full parameter snapshot under `dir`
    fn save(&self, dir: &Path) -> Result<()>;

    /// Restore every parameter from the snapshot under `dir`.
    /// A directory without a checkpoint is an error.
    fn load(&mut self, dir: &Path) -> Result<()>;

    /// Predict a rating for each raw line.
    /// Returns `(0.0, rating)` pairs; the first element is a placeholder.
    fn infer(&self, raw: &[String]) -> Result<Vec<(f32, u8)>>;
}

// ─── Platform ─────────────────────────────────────────────────────────────────
/// The external platform driving a training run.
pub trait Platform {
    /// Receive aggregate training metrics
    fn report(&mut self, report: &StepReport) -> Result<()>;

    /// Persist the session under the platform's name for `checkpoint`
    fn save(&mut self, session: &dyn ModelSession, checkpoint: usize) -> Result<()>;
}
