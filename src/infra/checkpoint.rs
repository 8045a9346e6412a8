// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores one model snapshot per directory using
// Burn's named MessagePack + gzip recorder.
//
// Layout of a checkpoint directory:
//   <dir>/
//     model.mpk.gz        ← all learned parameters
//     model_config.json   ← architecture, so load can rebuild it
//     checkpoint          ← pointer naming the weights file
//
// The pointer file is what makes a directory a checkpoint:
// load() reads it first, and a directory without one is a
// fatal "No checkpoint!" error. Saving writes the pointer
// last, so a half-written directory is never picked up.
//
// The recorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Keeps full f32 precision, so a restored model predicts
//     exactly what the saved one did
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::ml::model::{ModelConfig, RatingModel};

const POINTER_FILE: &str = "checkpoint";
const MODEL_FILE:   &str = "model";
const CONFIG_FILE:  &str = "model_config.json";

type CheckpointRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Contents of the pointer file
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointPointer {
    model_checkpoint_path: String,
}

/// Reads and writes the checkpoint stored in one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// True when the directory holds a checkpoint pointer.
    pub fn has_checkpoint(&self) -> bool {
        self.dir.join(POINTER_FILE).is_file()
    }

    /// Write weights, architecture and pointer.
    pub fn save_model<B: Backend>(&self, model: &RatingModel<B>, config: &ModelConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))?;

        // Recorder adds the .mpk.gz extension
        let path = self.dir.join(MODEL_FILE);
        CheckpointRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let config_path = self.dir.join(CONFIG_FILE);
        config
            .save(&config_path)
            .with_context(|| format!("Cannot write '{}'", config_path.display()))?;

        let pointer = CheckpointPointer { model_checkpoint_path: MODEL_FILE.to_string() };
        fs::write(self.dir.join(POINTER_FILE), serde_json::to_string(&pointer)?)
            .with_context(|| "Failed to write checkpoint pointer")?;

        tracing::debug!("Saved checkpoint to '{}'", self.dir.display());
        Ok(())
    }

    /// Architecture stored next to the weights.
    pub fn load_config(&self) -> Result<ModelConfig> {
        self.ensure_checkpoint()?;
        let path = self.dir.join(CONFIG_FILE);
        ModelConfig::load(&path)
            .map_err(|e| anyhow!("Cannot read model config '{}': {e:?}", path.display()))
    }

    /// Load the weights named by the pointer into `model`.
    /// `model` must have the checkpoint's architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  RatingModel<B>,
        device: &B::Device,
    ) -> Result<RatingModel<B>> {
        let pointer = self.ensure_checkpoint()?;
        let path    = self.dir.join(&pointer.model_checkpoint_path);

        let record = CheckpointRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    fn ensure_checkpoint(&self) -> Result<CheckpointPointer> {
        let path = self.dir.join(POINTER_FILE);
        if !path.is_file() {
            bail!("No checkpoint! ('{}' has no checkpoint pointer)", self.dir.display());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        Ok(serde_json::from_str(&text)?)
    }
}
