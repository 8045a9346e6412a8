// ============================================================
// Layer 5 — Review Session (save / load / infer)
// ============================================================
// Owns everything needed to serve the trained model:
// parameters, architecture, the text encoder, and a batcher.
// The platform calls it through the ModelSession trait.
//
// Training runs on an autodiff backend; inference goes through
// model.valid(), which drops gradient tracking, and runs with
// Mode::Eval so dropout never fires.

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::path::Path;

use crate::data::batcher::{ReviewBatcher, ReviewInput};
use crate::data::preprocessor::HangulEncoder;
use crate::domain::traits::{ModelSession, TextEncoder};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Mode, ModelConfig, RatingModel};
use crate::ml::objective::decode_ratings;

pub struct ReviewSession<B: AutodiffBackend> {
    model:   RatingModel<B>,
    config:  ModelConfig,
    encoder: HangulEncoder,
    batcher: ReviewBatcher<B::InnerBackend>,
    device:  B::Device,
}

impl<B: AutodiffBackend> ReviewSession<B> {
    /// Fresh, randomly initialised model.
    pub fn new(config: ModelConfig, device: B::Device) -> Self {
        let model   = config.init::<B>(&device);
        let encoder = HangulEncoder::new(config.grid_shape());
        let batcher = ReviewBatcher::new(device.clone(), config.grid_shape());
        Self { model, config, encoder, batcher, device }
    }

    pub fn model(&self) -> &RatingModel<B> { &self.model }

    pub fn set_model(&mut self, model: RatingModel<B>) { self.model = model; }

    pub fn config(&self) -> &ModelConfig { &self.config }

    pub fn encoder(&self) -> &HangulEncoder { &self.encoder }

    pub fn device(&self) -> &B::Device { &self.device }

    /// Ratings for raw review lines, forward-only.
    pub fn predict(&self, raw: &[String]) -> Result<Vec<u8>> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let encoded = raw.iter().map(|line| self.encoder.encode(line)).collect();
        let input: ReviewInput<B::InnerBackend> = self.batcher.batch(encoded);

        let scores = self.model.valid().forward(input, Mode::Eval);
        decode_ratings(scores)
    }
}

impl<B: AutodiffBackend> ModelSession for ReviewSession<B> {
    fn save(&self, dir: &Path) -> Result<()> {
        CheckpointManager::new(dir).save_model(&self.model, &self.config)
    }

    fn load(&mut self, dir: &Path) -> Result<()> {
        let manager = CheckpointManager::new(dir);
        let config  = manager.load_config()?;
        let model   = manager.load_model(config.init::<B>(&self.device), &self.device)?;

        self.encoder = HangulEncoder::new(config.grid_shape());
        self.batcher = ReviewBatcher::new(self.device.clone(), config.grid_shape());
        self.model   = model;
        self.config  = config;

        tracing::info!("Model loaded from '{}'", dir.display());
        Ok(())
    }

    fn infer(&self, raw: &[String]) -> Result<Vec<(f32, u8)>> {
        Ok(self.predict(raw)?.into_iter().map(|rating| (0.0, rating)).collect())
    }
}
