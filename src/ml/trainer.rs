// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Step-driven train loop with periodic logging, held-out debug
// evaluation, reporting and checkpointing.
//
//   for epoch in 0..epochs:
//     shuffle
//     for batch in batch_loader(train, batch):
//       forward + backward + Adam update          (step += 1)
//       step % log_freq   == 0 → print batch acc / mse
//       step % debug_freq == 0 → full debug pass  (if --debug)
//       step % log_freq   == 0 → report + save checkpoint
//
// All counters live in TrainState, so the decision logic can be
// tested without a tensor engine. best_ema is not an average:
// it is the lowest summed debug loss seen so far.
//
// Key Burn insight:
//   - Training uses the autodiff backend for gradients
//   - model.valid() returns the model on the inner backend,
//     and the debug batcher must use that backend too
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::time::Instant;

use crate::data::batcher::{batch_count, batch_loader, ReviewBatcher};
use crate::data::dataset::MovieReviewDataset;
use crate::domain::report::StepReport;
use crate::domain::review::Review;
use crate::domain::traits::Platform;
use crate::ml::model::{Mode, RatingModel};
use crate::ml::objective::{decode_ratings, mse_loss, one_hot_targets, BatchMetrics, LabelEncoding};
use crate::ml::session::ReviewSession;

/// Starting value of `best_ema`; any real debug loss beats it.
pub const INITIAL_BEST_EMA: f64 = 99_999.0;

// ─── TrainState ───────────────────────────────────────────────────────────────
/// Everything the loop mutates between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainState {
    pub epoch:      usize,
    /// Global step, never reset
    pub step:       usize,
    /// Lowest summed debug loss so far
    pub best_ema:   f64,
    /// Running sums for the current epoch
    pub epoch_loss: f64,
    pub epoch_acc:  f64,
}

impl Default for TrainState {
    fn default() -> Self {
        Self { epoch: 0, step: 0, best_ema: INITIAL_BEST_EMA, epoch_loss: 0.0, epoch_acc: 0.0 }
    }
}

impl TrainState {
    pub fn new() -> Self { Self::default() }

    /// Continue the global step count of a run saved at `step`, so new
    /// checkpoints land after the ones already on disk.
    pub fn resume(step: usize) -> Self {
        Self { step, ..Self::default() }
    }

    pub fn begin_epoch(&mut self, epoch: usize) {
        self.epoch      = epoch;
        self.epoch_loss = 0.0;
        self.epoch_acc  = 0.0;
    }

    /// Account for one optimizer step; returns the new global step.
    pub fn record_step(&mut self, metrics: &BatchMetrics) -> usize {
        self.step       += 1;
        self.epoch_loss += metrics.loss;
        self.epoch_acc  += metrics.accuracy;
        self.step
    }

    /// Keep `debug_loss` if it is strictly lower than the best so far.
    pub fn record_debug_loss(&mut self, debug_loss: f64) -> bool {
        if debug_loss < self.best_ema {
            self.best_ema = debug_loss;
            true
        } else {
            false
        }
    }

    /// Platform record: running loss over the epoch's full batch count.
    pub fn report(&self, epoch_total: usize, batches_per_epoch: usize) -> StepReport {
        StepReport {
            epoch:       self.epoch,
            epoch_total,
            step:        self.step,
            train_loss:  self.epoch_loss / batches_per_epoch.max(1) as f64,
        }
    }
}

// ─── Schedule ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub log_freq:   usize,
    pub debug_freq: usize,
    /// Debug evaluation only runs when enabled
    pub debug:      bool,
}

impl Schedule {
    pub fn is_log_step(&self, step: usize) -> bool {
        step % self.log_freq == 0
    }

    pub fn is_debug_step(&self, step: usize) -> bool {
        self.debug && step % self.debug_freq == 0
    }
}

/// Loop settings that are not part of the model architecture.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub label_encoding: LabelEncoding,
    pub schedule:       Schedule,
}

// ─── Debug evaluation ─────────────────────────────────────────────────────────
/// Result of one forward-only pass over the debug set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSummary {
    /// Summed over batches, compared against best_ema
    pub loss:     f64,
    /// Averaged over batches
    pub accuracy: f64,
    pub mse:      f64,
}

pub fn evaluate<B: Backend>(
    model:      &RatingModel<B>,
    batcher:    &ReviewBatcher<B>,
    reviews:    &[Review],
    batch_size: usize,
    encoding:   LabelEncoding,
) -> Result<DebugSummary> {
    let batches = batch_count(reviews.len(), batch_size);
    if batches == 0 {
        bail!("Debug set is empty");
    }

    let mut summary = DebugSummary { loss: 0.0, accuracy: 0.0, mse: 0.0 };
    for chunk in batch_loader(reviews, batch_size) {
        let batch   = batcher.batch(chunk.to_vec());
        let scores  = model.forward(batch.input, Mode::Eval);
        let targets = one_hot_targets::<B>(&batch.ratings, encoding, &batcher.device);

        let loss: f64 = mse_loss(scores.clone(), targets).into_scalar().elem::<f64>();
        let predicted = decode_ratings(scores)?;
        let metrics   = BatchMetrics::from_predictions(loss, &predicted, &batch.ratings);

        summary.loss     += metrics.loss;
        summary.accuracy += metrics.accuracy;
        summary.mse      += metrics.mse;
    }

    summary.accuracy /= batches as f64;
    summary.mse      /= batches as f64;
    Ok(summary)
}

// ─── Train loop ───────────────────────────────────────────────────────────────
pub fn run_training<B: AutodiffBackend>(
    session:  &mut ReviewSession<B>,
    train:    &mut MovieReviewDataset,
    debugset: Option<&MovieReviewDataset>,
    opts:     &TrainOptions,
    mut state: TrainState,
    platform: &mut dyn Platform,
) -> Result<TrainState> {
    let schedule = opts.schedule;
    if schedule.debug && debugset.is_none() {
        bail!("Debug evaluation is enabled but no debug set was loaded");
    }

    let device        = session.device().clone();
    let shape         = session.config().grid_shape();
    let train_batcher = ReviewBatcher::<B>::new(device.clone(), shape);
    let debug_batcher = ReviewBatcher::<B::InnerBackend>::new(device.clone(), shape);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().init();

    let batches_per_epoch = batch_count(train.as_slice().len(), opts.batch_size);
    tracing::info!(
        "Training {} reviews for {} epochs ({} batches per epoch)",
        train.as_slice().len(), opts.epochs, batches_per_epoch
    );

    if state.step > 0 {
        tracing::info!("Continuing from step {}", state.step);
    }
    let mut started = Instant::now();

    for epoch in 0..opts.epochs {
        state.begin_epoch(epoch);
        train.shuffle_dataset();

        for chunk in batch_loader(train.as_slice(), opts.batch_size) {
            let batch = train_batcher.batch(chunk.to_vec());
            let model = session.model().clone();

            let scores  = model.forward(batch.input, Mode::Train);
            let targets = one_hot_targets::<B>(&batch.ratings, opts.label_encoding, &device);
            let loss    = mse_loss(scores.clone(), targets);

            let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();
            let predicted       = decode_ratings(scores)?;

            // Backward pass + Adam update
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            session.set_model(optim.step(opts.lr, model, grads));

            let metrics = BatchMetrics::from_predictions(loss_value, &predicted, &batch.ratings);
            let step    = state.record_step(&metrics);
            let do_log  = schedule.is_log_step(step);

            if do_log {
                println!(
                    "{} epoch , {} step | batch_acc: {:.6} , batch_mse: {:.6} (took {} sec for {} step)",
                    epoch, step, metrics.accuracy, metrics.mse,
                    started.elapsed().as_secs(), schedule.log_freq,
                );
            }

            if let Some(debugset) = debugset.filter(|_| schedule.is_debug_step(step)) {
                tracing::info!("debug start ....");
                let summary = evaluate(
                    &session.model().valid(),
                    &debug_batcher,
                    debugset.as_slice(),
                    opts.batch_size,
                    opts.label_encoding,
                )?;

                let mut line = format!(" ---[DEBUG] acc: {:.6} , mse: {:.6}", summary.accuracy, summary.mse);
                if state.record_debug_loss(summary.loss) {
                    line.push_str(&format!(" (got best ema! : {:.4})", summary.loss));
                }
                println!("{line}");
            }

            if do_log {
                platform.report(&state.report(opts.epochs, batches_per_epoch))?;
                platform.save(&*session, step)?;
                started = Instant::now();
            }
        }

        tracing::debug!(
            "Epoch {} done: mean loss {:.6}, mean acc {:.4}",
            epoch,
            state.epoch_loss / batches_per_epoch.max(1) as f64,
            state.epoch_acc / batches_per_epoch.max(1) as f64,
        );
    }

    tracing::info!("Training complete! best_ema={:.4}", state.best_ema);
    Ok(state)
}
