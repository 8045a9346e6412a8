// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the configuration
//   Step 2: Build the session             (Layer 5 - ml)
//   Step 3: Resume from a checkpoint      (Layer 6 - infra)
//   Step 4: Resolve the dataset root      (debug / test / DATASET_PATH)
//   Step 5: Load and encode reviews       (Layer 4 - data)
//   Step 6: Load the debug set if needed  (Layer 4 - data)
//   Step 7: Run the training loop         (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use burn::backend::{wgpu::WgpuDevice, Autodiff, Wgpu};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{dataset::MovieReviewDataset, loader::ReviewLoader};
use crate::domain::traits::ModelSession;
use crate::infra::platform::LocalPlatform;
use crate::ml::{
    model::ModelConfig,
    objective::LabelEncoding,
    session::ReviewSession,
    trainer::{run_training, Schedule, TrainOptions, TrainState},
};

pub type TrainBackend = Autodiff<Wgpu>;

pub const DEBUG_TRAIN_PATH: &str = "../sample_data/movie/debug_1";
pub const TEST_TRAIN_PATH:  &str = "../sample_data/movie/debug_2";
pub const DEBUG_EVAL_PATH:  &str = "../sample_data/movie/debug_3";

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs, independent of clap.
// Serialisable so a run's settings can be dumped next to its checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:        String,
    pub checkpoint_dir:      String,
    pub pause:               u32,
    pub iteration:           String,
    /// Accepted for compatibility, never read
    pub threshold:           f64,
    pub epochs:              usize,
    pub batch:               usize,
    /// Accepted for compatibility, never read
    pub strmaxlen:           usize,
    /// Accepted for compatibility, never read
    pub embedding:           usize,
    pub lr:                  f64,
    pub keep_prob:           f64,
    pub log_freq:            usize,
    pub debug:               bool,
    pub debug_freq:          usize,
    pub test:                bool,
    pub n_units:             usize,
    pub max_sentence_length: usize,
    pub max_word_length:     usize,
    pub word_dim:            usize,
    pub char_dim:            usize,
    pub syll_dim:            usize,
    pub rnn_dim:             usize,
    pub max_syll_num:        usize,
    pub syll_filter_size:    usize,
    pub cell_stack_count:    usize,
    pub label_encoding:      LabelEncoding,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:        ".".to_string(),
            checkpoint_dir:      "checkpoints".to_string(),
            pause:               0,
            iteration:           "0".to_string(),
            threshold:           0.5,
            epochs:              40,
            batch:               800,
            strmaxlen:           400,
            embedding:           100,
            lr:                  0.001,
            keep_prob:           0.8,
            log_freq:            30,
            debug:               false,
            debug_freq:          100,
            test:                false,
            n_units:             10,
            max_sentence_length: 30,
            max_word_length:     20,
            word_dim:            100,
            char_dim:            100,
            syll_dim:            100,
            rnn_dim:             100,
            max_syll_num:        20,
            syll_filter_size:    3,
            cell_stack_count:    3,
            label_encoding:      LabelEncoding::default(),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("batch", self.batch),
            ("log_freq", self.log_freq),
            ("debug_freq", self.debug_freq),
            ("cell_stack_count", self.cell_stack_count),
            ("n_units", self.n_units),
            ("rnn_dim", self.rnn_dim),
            ("max_sentence_length", self.max_sentence_length),
            ("max_word_length", self.max_word_length),
            ("max_syll_num", self.max_syll_num),
        ];
        for (name, value) in positive {
            if value == 0 {
                bail!("{name} must be greater than 0");
            }
        }
        if self.syll_filter_size % 2 == 0 {
            bail!("syll_filter_size must be odd, got {}", self.syll_filter_size);
        }
        if !(self.keep_prob > 0.0 && self.keep_prob <= 1.0) {
            bail!("keep_prob must lie in (0, 1], got {}", self.keep_prob);
        }
        Ok(())
    }

    /// Any non-zero `pause` resumes from the latest checkpoint.
    pub fn resumes(&self) -> bool {
        self.pause != 0
    }

    /// Dataset root for this run: the sample sets win over DATASET_PATH.
    pub fn train_root(&self) -> PathBuf {
        if self.debug {
            PathBuf::from(DEBUG_TRAIN_PATH)
        } else if self.test {
            PathBuf::from(TEST_TRAIN_PATH)
        } else {
            PathBuf::from(&self.dataset_path)
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(
            self.max_sentence_length,
            self.max_word_length,
            self.max_syll_num,
            self.word_dim,
            self.char_dim,
            self.syll_dim,
            self.n_units,
            self.rnn_dim,
            self.syll_filter_size,
            self.cell_stack_count,
        )
        .with_dropout(1.0 - self.keep_prob)
    }

    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            epochs:         self.epochs,
            batch_size:     self.batch,
            lr:             self.lr,
            label_encoding: self.label_encoding,
            schedule:       Schedule {
                log_freq:   self.log_freq,
                debug_freq: self.debug_freq,
                debug:      self.debug,
            },
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Session and platform ─────────────────────────────────────────────
        let device       = WgpuDevice::default();
        let mut session  = ReviewSession::<TrainBackend>::new(cfg.model_config(), device);
        let mut platform = LocalPlatform::new(&cfg.checkpoint_dir)?;

        // A resumed session keeps the architecture it was saved with
        let start = if cfg.resumes() {
            resume_latest(&mut session, &platform)?
        } else {
            TrainState::new()
        };
        let encoder = session.encoder().clone();

        // ── Training data ────────────────────────────────────────────────────
        let root = cfg.train_root();
        tracing::info!("Loading training data from '{}'", root.display());
        let raw = ReviewLoader::new(&root).load_all()?;
        let mut train = MovieReviewDataset::new(raw, &encoder);

        // ── Debug set ────────────────────────────────────────────────────────
        let debugset = if cfg.debug {
            tracing::info!("Loading debug set from '{}'", DEBUG_EVAL_PATH);
            let raw = ReviewLoader::new(DEBUG_EVAL_PATH).load_all()?;
            Some(MovieReviewDataset::new(raw, &encoder))
        } else {
            None
        };

        let state = run_training(
            &mut session,
            &mut train,
            debugset.as_ref(),
            &cfg.train_options(),
            start,
            &mut platform,
        )?;
        tracing::info!(
            "Training finished after {} steps (best debug loss {:.4})",
            state.step,
            state.best_ema
        );
        Ok(())
    }
}

/// Load the newest checkpoint under the platform root into `session` and
/// return a state whose step count carries on from it.
pub fn resume_latest<B: AutodiffBackend>(
    session:  &mut ReviewSession<B>,
    platform: &LocalPlatform,
) -> Result<TrainState> {
    let (step, dir) = platform
        .latest_step()?
        .with_context(|| format!("No checkpoint! (nothing to resume under '{}')", platform.root().display()))?;
    session.load(&dir)?;
    tracing::info!("Resumed from '{}' at step {}", dir.display(), step);
    Ok(TrainState::resume(step))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    use burn::backend::NdArray;

    use crate::data::preprocessor::HangulEncoder;
    use crate::domain::review::RawReview;
    use crate::ml::model::tests::tiny_config;

    type B = Autodiff<NdArray>;

    fn reviews(encoder: &HangulEncoder, n: usize) -> MovieReviewDataset {
        let raw = (0..n)
            .map(|i| RawReview::new(format!("다시 볼 영화 {i}"), (i % 10) as u8 + 1))
            .collect();
        MovieReviewDataset::new(raw, encoder)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let even = TrainConfig { syll_filter_size: 4, ..TrainConfig::default() };
        assert!(even.validate().is_err());

        let no_batch = TrainConfig { batch: 0, ..TrainConfig::default() };
        assert!(no_batch.validate().is_err());

        let keep_nothing = TrainConfig { keep_prob: 0.0, ..TrainConfig::default() };
        assert!(keep_nothing.validate().is_err());

        let keep_all = TrainConfig { keep_prob: 1.0, ..TrainConfig::default() };
        assert!(keep_all.validate().is_ok());
    }

    #[test]
    fn test_train_root_resolution() {
        let cfg = TrainConfig { dataset_path: "/data/movie".into(), ..TrainConfig::default() };
        assert_eq!(cfg.train_root(), PathBuf::from("/data/movie"));

        let test = TrainConfig { test: true, ..cfg.clone() };
        assert_eq!(test.train_root(), PathBuf::from(TEST_TRAIN_PATH));

        let debug = TrainConfig { debug: true, test: true, ..cfg };
        assert_eq!(debug.train_root(), PathBuf::from(DEBUG_TRAIN_PATH));
    }

    #[test]
    fn test_model_config_maps_fields() {
        let cfg = TrainConfig { keep_prob: 0.75, ..TrainConfig::default() };
        let model = cfg.model_config();

        assert_eq!(model.max_word_num, 30);
        assert_eq!(model.max_char_num, 20);
        assert_eq!(model.max_syll_num, 20);
        assert_eq!(model.rnn_dim, 100);
        assert_eq!(model.character_size, 252);
        assert_eq!(model.syllable_size, 11173);
        assert!((model.dropout - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_train_options_carry_schedule() {
        let cfg  = TrainConfig { debug: true, log_freq: 7, debug_freq: 9, ..TrainConfig::default() };
        let opts = cfg.train_options();

        assert_eq!(opts.batch_size, 800);
        assert_eq!(opts.epochs, 40);
        assert_eq!(opts.schedule, Schedule { log_freq: 7, debug_freq: 9, debug: true });
    }

    #[test]
    fn test_any_nonzero_pause_resumes() {
        assert!(!TrainConfig::default().resumes());
        assert!(TrainConfig { pause: 1, ..TrainConfig::default() }.resumes());
        assert!(TrainConfig { pause: 2, ..TrainConfig::default() }.resumes());
    }

    #[test]
    fn test_resumed_run_saves_after_previous_checkpoints() {
        let dir          = tempfile::tempdir().unwrap();
        let mut platform = LocalPlatform::new(dir.path()).unwrap();
        let opts = TrainOptions {
            epochs:         2,
            batch_size:     3,
            lr:             1e-3,
            label_encoding: LabelEncoding::Raw,
            schedule:       Schedule { log_freq: 2, debug_freq: 100, debug: false },
        };

        // First run: 7 reviews / batch 3 → 6 steps, saves at 2, 4, 6
        let mut first = ReviewSession::<B>::new(tiny_config(), Default::default());
        let mut train = reviews(first.encoder(), 7);
        run_training(&mut first, &mut train, None, &opts, TrainState::new(), &mut platform).unwrap();
        assert_eq!(platform.latest_checkpoint().unwrap(), Some(dir.path().join("6")));

        let mut resumed = ReviewSession::<B>::new(tiny_config(), Default::default());
        let start = resume_latest(&mut resumed, &platform).unwrap();
        assert_eq!(start.step, 6);

        let end = run_training(&mut resumed, &mut train, None, &opts, start, &mut platform).unwrap();
        assert_eq!(end.step, 12);
        assert_eq!(platform.latest_checkpoint().unwrap(), Some(dir.path().join("12")));
    }

    #[test]
    fn test_resume_without_checkpoint_fails() {
        let dir      = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path()).unwrap();
        let mut session = ReviewSession::<B>::new(tiny_config(), Default::default());

        let err = resume_latest(&mut session, &platform).unwrap_err();
        assert!(err.to_string().contains("No checkpoint!"));
    }
}
