// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// One flat flag surface shared by both modes, so a checkpoint
// trained with some architecture flags can be tested locally
// with the same command line.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for bad values
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::ml::objective::LabelEncoding;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Train the model and save checkpoints
    Train,
    /// Restore a checkpoint and rate the local dataset
    #[value(name = "test_local")]
    TestLocal,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelEncodingArg {
    /// Slot = rating (rating 10 has no slot)
    Raw,
    /// Slot = rating - 1
    ZeroBased,
}

impl From<LabelEncodingArg> for LabelEncoding {
    fn from(arg: LabelEncodingArg) -> Self {
        match arg {
            LabelEncodingArg::Raw       => LabelEncoding::Raw,
            LabelEncodingArg::ZeroBased => LabelEncoding::ZeroBased,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t = Mode::Train)]
    pub mode: Mode,

    /// 1 = resume training from the latest checkpoint
    #[arg(long, default_value_t = 0)]
    pub pause: u32,

    /// Checkpoint to restore in test_local mode ("0" = latest)
    #[arg(long, default_value = "0")]
    pub iteration: String,

    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    #[arg(long, default_value_t = 40)]
    pub epochs: usize,

    /// Reviews per step
    #[arg(long, default_value_t = 800)]
    pub batch: usize,

    #[arg(long, default_value_t = 400)]
    pub strmaxlen: usize,

    #[arg(long, default_value_t = 100)]
    pub embedding: usize,

    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Probability of keeping an activation under dropout
    #[arg(long, default_value_t = 0.8)]
    pub keep_prob: f64,

    /// Steps between progress lines, reports and checkpoints
    #[arg(long, default_value_t = 30)]
    pub log_freq: usize,

    /// Evaluate on the held-out debug set every debug_freq steps
    #[arg(long)]
    pub debug: bool,

    #[arg(long, default_value_t = 100)]
    pub debug_freq: usize,

    /// Train on the small test sample instead of DATASET_PATH
    #[arg(long)]
    pub test: bool,

    #[arg(long, default_value_t = 10)]
    pub n_units: usize,

    /// Words kept per review
    #[arg(long, default_value_t = 30)]
    pub max_sentence_length: usize,

    /// Characters kept per word
    #[arg(long, default_value_t = 20)]
    pub max_word_length: usize,

    #[arg(long, default_value_t = 100)]
    pub word_dim: usize,

    #[arg(long, default_value_t = 100)]
    pub char_dim: usize,

    #[arg(long, default_value_t = 100)]
    pub syll_dim: usize,

    #[arg(long, default_value_t = 100)]
    pub rnn_dim: usize,

    /// Syllables kept per word
    #[arg(long, default_value_t = 20)]
    pub max_syll_num: usize,

    /// Kernel size of every convolution (odd)
    #[arg(long, default_value_t = 3)]
    pub syll_filter_size: usize,

    #[arg(long, default_value_t = 3)]
    pub cell_stack_count: usize,

    /// Dataset root containing train/train_data and train/train_label
    #[arg(long, env = "DATASET_PATH", default_value = ".")]
    pub dataset_path: String,

    /// Where numbered checkpoints and reports.csv are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, value_enum, default_value_t = LabelEncodingArg::Raw)]
    pub label_encoding: LabelEncodingArg,
}

/// Convert CLI RunArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<RunArgs> for TrainConfig {
    fn from(a: RunArgs) -> Self {
        TrainConfig {
            dataset_path:        a.dataset_path,
            checkpoint_dir:      a.checkpoint_dir,
            pause:               a.pause,
            iteration:           a.iteration,
            threshold:           a.threshold,
            epochs:              a.epochs,
            batch:               a.batch,
            strmaxlen:           a.strmaxlen,
            embedding:           a.embedding,
            lr:                  a.lr,
            keep_prob:           a.keep_prob,
            log_freq:            a.log_freq,
            debug:               a.debug,
            debug_freq:          a.debug_freq,
            test:                a.test,
            n_units:             a.n_units,
            max_sentence_length: a.max_sentence_length,
            max_word_length:     a.max_word_length,
            word_dim:            a.word_dim,
            char_dim:            a.char_dim,
            syll_dim:            a.syll_dim,
            rnn_dim:             a.rnn_dim,
            max_syll_num:        a.max_syll_num,
            syll_filter_size:    a.syll_filter_size,
            cell_stack_count:    a.cell_stack_count,
            label_encoding:      a.label_encoding.into(),
        }
    }
}
