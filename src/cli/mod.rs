// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two modes are supported:
//   1. `--mode train`      — trains the model, saving every log_freq steps
//   2. `--mode test_local` — restores a checkpoint and rates the dataset
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Mode, RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "movie-rating-cnn",
    version = "0.1.0",
    about = "Train a character + syllable CNN that rates movie reviews from 1 to 10."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    /// Route to the use case for the selected mode.
    pub fn run(self) -> Result<()> {
        match self.args.mode {
            Mode::Train     => run_train(self.args),
            Mode::TestLocal => run_test_local(self.args),
        }
    }
}

fn run_train(args: RunArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training (checkpoints in '{}')", args.checkpoint_dir);
    TrainUseCase::new(args.into()).execute()?;

    println!("Training complete.");
    Ok(())
}

fn run_test_local(args: RunArgs) -> Result<()> {
    use crate::application::test_local_use_case::{format_results, TestLocalUseCase};

    let results = TestLocalUseCase::new(args.into()).execute()?;
    println!("{}", format_results(&results));
    Ok(())
}
