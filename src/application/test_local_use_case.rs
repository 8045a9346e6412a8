// ============================================================
// Layer 2 — Local Test Use Case
// ============================================================
// Mirrors what the hosted platform does at evaluation time:
//
//   1. Restore a saved session (by iteration, "0" = latest)
//   2. Read raw review lines from <dataset root>/train/train_data
//   3. Run infer() batch by batch
//   4. Return the (confidence, rating) pairs in input order

use anyhow::{Context, Result};
use burn::backend::wgpu::WgpuDevice;
use std::path::PathBuf;

use crate::application::train_use_case::{TrainBackend, TrainConfig};
use crate::data::{batcher::batch_loader, loader::ReviewLoader};
use crate::domain::traits::ModelSession;
use crate::infra::platform::LocalPlatform;
use crate::ml::session::ReviewSession;

pub struct TestLocalUseCase {
    config: TrainConfig,
}

impl TestLocalUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Checkpoint directory selected by `iteration`.
    pub fn checkpoint_dir(&self, platform: &LocalPlatform) -> Result<PathBuf> {
        if self.config.iteration == "0" {
            platform
                .latest_checkpoint()?
                .with_context(|| format!("No checkpoint! (none found under '{}')", self.config.checkpoint_dir))
        } else {
            Ok(platform.checkpoint_dir(&self.config.iteration))
        }
    }

    pub fn execute(&self) -> Result<Vec<(f32, u8)>> {
        let cfg = &self.config;
        cfg.validate()?;

        let platform = LocalPlatform::new(&cfg.checkpoint_dir)?;
        let dir      = self.checkpoint_dir(&platform)?;

        let mut session = ReviewSession::<TrainBackend>::new(cfg.model_config(), WgpuDevice::default());
        session.load(&dir)?;

        let lines = ReviewLoader::new(cfg.train_root()).load_lines()?;
        tracing::info!("Running inference on {} reviews", lines.len());
        predict_in_batches(&session, &lines, cfg.batch)
    }
}

pub fn predict_in_batches(
    session:    &dyn ModelSession,
    lines:      &[String],
    batch_size: usize,
) -> Result<Vec<(f32, u8)>> {
    let mut results = Vec::with_capacity(lines.len());
    for batch in batch_loader(lines, batch_size) {
        results.extend(session.infer(batch)?);
    }
    Ok(results)
}

/// `[(0.0, 7), (0.0, 3)]`
pub fn format_results(results: &[(f32, u8)]) -> String {
    let items: Vec<String> = results
        .iter()
        .map(|(confidence, rating)| format!("({confidence:.1}, {rating})"))
        .collect();
    format!("[{}]", items.join(", "))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    /// Rates every line by its length and remembers batch sizes.
    struct LengthSession {
        batches: RefCell<Vec<usize>>,
    }

    impl ModelSession for LengthSession {
        fn save(&self, _dir: &Path) -> Result<()> { Ok(()) }
        fn load(&mut self, _dir: &Path) -> Result<()> { Ok(()) }
        fn infer(&self, raw: &[String]) -> Result<Vec<(f32, u8)>> {
            self.batches.borrow_mut().push(raw.len());
            Ok(raw.iter().map(|l| (0.0, l.chars().count().clamp(1, 10) as u8)).collect())
        }
    }

    #[test]
    fn test_predict_in_batches_keeps_order() {
        let session = LengthSession { batches: RefCell::new(Vec::new()) };
        let lines: Vec<String> = ["a", "bbb", "cc", "dddddddddddd", "e"].iter().map(|s| s.to_string()).collect();

        let results = predict_in_batches(&session, &lines, 2).unwrap();

        assert_eq!(results, vec![(0.0, 1), (0.0, 3), (0.0, 2), (0.0, 10), (0.0, 1)]);
        assert_eq!(*session.batches.borrow(), vec![2, 2, 1]);
    }

    #[test]
    fn test_format_results() {
        assert_eq!(format_results(&[(0.0, 7), (0.0, 3)]), "[(0.0, 7), (0.0, 3)]");
        assert_eq!(format_results(&[]), "[]");
    }

    #[test]
    fn test_iteration_selects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path()).unwrap();

        let named = TestLocalUseCase::new(TrainConfig {
            iteration: "120".into(),
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
            ..TrainConfig::default()
        });
        assert_eq!(named.checkpoint_dir(&platform).unwrap(), dir.path().join("120"));

        // "0" asks for the latest one, and there is none yet
        let latest = TestLocalUseCase::new(TrainConfig::default());
        let err = latest.checkpoint_dir(&platform).unwrap_err();
        assert!(err.to_string().contains("No checkpoint!"));
    }
}
