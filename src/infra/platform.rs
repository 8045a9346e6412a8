// ============================================================
// Layer 6 — Local Platform
// ============================================================
// Stand-in for the hosted leaderboard platform. It receives
// step reports and stores session snapshots on local disk:
//
//   <root>/
//     reports.csv
//     30/    ← checkpoint saved at step 30
//     60/
//     ...
//
// latest_checkpoint() finds the highest numbered directory that
// actually holds a checkpoint.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::report::StepReport;
use crate::domain::traits::{ModelSession, Platform};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::MetricsLogger;

pub struct LocalPlatform {
    root:    PathBuf,
    metrics: MetricsLogger,
}

impl LocalPlatform {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root    = root.as_ref().to_path_buf();
        let metrics = MetricsLogger::new(&root)?;
        Ok(Self { root, metrics })
    }

    /// Directory a checkpoint with this name lives in.
    pub fn checkpoint_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Highest numbered checkpoint directory under the root, if any.
    pub fn latest_checkpoint(&self) -> Result<Option<PathBuf>> {
        Ok(self.latest_step()?.map(|(_, path)| path))
    }

    /// Step number and directory of the newest checkpoint.
    pub fn latest_step(&self) -> Result<Option<(usize, PathBuf)>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Cannot read directory '{}'", self.root.display()))?;

        let mut best: Option<(usize, PathBuf)> = None;
        for entry in entries {
            let path = entry?.path();
            let Some(step) = path.file_name().and_then(|n| n.to_str()).and_then(|n| n.parse::<usize>().ok()) else {
                continue;
            };
            if !CheckpointManager::new(&path).has_checkpoint() {
                continue;
            }
            if best.as_ref().map_or(true, |(b, _)| step > *b) {
                best = Some((step, path));
            }
        }
        Ok(best)
    }
}

impl Platform for LocalPlatform {
    fn report(&mut self, report: &StepReport) -> Result<()> {
        tracing::info!(
            epoch = report.epoch,
            epoch_total = report.epoch_total,
            step = report.step,
            train_loss = report.train_loss,
            "report"
        );
        self.metrics.log(report)
    }

    fn save(&mut self, session: &dyn ModelSession, checkpoint: usize) -> Result<()> {
        let dir = self.checkpoint_dir(&checkpoint.to_string());
        session.save(&dir)?;
        tracing::info!("Checkpoint {} saved to '{}'", checkpoint, dir.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Writes only the pointer file, which is what marks a checkpoint.
    struct PointerOnly;

    impl ModelSession for PointerOnly {
        fn save(&self, dir: &Path) -> Result<()> {
            fs::create_dir_all(dir)?;
            fs::write(dir.join("checkpoint"), r#"{"model_checkpoint_path":"model"}"#)?;
            Ok(())
        }
        fn load(&mut self, _dir: &Path) -> Result<()> { Ok(()) }
        fn infer(&self, raw: &[String]) -> Result<Vec<(f32, u8)>> {
            Ok(raw.iter().map(|_| (0.0, 1)).collect())
        }
    }

    #[test]
    fn test_latest_checkpoint_is_highest_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut platform = LocalPlatform::new(dir.path()).unwrap();
        assert_eq!(platform.latest_checkpoint().unwrap(), None);

        for step in [30, 120, 90] {
            platform.save(&PointerOnly, step).unwrap();
        }
        // Not numeric, and numeric without a checkpoint: both ignored
        fs::create_dir_all(dir.path().join("scratch")).unwrap();
        fs::create_dir_all(dir.path().join("500")).unwrap();

        assert_eq!(platform.latest_checkpoint().unwrap(), Some(dir.path().join("120")));
        assert_eq!(platform.latest_step().unwrap().map(|(step, _)| step), Some(120));
    }

    #[test]
    fn test_report_is_appended_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut platform = LocalPlatform::new(dir.path()).unwrap();
        platform
            .report(&StepReport { epoch: 1, epoch_total: 5, step: 10, train_loss: 0.5 })
            .unwrap();

        let text = fs::read_to_string(dir.path().join("reports.csv")).unwrap();
        assert!(text.ends_with("1,5,10,0.500000\n"));
    }
}
