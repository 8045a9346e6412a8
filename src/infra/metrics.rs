// ============================================================
// Layer 6 — Report Logger
// ============================================================
// Appends every StepReport the platform receives to a CSV
// file, so a run's loss curve survives the process.
//
// Output file: <checkpoint_root>/reports.csv
//
//   epoch,epoch_total,step,train_loss
//   0,40,30,0.094512
//   0,40,60,0.081033
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::report::StepReport;

const HEADER: &str = "epoch,epoch_total,step,train_loss";

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet,
    /// so a resumed run keeps appending to the same log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("reports.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created report CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, r: &StepReport) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{},{},{:.6}", r.epoch, r.epoch_total, r.step, r.train_loss)?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_rows_after_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let report = StepReport { epoch: 0, epoch_total: 40, step: 30, train_loss: 0.25 };

        MetricsLogger::new(dir.path()).unwrap().log(&report).unwrap();
        // A second logger on the same directory must not repeat the header
        MetricsLogger::new(dir.path()).unwrap().log(&StepReport { step: 60, ..report }).unwrap();

        let text = fs::read_to_string(dir.path().join("reports.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![HEADER, "0,40,30,0.250000", "0,40,60,0.250000"]);
    }
}
