// ============================================================
// Layer 3 — Step Report
// ============================================================
// The aggregate metrics the training loop hands to the
// platform every log_freq steps.

use serde::{Deserialize, Serialize};

/// Structured training metrics handed to the platform every `log_freq` steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub epoch:       usize,
    pub epoch_total: usize,
    pub step:        usize,
    /// Running epoch loss divided by the epoch's batch count
    pub train_loss:  f64,
}
