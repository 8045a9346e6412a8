// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw dataset files
// all the way to tensor batches.
//
// The pipeline flows in this order:
//
//   train/train_data + train/train_label
//       │
//       ▼
//   ReviewLoader        → reads lines, parses and checks labels
//       │
//       ▼
//   HangulEncoder       → cleans text, builds word / char / syllable grids
//       │
//       ▼
//   MovieReviewDataset  → implements Burn's Dataset trait, shuffles per epoch
//       │
//       ▼
//   batch_loader        → consecutive slices of batch_size reviews
//       │
//       ▼
//   ReviewBatcher       → stacks a slice into tensors
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads train_data / train_label line files
pub mod loader;

/// Text cleaning and the Hangul grid encoder
pub mod preprocessor;

/// Implements Burn's Dataset trait for encoded reviews
pub mod dataset;

/// Batch slicing and Burn's Batcher trait for tensor batches
pub mod batcher;
