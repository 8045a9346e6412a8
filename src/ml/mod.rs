// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn-specific numerical core.
//
//   model.rs     — Character + syllable CNN
//                  • character and syllable embedding tables
//                  • per-word convolutions, max-pooled per word
//                  • stacked word-level convolutions, max-pooled
//                    into one sentence vector
//                  • dense 10-way head with ReLU
//
//   objective.rs — One-hot targets, MSE loss, argmax+1
//                  decision rule, accuracy and rating MSE
//
//   trainer.rs   — The step-driven training loop and the
//                  TrainState it mutates
//
//   session.rs   — save / load / infer over a trained model
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Kim (2014) Convolutional Neural Networks for Sentence Classification

/// Character + syllable CNN architecture
pub mod model;

/// Loss, metrics and decision rule
pub mod objective;

/// Training loop with debug evaluation and checkpointing
pub mod trainer;

/// The model as the platform sees it
pub mod session;
