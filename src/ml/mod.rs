// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here. The data layer only touches
// Burn through its Dataset/Batcher traits.
//
//   embedding.rs  — assembles the frozen (vocab+1) x dim table
//   encoder.rs    — frozen embedding → 2 x BiLSTM → attention pooling
//   distance.rs   — exp(-L1) similarity between two pooled vectors
//   model.rs      — siamese wiring: one encoder, merge, dense head
//   trainer.rs    — Adam + MSE training loop with validation
//   inferencer.rs — reloads the artifact and scores new pairs
//
// Backend: NdArray (CPU) by default; build with `--features wgpu`
// to run on the GPU instead.

/// Frozen embedding table assembly
pub mod embedding;

/// Shared BiLSTM + attention sentence encoder
pub mod encoder;

/// Manhattan similarity between sentence vectors
pub mod distance;

/// Siamese model architecture
pub mod model;

/// Training loop with validation
pub mod trainer;

/// Loads the trained artifact and scores question pairs
pub mod inferencer;

#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

/// Backend used for training (gradients enabled)
pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;
