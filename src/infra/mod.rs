// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed concerns shared by the training and predict
// workflows:
//
//   checkpoint.rs   — Saving and loading the trained artifact
//                     (f32 weights via Burn's MessagePack recorder, plus
//                     the config and vocabulary as JSON)
//
//   metrics.rs      — Per-epoch loss/accuracy CSV
//
//   word_vectors.rs — Pretrained word2vec text vectors behind
//                     the EmbeddingSource trait
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Trained artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Pretrained word-vector store
pub mod word_vectors;
