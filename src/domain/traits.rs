// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits, never to the
// concrete CSV reader, word-vector file or burn model behind them.
//
//   PairSource      — anything that yields labelled question pairs
//   EmbeddingSource — a read-only token → vector lookup
//   PairScorer      — anything that scores two questions
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::question_pair::QuestionPair;

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can load the labelled corpus.
///
/// Implementations:
///   - CsvPairLoader → reads question1/question2/is_duplicate columns
pub trait PairSource {
    /// Load every pair in corpus order. Row order matters: it fixes
    /// the order in which vocabulary ids are handed out.
    fn load_all(&self) -> Result<Vec<QuestionPair>>;
}

// ─── EmbeddingSource ──────────────────────────────────────────────────────────
/// A pretrained token → vector store.
///
/// Implementations:
///   - WordVectors → a word2vec text file held in memory
pub trait EmbeddingSource {
    /// Width of every vector in the store
    fn dim(&self) -> usize;

    /// Look up the vector for a token, if the store has one
    fn vector(&self, token: &str) -> Option<&[f32]>;

    fn contains(&self, token: &str) -> bool {
        self.vector(token).is_some()
    }
}

// ─── PairScorer ───────────────────────────────────────────────────────────────
/// Any component that can score how likely two questions are duplicates.
///
/// Implementations:
///   - PredictUseCase → loads a trained artifact and runs the model
pub trait PairScorer {
    /// Probability in [0, 1] that the two questions are duplicates
    fn score(&self, question1: &str, question2: &str) -> Result<f32>;
}
