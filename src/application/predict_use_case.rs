// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads a trained artifact directory and scores question pairs.
// The vocabulary is frozen: words never seen during training are
// dropped, exactly like stopwords.

use anyhow::Result;
use std::path::Path;

use crate::domain::traits::PairScorer;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(artifact_dir: impl AsRef<Path>) -> Result<Self> {
        let ckpt       = CheckpointManager::new(artifact_dir)?;
        let inferencer = Inferencer::from_checkpoint(&ckpt)?;
        Ok(Self { inferencer })
    }
}

impl PairScorer for PredictUseCase {
    fn score(&self, question1: &str, question2: &str) -> Result<f32> {
        self.inferencer.predict(question1, question2)
    }
}
