// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::{
    batcher::stack_ids,
    padding::pad_sequence,
    stopwords::StopWords,
    vocabulary::Vocabulary,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{model::SiameseModel, InnerBackend};

pub struct Inferencer {
    model:       SiameseModel<InnerBackend>,
    vocabulary:  Vocabulary,
    stopwords:   StopWords,
    max_seq_len: usize,
    device:      <InnerBackend as Backend>::Device,
}

impl Inferencer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = <InnerBackend as Backend>::Device::default();
        let cfg    = ckpt_manager.load_config()?;
        let (vocabulary, stopwords) = ckpt_manager.load_lexicon()?;

        // Shape must match the saved record: embedding rows = vocab + padding
        let model_cfg = cfg.model_config(vocabulary.len() + 1);
        let model: SiameseModel<InnerBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!(
            "Model loaded from '{}' ({} vocabulary tokens)",
            ckpt_manager.dir().display(),
            vocabulary.len()
        );

        Ok(Self { model, vocabulary, stopwords, max_seq_len: cfg.max_seq_len, device })
    }

    /// Text → padded ids, with the training-time vocabulary and stopwords.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let ids = self.vocabulary.encode(text, &self.stopwords);
        pad_sequence(&ids, self.max_seq_len)
    }

    /// Duplicate probability for one question pair.
    pub fn predict(&self, question1: &str, question2: &str) -> Result<f32> {
        let left  = self.encode(question1);
        let right = self.encode(question2);
        tracing::debug!("left ids {:?}, right ids {:?}", left, right);

        let output = self.model.forward(
            stack_ids::<InnerBackend>(&[left.as_slice()], &self.device),
            stack_ids::<InnerBackend>(&[right.as_slice()], &self.device),
        );

        output
            .into_data()
            .iter::<f32>()
            .next()
            .ok_or_else(|| anyhow!("model returned an empty output"))
    }
}
