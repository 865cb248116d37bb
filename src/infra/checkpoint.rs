// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained artifact using Burn's gzipped
// MessagePack recorder at full precision, plus two JSON side files.
// Weights are stored as f32 so the reloaded model, frozen
// embedding rows included, is bit-identical to the trained one.
//
// Artifact layout:
//   <artifact_dir>/
//     model.mpk.gz        ← all weights, frozen embedding table included
//     train_config.json   ← hyperparameters and input paths
//     vocabulary.json     ← tokens in id order + the stopword list
//     metrics.csv         ← written by MetricsLogger
//
// Why the side files?
//   The recorder stores parameters only. To rebuild the model
//   for inference we need the architecture (train_config.json)
//   and the number of embedding rows, which is the vocabulary
//   size + 1. The vocabulary and stopwords are also what turns
//   a new question into the same ids the model was trained on.
//
// The model is saved once, after the final epoch.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{stopwords::StopWords, vocabulary::Vocabulary};
use crate::ml::model::SiameseModel;

/// The recorder appends `.mpk.gz` to this stem
const MODEL_FILE:      &str = "model";
const CONFIG_FILE:     &str = "train_config.json";
const VOCABULARY_FILE: &str = "vocabulary.json";

/// Everything needed to map raw text to model input ids.
#[derive(Debug, Serialize, Deserialize)]
struct LexiconFile {
    tokens:    Vocabulary,
    stopwords: Vec<String>,
}

type ModelRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Manages saving and loading of the trained artifact.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Point at an artifact directory, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `save_model` writes the weights.
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{MODEL_FILE}.mpk.gz"))
    }

    pub fn save_model<B: Backend>(&self, model: &SiameseModel<B>) -> Result<()> {
        let stem = self.dir.join(MODEL_FILE);

        ModelRecorder::new()
            .record(model.clone().into_record(), stem)
            .with_context(|| format!("Failed to save model to '{}'", self.model_path().display()))?;

        tracing::info!("Saved model to '{}'", self.model_path().display());
        Ok(())
    }

    /// Load weights into a freshly initialised model of the same shape.
    pub fn load_model<B: Backend>(
        &self,
        model:  SiameseModel<B>,
        device: &B::Device,
    ) -> Result<SiameseModel<B>> {
        let stem = self.dir.join(MODEL_FILE);

        let record = ModelRecorder::new()
            .load(stem, device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained the model first?",
                    self.model_path().display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'predict'.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt config '{}'", path.display()))
    }

    pub fn save_lexicon(&self, vocab: &Vocabulary, stops: &StopWords) -> Result<()> {
        let path = self.dir.join(VOCABULARY_FILE);
        let file = LexiconFile {
            tokens:    vocab.clone(),
            stopwords: stops.to_sorted_vec(),
        };

        fs::write(&path, serde_json::to_string(&file)?)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::debug!("Saved {} vocabulary tokens to '{}'", vocab.len(), path.display());
        Ok(())
    }

    pub fn load_lexicon(&self) -> Result<(Vocabulary, StopWords)> {
        let path = self.dir.join(VOCABULARY_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read vocabulary from '{}'", path.display()))?;
        let file: LexiconFile = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt vocabulary '{}'", path.display()))?;

        Ok((file.tokens, StopWords::from_lines(file.stopwords)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{embedding::EmbeddingMatrix, model::SiameseConfig};
    use burn::backend::NdArray;
    use rand::{rngs::StdRng, SeedableRng};

    type TestBackend = NdArray;

    fn weights<B: Backend>(t: Tensor<B, 2>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_model_round_trip_is_lossless() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let vocab  = Vocabulary::try_from(vec!["借".to_string(), "还款".to_string(), "花".to_string()]).unwrap();
        let matrix = EmbeddingMatrix::build(&vocab, 4, None, &mut StdRng::seed_from_u64(7)).unwrap();
        let cfg    = SiameseConfig::new(matrix.rows(), 4, 3);
        let model  = cfg.init_with_embeddings::<TestBackend>(&matrix, &device).unwrap();

        ckpt.save_model(&model).unwrap();
        assert!(ckpt.model_path().exists());
        assert!(ckpt.model_path().ends_with("model.mpk.gz"));

        let loaded = ckpt.load_model(cfg.init::<TestBackend>(&device), &device).unwrap();

        let saved_rows  = weights(model.encoder.embedding.weight.val());
        let loaded_rows = weights(loaded.encoder.embedding.weight.val());
        assert_eq!(saved_rows, loaded_rows);
        assert!(loaded_rows[..4].iter().all(|&x| x == 0.0));
        assert_eq!(&loaded_rows[4..8], matrix.row(1));
        assert_eq!(
            weights(model.output.weight.val()),
            weights(loaded.output.weight.val())
        );
    }

    #[test]
    fn test_load_model_without_record_fails() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let model  = SiameseConfig::new(3, 2, 2).init::<TestBackend>(&device);
        assert!(ckpt.load_model(model, &device).is_err());
    }

    #[test]
    fn test_lexicon_round_trip_keeps_ids() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();

        let vocab = Vocabulary::try_from(vec!["借".to_string(), "还款".to_string()]).unwrap();
        let stops = StopWords::from_lines(["的"]);
        ckpt.save_lexicon(&vocab, &stops).unwrap();

        let (vocab2, stops2) = ckpt.load_lexicon().unwrap();
        assert_eq!(vocab2.id("还款"), Some(2));
        assert!(stops2.contains("的"));
    }

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let cfg  = TrainConfig { epochs: 3, ..TrainConfig::default() };

        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.epochs, 3);
        assert_eq!(loaded.embedding_dim, cfg.embedding_dim);
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        assert!(ckpt.load_config().is_err());
        assert!(ckpt.load_lexicon().is_err());
    }
}
