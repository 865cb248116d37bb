// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the question-pair CSV        (Layer 4 - data)
//   Step 2: Load stopwords + word vectors     (Layer 4 / 6)
//   Step 3: Build vocabulary and id sequences (Layer 4 - data)
//   Step 4: Assemble the embedding matrix     (Layer 5 - ml)
//   Step 5: Split train/validation            (Layer 4 - data)
//   Step 6: Pad and shape-check both splits   (Layer 4 - data)
//   Step 7: Save config + vocabulary          (Layer 6 - infra)
//   Step 8: Run training loop, save model     (Layer 5 - ml)
//
// Any failure before Step 8 aborts the run before an epoch starts.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::PaddedSplit,
    loader::CsvPairLoader,
    splitter::split_train_val,
    stopwords::StopWords,
    vocabulary::VocabularyBuilder,
};
use crate::domain::traits::{EmbeddingSource, PairSource};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    word_vectors::WordVectors,
};
use crate::ml::{
    embedding::EmbeddingMatrix,
    model::{SiameseConfig, SiameseModel},
    trainer::{run_training, TrainingSummary},
    InnerBackend,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All inputs and hyperparameters for a training run.
// Saved next to the model so inference can rebuild the same architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_csv:           String,
    pub stopwords:           String,
    /// None disables pretrained vectors: every row is random
    pub word_vectors:        Option<String>,
    pub artifact_dir:        String,
    pub embedding_dim:       usize,
    pub max_seq_len:         usize,
    pub hidden:              usize,
    pub batch_size:          usize,
    pub epochs:              usize,
    pub lr:                  f64,
    pub validation_fraction: f64,
    pub seed:                u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csv:           "data/atec_train_segmented.csv".to_string(),
            stopwords:           "data/stopwords.txt".to_string(),
            word_vectors:        Some("data/word60.txt".to_string()),
            artifact_dir:        "data/siamese_lstm".to_string(),
            embedding_dim:       60,
            max_seq_len:         10,
            hidden:              50,
            batch_size:          1024,
            epochs:              30,
            lr:                  1e-3,
            validation_fraction: 0.1,
            seed:                42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("embedding_dim", self.embedding_dim),
            ("max_seq_len",   self.max_seq_len),
            ("hidden",        self.hidden),
            ("batch_size",    self.batch_size),
            ("epochs",        self.epochs),
        ] {
            ensure!(value > 0, "{} must be positive", name);
        }
        ensure!(self.lr > 0.0, "lr must be positive, got {}", self.lr);
        ensure!(
            (0.0..1.0).contains(&self.validation_fraction),
            "validation_fraction must be in [0, 1), got {}",
            self.validation_fraction
        );
        Ok(())
    }

    /// Model architecture for a table with `vocab_rows` rows (vocab + padding).
    pub fn model_config(&self, vocab_rows: usize) -> SiameseConfig {
        SiameseConfig::new(vocab_rows, self.embedding_dim, self.hidden)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let (_, summary) = self.train()?;
        Ok(summary)
    }

    /// Same pipeline, also returning the trained model as it was saved.
    pub fn train(&self) -> Result<(SiameseModel<InnerBackend>, TrainingSummary)> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the corpus ───────────────────────────────────────────
        let pairs = CsvPairLoader::new(&cfg.train_csv).load_all()?;
        ensure!(!pairs.is_empty(), "corpus '{}' has no rows", cfg.train_csv);

        // ── Step 2: Stopwords and (optional) pretrained vectors ───────────────
        let stops = StopWords::load(&cfg.stopwords)?;
        let word_vectors = match &cfg.word_vectors {
            Some(path) => Some(WordVectors::load(path, cfg.embedding_dim)?),
            None => {
                tracing::info!("Pretrained vectors disabled; all embedding rows are random");
                None
            }
        };
        let source = word_vectors.as_ref().map(|w| w as &dyn EmbeddingSource);

        // ── Step 3: Vocabulary and id sequences ───────────────────────────────
        let mut builder = VocabularyBuilder::new(&stops, source);
        let indexed     = builder.index_pairs(&pairs);
        let (vocab, _oov) = builder.finish();

        // ── Step 4: Embedding matrix ──────────────────────────────────────────
        let mut rng    = StdRng::seed_from_u64(cfg.seed);
        let embeddings = EmbeddingMatrix::build(&vocab, cfg.embedding_dim, source, &mut rng)?;
        // the pretrained store is no longer needed
        drop(word_vectors);

        // ── Step 5: Train / validation split ──────────────────────────────────
        let (train_pairs, val_pairs) = split_train_val(indexed, cfg.validation_fraction, cfg.seed);

        // ── Step 6: Pad and check shapes ──────────────────────────────────────
        let train_split = PaddedSplit::from_indexed(&train_pairs, cfg.max_seq_len);
        let val_split   = PaddedSplit::from_indexed(&val_pairs, cfg.max_seq_len);
        tracing::info!(
            "Split: {} train, {} validation (max_seq_len={})",
            train_split.len(),
            val_split.len(),
            cfg.max_seq_len
        );
        let train_dataset = train_split.into_dataset()?;
        let val_dataset   = val_split.into_dataset()?;

        // ── Step 7: Persist what inference needs ──────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.artifact_dir)?;
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_lexicon(&vocab, &stops)?;
        let metrics = MetricsLogger::create(&cfg.artifact_dir)?;

        // ── Step 8: Train (Layer 5) ───────────────────────────────────────────
        run_training(cfg, &embeddings, train_dataset, val_dataset, &ckpt_manager, &metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::predict_use_case::PredictUseCase;
    use crate::data::batcher::stack_ids;
    use crate::domain::traits::PairScorer;
    use std::{fs, path::Path};

    fn write_inputs(dir: &Path) -> TrainConfig {
        let csv = dir.join("train.csv");
        fs::write(
            &csv,
            "question1,question2,is_duplicate\n\
             借 呗 还款 信息,借 呗 还款 日期,0\n\
             花 呗 怎么 开通,如何 开通 花 呗,1\n",
        )
        .unwrap();

        let stops = dir.join("stopwords.txt");
        fs::write(&stops, "的\n了\n").unwrap();

        TrainConfig {
            train_csv:     csv.display().to_string(),
            stopwords:     stops.display().to_string(),
            word_vectors:  None,
            artifact_dir:  dir.join("artifact").display().to_string(),
            embedding_dim: 4,
            max_seq_len:   5,
            hidden:        3,
            batch_size:    2,
            epochs:        1,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_validate_rejects_zero_hyperparameters() {
        let cfg = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());

        let cfg = TrainConfig { validation_fraction: 1.0, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());

        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_stopwords_abort_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            stopwords: dir.path().join("none.txt").display().to_string(),
            ..write_inputs(dir.path())
        };

        assert!(TrainUseCase::new(cfg.clone()).execute().is_err());
        let artifact = Path::new(&cfg.artifact_dir);
        assert!(!artifact.join("model.mpk.gz").exists());
        assert!(!artifact.join("model.mpk").exists());
    }

    #[test]
    fn test_two_row_corpus_trains_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());

        let (trained, summary) = TrainUseCase::new(cfg.clone()).train().unwrap();
        assert_eq!(summary.epochs, 1);
        // one row is held out for validation
        assert!(summary.last_val_acc.is_some());

        let artifact = Path::new(&cfg.artifact_dir);
        assert!(artifact.join("model.mpk.gz").exists());
        assert!(artifact.join("train_config.json").exists());
        assert!(artifact.join("vocabulary.json").exists());
        assert!(artifact.join("metrics.csv").exists());

        let scorer = PredictUseCase::new(&cfg.artifact_dir).unwrap();
        let p = scorer.score("借 呗 还款 信息", "花 呗 怎么 开通").unwrap();
        assert!((0.0..=1.0).contains(&p));

        // the reloaded model is deterministic
        let again = scorer.score("借 呗 还款 信息", "花 呗 怎么 开通").unwrap();
        assert_eq!(p, again);

        // and identical to the one training produced
        let device   = Default::default();
        let ckpt     = CheckpointManager::new(&cfg.artifact_dir).unwrap();
        let (vocab, _) = ckpt.load_lexicon().unwrap();
        let skeleton = cfg.model_config(vocab.len() + 1).init::<InnerBackend>(&device);
        let reloaded = ckpt.load_model(skeleton, &device).unwrap();

        let table = |m: &SiameseModel<InnerBackend>| -> Vec<f32> {
            m.encoder.embedding.weight.val().into_data().to_vec().unwrap()
        };
        let trained_table  = table(&trained);
        let reloaded_table = table(&reloaded);
        assert_eq!(trained_table, reloaded_table);
        assert!(reloaded_table[..cfg.embedding_dim].iter().all(|&x| x == 0.0));

        let left  = stack_ids::<InnerBackend>(&[&[0, 0, 1, 2, 3], &[0, 4, 5, 6, 7]], &device);
        let right = stack_ids::<InnerBackend>(&[&[0, 0, 1, 2, 4], &[0, 0, 8, 7, 5]], &device);
        let before: Vec<f32> = trained.forward(left.clone(), right.clone()).into_data().to_vec().unwrap();
        let after:  Vec<f32> = reloaded.forward(left, right).into_data().to_vec().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_trains_with_pretrained_vectors() {
        let dir     = tempfile::tempdir().unwrap();
        let vectors = dir.path().join("vectors.txt");
        fs::write(&vectors, "2 4\n借 0.1 0.2 0.3 0.4\n开通 1 1 1 1\n").unwrap();

        let cfg = TrainConfig {
            word_vectors: Some(vectors.display().to_string()),
            ..write_inputs(dir.path())
        };

        assert!(TrainUseCase::new(cfg).execute().is_ok());
    }
}
