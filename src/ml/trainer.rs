// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch train + validation loop using Burn's DataLoader
// and Adam, minimising mean squared error on the sigmoid output.
//
//   - Training runs on TrainBackend (Autodiff<...>) for gradients
//   - model.valid() drops autodiff, which also disables dropout
//   - Accuracy: a pair counts as duplicate when p > 0.5
//   - The model is saved once, after the last epoch, and handed
//     back in inference form (autodiff stripped)
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use std::time::{Duration, Instant};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::PairBatcher, dataset::PairDataset};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{embedding::EmbeddingMatrix, model::SiameseModel, InnerBackend, TrainBackend};

/// Probability above which a pair is called a duplicate
pub const DECISION_THRESHOLD: f32 = 0.5;

/// What the caller reports once training is over.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs:       usize,
    pub elapsed:      Duration,
    pub last_val_acc: Option<f64>,
    pub best_val_acc: Option<f64>,
}

/// Number of predictions on the same side of the threshold as their label.
pub fn count_correct(predictions: &[f32], labels: &[f32]) -> usize {
    predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| (**p > DECISION_THRESHOLD) == (**l > DECISION_THRESHOLD))
        .count()
}

fn to_vec<B: Backend>(t: Tensor<B, 2>) -> Vec<f32> {
    t.into_data().iter::<f32>().collect()
}

/// Running sums for one pass over a loader.
#[derive(Default)]
struct PassStats {
    loss_sum: f64,
    batches:  usize,
    correct:  usize,
    samples:  usize,
}

impl PassStats {
    fn add(&mut self, loss: f64, predictions: &[f32], labels: &[f32]) {
        self.loss_sum += loss;
        self.batches  += 1;
        self.correct  += count_correct(predictions, labels);
        self.samples  += labels.len();
    }

    fn mean_loss(&self) -> Option<f64> {
        (self.batches > 0).then(|| self.loss_sum / self.batches as f64)
    }

    fn accuracy(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.correct as f64 / self.samples as f64)
    }
}

pub fn run_training(
    cfg:           &TrainConfig,
    embeddings:    &EmbeddingMatrix,
    train_dataset: PairDataset,
    val_dataset:   PairDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<(SiameseModel<InnerBackend>, TrainingSummary)> {
    let device = <InnerBackend as Backend>::Device::default();
    tracing::info!("Using device: {:?}", device);
    <TrainBackend as Backend>::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.model_config(embeddings.rows());
    let mut model: SiameseModel<TrainBackend> =
        model_cfg.init_with_embeddings(embeddings, &device)?;
    tracing::info!(
        "Model ready: embedding {}x{} (frozen), hidden={}, {} parameters",
        embeddings.rows(),
        embeddings.dim(),
        cfg.hidden,
        model.num_params()
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(PairBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(PairBatcher::<InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let started = Instant::now();
    let mut last_val_acc = None;
    let mut best_val_acc = None;

    for epoch in 1..=cfg.epochs {
        let mut train = PassStats::default();

        for batch in train_loader.iter() {
            let labels = to_vec(batch.labels.clone());
            let (loss, output) = model.forward_loss(batch.left, batch.right, batch.labels);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train.add(loss_val, &to_vec(output), &labels);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase (no autodiff, no dropout) ────────────────────────
        let model_valid = model.valid();
        let mut val = PassStats::default();

        for batch in val_loader.iter() {
            let labels = to_vec(batch.labels.clone());
            let (loss, output) = model_valid.forward_loss(batch.left, batch.right, batch.labels);
            val.add(loss.into_scalar().elem::<f64>(), &to_vec(output), &labels);
        }

        let m = EpochMetrics {
            epoch,
            train_loss: train.mean_loss().unwrap_or(f64::NAN),
            train_acc:  train.accuracy().unwrap_or(0.0),
            val_loss:   val.mean_loss(),
            val_acc:    val.accuracy(),
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.2}% | val_loss={:.4} | val_acc={:.2}%",
            epoch,
            cfg.epochs,
            m.train_loss,
            m.train_acc * 100.0,
            m.val_loss.unwrap_or(f64::NAN),
            m.val_acc.map_or(f64::NAN, |a| a * 100.0),
        );

        if m.improves_on(best_val_acc) {
            best_val_acc = m.val_acc;
        }
        last_val_acc = m.val_acc;
        metrics.log(&m)?;
    }

    let elapsed = started.elapsed();
    ckpt_manager.save_model(&model)?;

    tracing::info!("Training complete! Metrics in '{}'", metrics.csv_path().display());
    let summary = TrainingSummary {
        epochs: cfg.epochs,
        elapsed,
        last_val_acc,
        best_val_acc,
    };
    Ok((model.valid(), summary))
}
