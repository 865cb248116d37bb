// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean squared error over training batches
//   - train_acc:  fraction of training pairs classified correctly
//   - val_loss:   mean squared error on the validation split
//   - val_acc:    fraction of validation pairs classified correctly
//
// An empty validation split is written as NaN.
//
// Output file: <artifact_dir>/metrics.csv
//
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,0.251200,0.512000,0.249800,0.530000
//   2,0.231900,0.604000,0.238100,0.588000

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    pub train_loss: f64,
    pub train_acc:  f64,

    /// None when the validation split is empty
    pub val_loss: Option<f64>,
    pub val_acc:  Option<f64>,
}

impl EpochMetrics {
    /// Returns true if this epoch beat the best validation accuracy so far
    pub fn improves_on(&self, best_val_acc: Option<f64>) -> bool {
        match (self.val_acc, best_val_acc) {
            (Some(acc), Some(best)) => acc > best,
            (Some(_), None)         => true,
            (None, _)               => false,
        }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics file in `dir`, replacing any previous run's log.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.val_loss.unwrap_or(f64::NAN),
            m.val_acc.unwrap_or(f64::NAN),
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
