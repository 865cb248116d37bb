// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the labelled question-pair corpus from a CSV file.
//
// Expected header (extra columns such as `id` are ignored):
//   question1,question2,is_duplicate
//
// Text columns are expected to be word-segmented already for
// scripts that don't put spaces between words.
//
// Unlike a best-effort document loader, nothing here is skipped
// silently: a missing file, a malformed row or a label other than
// 0/1 aborts the run, since a partial corpus would produce a
// different vocabulary.
//
// Reference: csv crate documentation (serde deserialisation)
//            Rust Book §9 (Error Handling)

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::question_pair::QuestionPair;
use crate::domain::traits::PairSource;

/// One raw CSV record. Empty cells deserialise to empty strings.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    question1:    String,
    #[serde(default)]
    question2:    String,
    is_duplicate: u8,
}

/// Loads question pairs from a headed CSV file.
/// Implements the PairSource trait from Layer 3.
pub struct CsvPairLoader {
    path: PathBuf,
}

impl CsvPairLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl PairSource for CsvPairLoader {
    fn load_all(&self) -> Result<Vec<QuestionPair>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open corpus '{}'", self.path.display()))?;

        let mut pairs = Vec::new();

        for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
            // +2: one for the header line, one for 1-based numbering
            let line = index + 2;
            let row = record.with_context(|| {
                format!("Malformed row at line {} of '{}'", line, self.path.display())
            })?;

            ensure!(
                row.is_duplicate <= 1,
                "is_duplicate must be 0 or 1, got {} at line {} of '{}'",
                row.is_duplicate,
                line,
                self.path.display()
            );

            pairs.push(QuestionPair::new(row.question1, row.question2, row.is_duplicate));
        }

        tracing::info!("Loaded {} question pairs from '{}'", pairs.len(), self.path.display());
        Ok(pairs)
    }
}
