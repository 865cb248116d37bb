// ============================================================
// Layer 4 — Stopword Set
// ============================================================
// An immutable set of tokens that never get a vocabulary id
// and are dropped from every id sequence.
//
// File format: one token per line. Surrounding whitespace is
// trimmed and blank lines are ignored.

use anyhow::{Context, Result};
use std::{collections::HashSet, fs, path::Path};

#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Read a newline-delimited stopword file. A missing file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read stopword list '{}'", path.display()))?;
        let stops = Self::from_lines(text.lines());
        tracing::info!("Loaded {} stopwords from '{}'", stops.len(), path.display());
        Ok(stops)
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Sorted copy of the set, used when persisting it next to the model
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut v: Vec<String> = self.words.iter().cloned().collect();
        v.sort();
        v
    }
}
