// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Turns tokenised questions into integer id sequences.
//
// Id assignment:
//   - id 0 is the padding sentinel and never belongs to a token
//   - every new non-stopword token gets the next id, starting at 1
//   - a token keeps its first id for the rest of the run
//
// Traversal order fixes the ids: rows in corpus order,
// question1 before question2, tokens left to right.
//
// Alongside the ids we keep an OOV registry: tokens the pretrained
// embedding source has no vector for. It is diagnostic only and
// never changes which ids are assigned.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::data::{stopwords::StopWords, tokenizer::tokenize};
use crate::domain::{question_pair::QuestionPair, traits::EmbeddingSource};

/// Reserved id for "no token here"
pub const PAD_ID: u32 = 0;

/// Rows between two progress log lines
const PROGRESS_EVERY: usize = 1000;

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Insertion-ordered token → id mapping. `tokens[i]` has id `i + 1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids:    HashMap<String, u32>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of real tokens (excludes the padding slot)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// Return the token's id, assigning the next one if it is new
    fn id_or_insert(&mut self, token: &str) -> u32 {
        if let Some(id) = self.ids.get(token) {
            return *id;
        }
        self.tokens.push(token.to_string());
        let id = self.tokens.len() as u32;
        self.ids.insert(token.to_string(), id);
        id
    }

    /// (token, id) pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i as u32 + 1))
    }

    /// Map a text to ids without growing the vocabulary.
    /// Stopwords and unknown tokens are dropped.
    pub fn encode(&self, text: &str, stops: &StopWords) -> Vec<u32> {
        tokenize(text)
            .iter()
            .filter(|t| !stops.contains(t))
            .filter_map(|t| self.id(t))
            .collect()
    }
}

/// Rebuild a saved vocabulary. A repeated token would leave two rows
/// for one id, so it is rejected.
impl TryFrom<Vec<String>> for Vocabulary {
    type Error = anyhow::Error;

    fn try_from(tokens: Vec<String>) -> Result<Self> {
        let mut ids = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let id = i as u32 + 1;
            if let Some(first) = ids.insert(token.clone(), id) {
                bail!("token '{}' appears twice in the vocabulary (ids {} and {})", token, first, id);
            }
        }
        Ok(Self { tokens, ids })
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(v: Vocabulary) -> Self {
        v.tokens
    }
}

// ─── IndexedPair ──────────────────────────────────────────────────────────────
/// A question pair after id assignment, before padding.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPair {
    pub left:  Vec<u32>,
    pub right: Vec<u32>,
    pub label: f32,
}

// ─── VocabularyBuilder ────────────────────────────────────────────────────────
pub struct VocabularyBuilder<'a> {
    stops:      &'a StopWords,
    pretrained: Option<&'a dyn EmbeddingSource>,
    vocab:      Vocabulary,
    oov:        HashSet<String>,
}

impl<'a> VocabularyBuilder<'a> {
    /// `pretrained` is only consulted to fill the OOV registry.
    /// With no source at all, every token counts as OOV.
    pub fn new(stops: &'a StopWords, pretrained: Option<&'a dyn EmbeddingSource>) -> Self {
        Self {
            stops,
            pretrained,
            vocab: Vocabulary::new(),
            oov:   HashSet::new(),
        }
    }

    /// Assign ids to one token sequence, growing the vocabulary as needed.
    pub fn index_tokens(&mut self, tokens: &[String]) -> Vec<u32> {
        let mut ids = Vec::with_capacity(tokens.len());

        for token in tokens {
            if self.stops.contains(token) {
                continue;
            }
            let has_vector = self.pretrained.is_some_and(|p| p.contains(token));
            if !has_vector && !self.oov.contains(token) {
                self.oov.insert(token.clone());
            }
            ids.push(self.vocab.id_or_insert(token));
        }

        ids
    }

    /// Index a whole corpus in traversal order.
    pub fn index_pairs(&mut self, pairs: &[QuestionPair]) -> Vec<IndexedPair> {
        let mut indexed = Vec::with_capacity(pairs.len());

        for (row, pair) in pairs.iter().enumerate() {
            if row != 0 && row % PROGRESS_EVERY == 0 {
                tracing::info!("{} sentences embedded.", row);
            }
            let left  = self.index_tokens(&tokenize(&pair.question1));
            let right = self.index_tokens(&tokenize(&pair.question2));
            indexed.push(IndexedPair { left, right, label: pair.target() });
        }

        indexed
    }

    /// Freeze the vocabulary and hand back the OOV registry.
    pub fn finish(self) -> (Vocabulary, HashSet<String>) {
        tracing::info!(
            "Vocabulary built: {} tokens, {} without a pretrained vector",
            self.vocab.len(),
            self.oov.len()
        );
        (self.vocab, self.oov)
    }
}
