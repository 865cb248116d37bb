// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV to tensor batches:
//
//   train.csv
//       │
//       ▼
//   CsvPairLoader      → reads question1 / question2 / is_duplicate
//       │
//       ▼
//   tokenize           → lower-case, split on whitespace
//       │
//       ▼
//   VocabularyBuilder  → drops stopwords, assigns ids (1, 2, 3, ...)
//       │
//       ▼
//   split_train_val    → seeded shuffle, hold out validation rows
//       │
//       ▼
//   PaddedSplit        → pre-pad / post-truncate to max_seq_len
//       │
//       ▼
//   PairDataset        → implements Burn's Dataset trait
//       │
//       ▼
//   PairBatcher        → stacks samples into [N, S] tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the labelled corpus from CSV
pub mod loader;

/// Whitespace tokenizer
pub mod tokenizer;

/// Stopword list loading
pub mod stopwords;

/// Token → id assignment and the OOV registry
pub mod vocabulary;

/// Pre-padding and post-truncation
pub mod padding;

/// Padded splits and Burn's Dataset trait
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/validation split
pub mod splitter;
