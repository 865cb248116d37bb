// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the siamese model on a labelled question-pair CSV
    Train(TrainArgs),

    /// Score a question pair with a trained artifact
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with question1, question2 and is_duplicate columns
    #[arg(long, default_value = "data/atec_train_segmented.csv")]
    pub train_csv: String,

    /// Newline-delimited stopword list
    #[arg(long, default_value = "data/stopwords.txt")]
    pub stopwords: String,

    /// Pretrained vectors in word2vec text format
    #[arg(long, default_value = "data/word60.txt")]
    pub word_vectors: String,

    /// Ignore --word-vectors and initialise every embedding row randomly
    #[arg(long)]
    pub no_pretrained: bool,

    /// Directory the trained model, config and vocabulary are written to
    #[arg(long, default_value = "data/siamese_lstm")]
    pub artifact_dir: String,

    /// Width of each word vector (must match --word-vectors)
    #[arg(long, default_value_t = 60)]
    pub embedding_dim: usize,

    /// Every question is pre-padded / post-truncated to this many ids
    #[arg(long, default_value_t = 10)]
    pub max_seq_len: usize,

    /// LSTM units per direction
    #[arg(long, default_value_t = 50)]
    pub hidden: usize,

    /// Number of pairs processed together in one forward pass
    #[arg(long, default_value_t = 1024)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of pairs held out for validation
    #[arg(long, default_value_t = 0.1)]
    pub validation_fraction: f64,

    /// Seed for the split, the random embedding rows and weight init
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_csv:           a.train_csv,
            stopwords:           a.stopwords,
            word_vectors:        (!a.no_pretrained).then_some(a.word_vectors),
            artifact_dir:        a.artifact_dir,
            embedding_dim:       a.embedding_dim,
            max_seq_len:         a.max_seq_len,
            hidden:              a.hidden,
            batch_size:          a.batch_size,
            epochs:              a.epochs,
            lr:                  a.lr,
            validation_fraction: a.validation_fraction,
            seed:                a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// First question (word-segmented the same way as the training data)
    #[arg(long)]
    pub question1: String,

    /// Second question
    #[arg(long)]
    pub question2: String,

    /// Directory written by `train`
    #[arg(long, default_value = "data/siamese_lstm")]
    pub artifact_dir: String,
}
