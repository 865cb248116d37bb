// ============================================================
// Layer 5 — Shared Sentence Encoder
// ============================================================
// Maps a padded id sequence to one fixed-width vector:
//
//   ids [N, S]
//     → frozen embedding           [N, S, E]
//     → BiLSTM (hidden)            [N, S, 2H]   forward ‖ backward
//     → BiLSTM (hidden)            [N, S, 2H]
//     → dropout 0.5
//     → attention pooling          [N, 2H]
//     → dropout 0.1, twice
//
// Attention pooling:
//   score_t  = tanh(w · h_t + b)          one scalar per position
//   alpha    = softmax(score) over t
//   pooled   = Σ_t alpha_t · h_t
//
// The siamese model owns ONE SharedEncoder and calls it for
// both questions, so both sides are embedded with the same
// parameters.
//
// Reference: Burn Book §3 (Building Blocks)

use anyhow::{ensure, Result};
use burn::{
    module::Param,
    nn::{
        BiLstm, BiLstmConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{softmax, tanh},
};

use crate::ml::embedding::EmbeddingMatrix;

#[derive(Config, Debug)]
pub struct SharedEncoderConfig {
    /// vocab_size + 1 (row 0 is padding)
    pub vocab_rows:    usize,
    pub embedding_dim: usize,
    /// Units per LSTM direction; the output width is twice this
    pub hidden:        usize,
    #[config(default = 0.5)]
    pub recurrent_dropout: f64,
    #[config(default = 0.1)]
    pub pooled_dropout: f64,
}

impl SharedEncoderConfig {
    /// Build an encoder whose embedding table is random and frozen.
    /// Training replaces the table via `with_embeddings`; inference
    /// overwrites it when the saved record is loaded.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SharedEncoder<B> {
        let embedding = EmbeddingConfig::new(self.vocab_rows, self.embedding_dim)
            .init(device)
            .no_grad();
        let lower = BiLstmConfig::new(self.embedding_dim, self.hidden, true).init(device);
        let upper = BiLstmConfig::new(2 * self.hidden, self.hidden, true).init(device);
        let attention = LinearConfig::new(2 * self.hidden, 1).init(device);

        SharedEncoder {
            embedding,
            lower,
            upper,
            attention,
            recurrent_dropout: DropoutConfig::new(self.recurrent_dropout).init(),
            pooled_dropout:    DropoutConfig::new(self.pooled_dropout).init(),
        }
    }

    pub fn output_width(&self) -> usize {
        2 * self.hidden
    }
}

#[derive(Module, Debug)]
pub struct SharedEncoder<B: Backend> {
    pub embedding:         Embedding<B>,
    pub lower:             BiLstm<B>,
    pub upper:             BiLstm<B>,
    pub attention:         Linear<B>,
    pub recurrent_dropout: Dropout,
    pub pooled_dropout:    Dropout,
}

impl<B: Backend> SharedEncoder<B> {
    /// Install a prebuilt table as the (non-trainable) embedding weights.
    pub fn with_embeddings(self, matrix: &EmbeddingMatrix, device: &B::Device) -> Result<Self> {
        let [rows, dim] = self.embedding.weight.val().dims();
        ensure!(
            matrix.rows() == rows && matrix.dim() == dim,
            "embedding matrix is {}x{}, encoder expects {}x{}",
            matrix.rows(),
            matrix.dim(),
            rows,
            dim
        );

        let embedding = Embedding {
            weight: Param::from_tensor(matrix.to_tensor(device)),
        }
        .no_grad();

        Ok(Self { embedding, ..self })
    }

    /// ids: [batch, seq_len] → [batch, 2 * hidden]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let embedded   = self.embedding.forward(ids);
        let (states, _) = self.lower.forward(embedded, None);
        let (states, _) = self.upper.forward(states, None);
        let states     = self.recurrent_dropout.forward(states);

        let pooled = self.attend(states);
        let pooled = self.pooled_dropout.forward(pooled);
        self.pooled_dropout.forward(pooled)
    }

    /// Per-position weights: [batch, seq_len, width] → [batch, seq_len], rows sum to 1
    pub fn attention_weights(&self, states: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, seq_len, _] = states.dims();
        let scores = tanh(self.attention.forward(states)).reshape([batch, seq_len]);
        softmax(scores, 1)
    }

    fn attend(&self, states: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, seq_len, width] = states.dims();
        let weights = self
            .attention_weights(states.clone())
            .reshape([batch, seq_len, 1])
            .expand([batch, seq_len, width]);

        (states * weights).sum_dim(1).reshape([batch, width])
    }
}
