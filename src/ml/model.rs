use anyhow::Result;
use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::ml::{
    distance::manhattan_similarity,
    embedding::EmbeddingMatrix,
    encoder::{SharedEncoder, SharedEncoderConfig},
};

/// Widths of the linear layers between the merge and the sigmoid output.
pub const HEAD_WIDTHS: [usize; 3] = [16, 4, 2];

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SiameseConfig {
    pub vocab_rows:    usize,
    pub embedding_dim: usize,
    pub hidden:        usize,
    #[config(default = 0.5)]
    pub recurrent_dropout: f64,
    #[config(default = 0.1)]
    pub pooled_dropout: f64,
}

impl SiameseConfig {
    pub fn encoder(&self) -> SharedEncoderConfig {
        SharedEncoderConfig::new(self.vocab_rows, self.embedding_dim, self.hidden)
            .with_recurrent_dropout(self.recurrent_dropout)
            .with_pooled_dropout(self.pooled_dropout)
    }

    /// Random weights everywhere, embedding included. Used as the
    /// skeleton a saved record is loaded into.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SiameseModel<B> {
        let encoder_cfg = self.encoder();
        // left ‖ right ‖ similarity
        let mut d_in = 2 * encoder_cfg.output_width() + 1;

        let head = HEAD_WIDTHS
            .iter()
            .map(|&width| {
                let layer = LinearConfig::new(d_in, width).init(device);
                d_in = width;
                layer
            })
            .collect();
        let output = LinearConfig::new(d_in, 1).init(device);

        SiameseModel { encoder: encoder_cfg.init(device), head, output }
    }

    /// Fresh model whose frozen embedding table is `matrix`.
    pub fn init_with_embeddings<B: Backend>(
        &self,
        matrix: &EmbeddingMatrix,
        device: &B::Device,
    ) -> Result<SiameseModel<B>> {
        let model   = self.init(device);
        let encoder = model.encoder.with_embeddings(matrix, device)?;
        Ok(SiameseModel { encoder, ..model })
    }
}

#[derive(Module, Debug)]
pub struct SiameseModel<B: Backend> {
    /// The one encoder both questions go through
    pub encoder: SharedEncoder<B>,
    pub head:    Vec<Linear<B>>,
    pub output:  Linear<B>,
}

impl<B: Backend> SiameseModel<B> {
    /// left, right: [batch, seq_len] → duplicate probability [batch, 1]
    pub fn forward(&self, left: Tensor<B, 2, Int>, right: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let left  = self.encoder.forward(left);
        let right = self.encoder.forward(right);
        self.classify(left, right)
    }

    /// Merge two pooled representations and score them.
    pub fn classify(&self, left: Tensor<B, 2>, right: Tensor<B, 2>) -> Tensor<B, 2> {
        let similarity = manhattan_similarity(left.clone(), right.clone());
        let mut x = Tensor::cat(vec![left, right, similarity], 1);

        // linear stack, no activation until the output
        for layer in &self.head {
            x = layer.forward(x);
        }
        sigmoid(self.output.forward(x))
    }

    /// Mean squared error against the 0/1 labels ([batch, 1]).
    pub fn forward_loss(
        &self,
        left:   Tensor<B, 2, Int>,
        right:  Tensor<B, 2, Int>,
        labels: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(left, right);
        let loss   = MseLoss::new().forward(output.clone(), labels, Reduction::Mean);
        (loss, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::stack_ids;
    use crate::data::vocabulary::Vocabulary;
    use burn::{
        backend::{Autodiff, NdArray},
        optim::{AdamConfig, GradientsParams, Optimizer},
    };
    use rand::{rngs::StdRng, SeedableRng};

    type TestBackend  = NdArray;
    type TestAutodiff = Autodiff<NdArray>;

    fn config() -> SiameseConfig {
        SiameseConfig::new(8, 4, 3)
    }

    fn batch<B: Backend>(rows: &[&[u32]]) -> Tensor<B, 2, Int> {
        stack_ids::<B>(rows, &Default::default())
    }

    #[test]
    fn test_output_is_a_probability() {
        let model = config().init::<TestBackend>(&Default::default());
        let out   = model.forward(
            batch(&[&[0, 0, 1, 2], &[3, 4, 5, 6]]),
            batch(&[&[0, 0, 0, 7], &[3, 4, 5, 6]]),
        );
        assert_eq!(out.dims(), [2, 1]);

        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        assert!(values.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_encoder_is_shared_between_sides() {
        let model = config().init::<TestBackend>(&Default::default());
        let ids: &[&[u32]] = &[&[0, 1, 2, 3]];

        let left:  Vec<f32> = model.encoder.forward(batch(ids)).into_data().to_vec().unwrap();
        let right: Vec<f32> = model.encoder.forward(batch(ids)).into_data().to_vec().unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_identical_encodings_have_similarity_one() {
        let model = config().init::<TestBackend>(&Default::default());
        let ids: &[&[u32]] = &[&[1, 2, 3, 4]];

        let encoded = model.encoder.forward(batch(ids));
        let sim: Vec<f32> = manhattan_similarity(encoded.clone(), encoded)
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(sim, vec![1.0]);
    }

    #[test]
    fn test_embedding_stays_frozen_during_training() {
        let device = Default::default();
        let vocab  = Vocabulary::try_from((1..8).map(|i| format!("w{i}")).collect::<Vec<_>>()).unwrap();
        let matrix = EmbeddingMatrix::build(&vocab, 4, None, &mut StdRng::seed_from_u64(11)).unwrap();

        let mut model = config()
            .init_with_embeddings::<TestAutodiff>(&matrix, &device)
            .unwrap();
        let before: Vec<f32> = model.encoder.embedding.weight.val().into_data().to_vec().unwrap();
        let head_before: Vec<f32> = model.output.weight.val().into_data().to_vec().unwrap();

        let mut optim = AdamConfig::new().init();
        let labels = Tensor::<TestAutodiff, 1>::from_floats([0.0f32, 1.0].as_slice(), &device)
            .reshape([2, 1]);
        let (loss, _) = model.forward_loss(
            batch(&[&[0, 1, 2, 3], &[4, 5, 6, 7]]),
            batch(&[&[0, 0, 2, 3], &[4, 5, 6, 7]]),
            labels,
        );
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(1e-2, model, grads);

        let after: Vec<f32> = model.encoder.embedding.weight.val().into_data().to_vec().unwrap();
        let head_after: Vec<f32> = model.output.weight.val().into_data().to_vec().unwrap();
        assert_eq!(before, after);
        assert_ne!(head_before, head_after);
    }
}
