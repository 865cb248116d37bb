// ============================================================
// Layer 5 — Embedding Table Builder
// ============================================================
// Assembles the frozen lookup table the encoder starts from.
//
//   shape:  (vocab_size + 1, embedding_dim)
//   row 0:  all zeros                   ← PAD_ID, never a real token
//   row i:  pretrained vector for token i, if the source has one
//           otherwise an N(0, 1) draw per element
//
// Every row is drawn first, then row 0 is zeroed, then
// pretrained rows overwrite their random draw. With no
// pretrained source all non-padding rows stay random.

use anyhow::{ensure, Result};
use burn::{prelude::*, tensor::TensorData};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::data::vocabulary::{Vocabulary, PAD_ID};
use crate::domain::traits::EmbeddingSource;

/// Dense row-major matrix; row index == vocabulary id.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    rows:   usize,
    dim:    usize,
    values: Vec<f32>,
}

impl EmbeddingMatrix {
    pub fn build<R: Rng + ?Sized>(
        vocab:      &Vocabulary,
        dim:        usize,
        pretrained: Option<&dyn EmbeddingSource>,
        rng:        &mut R,
    ) -> Result<Self> {
        if let Some(source) = pretrained {
            ensure!(
                source.dim() == dim,
                "pretrained vectors are {} wide but embedding_dim is {}",
                source.dim(),
                dim
            );
        }

        let rows = vocab.len() + 1;
        let values: Vec<f32> = (0..rows * dim)
            .map(|_| rng.sample(StandardNormal))
            .collect();
        let mut matrix = Self { rows, dim, values };

        matrix.row_mut(PAD_ID).fill(0.0);

        let mut copied = 0usize;
        if let Some(source) = pretrained {
            for (token, id) in vocab.iter() {
                if let Some(v) = source.vector(token) {
                    matrix.row_mut(id).copy_from_slice(v);
                    copied += 1;
                }
            }
        }

        tracing::info!(
            "Embedding matrix {}x{}: {} pretrained rows, {} random rows",
            rows,
            dim,
            copied,
            rows - 1 - copied
        );
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[cfg(test)]
    pub fn row(&self, id: u32) -> &[f32] {
        let start = id as usize * self.dim;
        &self.values[start..start + self.dim]
    }

    fn row_mut(&mut self, id: u32) -> &mut [f32] {
        let start = id as usize * self.dim;
        &mut self.values[start..start + self.dim]
    }

    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::from_data(TensorData::new(self.values.clone(), [self.rows, self.dim]), device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    struct FixedVectors(HashMap<String, Vec<f32>>);

    impl EmbeddingSource for FixedVectors {
        fn dim(&self) -> usize { 3 }
        fn vector(&self, token: &str) -> Option<&[f32]> {
            self.0.get(token).map(Vec::as_slice)
        }
    }

    fn vocab(tokens: &[&str]) -> Vocabulary {
        Vocabulary::try_from(tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_shape_and_zero_padding_row() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = EmbeddingMatrix::build(&vocab(&["a", "b", "c"]), 4, None, &mut rng).unwrap();

        assert_eq!(m.rows(), 4);
        assert_eq!(m.dim(), 4);
        assert!(m.row(0).iter().all(|&x| x == 0.0));
        // random rows carry signal
        assert!(m.row(1).iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_pretrained_rows_are_copied() {
        let mut known = HashMap::new();
        known.insert("b".to_string(), vec![0.5, -1.0, 2.0]);
        let source  = FixedVectors(known);
        let mut rng = StdRng::seed_from_u64(3);

        let m = EmbeddingMatrix::build(&vocab(&["a", "b"]), 3, Some(&source), &mut rng).unwrap();
        assert_eq!(m.row(2), &[0.5, -1.0, 2.0]);
        assert_ne!(m.row(1), &[0.0, 0.0, 0.0]);
        assert!(m.row(0).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let source  = FixedVectors(HashMap::new());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(EmbeddingMatrix::build(&vocab(&["a"]), 5, Some(&source), &mut rng).is_err());
    }

    #[test]
    fn test_empty_vocabulary_has_only_padding_row() {
        let mut rng = StdRng::seed_from_u64(0);
        let m = EmbeddingMatrix::build(&Vocabulary::new(), 2, None, &mut rng).unwrap();
        assert_eq!(m.rows(), 1);
        assert_eq!(m.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_same_seed_same_matrix() {
        let v = vocab(&["x", "y"]);
        let a = EmbeddingMatrix::build(&v, 3, None, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = EmbeddingMatrix::build(&v, 3, None, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tensor_matches_rows() {
        type TestBackend = burn::backend::NdArray;
        let mut rng = StdRng::seed_from_u64(1);
        let m = EmbeddingMatrix::build(&vocab(&["a"]), 2, None, &mut rng).unwrap();

        let t = m.to_tensor::<TestBackend>(&Default::default());
        assert_eq!(t.dims(), [2, 2]);
        let values: Vec<f32> = t.into_data().to_vec::<f32>().unwrap();
        assert_eq!(&values[..2], &[0.0, 0.0]);
        assert_eq!(&values[2..], m.row(1));
    }
}
