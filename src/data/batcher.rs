// ============================================================
// Layer 4 — Pair Batcher
// ============================================================
// Implements Burn's Batcher trait to stack PairSamples into
// tensors.
//
//   Input:  Vec of N PairSamples, each side of length S
//   Output: PairBatch with left/right [N, S] and labels [N, 1]
//
// Samples are already padded, so stacking is a flatten + reshape:
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::PairSample;

/// A batch of padded question pairs ready for the forward pass.
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// Left question ids — shape: [batch_size, seq_len]
    pub left: Tensor<B, 2, Int>,

    /// Right question ids — shape: [batch_size, seq_len]
    pub right: Tensor<B, 2, Int>,

    /// 0/1 targets — shape: [batch_size, 1]
    pub labels: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct PairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Flatten one side of every sample into a [N, S] Int tensor.
pub fn stack_ids<B: Backend>(rows: &[&[u32]], device: &B::Device) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();
    let seq_len    = rows.first().map_or(0, |r| r.len());
    let flat: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&x| x as i32))
        .collect();

    Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([batch_size, seq_len])
}

impl<B: Backend> Batcher<PairSample, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<PairSample>) -> PairBatch<B> {
        let batch_size = items.len();

        let lefts:  Vec<&[u32]> = items.iter().map(|s| s.left.as_slice()).collect();
        let rights: Vec<&[u32]> = items.iter().map(|s| s.right.as_slice()).collect();
        let labels: Vec<f32>    = items.iter().map(|s| s.label).collect();

        PairBatch {
            left:   stack_ids(&lefts, &self.device),
            right:  stack_ids(&rights, &self.device),
            labels: Tensor::<B, 1>::from_floats(labels.as_slice(), &self.device)
                .reshape([batch_size, 1]),
        }
    }
}
